//! Community detection over the citation graph
//!
//! Partitions papers into topical communities by iterative modularity
//! optimization (local moving + aggregation)

mod leiden;

pub use leiden::LeidenDetector;

use crate::graph::CitationGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Community identifier, consecutive from 0 within one partition
pub type CommunityId = u32;

/// A detected community
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    /// Community ID
    pub id: CommunityId,

    /// Member paper ids, sorted
    pub members: Vec<Uuid>,

    /// Total citations received by members
    pub total_citations: u64,
}

impl Community {
    /// Get member count
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Mean citations received across members
    pub fn mean_citations(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.total_citations as f64 / self.members.len() as f64
    }
}

/// A disjoint partition of the graph's papers into communities
///
/// Invariant: every paper belongs to exactly one community.
#[derive(Debug)]
pub struct Partition {
    assignments: HashMap<Uuid, CommunityId>,
    communities: Vec<Community>,
    passes: u32,
}

impl Partition {
    /// Build a partition from per-arena-index community labels.
    ///
    /// Labels are renumbered consecutively in order of each
    /// community's smallest member index; with the arena sorted by
    /// paper id this makes ids reproducible across runs.
    pub(crate) fn from_labels(graph: &CitationGraph, labels: &[usize], passes: u32) -> Self {
        debug_assert_eq!(labels.len(), graph.node_count());

        let mut remap: HashMap<usize, CommunityId> = HashMap::new();
        let mut communities: Vec<Community> = Vec::new();
        let mut assignments = HashMap::with_capacity(labels.len());

        for (idx, &label) in labels.iter().enumerate() {
            let next = communities.len() as CommunityId;
            let id = *remap.entry(label).or_insert_with(|| {
                communities.push(Community {
                    id: next,
                    members: Vec::new(),
                    total_citations: 0,
                });
                next
            });

            let paper = graph.paper(idx);
            let community = &mut communities[id as usize];
            community.members.push(paper.id);
            community.total_citations += u64::from(paper.citations_received);
            assignments.insert(paper.id, id);
        }

        Self {
            assignments,
            communities,
            passes,
        }
    }

    /// Community assignment for a paper
    pub fn community_of(&self, paper: Uuid) -> Option<CommunityId> {
        self.assignments.get(&paper).copied()
    }

    /// All communities, indexed by id
    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    /// Community by id
    pub fn community(&self, id: CommunityId) -> Option<&Community> {
        self.communities.get(id as usize)
    }

    /// Paper -> community mapping
    pub fn assignments(&self) -> &HashMap<Uuid, CommunityId> {
        &self.assignments
    }

    /// Number of communities
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// Whether the partition is empty
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Aggregation passes the detector ran
    pub fn passes(&self) -> u32 {
        self.passes
    }
}
