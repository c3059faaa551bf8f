//! Journal-level aggregation of community memberships
//!
//! A journal's papers may be split across communities; its citation
//! potential is then a blend of community potentials weighted by the
//! fraction of its papers in each.

use crate::cluster::{CommunityId, Partition};
use crate::graph::CitationGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Per-journal distribution of papers over communities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalCommunityDistribution {
    /// Journal ID
    pub journal_id: Uuid,

    /// Papers of this journal in the graph
    pub paper_count: usize,

    /// Total citations received by this journal's papers
    pub total_citations: u64,

    /// Community id -> member-paper count
    members_by_community: HashMap<CommunityId, usize>,
}

impl JournalCommunityDistribution {
    /// Member-paper counts per community
    pub fn members_by_community(&self) -> &HashMap<CommunityId, usize> {
        &self.members_by_community
    }

    /// Fraction of this journal's papers in a community
    pub fn community_fraction(&self, community: CommunityId) -> f64 {
        if self.paper_count == 0 {
            return 0.0;
        }
        let members = self.members_by_community.get(&community).copied().unwrap_or(0);
        members as f64 / self.paper_count as f64
    }

    /// Mean citations received across this journal's papers
    pub fn mean_citations(&self) -> f64 {
        if self.paper_count == 0 {
            return 0.0;
        }
        self.total_citations as f64 / self.paper_count as f64
    }

    /// Blended potential: community potentials weighted by the
    /// journal's member-paper fractions
    pub fn blended_potential(&self, potentials: &HashMap<CommunityId, f64>) -> f64 {
        self.members_by_community
            .iter()
            .map(|(community, &members)| {
                let potential = potentials.get(community).copied().unwrap_or(0.0);
                potential * members as f64 / self.paper_count as f64
            })
            .sum()
    }

    /// Whether every community holding this journal's papers is below
    /// the reliability threshold
    pub fn all_below_threshold(&self, partition: &Partition, min_size: usize) -> bool {
        self.members_by_community.keys().all(|&community| {
            partition
                .community(community)
                .map(|c| c.member_count() < min_size)
                .unwrap_or(true)
        })
    }
}

/// Aggregates per-paper community memberships into journal distributions
pub struct JournalAssigner;

impl JournalAssigner {
    /// Tally member papers per community for each journal.
    ///
    /// Journals with zero papers in the graph never appear; their SNIP
    /// is undefined and surfaced as absent, not zero.
    pub fn assign(
        graph: &CitationGraph,
        partition: &Partition,
    ) -> HashMap<Uuid, JournalCommunityDistribution> {
        let mut distributions: HashMap<Uuid, JournalCommunityDistribution> = HashMap::new();

        for paper in graph.papers() {
            let community = match partition.community_of(paper.id) {
                Some(community) => community,
                None => continue,
            };

            let distribution = distributions.entry(paper.journal_id).or_insert_with(|| {
                JournalCommunityDistribution {
                    journal_id: paper.journal_id,
                    paper_count: 0,
                    total_citations: 0,
                    members_by_community: HashMap::new(),
                }
            });

            distribution.paper_count += 1;
            distribution.total_citations += u64::from(paper.citations_received);
            *distribution
                .members_by_community
                .entry(community)
                .or_insert(0) += 1;
        }

        distributions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::LeidenDetector;
    use crate::graph::GraphBuilder;
    use citemetrics_common::config::ClusteringConfig;
    use citemetrics_common::models::{CitationRecord, PaperRecord};

    fn paper(id: u128, journal: u128, citations: u32) -> PaperRecord {
        PaperRecord::new(Uuid::from_u128(id), Uuid::from_u128(journal), 2023, citations)
    }

    fn edge(citing: u128, cited: u128) -> CitationRecord {
        CitationRecord::new(Uuid::from_u128(citing), Uuid::from_u128(cited))
    }

    fn split_journal_fixture() -> (crate::graph::CitationGraph, Partition) {
        // journal 10 owns {1,2,3}: papers 1,2 cluster together, 3
        // clusters with journal 11's paper 4
        let papers = vec![
            paper(1, 10, 4),
            paper(2, 10, 2),
            paper(3, 10, 6),
            paper(4, 11, 2),
        ];
        let citations = vec![edge(1, 2), edge(2, 1), edge(3, 4), edge(4, 3)];
        let graph = GraphBuilder::build(&papers, &citations).unwrap();
        let partition = LeidenDetector::new(ClusteringConfig::default())
            .detect(&graph)
            .unwrap();
        (graph, partition)
    }

    #[test]
    fn test_distribution_tally() {
        let (graph, partition) = split_journal_fixture();
        let distributions = JournalAssigner::assign(&graph, &partition);

        let journal = &distributions[&Uuid::from_u128(10)];
        assert_eq!(journal.paper_count, 3);
        assert_eq!(journal.total_citations, 12);
        assert_eq!(journal.members_by_community().len(), 2);

        let first = partition.community_of(Uuid::from_u128(1)).unwrap();
        let second = partition.community_of(Uuid::from_u128(3)).unwrap();
        assert!((journal.community_fraction(first) - 2.0 / 3.0).abs() < 1e-12);
        assert!((journal.community_fraction(second) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_blended_potential_weights_by_fraction() {
        let (graph, partition) = split_journal_fixture();
        let distributions = JournalAssigner::assign(&graph, &partition);

        let first = partition.community_of(Uuid::from_u128(1)).unwrap();
        let second = partition.community_of(Uuid::from_u128(3)).unwrap();
        let potentials: HashMap<CommunityId, f64> =
            [(first, 3.0), (second, 4.0)].into_iter().collect();

        let journal = &distributions[&Uuid::from_u128(10)];
        let blended = journal.blended_potential(&potentials);
        assert!((blended - (3.0 * 2.0 / 3.0 + 4.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_journal_without_papers_is_absent() {
        let (graph, partition) = split_journal_fixture();
        let distributions = JournalAssigner::assign(&graph, &partition);

        assert_eq!(distributions.len(), 2);
        assert!(!distributions.contains_key(&Uuid::from_u128(99)));
    }

    #[test]
    fn test_all_below_threshold() {
        // two isolated papers: both singleton communities
        let papers = vec![paper(1, 10, 1), paper(2, 10, 3)];
        let graph = GraphBuilder::build(&papers, &[]).unwrap();
        let partition = LeidenDetector::new(ClusteringConfig::default())
            .detect(&graph)
            .unwrap();
        let distributions = JournalAssigner::assign(&graph, &partition);

        let journal = &distributions[&Uuid::from_u128(10)];
        assert!(journal.all_below_threshold(&partition, 2));
        assert!(!journal.all_below_threshold(&partition, 1));
    }

    #[test]
    fn test_mean_citations() {
        let (graph, partition) = split_journal_fixture();
        let distributions = JournalAssigner::assign(&graph, &partition);

        assert_eq!(distributions[&Uuid::from_u128(10)].mean_citations(), 4.0);
        assert_eq!(distributions[&Uuid::from_u128(11)].mean_citations(), 2.0);
    }
}
