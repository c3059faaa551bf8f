//! Citation graph representation
//!
//! Provides the in-memory citation graph the whole run operates on.
//! Nodes live in an arena sorted by paper id; adjacency is index-based
//! so the clustering hot loop never touches a Uuid.

use citemetrics_common::errors::{AnalysisError, Result};
use citemetrics_common::models::{CitationRecord, PaperRecord};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// In-memory citation graph
///
/// Directed structure is retained for degree bookkeeping; an
/// undirected symmetrized weight view is derived for clustering.
/// Isolated papers are kept — they still need a potential baseline.
#[derive(Debug)]
pub struct CitationGraph {
    /// Node arena, sorted by paper id
    papers: Vec<PaperRecord>,

    /// Paper id -> arena index
    index: HashMap<Uuid, usize>,

    /// Adjacency: index -> indices of papers it cites
    outgoing: Vec<Vec<usize>>,

    /// Reverse adjacency: index -> indices of papers citing it
    incoming: Vec<Vec<usize>>,

    /// Symmetrized weight view for clustering; a reciprocal citation
    /// pair carries weight 2.0
    undirected: Vec<Vec<(usize, f64)>>,

    /// Retained directed edges after dedup and self-citation drop
    edge_count: usize,
}

impl CitationGraph {
    /// Get node count
    pub fn node_count(&self) -> usize {
        self.papers.len()
    }

    /// Get retained directed edge count
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All papers in arena order
    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    /// Paper at an arena index
    pub fn paper(&self, idx: usize) -> &PaperRecord {
        &self.papers[idx]
    }

    /// Arena index for a paper id
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Undirected weighted neighbors of an arena index
    pub fn neighbors(&self, idx: usize) -> &[(usize, f64)] {
        &self.undirected[idx]
    }

    /// Get citation count within the edge set (incoming edges)
    pub fn citation_count(&self, id: Uuid) -> usize {
        self.index_of(id)
            .map(|idx| self.incoming[idx].len())
            .unwrap_or(0)
    }

    /// Get reference count within the edge set (outgoing edges)
    pub fn reference_count(&self, id: Uuid) -> usize {
        self.index_of(id)
            .map(|idx| self.outgoing[idx].len())
            .unwrap_or(0)
    }

    /// Sum of citations received across the corpus
    pub fn total_citations(&self) -> u64 {
        self.papers
            .iter()
            .map(|p| u64::from(p.citations_received))
            .sum()
    }
}

/// Builds a validated citation graph from raw records
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build a graph from paper and citation records.
    ///
    /// Deduplicates edges and drops self-citations. An edge endpoint
    /// missing from the paper set violates the caller's contract and
    /// fails the build; nothing is silently dropped.
    pub fn build(papers: &[PaperRecord], citations: &[CitationRecord]) -> Result<CitationGraph> {
        let mut arena: Vec<PaperRecord> = papers.to_vec();
        arena.sort_by_key(|p| p.id);

        for pair in arena.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(AnalysisError::InvalidGraphInput {
                    message: format!("duplicate paper id {}", pair[0].id),
                });
            }
        }

        let index: HashMap<Uuid, usize> = arena
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let n = arena.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut weights: HashMap<(usize, usize), f64> = HashMap::new();

        for citation in citations {
            if citation.is_self_citation() {
                continue;
            }

            let citing = *index.get(&citation.citing_id).ok_or_else(|| {
                AnalysisError::InvalidGraphInput {
                    message: format!(
                        "edge {} -> {} references unknown citing paper {}",
                        citation.citing_id, citation.cited_id, citation.citing_id
                    ),
                }
            })?;
            let cited = *index.get(&citation.cited_id).ok_or_else(|| {
                AnalysisError::InvalidGraphInput {
                    message: format!(
                        "edge {} -> {} references unknown cited paper {}",
                        citation.citing_id, citation.cited_id, citation.cited_id
                    ),
                }
            })?;

            if !seen.insert((citing, cited)) {
                continue;
            }

            outgoing[citing].push(cited);
            incoming[cited].push(citing);

            let key = if citing < cited {
                (citing, cited)
            } else {
                (cited, citing)
            };
            *weights.entry(key).or_insert(0.0) += 1.0;
        }

        let mut undirected = vec![Vec::new(); n];
        for (&(a, b), &w) in &weights {
            undirected[a].push((b, w));
            undirected[b].push((a, w));
        }

        for list in outgoing.iter_mut().chain(incoming.iter_mut()) {
            list.sort_unstable();
        }
        for list in &mut undirected {
            list.sort_unstable_by(|x, y| x.0.cmp(&y.0));
        }

        Ok(CitationGraph {
            papers: arena,
            index,
            outgoing,
            incoming,
            undirected,
            edge_count: seen.len(),
        })
    }
}
