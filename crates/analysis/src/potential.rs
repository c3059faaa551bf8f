//! Citation potential baselines
//!
//! The normalization denominator for SNIP: expected citations for a
//! paper in a given community, with a corpus-wide mean as both the
//! small-community substitute and the standalone fallback baseline.

use crate::cluster::{CommunityId, Partition};
use crate::graph::CitationGraph;
use std::collections::HashMap;

/// Computes per-community and corpus-wide citation potentials
pub struct PotentialCalculator {
    min_community_size: usize,
}

impl PotentialCalculator {
    /// Create a calculator with the given reliability threshold
    pub fn new(min_community_size: usize) -> Self {
        Self { min_community_size }
    }

    /// Corpus-wide mean citations received; 0.0 for an empty corpus
    pub fn global_potential(&self, graph: &CitationGraph) -> f64 {
        if graph.node_count() == 0 {
            return 0.0;
        }
        graph.total_citations() as f64 / graph.node_count() as f64
    }

    /// Per-community potential: mean citations received across
    /// members. Communities below the minimum size are statistically
    /// unreliable and take the global potential instead.
    pub fn community_potentials(
        &self,
        graph: &CitationGraph,
        partition: &Partition,
    ) -> HashMap<CommunityId, f64> {
        let global = self.global_potential(graph);

        partition
            .communities()
            .iter()
            .map(|community| {
                let potential = if community.member_count() < self.min_community_size {
                    global
                } else {
                    community.mean_citations()
                };
                (community.id, potential)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::LeidenDetector;
    use crate::graph::GraphBuilder;
    use citemetrics_common::config::ClusteringConfig;
    use citemetrics_common::models::{CitationRecord, PaperRecord};
    use uuid::Uuid;

    fn paper(id: u128, citations: u32) -> PaperRecord {
        PaperRecord::new(Uuid::from_u128(id), Uuid::from_u128(100), 2023, citations)
    }

    fn edge(citing: u128, cited: u128) -> CitationRecord {
        CitationRecord::new(Uuid::from_u128(citing), Uuid::from_u128(cited))
    }

    fn clustered(
        papers: &[PaperRecord],
        citations: &[CitationRecord],
    ) -> (crate::graph::CitationGraph, Partition) {
        let graph = GraphBuilder::build(papers, citations).unwrap();
        let partition = LeidenDetector::new(ClusteringConfig::default())
            .detect(&graph)
            .unwrap();
        (graph, partition)
    }

    #[test]
    fn test_global_potential_is_corpus_mean() {
        let papers = vec![paper(1, 5), paper(2, 3), paper(3, 0), paper(4, 10)];
        let graph = GraphBuilder::build(&papers, &[]).unwrap();

        let calc = PotentialCalculator::new(2);
        assert_eq!(calc.global_potential(&graph), 4.5);
    }

    #[test]
    fn test_global_potential_empty_corpus() {
        let graph = GraphBuilder::build(&[], &[]).unwrap();
        let calc = PotentialCalculator::new(2);
        assert_eq!(calc.global_potential(&graph), 0.0);
    }

    #[test]
    fn test_community_potentials_are_member_means() {
        // {1,2} and {3,4}: potentials 4.0 and 5.0
        let papers = vec![paper(1, 5), paper(2, 3), paper(3, 0), paper(4, 10)];
        let citations = vec![edge(1, 2), edge(2, 1), edge(3, 4), edge(4, 3)];
        let (graph, partition) = clustered(&papers, &citations);

        let calc = PotentialCalculator::new(2);
        let potentials = calc.community_potentials(&graph, &partition);

        let first = partition.community_of(Uuid::from_u128(1)).unwrap();
        let second = partition.community_of(Uuid::from_u128(3)).unwrap();
        assert_eq!(potentials[&first], 4.0);
        assert_eq!(potentials[&second], 5.0);
    }

    #[test]
    fn test_small_community_takes_global_potential() {
        // {1,2} plus isolated 3: singleton below the threshold of 2
        let papers = vec![paper(1, 6), paper(2, 2), paper(3, 1)];
        let citations = vec![edge(1, 2), edge(2, 1)];
        let (graph, partition) = clustered(&papers, &citations);

        let calc = PotentialCalculator::new(2);
        let potentials = calc.community_potentials(&graph, &partition);
        let global = calc.global_potential(&graph);

        let singleton = partition.community_of(Uuid::from_u128(3)).unwrap();
        assert_eq!(potentials[&singleton], global);
        assert_eq!(global, 3.0);
    }

    #[test]
    fn test_normalization_property() {
        // mean over papers of citations / community potential is 1.0
        // when every community is at or above the threshold
        let papers = vec![
            paper(1, 8),
            paper(2, 2),
            paper(3, 1),
            paper(4, 3),
            paper(5, 2),
        ];
        let citations = vec![
            edge(1, 2),
            edge(2, 1),
            edge(3, 4),
            edge(4, 5),
            edge(5, 3),
            edge(4, 3),
        ];
        let (graph, partition) = clustered(&papers, &citations);

        let calc = PotentialCalculator::new(2);
        let potentials = calc.community_potentials(&graph, &partition);

        let normalized_sum: f64 = graph
            .papers()
            .iter()
            .map(|p| {
                let community = partition.community_of(p.id).unwrap();
                f64::from(p.citations_received) / potentials[&community]
            })
            .sum();
        let corpus_mean = normalized_sum / graph.node_count() as f64;

        assert!((corpus_mean - 1.0).abs() < 1e-9);
    }
}
