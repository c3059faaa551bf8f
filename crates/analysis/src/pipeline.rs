//! End-to-end analysis run
//!
//! One run is a sequential batch pass:
//! build -> cluster -> potentials -> assign -> score,
//! branching onto the corpus-wide fallback when clustering does not
//! converge. The only fatal abort is invalid graph input, raised
//! before any computation starts.

use crate::cluster::LeidenDetector;
use crate::graph::GraphBuilder;
use crate::journals::JournalAssigner;
use crate::potential::PotentialCalculator;
use crate::snip::{SnipCalculator, SnipResult, SnipScore};
use chrono::{DateTime, Utc};
use citemetrics_common::config::AppConfig;
use citemetrics_common::errors::{AnalysisError, Result};
use citemetrics_common::metrics::{record_clustering, record_graph, record_scoring, RunMetrics};
use citemetrics_common::models::{CitationRecord, PaperRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnipReport {
    /// Per-journal results; journals without papers are absent
    pub results: HashMap<Uuid, SnipResult>,

    /// Papers in the graph
    pub paper_count: usize,

    /// Retained citation edges
    pub edge_count: usize,

    /// Communities found (0 on the fallback path)
    pub community_count: usize,

    /// Corpus-wide mean citations received
    pub global_potential: f64,

    /// Whether the whole run scored against the global potential
    pub used_global_fallback: bool,

    /// When the run finished
    pub computed_at: DateTime<Utc>,
}

/// Execute one full analysis run over the given records
pub fn run(
    papers: &[PaperRecord],
    citations: &[CitationRecord],
    config: &AppConfig,
) -> Result<SnipReport> {
    config.validate()?;
    let run_metrics = RunMetrics::start();

    let graph = GraphBuilder::build(papers, citations)?;
    record_graph(graph.node_count(), graph.edge_count());
    info!(
        papers = graph.node_count(),
        edges = graph.edge_count(),
        "citation graph built"
    );

    let potential_calc = PotentialCalculator::new(config.scoring.min_community_size);
    let global_potential = potential_calc.global_potential(&graph);
    let snip_calc = SnipCalculator::new(config.scoring.min_community_size);

    let detector = LeidenDetector::new(config.clustering.clone());
    let (results, community_count, used_global_fallback) = match detector.detect(&graph) {
        Ok(partition) => {
            info!(
                communities = partition.len(),
                passes = partition.passes(),
                "clustering converged"
            );
            record_clustering(partition.passes(), partition.len(), true);

            let potentials = potential_calc.community_potentials(&graph, &partition);
            debug!(potentials = potentials.len(), "community potentials computed");

            let distributions = JournalAssigner::assign(&graph, &partition);
            debug!(journals = distributions.len(), "journals assigned");

            let results =
                snip_calc.calculate(&partition, &distributions, &potentials, global_potential);
            (results, partition.len(), false)
        }
        Err(err @ AnalysisError::ClusteringDidNotConverge { .. }) => {
            warn!(error = %err, "clustering did not converge, scoring against global potential");
            if let AnalysisError::ClusteringDidNotConverge { passes } = err {
                record_clustering(passes, 0, false);
            }

            let results = snip_calc.calculate_fallback(&graph, global_potential);
            (results, 0, true)
        }
        Err(err) => return Err(err),
    };

    let undefined = results
        .values()
        .filter(|r| matches!(r.score, SnipScore::Undefined { .. }))
        .count();
    record_scoring(results.len(), undefined);
    info!(
        journals = results.len(),
        undefined,
        fallback = used_global_fallback,
        "run scored"
    );

    run_metrics.finish(if used_global_fallback {
        "fallback"
    } else {
        "community"
    });

    Ok(SnipReport {
        paper_count: graph.node_count(),
        edge_count: graph.edge_count(),
        community_count,
        global_potential,
        used_global_fallback,
        computed_at: Utc::now(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: u128, journal: u128, citations: u32) -> PaperRecord {
        PaperRecord::new(Uuid::from_u128(id), Uuid::from_u128(journal), 2023, citations)
    }

    fn edge(citing: u128, cited: u128) -> CitationRecord {
        CitationRecord::new(Uuid::from_u128(citing), Uuid::from_u128(cited))
    }

    /// Papers A:5, B:3, C:0, D:10 in two tight clusters {A,B} and
    /// {C,D}; journal 10 owns A and B, journal 11 owns C and D.
    fn two_journal_corpus() -> (Vec<PaperRecord>, Vec<CitationRecord>) {
        let papers = vec![
            paper(1, 10, 5),
            paper(2, 10, 3),
            paper(3, 11, 0),
            paper(4, 11, 10),
        ];
        let citations = vec![edge(1, 2), edge(2, 1), edge(3, 4), edge(4, 3)];
        (papers, citations)
    }

    #[test]
    fn test_end_to_end_two_communities() {
        let (papers, citations) = two_journal_corpus();
        let report = run(&papers, &citations, &AppConfig::default()).unwrap();

        assert_eq!(report.paper_count, 4);
        assert_eq!(report.community_count, 2);
        assert!(!report.used_global_fallback);
        assert_eq!(report.global_potential, 4.5);

        // {A,B} potential 4.0, journal mean (5+3)/2 = 4.0 => SNIP 1.0
        let journal = &report.results[&Uuid::from_u128(10)];
        assert_eq!(
            journal.score,
            SnipScore::Community {
                potential: 4.0,
                value: 1.0
            }
        );

        // {C,D} potential 5.0, journal mean 5.0 => SNIP 1.0
        let other = &report.results[&Uuid::from_u128(11)];
        assert_eq!(
            other.score,
            SnipScore::Community {
                potential: 5.0,
                value: 1.0
            }
        );
    }

    #[test]
    fn test_forced_fallback_scores_every_journal_globally() {
        let (papers, citations) = two_journal_corpus();
        let mut config = AppConfig::default();
        config.clustering.max_aggregation_passes = 0;

        let report = run(&papers, &citations, &config).unwrap();

        assert!(report.used_global_fallback);
        assert_eq!(report.community_count, 0);
        for result in report.results.values() {
            assert!(result.score.used_fallback());
            assert_eq!(result.score.potential(), report.global_potential);
        }
    }

    #[test]
    fn test_invalid_input_aborts_run() {
        let papers = vec![paper(1, 10, 1)];
        let citations = vec![edge(1, 2)];

        let err = run(&papers, &citations, &AppConfig::default()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_config_aborts_run() {
        let (papers, citations) = two_journal_corpus();
        let mut config = AppConfig::default();
        config.clustering.resolution = -1.0;

        let err = run(&papers, &citations, &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration { .. }));
    }

    #[test]
    fn test_zero_citation_corpus_is_undefined_not_nan() {
        let papers = vec![paper(1, 10, 0), paper(2, 10, 0)];
        let citations = vec![edge(1, 2), edge(2, 1)];

        let report = run(&papers, &citations, &AppConfig::default()).unwrap();

        let journal = &report.results[&Uuid::from_u128(10)];
        assert_eq!(journal.score.value(), None);
        assert_eq!(journal.score, SnipScore::Undefined { potential: 0.0 });
    }

    #[test]
    fn test_runs_are_reproducible() {
        let (papers, citations) = two_journal_corpus();
        let config = AppConfig::default();

        let first = run(&papers, &citations, &config).unwrap();
        let second = run(&papers, &citations, &config).unwrap();

        assert_eq!(first.results, second.results);
        assert_eq!(first.community_count, second.community_count);
    }

    #[test]
    fn test_empty_corpus() {
        let report = run(&[], &[], &AppConfig::default()).unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.global_potential, 0.0);
    }
}
