//! SNIP scoring
//!
//! Source Normalized Impact per Paper: a journal's mean citations
//! divided by the citation potential of its subject field. The score
//! is a tagged variant so downstream handling of the community,
//! fallback, and undefined outcomes stays exhaustive.

use crate::cluster::{CommunityId, Partition};
use crate::graph::CitationGraph;
use crate::journals::JournalCommunityDistribution;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// SNIP score outcome for one journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum SnipScore {
    /// Scored against the blended community potential
    Community { potential: f64, value: f64 },

    /// Scored against the corpus-wide potential: clustering failed
    /// globally, or every community of the journal was below the
    /// reliability threshold
    Fallback { potential: f64, value: f64 },

    /// Potential was zero; the ratio is undefined, never NaN
    Undefined { potential: f64 },
}

impl SnipScore {
    /// The score value, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            SnipScore::Community { value, .. } | SnipScore::Fallback { value, .. } => Some(*value),
            SnipScore::Undefined { .. } => None,
        }
    }

    /// The potential used as denominator
    pub fn potential(&self) -> f64 {
        match self {
            SnipScore::Community { potential, .. }
            | SnipScore::Fallback { potential, .. }
            | SnipScore::Undefined { potential } => *potential,
        }
    }

    /// Whether the fallback computation produced this score
    pub fn used_fallback(&self) -> bool {
        matches!(self, SnipScore::Fallback { .. })
    }
}

/// SNIP result for one journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnipResult {
    /// Journal ID
    pub journal_id: Uuid,

    /// Papers of this journal in the graph
    pub paper_count: usize,

    /// Raw mean citations received by the journal's papers
    pub mean_citations: f64,

    /// Score outcome
    pub score: SnipScore,
}

/// Computes per-journal SNIP scores
pub struct SnipCalculator {
    min_community_size: usize,
}

impl SnipCalculator {
    /// Create a calculator with the given reliability threshold
    pub fn new(min_community_size: usize) -> Self {
        Self { min_community_size }
    }

    /// Score each journal against its blended community potential.
    ///
    /// A journal whose papers all sit in below-threshold communities
    /// scores against the global potential with the fallback tag.
    pub fn calculate(
        &self,
        partition: &Partition,
        distributions: &HashMap<Uuid, JournalCommunityDistribution>,
        potentials: &HashMap<CommunityId, f64>,
        global_potential: f64,
    ) -> HashMap<Uuid, SnipResult> {
        distributions
            .iter()
            .map(|(&journal_id, distribution)| {
                let mean_citations = distribution.mean_citations();

                let score = if distribution.all_below_threshold(partition, self.min_community_size)
                {
                    Self::score(mean_citations, global_potential, true)
                } else {
                    let potential = distribution.blended_potential(potentials);
                    Self::score(mean_citations, potential, false)
                };

                (
                    journal_id,
                    SnipResult {
                        journal_id,
                        paper_count: distribution.paper_count,
                        mean_citations,
                        score,
                    },
                )
            })
            .collect()
    }

    /// Score every journal against the corpus-wide potential. Used
    /// when clustering did not converge.
    pub fn calculate_fallback(
        &self,
        graph: &CitationGraph,
        global_potential: f64,
    ) -> HashMap<Uuid, SnipResult> {
        let mut tallies: HashMap<Uuid, (usize, u64)> = HashMap::new();
        for paper in graph.papers() {
            let tally = tallies.entry(paper.journal_id).or_insert((0, 0));
            tally.0 += 1;
            tally.1 += u64::from(paper.citations_received);
        }

        tallies
            .into_iter()
            .map(|(journal_id, (paper_count, total_citations))| {
                let mean_citations = total_citations as f64 / paper_count as f64;
                (
                    journal_id,
                    SnipResult {
                        journal_id,
                        paper_count,
                        mean_citations,
                        score: Self::score(mean_citations, global_potential, true),
                    },
                )
            })
            .collect()
    }

    fn score(mean_citations: f64, potential: f64, fallback: bool) -> SnipScore {
        if potential <= 0.0 {
            return SnipScore::Undefined { potential };
        }
        let value = mean_citations / potential;
        if fallback {
            SnipScore::Fallback { potential, value }
        } else {
            SnipScore::Community { potential, value }
        }
    }
}
