//! Leiden-style community detection
//!
//! Iterative local moving + aggregation over the symmetrized citation
//! graph, optimizing modularity at a configurable resolution. The only
//! randomness is the node visitation order, drawn from a seeded RNG so
//! a (graph, resolution, seed) triple is fully reproducible.

use super::Partition;
use crate::graph::CitationGraph;
use citemetrics_common::config::ClusteringConfig;
use citemetrics_common::errors::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Community detector
pub struct LeidenDetector {
    config: ClusteringConfig,
}

/// Coarsened view of the graph at one aggregation level.
/// Self-loop weight w contributes 2w to a node's degree.
struct WorkingGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
    degrees: Vec<f64>,
    total_weight: f64,
}

impl WorkingGraph {
    fn from_citation_graph(graph: &CitationGraph) -> Self {
        let n = graph.node_count();
        let adjacency: Vec<Vec<(usize, f64)>> =
            (0..n).map(|idx| graph.neighbors(idx).to_vec()).collect();
        let degrees: Vec<f64> = adjacency
            .iter()
            .map(|list| list.iter().map(|&(_, w)| w).sum())
            .collect();
        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        Self {
            adjacency,
            self_loops: vec![0.0; n],
            degrees,
            total_weight,
        }
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Collapse communities into super-nodes with aggregated weights
    fn aggregate(&self, labels: &[usize], n_comms: usize) -> WorkingGraph {
        let mut self_loops = vec![0.0; n_comms];
        let mut pairs: HashMap<(usize, usize), f64> = HashMap::new();

        for v in 0..self.node_count() {
            let cv = labels[v];
            self_loops[cv] += self.self_loops[v];

            for &(u, w) in &self.adjacency[v] {
                // each undirected edge once
                if u <= v {
                    continue;
                }
                let cu = labels[u];
                if cu == cv {
                    self_loops[cv] += w;
                } else {
                    let key = if cv < cu { (cv, cu) } else { (cu, cv) };
                    *pairs.entry(key).or_insert(0.0) += w;
                }
            }
        }

        let mut adjacency = vec![Vec::new(); n_comms];
        for (&(a, b), &w) in &pairs {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
        for list in &mut adjacency {
            list.sort_unstable_by(|x, y| x.0.cmp(&y.0));
        }

        let degrees: Vec<f64> = (0..n_comms)
            .map(|c| {
                adjacency[c].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self_loops[c]
            })
            .collect();
        let total_weight = degrees.iter().sum::<f64>() / 2.0;

        WorkingGraph {
            adjacency,
            self_loops,
            degrees,
            total_weight,
        }
    }
}

impl LeidenDetector {
    /// Create a detector with the given configuration
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Partition the graph's papers into communities.
    ///
    /// Fails with `ClusteringDidNotConverge` when the optimization is
    /// still improving after `max_aggregation_passes`; callers treat
    /// that as the signal to score against the corpus-wide fallback.
    pub fn detect(&self, graph: &CitationGraph) -> Result<Partition> {
        if self.config.max_aggregation_passes == 0 {
            return Err(AnalysisError::ClusteringDidNotConverge { passes: 0 });
        }

        let n = graph.node_count();
        if n == 0 {
            return Ok(Partition::from_labels(graph, &[], 0));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut working = WorkingGraph::from_citation_graph(graph);

        // original node -> current super-node
        let mut membership: Vec<usize> = (0..n).collect();
        let mut converged = false;
        let mut passes = 0u32;

        while passes < self.config.max_aggregation_passes {
            passes += 1;

            let (mut labels, moved) = self.local_moving(&working, &mut rng);
            let n_comms = compact_labels(&mut labels);

            for slot in membership.iter_mut() {
                *slot = labels[*slot];
            }

            // a sweep with no accepted move is the fixed point
            if !moved || n_comms == working.node_count() {
                converged = true;
                break;
            }

            working = working.aggregate(&labels, n_comms);
        }

        if !converged {
            return Err(AnalysisError::ClusteringDidNotConverge { passes });
        }

        Ok(Partition::from_labels(graph, &membership, passes))
    }

    /// One level of greedy local moving.
    ///
    /// Each node moves to the neighboring community with the highest
    /// modularity gain; equal gains resolve to the lowest community id
    /// and staying put beats any move not exceeding `min_gain`. Sweeps
    /// repeat until a full sweep accepts no move.
    fn local_moving(&self, working: &WorkingGraph, rng: &mut StdRng) -> (Vec<usize>, bool) {
        let n = working.node_count();
        let mut comm: Vec<usize> = (0..n).collect();

        let two_m = 2.0 * working.total_weight;
        if two_m == 0.0 {
            // no edges: every node is its own community
            return (comm, false);
        }

        let resolution = self.config.resolution;
        let mut community_total: Vec<f64> = working.degrees.clone();
        let mut order: Vec<usize> = (0..n).collect();

        // scratch buffers keep the sweep allocation-free
        let mut weight_to: Vec<f64> = vec![0.0; n];
        let mut touched: Vec<usize> = Vec::with_capacity(16);

        let mut improved = false;
        loop {
            let mut moves = 0usize;
            order.shuffle(rng);

            for &v in &order {
                let current = comm[v];
                let degree = working.degrees[v];

                for &(u, w) in &working.adjacency[v] {
                    let c = comm[u];
                    if weight_to[c] == 0.0 {
                        touched.push(c);
                    }
                    weight_to[c] += w;
                }
                if !touched.contains(&current) {
                    touched.push(current);
                }
                touched.sort_unstable();

                // evaluate with v lifted out of its community
                community_total[current] -= degree;

                let stay_gain = weight_to[current]
                    - resolution * degree * community_total[current] / two_m;
                let mut best_comm = current;
                let mut best_gain = stay_gain;

                // ascending candidate order: equal gains keep the lowest id
                for &c in &touched {
                    if c == current {
                        continue;
                    }
                    let gain = weight_to[c] - resolution * degree * community_total[c] / two_m;
                    if gain > best_gain {
                        best_gain = gain;
                        best_comm = c;
                    }
                }

                if best_comm != current && best_gain - stay_gain > self.config.min_gain {
                    comm[v] = best_comm;
                    moves += 1;
                }
                community_total[comm[v]] += degree;

                for &c in &touched {
                    weight_to[c] = 0.0;
                }
                touched.clear();
            }

            if moves == 0 {
                break;
            }
            improved = true;
        }

        (comm, improved)
    }
}

/// Renumber labels consecutively in first-appearance order
fn compact_labels(labels: &mut [usize]) -> usize {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    for label in labels.iter_mut() {
        let next = remap.len();
        *label = *remap.entry(*label).or_insert(next);
    }
    remap.len()
}
