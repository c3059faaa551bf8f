//! Metrics and observability utilities
//!
//! Provides run-level metrics with standardized naming conventions.
//! Exporter wiring is the embedding binary's concern.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use std::time::Instant;

/// Metrics prefix for all citemetrics metrics
pub const METRICS_PREFIX: &str = "citemetrics";

/// Histogram buckets for analysis run duration (in seconds).
/// Runs are batch-shaped; the tail is minutes, not milliseconds.
pub const RUN_DURATION_BUCKETS: &[f64] = &[
    0.010,  // 10ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
    60.00,  // 1m
    300.0,  // 5m
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Run metrics
    describe_counter!(
        format!("{}_runs_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of analysis runs"
    );

    describe_histogram!(
        format!("{}_run_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Analysis run duration in seconds"
    );

    // Graph metrics
    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Number of papers in the citation graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Number of retained citation edges"
    );

    // Clustering metrics
    describe_counter!(
        format!("{}_clustering_passes_total", METRICS_PREFIX),
        Unit::Count,
        "Total aggregation passes across runs"
    );

    describe_gauge!(
        format!("{}_clustering_communities", METRICS_PREFIX),
        Unit::Count,
        "Communities found by the last clustering run"
    );

    describe_counter!(
        format!("{}_clustering_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Runs that degraded to the corpus-wide fallback path"
    );

    // Scoring metrics
    describe_counter!(
        format!("{}_journals_scored_total", METRICS_PREFIX),
        Unit::Count,
        "Total journals scored"
    );

    describe_counter!(
        format!("{}_journals_undefined_total", METRICS_PREFIX),
        Unit::Count,
        "Journals with an undefined score (zero potential)"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record run metrics
pub struct RunMetrics {
    start: Instant,
}

impl RunMetrics {
    /// Start tracking an analysis run
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Record run completion
    pub fn finish(self, path: &str) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_runs_total", METRICS_PREFIX),
            "path" => path.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_run_duration_seconds", METRICS_PREFIX),
            "path" => path.to_string()
        )
        .record(duration);
    }
}

/// Helper to record graph construction metrics
pub fn record_graph(nodes: usize, edges: usize) {
    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edges as f64);
}

/// Helper to record clustering metrics
pub fn record_clustering(passes: u32, communities: usize, converged: bool) {
    counter!(format!("{}_clustering_passes_total", METRICS_PREFIX)).increment(passes as u64);

    if converged {
        gauge!(format!("{}_clustering_communities", METRICS_PREFIX)).set(communities as f64);
    } else {
        counter!(format!("{}_clustering_fallbacks_total", METRICS_PREFIX)).increment(1);
    }
}

/// Helper to record scoring metrics
pub fn record_scoring(scored: usize, undefined: usize) {
    counter!(format!("{}_journals_scored_total", METRICS_PREFIX)).increment(scored as u64);
    counter!(format!("{}_journals_undefined_total", METRICS_PREFIX)).increment(undefined as u64);
}
