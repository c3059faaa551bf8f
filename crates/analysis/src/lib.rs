//! Citemetrics Analysis Engine
//!
//! Computes journal-level, field-normalized citation impact (SNIP)
//! from publication and citation records:
//! - Citation graph construction with input validation
//! - Leiden-style community detection (seeded, reproducible)
//! - Per-community citation-potential baselines
//! - Journal assignment and blended potentials
//! - SNIP scoring with an explicit corpus-wide fallback path
//!
//! One run is a sequential in-memory batch pass; independent runs with
//! their own graphs and seeds may execute concurrently.

pub mod cluster;
pub mod graph;
pub mod journals;
pub mod pipeline;
pub mod potential;
pub mod snip;

// Re-export commonly used types
pub use cluster::{Community, CommunityId, LeidenDetector, Partition};
pub use graph::{CitationGraph, GraphBuilder};
pub use journals::{JournalAssigner, JournalCommunityDistribution};
pub use pipeline::{run, SnipReport};
pub use potential::PotentialCalculator;
pub use snip::{SnipCalculator, SnipResult, SnipScore};
