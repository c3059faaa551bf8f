//! Citemetrics Common Library
//!
//! Shared code for the citemetrics analysis engine and its collaborators:
//! - Domain records exchanged at the ingestion boundary
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AnalysisError, Result};
pub use models::{CitationRecord, PaperRecord};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default modularity resolution (community granularity)
pub const DEFAULT_RESOLUTION: f64 = 1.0;

/// Default clustering seed
pub const DEFAULT_SEED: u64 = 42;
