//! Domain records exchanged at the ingestion boundary
//!
//! The ingestion collaborator hands the engine flat paper and citation
//! records; no ordering is assumed and duplicates are legal input.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper ID
    pub id: Uuid,

    /// Owning journal ID
    pub journal_id: Uuid,

    /// Publication year
    pub year: i32,

    /// Citations received within the corpus window. Authoritative for
    /// scoring; the edge set may not cover all of them.
    pub citations_received: u32,
}

impl PaperRecord {
    /// Create a new paper record
    pub fn new(id: Uuid, journal_id: Uuid, year: i32, citations_received: u32) -> Self {
        Self {
            id,
            journal_id,
            year,
            citations_received,
        }
    }
}

/// Citation record (directed: citing -> cited)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Paper that contains the citation
    pub citing_id: Uuid,

    /// Paper that is being cited
    pub cited_id: Uuid,
}

impl CitationRecord {
    /// Create a new citation record
    pub fn new(citing_id: Uuid, cited_id: Uuid) -> Self {
        Self { citing_id, cited_id }
    }

    /// Check if this citation is a self-citation
    pub fn is_self_citation(&self) -> bool {
        self.citing_id == self.cited_id
    }
}
