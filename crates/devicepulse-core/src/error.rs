//! Error taxonomy shared across the telemetry crates.
//!
//! Two faults matter at the store/API boundary: a payload that fails schema
//! validation ([`ValidationError`], surfaced as a 400 response) and a fault
//! inside the store itself ([`StoreError`], surfaced as a 500). Missing
//! sensor capabilities are not errors — the adapter falls back to mock
//! generation silently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection raised when a create payload fails schema validation.
///
/// Carries a human-readable message plus the path of the offending field.
/// Serializes directly as the 400 response body: `{"message": ..., "field": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub message: String,
    /// Path of the offending field (e.g. `"toolName"`).
    pub field: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }
}

/// Fault inside the telemetry store.
///
/// There is no recovery path inside the store; callers decide whether to
/// retry or fail fast.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt {table} journal line {line}: {reason}")]
    CorruptJournal {
        table: &'static str,
        line: usize,
        reason: String,
    },
}
