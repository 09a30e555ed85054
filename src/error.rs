//! Error types for capability queries.

use std::fmt;
use thiserror::Error;

/// Which half of the two-call query protocol failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    /// Asking the provider how many bytes the property needs.
    Size,
    /// Asking the provider to fill the allocated buffer.
    Fill,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStage::Size => f.write_str("size query"),
            QueryStage::Fill => f.write_str("fill query"),
        }
    }
}

/// Errors produced while querying or decoding a property.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The provider reported a failure status for one of the round-trips.
    #[error("Failed to query {key} ({stage} returned status {status})")]
    ProviderQuery {
        key: String,
        stage: QueryStage,
        status: i32,
    },

    /// The property buffer does not hold a whole number of elements.
    #[error("Buffer of {len} bytes cannot be decoded as {width}-byte elements")]
    DecodeSizeMismatch { len: usize, width: usize },

    /// The key has no meaning for the requested operation.
    #[error("Unrecognised property: {key}")]
    UnknownKey { key: String },

    /// Platform or device enumeration failed.
    #[error("Failed to enumerate {what} (status {status})")]
    Enumeration { what: &'static str, status: i32 },
}

/// Result type for inspector operations.
pub type Result<T> = std::result::Result<T, InspectError>;
