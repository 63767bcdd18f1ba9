use register_canonical::{CanonicalizationError, ValidationError};
use thiserror::Error;

/// Errors that can occur during log operations.
#[derive(Error, Debug)]
pub enum LogError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A record could not be canonicalized.
    #[error("record {index}: {source}")]
    Canonicalization {
        /// Zero-based position of the record in the input.
        index: u64,
        /// Underlying failure.
        source: CanonicalizationError,
    },
    /// A line is not a well-formed `add-item` or `append-entry` line.
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// One-based line number.
        line: u64,
        /// Reason for rejection.
        reason: String,
    },
    /// A timestamp or hash field failed validation.
    #[error("invalid field on line {line}: {source}")]
    InvalidField {
        /// One-based line number.
        line: u64,
        /// Validation failure.
        source: ValidationError,
    },
    /// An item or entry line without its partner.
    #[error("unpaired {kind} line {line}")]
    Unpaired {
        /// Command of the orphaned line.
        kind: &'static str,
        /// One-based line number.
        line: u64,
    },
}
