//! Error types for ingest operations.

use register_canonical::CanonicalizationError;
use thiserror::Error;

/// Errors that can occur while reading source data.
#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O error while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Tab-separated input could not be read.
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Tab-separated input has no header row.
    #[error("TSV input has no header row")]
    MissingHeader,
    /// A YAML document could not be parsed.
    #[error("failed to parse YAML in {origin}: {source}")]
    Yaml {
        /// File path or other description of the input.
        origin: String,
        /// Parser error.
        source: serde_yaml::Error,
    },
    /// A YAML document has a shape that cannot become a flat record.
    #[error("unsupported YAML in {origin} at '{key}': {reason}")]
    UnsupportedYaml {
        /// File path or other description of the input.
        origin: String,
        /// Top-level key of the offending value.
        key: String,
        /// What is unsupported.
        reason: String,
    },
    /// Field metadata is not valid JSON or has an unexpected shape.
    #[error("field metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A field record lacks something the catalog needs.
    #[error("invalid field record: {0}")]
    FieldRecord(String),
    /// A field record carries an unknown cardinality or datatype.
    #[error(transparent)]
    Metadata(#[from] CanonicalizationError),
}
