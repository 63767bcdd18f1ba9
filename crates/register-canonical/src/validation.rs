use thiserror::Error;

/// Validation errors for textual identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Name of the identifier that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a value names an algorithm this crate cannot compute.
    #[error("unsupported {field} '{value}'")]
    Unsupported {
        /// Name of the identifier that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
