//! Canonical records and content hashes for register log entries.
//!
//! A record is a list of field name / raw value pairs. Together with the
//! register's field metadata it is rendered into exactly one JSON object
//! string, and that string is hashed to address the entry. Every byte that
//! participates in hashing is produced by this crate.
//!
#![deny(missing_docs)]

/// Record canonicalization into deterministic JSON.
pub mod canonicalizer;
/// Content hash primitives.
pub mod digest;
/// Per-field value encoding.
pub mod encoder;
/// Field metadata model (cardinality and datatype per field).
pub mod field;
/// Validated identifiers such as entry timestamps.
pub mod identifiers;
/// Validation helpers used by identifier types.
pub mod validation;

pub use canonicalizer::{
    CanonicalRecord, CanonicalizationError, Canonicalizer, FieldOrder, RawRecord,
};
pub use digest::{ContentHash, HashAlg};
pub use encoder::{encode_value, escape, is_absent};
pub use field::{Cardinality, Datatype, FieldCatalog, FieldDefinition, MetadataError};
pub use identifiers::Timestamp;
pub use validation::ValidationError;
