//! Input adapters that turn register source data into raw records.
//!
//! This crate provides:
//! - `RecordSource` trait for anything that yields raw records in order
//! - TSV adapter: one record per row, header row names the fields
//! - YAML adapter: one record per document, top-level keys name the fields
//! - Field metadata loader producing a `FieldCatalog` from JSON
//!
//! Adapters do no encoding; everything they produce goes through
//! `register_canonical::Canonicalizer`.

#![deny(missing_docs)]

/// Error types for ingest operations.
pub mod error;
/// Field metadata loading.
pub mod metadata;
/// Record source trait.
pub mod traits;
/// Tab-separated input.
pub mod tsv;
/// YAML document input.
pub mod yaml;

pub use error::IngestError;
pub use metadata::{load_field_catalog, load_field_catalog_file};
pub use traits::{RecordSource, Records};
pub use tsv::TsvSource;
pub use yaml::{record_from_yaml, YamlSource};
