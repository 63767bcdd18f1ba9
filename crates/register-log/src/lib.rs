//! Append-only log format for canonical register records.
//!
//! Every record becomes one log entry made of two tab-separated lines:
//!
//! ```text
//! add-item	{"country":"GB","name":"United Kingdom"}
//! append-entry	2021-01-01T00:00:00Z	sha256:<64 hex chars>
//! ```
//!
//! The item line carries the canonical JSON; the entry line references it by
//! the SHA-256 of exactly those bytes. Entries are independent of each other.
//!
//! This crate provides:
//! - [`LogEntry`] and [`emit`] to render the two lines
//! - [`LogWriter`] to write line pairs to any output stream
//! - [`LogReader`] and [`verify_log`] to read a log back and re-hash it
//! - [`Pipeline`] to drive records through canonicalize, hash and emit
//!
//! ## Quick Start
//!
//! ```rust
//! use register_canonical::{Canonicalizer, FieldCatalog, RawRecord, Timestamp};
//! use register_log::{LogEntry, LogWriter, WriteOptions};
//!
//! let mut catalog = FieldCatalog::new();
//! catalog.insert_tags("country", "1", "string")?;
//! let canonicalizer = Canonicalizer::new(catalog);
//!
//! let record: RawRecord = [("country", "GB")].into_iter().collect();
//! let item = canonicalizer.canonicalize(&record)?;
//! let entry = LogEntry::new(item, Timestamp::parse("2021-01-01T00:00:00Z")?);
//!
//! let mut writer = LogWriter::new(Vec::new(), WriteOptions::default());
//! writer.append(&entry)?;
//! let out = String::from_utf8(writer.finish()?)?;
//! assert!(out.starts_with("add-item\t{\"country\":\"GB\"}\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Log entry type and line rendering.
pub mod entry;
/// Error types for log operations.
pub mod errors;
/// Record-by-record serialization with an explicit error policy.
pub mod pipeline;
/// Log reader implementation.
pub mod reader;
/// Verification of recorded entries.
pub mod verification;
/// Log writer implementation.
pub mod writer;

pub use entry::{emit, LogEntry, ADD_ITEM, APPEND_ENTRY};
pub use errors::LogError;
pub use pipeline::{ErrorPolicy, Pipeline, PipelineReport, SkippedRecord};
pub use reader::{LineOrder, LogReader, ReadMode, RecordedEntry};
pub use verification::{
    verify_entry, verify_log, EntryVerdict, VerificationFailure, VerificationSummary,
};
pub use writer::{LogWriter, WriteOptions};
