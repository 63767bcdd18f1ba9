//! Verification helpers for recorded entries.

use crate::errors::LogError;
use crate::reader::{LogReader, RecordedEntry};
use register_canonical::ContentHash;
use serde::Serialize;
use serde_json::Value;
use std::io::BufRead;

/// Outcome of checking one recorded entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum EntryVerdict {
    /// The item re-hashes to the claimed hash.
    Ok,
    /// The item's hash differs from the one on the entry line.
    HashMismatch {
        /// Hash of the item as logged.
        computed: ContentHash,
    },
    /// The item is not a JSON object.
    InvalidItem {
        /// Why the item was rejected.
        reason: String,
    },
}

/// Re-hashes an entry's item and compares it with the claimed hash.
pub fn verify_entry(entry: &RecordedEntry) -> EntryVerdict {
    match serde_json::from_str::<Value>(&entry.item) {
        Ok(Value::Object(_)) => {}
        Ok(_) => {
            return EntryVerdict::InvalidItem {
                reason: "item is not a JSON object".to_string(),
            }
        }
        Err(e) => {
            return EntryVerdict::InvalidItem {
                reason: e.to_string(),
            }
        }
    }

    if entry.hash.matches(entry.item.as_bytes()) {
        EntryVerdict::Ok
    } else {
        EntryVerdict::HashMismatch {
            computed: ContentHash::of(entry.item.as_bytes()),
        }
    }
}

/// A failed entry in a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationFailure {
    /// Line of the entry's first line.
    pub line: u64,
    /// Hash claimed by the entry line.
    pub claimed: ContentHash,
    /// What went wrong.
    #[serde(flatten)]
    pub verdict: EntryVerdict,
}

/// Totals for a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationSummary {
    /// Entries read.
    pub entries: u64,
    /// Entries whose verdict was not [`EntryVerdict::Ok`].
    pub failures: Vec<VerificationFailure>,
}

impl VerificationSummary {
    /// Returns `true` when every entry verified.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reads every entry from `reader` and verifies it.
///
/// # Errors
///
/// Propagates reader errors (I/O, and malformed lines in strict mode).
pub fn verify_log<R: BufRead>(reader: &mut LogReader<R>) -> Result<VerificationSummary, LogError> {
    let mut summary = VerificationSummary::default();
    while let Some(entry) = reader.read_entry()? {
        summary.entries += 1;
        let verdict = verify_entry(&entry);
        if verdict != EntryVerdict::Ok {
            tracing::debug!(line = entry.line, hash = %entry.hash, ?verdict, "entry failed verification");
            summary.failures.push(VerificationFailure {
                line: entry.line,
                claimed: entry.hash,
                verdict,
            });
        }
    }
    Ok(summary)
}
