//! Record-by-record serialization.
//!
//! Canonicalization returns a `Result` per record; the pipeline applies an
//! [`ErrorPolicy`] to decide whether a failed record ends the run or is
//! reported and skipped. Emitted entries always keep input order.

use std::io::Write;

use register_canonical::{
    CanonicalizationError, Canonicalizer, ContentHash, FieldOrder, RawRecord, Timestamp,
};

use crate::entry::LogEntry;
use crate::errors::LogError;
use crate::writer::LogWriter;

/// What to do with a record that cannot be canonicalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort on the first failed record.
    #[default]
    FailFast,
    /// Log the failure, remember it, and continue with the next record.
    SkipInvalid,
}

/// A record left out of the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position of the record in the input.
    pub index: u64,
    /// Why it was skipped.
    pub error: CanonicalizationError,
}

/// Totals for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Entries written.
    pub emitted: u64,
    /// Records skipped under [`ErrorPolicy::SkipInvalid`].
    pub skipped: Vec<SkippedRecord>,
}

/// Drives raw records through canonicalize, hash and emit.
///
/// The field order of the most recent header is kept and reused while
/// consecutive records share it, so a tabular file sorts its header once.
pub struct Pipeline<'a> {
    canonicalizer: &'a Canonicalizer,
    policy: ErrorPolicy,
    header: Option<(Vec<String>, FieldOrder)>,
    next_index: u64,
    report: PipelineReport,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over a canonicalizer.
    pub fn new(canonicalizer: &'a Canonicalizer, policy: ErrorPolicy) -> Self {
        Self {
            canonicalizer,
            policy,
            header: None,
            next_index: 0,
            report: PipelineReport::default(),
        }
    }

    /// Builds the log entry for one record without writing it.
    pub fn entry_for(
        &mut self,
        record: &RawRecord,
        timestamp: Timestamp,
    ) -> Result<LogEntry, CanonicalizationError> {
        let canonicalizer = self.canonicalizer;
        let order = self.order_for(record);
        let item = canonicalizer.canonicalize_ordered(record, order)?;
        Ok(LogEntry::new(item, timestamp))
    }

    /// Processes one record and writes its entry.
    ///
    /// Returns the entry's hash, or `None` when the record was skipped.
    ///
    /// # Errors
    ///
    /// I/O errors always abort. Canonicalization errors abort under
    /// [`ErrorPolicy::FailFast`].
    pub fn process<W: Write>(
        &mut self,
        record: &RawRecord,
        timestamp: Timestamp,
        writer: &mut LogWriter<W>,
    ) -> Result<Option<ContentHash>, LogError> {
        let index = self.next_index;
        self.next_index += 1;

        match self.entry_for(record, timestamp) {
            Ok(entry) => {
                writer.append(&entry)?;
                self.report.emitted += 1;
                tracing::debug!(index, hash = %entry.hash(), "emitted entry");
                Ok(Some(entry.hash().clone()))
            }
            Err(source) => match self.policy {
                ErrorPolicy::FailFast => Err(LogError::Canonicalization { index, source }),
                ErrorPolicy::SkipInvalid => {
                    tracing::warn!(index, error = %source, "skipping record");
                    self.report.skipped.push(SkippedRecord {
                        index,
                        error: source,
                    });
                    Ok(None)
                }
            },
        }
    }

    /// Processes every record in order, stamping each with `clock()`.
    pub fn run<I, W, F>(
        &mut self,
        records: I,
        writer: &mut LogWriter<W>,
        mut clock: F,
    ) -> Result<&PipelineReport, LogError>
    where
        I: IntoIterator<Item = RawRecord>,
        W: Write,
        F: FnMut() -> Timestamp,
    {
        for record in records {
            self.process(&record, clock(), writer)?;
        }
        Ok(&self.report)
    }

    /// Totals so far.
    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    /// Consumes the pipeline, returning its totals.
    pub fn into_report(self) -> PipelineReport {
        self.report
    }

    fn order_for(&mut self, record: &RawRecord) -> &FieldOrder {
        let reusable = matches!(
            &self.header,
            Some((names, _)) if names.iter().map(String::as_str).eq(record.names())
        );
        if !reusable {
            self.header = None;
        }
        let (_, order) = self.header.get_or_insert_with(|| {
            let names: Vec<String> = record.names().map(str::to_string).collect();
            let order = FieldOrder::for_names(&names);
            (names, order)
        });
        order
    }
}
