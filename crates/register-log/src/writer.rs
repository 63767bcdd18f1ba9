//! Log writer implementation.

use crate::entry::{LogEntry, ADD_ITEM, APPEND_ENTRY};
use crate::errors::LogError;
use std::io::Write;

/// Options for log writing.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Whether to flush the stream after each entry (default: false).
    pub flush_each: bool,
}

/// Writes log entries to an output stream.
///
/// Each entry's two lines are assembled into one buffer and handed to the
/// stream in a single `write_all`, so the pair for one record is complete
/// before the next record's pair begins.
///
/// # Example
///
/// ```rust
/// use register_canonical::{Canonicalizer, FieldCatalog, RawRecord, Timestamp};
/// use register_log::{LogEntry, LogWriter, WriteOptions};
///
/// let mut catalog = FieldCatalog::new();
/// catalog.insert_tags("key", "1", "string")?;
/// let item = Canonicalizer::new(catalog)
///     .canonicalize(&[("key", "value")].into_iter().collect::<RawRecord>())?;
///
/// let mut writer = LogWriter::new(Vec::new(), WriteOptions::default());
/// writer.append(&LogEntry::new(item, Timestamp::parse("2021-01-01T00:00:00Z")?))?;
/// assert_eq!(writer.entries_written(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LogWriter<W: Write> {
    out: W,
    flush_each: bool,
    entries_written: u64,
    buf: String,
}

impl<W: Write> LogWriter<W> {
    /// Wraps an output stream.
    pub fn new(out: W, options: WriteOptions) -> Self {
        Self {
            out,
            flush_each: options.flush_each,
            entries_written: 0,
            buf: String::new(),
        }
    }

    /// Appends one entry: the `add-item` line followed by the `append-entry` line.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if the stream rejects the write.
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        self.buf.clear();
        self.buf.push_str(ADD_ITEM);
        self.buf.push('\t');
        self.buf.push_str(entry.item().as_str());
        self.buf.push('\n');
        self.buf.push_str(APPEND_ENTRY);
        self.buf.push('\t');
        self.buf.push_str(entry.timestamp().as_str());
        self.buf.push('\t');
        self.buf.push_str(&entry.hash().to_string());
        self.buf.push('\n');

        self.out.write_all(self.buf.as_bytes())?;
        if self.flush_each {
            self.out.flush()?;
        }
        self.entries_written += 1;
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Flushes and returns the underlying stream.
    pub fn finish(mut self) -> Result<W, LogError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_canonical::{Canonicalizer, FieldCatalog, RawRecord, Timestamp};

    fn entry(value: &str) -> LogEntry {
        let mut catalog = FieldCatalog::new();
        catalog.insert_tags("key", "1", "string").unwrap();
        let record: RawRecord = [("key", value)].into_iter().collect();
        let item = Canonicalizer::new(catalog).canonicalize(&record).unwrap();
        LogEntry::new(item, Timestamp::parse("2021-01-01T00:00:00Z").unwrap())
    }

    #[test]
    fn writes_item_then_entry_per_record() {
        let mut writer = LogWriter::new(Vec::new(), WriteOptions::default());
        writer.append(&entry("one")).unwrap();
        writer.append(&entry("two")).unwrap();
        assert_eq!(writer.entries_written(), 2);

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "add-item\t{\"key\":\"one\"}");
        assert!(lines[1].starts_with("append-entry\t2021-01-01T00:00:00Z\tsha256:"));
        assert_eq!(lines[2], "add-item\t{\"key\":\"two\"}");
        assert!(lines[3].starts_with("append-entry\t"));
        assert!(out.ends_with('\n'));
    }
}
