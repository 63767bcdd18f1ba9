//! Log reader implementation.

use crate::entry::{ADD_ITEM, APPEND_ENTRY};
use crate::errors::LogError;
use register_canonical::{ContentHash, Timestamp};
use std::io::BufRead;

/// Read mode for handling damaged logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: malformed or unpaired lines are errors.
    Strict,
    /// Permissive mode: malformed or unpaired lines are skipped with a warning.
    Permissive,
}

/// Which line of a pair comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineOrder {
    /// `add-item` then `append-entry`, as [`LogWriter`](crate::LogWriter) writes.
    #[default]
    ItemFirst,
    /// `append-entry` then `add-item`.
    EntryFirst,
}

/// An item line paired with its entry line, as found in a log.
///
/// Unlike [`LogEntry`](crate::LogEntry) nothing here is trusted: the item is
/// the raw text after `add-item` and the hash is whatever the entry line
/// claims. Use [`verify_entry`](crate::verify_entry) to check them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEntry {
    /// Item text exactly as logged.
    pub item: String,
    /// Timestamp from the entry line.
    pub timestamp: Timestamp,
    /// Hash claimed by the entry line.
    pub hash: ContentHash,
    /// One-based line number of the first line of the pair.
    pub line: u64,
}

enum Line {
    Item(String),
    Entry(Timestamp, ContentHash),
}

enum Pending {
    Item {
        item: String,
        line: u64,
    },
    Entry {
        timestamp: Timestamp,
        hash: ContentHash,
        line: u64,
    },
}

impl Pending {
    fn new(parsed: Line, line: u64) -> Self {
        match parsed {
            Line::Item(item) => Self::Item { item, line },
            Line::Entry(timestamp, hash) => Self::Entry {
                timestamp,
                hash,
                line,
            },
        }
    }

    fn opens_pair(&self, order: LineOrder) -> bool {
        matches!(
            (order, self),
            (LineOrder::ItemFirst, Self::Item { .. }) | (LineOrder::EntryFirst, Self::Entry { .. })
        )
    }

    fn unpaired(&self) -> LogError {
        match self {
            Self::Item { line, .. } => LogError::Unpaired {
                kind: ADD_ITEM,
                line: *line,
            },
            Self::Entry { line, .. } => LogError::Unpaired {
                kind: APPEND_ENTRY,
                line: *line,
            },
        }
    }
}

/// Reads entries back from a log stream.
///
/// Lines pair only in the reader's [`LineOrder`]. A line that arrives where
/// its partner was expected is unpaired, never joined to a neighbouring
/// record.
///
/// # Example
///
/// ```rust
/// use register_log::{LogReader, ReadMode};
///
/// let log = "add-item\t{\"key\":\"value\"}\n\
///            append-entry\t2021-01-01T00:00:00Z\tsha256:e43abcf3375244839c012f9633f95862d232a95b00d5bc7348b3098b9fed7f32\n";
/// let mut reader = LogReader::new(log.as_bytes(), ReadMode::Strict);
/// while let Some(entry) = reader.read_entry()? {
///     println!("{} {}", entry.line, entry.hash);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LogReader<R: BufRead> {
    input: R,
    mode: ReadMode,
    order: LineOrder,
    line: u64,
    pending: Option<Pending>,
    buf: String,
}

impl<R: BufRead> LogReader<R> {
    /// Wraps a buffered input stream of item-first pairs.
    pub fn new(input: R, mode: ReadMode) -> Self {
        Self::with_order(input, mode, LineOrder::ItemFirst)
    }

    /// Wraps a buffered input stream whose pairs use `order`.
    pub fn with_order(input: R, mode: ReadMode, order: LineOrder) -> Self {
        Self {
            input,
            mode,
            order,
            line: 0,
            pending: None,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> u64 {
        self.line
    }

    /// Reads the next paired entry.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] on I/O failure, or in strict mode when a line is
    /// malformed or left without its partner.
    pub fn read_entry(&mut self) -> Result<Option<RecordedEntry>, LogError> {
        loop {
            if !self.next_line()? {
                if let Some(pending) = self.pending.take() {
                    self.reject(pending.unpaired())?;
                }
                return Ok(None);
            }
            let line = self.line;

            let parsed = match parse_line(&self.buf, line) {
                Ok(parsed) => parsed,
                Err(err) => {
                    self.reject(err)?;
                    continue;
                }
            };

            match (self.order, self.pending.take(), parsed) {
                (LineOrder::ItemFirst, Some(Pending::Item { item, line }), Line::Entry(timestamp, hash))
                | (LineOrder::EntryFirst, Some(Pending::Entry { timestamp, hash, line }), Line::Item(item)) => {
                    return Ok(Some(RecordedEntry {
                        item,
                        timestamp,
                        hash,
                        line,
                    }));
                }
                (order, previous, parsed) => {
                    if let Some(previous) = previous {
                        self.reject(previous.unpaired())?;
                    }
                    let pending = Pending::new(parsed, line);
                    if pending.opens_pair(order) {
                        self.pending = Some(pending);
                    } else {
                        self.reject(pending.unpaired())?;
                    }
                }
            }
        }
    }

    fn next_line(&mut self) -> Result<bool, LogError> {
        self.buf.clear();
        if self.input.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }

    fn reject(&self, err: LogError) -> Result<(), LogError> {
        match self.mode {
            ReadMode::Strict => Err(err),
            ReadMode::Permissive => {
                tracing::warn!(error = %err, "skipping log line");
                Ok(())
            }
        }
    }
}

fn parse_line(text: &str, line: u64) -> Result<Line, LogError> {
    let malformed = |reason: &str| LogError::MalformedLine {
        line,
        reason: reason.to_string(),
    };
    let (command, rest) = text
        .split_once('\t')
        .ok_or_else(|| malformed("missing tab separator"))?;

    match command {
        ADD_ITEM => Ok(Line::Item(rest.to_string())),
        APPEND_ENTRY => {
            let (timestamp, hash) = rest
                .split_once('\t')
                .ok_or_else(|| malformed("entry line needs a timestamp and a hash"))?;
            if hash.contains('\t') {
                return Err(malformed("entry line has extra fields"));
            }
            let timestamp = Timestamp::parse(timestamp)
                .map_err(|source| LogError::InvalidField { line, source })?;
            let hash = ContentHash::parse(hash)
                .map_err(|source| LogError::InvalidField { line, source })?;
            Ok(Line::Entry(timestamp, hash))
        }
        other => Err(malformed(&format!("unknown command '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "sha256:e43abcf3375244839c012f9633f95862d232a95b00d5bc7348b3098b9fed7f32";

    fn read_all(log: &str, mode: ReadMode) -> Result<Vec<RecordedEntry>, LogError> {
        let mut reader = LogReader::new(log.as_bytes(), mode);
        let mut entries = Vec::new();
        while let Some(entry) = reader.read_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    #[test]
    fn pairs_item_first() {
        let log = format!("add-item\t{{\"key\":\"value\"}}\nappend-entry\t2021-01-01T00:00:00Z\t{HASH}\n");
        let entries = read_all(&log, ReadMode::Strict).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].item, r#"{"key":"value"}"#);
        assert_eq!(entries[0].hash.to_string(), HASH);
        assert_eq!(entries[0].line, 1);
    }

    #[test]
    fn pairs_entry_first() {
        let log = format!("append-entry\t2021-01-01T00:00:00Z\t{HASH}\r\nadd-item\t{{\"key\":\"value\"}}\r\n");
        let mut reader = LogReader::with_order(log.as_bytes(), ReadMode::Strict, LineOrder::EntryFirst);
        let mut entries = Vec::new();
        while let Some(entry) = reader.read_entry().unwrap() {
            entries.push(entry);
        }
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].item, r#"{"key":"value"}"#);
        assert_eq!(entries[0].timestamp.as_str(), "2021-01-01T00:00:00Z");
    }

    #[test]
    fn entry_first_line_is_unpaired_in_item_first_log() {
        let log = format!("append-entry\t2021-01-01T00:00:00Z\t{HASH}\nadd-item\t{{\"key\":\"value\"}}\n");
        assert!(matches!(
            read_all(&log, ReadMode::Strict),
            Err(LogError::Unpaired { kind: APPEND_ENTRY, line: 1 })
        ));
    }

    #[test]
    fn strict_rejects_unknown_command() {
        let log = "delete-item\tx\n";
        match read_all(log, ReadMode::Strict) {
            Err(LogError::MalformedLine { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn strict_rejects_trailing_item() {
        let log = "add-item\t{}\n";
        assert!(matches!(
            read_all(log, ReadMode::Strict),
            Err(LogError::Unpaired { kind: ADD_ITEM, line: 1 })
        ));
    }

    #[test]
    fn strict_rejects_bad_hash() {
        let log = "add-item\t{}\nappend-entry\t2021-01-01T00:00:00Z\tmd5:abc\n";
        assert!(matches!(
            read_all(log, ReadMode::Strict),
            Err(LogError::InvalidField { line: 2, .. })
        ));
    }

    #[test]
    fn permissive_skips_damage() {
        let log = format!(
            "add-item\t{{\"orphan\":\"1\"}}\n\
             garbage\n\
             add-item\t{{\"key\":\"value\"}}\n\
             append-entry\t2021-01-01T00:00:00Z\t{HASH}\n\
             append-entry\t2021-01-01T00:00:00Z\t{HASH}\n"
        );
        let entries = read_all(&log, ReadMode::Permissive).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].item, r#"{"key":"value"}"#);
        assert_eq!(entries[0].line, 3);
    }
}
