use register_canonical::{CanonicalRecord, ContentHash, Timestamp};

/// Command word of the line carrying the canonical item.
pub const ADD_ITEM: &str = "add-item";
/// Command word of the line referencing the item by hash.
pub const APPEND_ENTRY: &str = "append-entry";

/// Renders the item line and the entry line for one record.
///
/// Neither line carries a trailing newline.
pub fn emit(canonical: &CanonicalRecord, hash: &ContentHash, timestamp: &Timestamp) -> (String, String) {
    let item_line = format!("{ADD_ITEM}\t{canonical}");
    let entry_line = format!("{APPEND_ENTRY}\t{timestamp}\t{hash}");
    (item_line, entry_line)
}

/// One immutable addition to a register log.
///
/// The hash is always computed from the item, so the two lines can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    item: CanonicalRecord,
    timestamp: Timestamp,
    hash: ContentHash,
}

impl LogEntry {
    /// Hashes the canonical item and stamps it.
    pub fn new(item: CanonicalRecord, timestamp: Timestamp) -> Self {
        let hash = ContentHash::of_record(&item);
        Self {
            item,
            timestamp,
            hash,
        }
    }

    /// Canonical item.
    pub fn item(&self) -> &CanonicalRecord {
        &self.item
    }

    /// Entry timestamp.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Content hash of the item.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// `add-item` line.
    pub fn item_line(&self) -> String {
        format!("{ADD_ITEM}\t{}", self.item)
    }

    /// `append-entry` line.
    pub fn entry_line(&self) -> String {
        format!("{APPEND_ENTRY}\t{}\t{}", self.timestamp, self.hash)
    }

    /// Both lines in emission order: item first, then entry.
    pub fn lines(&self) -> (String, String) {
        emit(&self.item, &self.hash, &self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_canonical::{Canonicalizer, FieldCatalog, RawRecord};

    fn item(value: &str) -> CanonicalRecord {
        let mut catalog = FieldCatalog::new();
        catalog.insert_tags("key", "1", "string").unwrap();
        let record: RawRecord = [("key", value)].into_iter().collect();
        Canonicalizer::new(catalog).canonicalize(&record).unwrap()
    }

    #[test]
    fn renders_tab_separated_lines() {
        let entry = LogEntry::new(item("value"), Timestamp::parse("2021-01-01T00:00:00Z").unwrap());
        let (item_line, entry_line) = entry.lines();
        assert_eq!(item_line, "add-item\t{\"key\":\"value\"}");
        assert_eq!(
            entry_line,
            "append-entry\t2021-01-01T00:00:00Z\tsha256:e43abcf3375244839c012f9633f95862d232a95b00d5bc7348b3098b9fed7f32"
        );
        assert_eq!(item_line, entry.item_line());
        assert_eq!(entry_line, entry.entry_line());
    }

    #[test]
    fn hash_always_matches_item() {
        let entry = LogEntry::new(item("e \"f\" g"), Timestamp::parse("2021-01-01T00:00:00Z").unwrap());
        assert!(entry.hash().matches(entry.item().as_bytes()));
        assert!(!entry.item_line().ends_with(char::is_whitespace));
        assert!(!entry.entry_line().ends_with(char::is_whitespace));
    }
}
