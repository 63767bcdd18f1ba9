//! Tab-separated input.
//!
//! The first row names the fields; every later row is one record with one
//! value per field. A field wrapped in double quotes loses the surrounding
//! quotes, while quotes inside an unquoted field are kept verbatim.

use crate::error::IngestError;
use crate::traits::RecordSource;
use register_canonical::{FieldOrder, RawRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Record source over tab-separated rows.
pub struct TsvSource<R: Read> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    order: FieldOrder,
    row: csv::StringRecord,
    rows_read: u64,
}

impl TsvSource<File> {
    /// Opens a TSV file.
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read> TsvSource<R> {
    /// Creates a source and reads the header row.
    ///
    /// Fails with [`IngestError::MissingHeader`] when the input has no rows.
    pub fn new(input: R) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_reader(input);

        let mut row = csv::StringRecord::new();
        if !reader.read_record(&mut row)? {
            return Err(IngestError::MissingHeader);
        }
        let header: Vec<String> = row.iter().map(str::to_string).collect();
        let order = FieldOrder::for_names(&header);
        tracing::debug!(fields = header.len(), "read TSV header");

        Ok(Self {
            reader,
            header,
            order,
            row,
            rows_read: 0,
        })
    }

    /// Field names from the header row, in column order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Sorted field order for the header, computed once.
    pub fn order(&self) -> &FieldOrder {
        &self.order
    }

    /// Number of data rows read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }
}

impl<R: Read> RecordSource for TsvSource<R> {
    fn next_record(&mut self) -> Result<Option<RawRecord>, IngestError> {
        if !self.reader.read_record(&mut self.row)? {
            return Ok(None);
        }
        self.rows_read += 1;
        let values = self.row.iter().map(str::to_string).collect();
        Ok(Some(RawRecord::from_row(&self.header, values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(input: &str) -> Vec<(String, String)> {
        let mut source = TsvSource::new(input.as_bytes()).unwrap();
        source.next_record().unwrap().unwrap().fields().to_vec()
    }

    #[test]
    fn test_surrounding_quotes_are_dropped() {
        let fields = values("name\tcode\n\"aa\"\tbb\n");
        assert_eq!(fields[0], ("name".to_string(), "aa".to_string()));
    }

    #[test]
    fn test_interior_quotes_are_kept() {
        let fields = values("name\tcode\na \"bb\" a\tbb\n");
        assert_eq!(fields[0].1, r#"a "bb" a"#);
    }

    #[test]
    fn test_empty_cells_are_kept_as_empty_values() {
        let fields = values("a\tb\tc\n1\t\t3\n");
        assert_eq!(fields[1], ("b".to_string(), String::new()));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_header_order_is_sorted_once() {
        let source = TsvSource::new("ba\tca\ta\n".as_bytes()).unwrap();
        assert_eq!(source.order().indices(), &[2, 0, 1]);
        assert_eq!(source.header(), &["ba", "ca", "a"]);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            TsvSource::new("".as_bytes()),
            Err(IngestError::MissingHeader)
        ));
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let mut source = TsvSource::new("a\tb\n1\n".as_bytes()).unwrap();
        assert!(matches!(source.next_record(), Err(IngestError::Csv(_))));
    }
}
