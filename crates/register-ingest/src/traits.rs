use crate::error::IngestError;
use register_canonical::RawRecord;

/// A source of raw records, read in input order.
pub trait RecordSource {
    /// Reads the next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> Result<Option<RawRecord>, IngestError>;

    /// Borrows the source as an iterator of records.
    fn records(&mut self) -> Records<'_, Self>
    where
        Self: Sized,
    {
        Records { source: self }
    }
}

/// Iterator over a [`RecordSource`].
pub struct Records<'a, S> {
    source: &'a mut S,
}

impl<S: RecordSource> Iterator for Records<'_, S> {
    type Item = Result<RawRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_record().transpose()
    }
}
