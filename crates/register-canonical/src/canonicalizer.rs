use std::fmt;

use crate::encoder::{encode_into, is_absent};
use crate::field::{FieldCatalog, MetadataError};

/// Error returned when a record cannot be canonicalized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A present value names a field the register does not define.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// Field name missing from the catalog.
        field: String,
    },
    /// A field definition carries a tag with no encoding rule.
    #[error("malformed metadata for field '{field}': {source}")]
    MalformedMetadata {
        /// Field whose definition is malformed.
        field: String,
        /// Offending tag.
        source: MetadataError,
    },
    /// The record breaks a structural contract of the canonical form.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
}

/// One logical entry as produced by an input adapter.
///
/// Pairs keep their input order; canonical ordering is applied later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates a record from name/value pairs.
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Creates a record from a header row and a data row of the same width.
    pub fn from_row(names: &[String], values: Vec<String>) -> Self {
        Self {
            fields: names.iter().cloned().zip(values).collect(),
        }
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Value of a field, if the record has it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Field names in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Names of fields whose values are present.
    pub fn present_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, v)| !is_absent(v))
            .map(|(n, _)| n.as_str())
    }

    /// Number of fields, present or not.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name/value pairs in input order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// Permutation that visits a header's fields in ascending byte-wise name order.
///
/// Computed once per distinct header and reused for every record sharing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrder {
    indices: Vec<usize>,
}

impl FieldOrder {
    /// Sorts the positions of `names` by name.
    pub fn for_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut indices: Vec<usize> = (0..names.len()).collect();
        indices.sort_by(|&a, &b| names[a].as_ref().as_bytes().cmp(names[b].as_ref().as_bytes()));
        Self { indices }
    }

    /// Sorted positions into the original header.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of fields covered.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` for the order of an empty header.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Canonical JSON object text for a record.
///
/// Only [`Canonicalizer`] builds these, so every instance went through the
/// canonical pipeline and can be hashed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalRecord(String);

impl CanonicalRecord {
    /// Canonical JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes that get hashed.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Consumes the record, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Renders raw records into canonical JSON using a register's field catalog.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    catalog: FieldCatalog,
}

impl Canonicalizer {
    /// Creates a canonicalizer for the given catalog.
    pub fn new(catalog: FieldCatalog) -> Self {
        Self { catalog }
    }

    /// Field catalog used for encoding.
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Canonicalizes a record, computing its field order on the fly.
    pub fn canonicalize(&self, record: &RawRecord) -> Result<CanonicalRecord, CanonicalizationError> {
        let names: Vec<&str> = record.names().collect();
        let order = FieldOrder::for_names(&names);
        self.canonicalize_ordered(record, &order)
    }

    /// Canonicalizes a record with a precomputed order for its header.
    pub fn canonicalize_ordered(
        &self,
        record: &RawRecord,
        order: &FieldOrder,
    ) -> Result<CanonicalRecord, CanonicalizationError> {
        let fields = record.fields();
        if order.len() != fields.len() {
            return Err(CanonicalizationError::EncodingFailure(format!(
                "field order covers {} fields but record has {}",
                order.len(),
                fields.len()
            )));
        }

        let mut out = String::from("{");
        let mut previous: Option<&str> = None;
        let mut first = true;
        for &index in order.indices() {
            let (name, value) = fields.get(index).ok_or_else(|| {
                CanonicalizationError::EncodingFailure(format!(
                    "field order index {index} out of range"
                ))
            })?;
            // Names must strictly ascend.
            match previous {
                Some(prev) if prev == name.as_str() => {
                    return Err(CanonicalizationError::EncodingFailure(format!(
                        "duplicate field '{name}'"
                    )));
                }
                Some(prev) if prev > name.as_str() => {
                    return Err(CanonicalizationError::EncodingFailure(format!(
                        "field '{name}' out of order after '{prev}'"
                    )));
                }
                _ => {}
            }
            previous = Some(name.as_str());

            if is_absent(value) {
                continue;
            }
            check_field_name(name)?;
            let definition = self.catalog.get(name)?;

            if !first {
                out.push(',');
            }
            first = false;
            out.push('"');
            out.push_str(name);
            out.push_str("\":");
            encode_into(&mut out, value, definition);
        }
        out.push('}');

        Ok(CanonicalRecord(out))
    }
}

/// Field names are written unescaped, so they must not need escaping.
fn check_field_name(name: &str) -> Result<(), CanonicalizationError> {
    if name.is_empty() {
        return Err(CanonicalizationError::EncodingFailure(
            "empty field name".to_string(),
        ));
    }
    if name.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Err(CanonicalizationError::EncodingFailure(format!(
            "field name {name:?} cannot be written without escaping"
        )));
    }
    Ok(())
}
