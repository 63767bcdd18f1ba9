//! Field metadata loading.
//!
//! Three JSON layouts are accepted:
//!
//! ```json
//! {"name": {"cardinality": "1", "datatype": "string"}}
//! {"name": {"entry-number": "3", "item": [{"cardinality": "1", "datatype": "string"}]}}
//! [{"field": "name", "cardinality": "1", "datatype": "string"}]
//! ```
//!
//! Item properties other than `field`, `cardinality` and `datatype` are ignored.

use crate::error::IngestError;
use register_canonical::FieldCatalog;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FieldItem {
    #[serde(default)]
    field: Option<String>,
    cardinality: String,
    datatype: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemPayload {
    One(FieldItem),
    Many(Vec<FieldItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldEntry {
    Item(FieldItem),
    Record { item: ItemPayload },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MetadataDocument {
    Keyed(BTreeMap<String, FieldEntry>),
    Listed(Vec<FieldItem>),
}

/// Loads a field catalog from JSON metadata.
pub fn load_field_catalog<R: Read>(input: R) -> Result<FieldCatalog, IngestError> {
    let document: MetadataDocument = serde_json::from_reader(input)?;
    let mut catalog = FieldCatalog::new();

    match document {
        MetadataDocument::Keyed(entries) => {
            for (name, entry) in entries {
                let item = match entry {
                    FieldEntry::Item(item) => item,
                    FieldEntry::Record {
                        item: ItemPayload::One(item),
                    } => item,
                    FieldEntry::Record {
                        item: ItemPayload::Many(items),
                    } => items.into_iter().next().ok_or_else(|| {
                        IngestError::FieldRecord(format!("record for '{}' has no items", name))
                    })?,
                };
                catalog.insert_tags(name, &item.cardinality, &item.datatype)?;
            }
        }
        MetadataDocument::Listed(items) => {
            for item in items {
                let name = item.field.ok_or_else(|| {
                    IngestError::FieldRecord("field item without a 'field' name".to_string())
                })?;
                catalog.insert_tags(name, &item.cardinality, &item.datatype)?;
            }
        }
    }

    tracing::debug!(fields = catalog.len(), "loaded field catalog");
    Ok(catalog)
}

/// Loads a field catalog from a JSON file.
pub fn load_field_catalog_file(path: &Path) -> Result<FieldCatalog, IngestError> {
    load_field_catalog(BufReader::new(File::open(path)?))
}
