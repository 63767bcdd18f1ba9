//! YAML document input.
//!
//! Each document is a single mapping whose top-level keys are field names.
//! Scalars keep their source text (`1.50` stays `1.50`), `null` becomes an
//! absent value, and a sequence of scalars becomes a `;`-joined list.
//!
//! A document is read twice: once as a [`Value`] to check its shape, then
//! with string targets so plain scalars are never re-rendered.

use crate::error::IngestError;
use crate::traits::RecordSource;
use register_canonical::RawRecord;
use serde::de::{DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const LIST_SEPARATOR: &str = ";";

#[derive(Debug, Clone, Copy)]
enum Shape {
    Scalar,
    List,
}

/// Parses one YAML document into a raw record.
///
/// `origin` names the input in error messages. Keys keep document order.
pub fn record_from_yaml(text: &str, origin: &str) -> Result<RawRecord, IngestError> {
    let yaml_error = |source| IngestError::Yaml {
        origin: origin.to_string(),
        source,
    };
    let document: Value = serde_yaml::from_str(text).map_err(yaml_error)?;

    let mapping = match document {
        Value::Null => return Ok(RawRecord::default()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(unsupported(origin, "", "document is not a mapping"));
        }
    };

    let mut shapes = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        if !is_scalar(key) {
            return Err(unsupported(origin, "", "mapping key is not a scalar"));
        }
        shapes.push(shape_of(value, origin, &key_label(key))?);
    }

    let fields = TextMapping { shapes: &shapes }
        .deserialize(serde_yaml::Deserializer::from_str(text))
        .map_err(yaml_error)?;

    let mut record = RawRecord::default();
    for (name, text) in fields {
        let raw = match text {
            FieldText::Scalar(value) => value,
            FieldText::List(items) => {
                if items.iter().any(|item| item.contains(LIST_SEPARATOR)) {
                    return Err(unsupported(
                        origin,
                        &name,
                        "list item contains the ';' separator",
                    ));
                }
                items.join(LIST_SEPARATOR)
            }
        };
        record.push(name, raw);
    }
    Ok(record)
}

fn shape_of(value: &Value, origin: &str, key: &str) -> Result<Shape, IngestError> {
    match value {
        Value::Sequence(items) => {
            if items.iter().all(is_scalar) {
                Ok(Shape::List)
            } else {
                Err(unsupported(origin, key, "list items must be scalars"))
            }
        }
        Value::Mapping(_) => Err(unsupported(origin, key, "nested mappings are not supported")),
        Value::Tagged(_) => Err(unsupported(origin, key, "tagged values are not supported")),
        _ => Ok(Shape::Scalar),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(name) => name.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

enum FieldText {
    Scalar(String),
    List(Vec<String>),
}

/// Reads a checked mapping with string targets, one per shape in order.
struct TextMapping<'a> {
    shapes: &'a [Shape],
}

impl<'de> DeserializeSeed<'de> for TextMapping<'_> {
    type Value = Vec<(String, FieldText)>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for TextMapping<'_> {
    type Value = Vec<(String, FieldText)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of field names to scalars or lists of scalars")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut fields = Vec::with_capacity(self.shapes.len());
        for shape in self.shapes {
            let Some(name) = map.next_key::<String>()? else {
                break;
            };
            let text = match shape {
                Shape::Scalar => {
                    FieldText::Scalar(map.next_value::<Option<String>>()?.unwrap_or_default())
                }
                Shape::List => FieldText::List(
                    map.next_value::<Vec<Option<String>>>()?
                        .into_iter()
                        .map(Option::unwrap_or_default)
                        .collect(),
                ),
            };
            fields.push((name, text));
        }
        Ok(fields)
    }
}

fn unsupported(origin: &str, key: &str, reason: &str) -> IngestError {
    IngestError::UnsupportedYaml {
        origin: origin.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Record source over the `*.yaml` files of a directory, one record per file.
#[derive(Debug)]
pub struct YamlSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl YamlSource {
    /// Lists the `.yaml` files in `dir`, sorted by file name.
    ///
    /// Subdirectories and files with other extensions are ignored.
    pub fn from_dir(dir: &Path) -> Result<Self, IngestError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        tracing::debug!(dir = %dir.display(), files = paths.len(), "listed YAML files");
        Ok(Self::from_paths(paths))
    }

    /// Creates a source over explicit file paths, read in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    /// Files this source reads.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Path of the file most recently read, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.next
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(PathBuf::as_path)
    }
}

impl RecordSource for YamlSource {
    fn next_record(&mut self) -> Result<Option<RawRecord>, IngestError> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let text = fs::read_to_string(path)?;
        record_from_yaml(&text, &path.display().to_string()).map(Some)
    }
}
