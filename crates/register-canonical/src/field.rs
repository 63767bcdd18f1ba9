//! Field metadata: how many values a field holds and what kind of values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonicalizer::CanonicalizationError;

/// A metadata tag that has no encoding rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// Cardinality other than `1` or `n`.
    #[error("unrecognised cardinality '{0}'")]
    Cardinality(String),
    /// Datatype outside the known set.
    #[error("unrecognised datatype '{0}'")]
    Datatype(String),
}

/// Whether a field carries one value or a `;`-delimited list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Cardinality {
    /// Wire tag `1`.
    Single,
    /// Wire tag `n`.
    Many,
}

impl Cardinality {
    /// Wire tag for this cardinality.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "1",
            Self::Many => "n",
        }
    }
}

impl FromStr for Cardinality {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::Single),
            "n" => Ok(Self::Many),
            other => Err(MetadataError::Cardinality(other.to_string())),
        }
    }
}

impl TryFrom<String> for Cardinality {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cardinality> for &'static str {
    fn from(value: Cardinality) -> Self {
        value.as_str()
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive datatype of a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Datatype {
    /// Free text on one line.
    String,
    /// Longer free text.
    Text,
    /// Human readable name.
    Name,
    /// Compact identifier `prefix:local-id`.
    Curie,
    /// Web address.
    Url,
    /// Content hash of another item.
    Hash,
    /// ISO-8601 date or date-time.
    Datetime,
    /// ISO-8601 period.
    Period,
    /// Geographic point.
    Point,
    /// Geographic polygon.
    Polygon,
    /// Whole number.
    Integer,
    /// Decimal number.
    Decimal,
    /// Generic number.
    Number,
}

impl Datatype {
    /// Wire tag for this datatype.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Name => "name",
            Self::Curie => "curie",
            Self::Url => "url",
            Self::Hash => "hash",
            Self::Datetime => "datetime",
            Self::Period => "period",
            Self::Point => "point",
            Self::Polygon => "polygon",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Number => "number",
        }
    }

    /// Numeric values are written bare inside list fields; everything else is quoted.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Integer | Self::Decimal | Self::Number => true,
            Self::String
            | Self::Text
            | Self::Name
            | Self::Curie
            | Self::Url
            | Self::Hash
            | Self::Datetime
            | Self::Period
            | Self::Point
            | Self::Polygon => false,
        }
    }
}

impl FromStr for Datatype {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "string" => Self::String,
            "text" => Self::Text,
            "name" => Self::Name,
            "curie" => Self::Curie,
            "url" => Self::Url,
            "hash" => Self::Hash,
            "datetime" => Self::Datetime,
            "period" => Self::Period,
            "point" => Self::Point,
            "polygon" => Self::Polygon,
            "integer" => Self::Integer,
            "decimal" => Self::Decimal,
            "number" => Self::Number,
            other => return Err(MetadataError::Datatype(other.to_string())),
        })
    }
}

impl TryFrom<String> for Datatype {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Datatype> for &'static str {
    fn from(value: Datatype) -> Self {
        value.as_str()
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable encoding metadata for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Single value or list.
    pub cardinality: Cardinality,
    /// Primitive datatype.
    pub datatype: Datatype,
}

impl FieldDefinition {
    /// Creates a definition from already parsed parts.
    pub fn new(cardinality: Cardinality, datatype: Datatype) -> Self {
        Self {
            cardinality,
            datatype,
        }
    }

    /// Parses a definition from its wire tags, e.g. `("n", "curie")`.
    pub fn from_tags(cardinality: &str, datatype: &str) -> Result<Self, MetadataError> {
        Ok(Self {
            cardinality: cardinality.parse()?,
            datatype: datatype.parse()?,
        })
    }
}

/// Field name to definition mapping for one register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: BTreeMap<String, FieldDefinition>,
}

impl FieldCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field definition.
    pub fn insert(&mut self, name: impl Into<String>, definition: FieldDefinition) {
        self.fields.insert(name.into(), definition);
    }

    /// Adds a field from its wire tags, reporting malformed tags against the field name.
    pub fn insert_tags(
        &mut self,
        name: impl Into<String>,
        cardinality: &str,
        datatype: &str,
    ) -> Result<(), CanonicalizationError> {
        let name = name.into();
        match FieldDefinition::from_tags(cardinality, datatype) {
            Ok(definition) => {
                self.fields.insert(name, definition);
                Ok(())
            }
            Err(source) => Err(CanonicalizationError::MalformedMetadata {
                field: name,
                source,
            }),
        }
    }

    /// Looks up a field, failing with `UnknownField` when it is not defined.
    pub fn get(&self, name: &str) -> Result<&FieldDefinition, CanonicalizationError> {
        self.fields
            .get(name)
            .ok_or_else(|| CanonicalizationError::UnknownField {
                field: name.to_string(),
            })
    }

    /// Returns `true` if the field is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Checks that every name is defined, reporting the first one that is not.
    pub fn check_names<'a, I>(&self, names: I) -> Result<(), CanonicalizationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.get(name)?;
        }
        Ok(())
    }

    /// Number of defined fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no fields are defined.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates definitions in field name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDefinition)> for FieldCatalog {
    fn from_iter<T: IntoIterator<Item = (K, FieldDefinition)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
