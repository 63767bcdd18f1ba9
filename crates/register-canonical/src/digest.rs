use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::canonicalizer::CanonicalRecord;
use crate::validation::ValidationError;

fn hex_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"))
}

/// Supported hash algorithms for content addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlg {
    /// SHA-256, the only algorithm registers currently use.
    #[serde(rename = "sha256")]
    Sha256,
}

impl HashAlg {
    /// Algorithm tag written before the colon.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlg {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            other => Err(ValidationError::Unsupported {
                field: "HashAlg",
                value: other.to_string(),
            }),
        }
    }
}

/// Algorithm-tagged content hash, rendered as `sha256:<lowercase hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    alg: HashAlg,
    hex: String,
}

impl ContentHash {
    /// Hashes arbitrary content bytes with SHA-256.
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        let digest = Sha256::digest(content.as_ref());
        Self {
            alg: HashAlg::Sha256,
            hex: hex::encode(digest),
        }
    }

    /// Hashes the exact bytes of a canonical record.
    pub fn of_record(record: &CanonicalRecord) -> Self {
        Self::of(record.as_bytes())
    }

    /// Parses the `alg:hex` text form.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let (alg, hex) = value
            .split_once(':')
            .ok_or_else(|| ValidationError::PatternMismatch {
                field: "ContentHash",
                value: value.to_string(),
            })?;
        let alg = alg.parse::<HashAlg>()?;
        if !hex_regex().is_match(hex) {
            return Err(ValidationError::PatternMismatch {
                field: "ContentHash",
                value: value.to_string(),
            });
        }
        Ok(Self {
            alg,
            hex: hex.to_string(),
        })
    }

    /// Algorithm that produced this hash.
    pub fn alg(&self) -> HashAlg {
        self.alg
    }

    /// Lowercase hex digest without the algorithm tag.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Returns `true` when hashing `content` reproduces this hash.
    pub fn matches(&self, content: impl AsRef<[u8]>) -> bool {
        match self.alg {
            HashAlg::Sha256 => Self::of(content) == *self,
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg, self.hex)
    }
}

impl FromStr for ContentHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
