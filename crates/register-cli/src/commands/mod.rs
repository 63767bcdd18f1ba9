//! Subcommand implementations and the emit loop they share.

pub mod hash;
pub mod tsv;
pub mod verify;
pub mod yaml;

use chrono::Utc;
use clap::Args;
use register_canonical::{Canonicalizer, Timestamp, ValidationError};
use register_ingest::{load_field_catalog_file, RecordSource};
use register_log::{ErrorPolicy, LogWriter, Pipeline, WriteOptions};
use std::io;
use std::path::Path;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Errors raised by the commands themselves rather than the libraries.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A timestamp from the command line or the clock was rejected.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] ValidationError),
    /// Strict verification found bad entries.
    #[error("{failed} of {entries} entries failed verification")]
    VerificationFailed {
        /// Entries that failed.
        failed: usize,
        /// Entries read.
        entries: u64,
    },
}

/// Options shared by the commands that emit log entries.
#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Timestamp for every entry (default: current UTC time, whole seconds)
    #[arg(long, env = "REGISTER_TIMESTAMP")]
    pub timestamp: Option<String>,
    /// Report and skip records that cannot be serialized instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,
}

impl EmitArgs {
    fn policy(&self) -> ErrorPolicy {
        if self.skip_invalid {
            ErrorPolicy::SkipInvalid
        } else {
            ErrorPolicy::FailFast
        }
    }
}

/// Source of entry timestamps.
#[derive(Debug, Clone)]
pub enum Clock {
    /// Every entry gets the same timestamp.
    Fixed(Timestamp),
    /// Current UTC time at second precision.
    System,
}

impl Clock {
    /// Builds a clock from an optional `--timestamp` value.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, CommandError> {
        match arg {
            Some(value) => Ok(Clock::Fixed(Timestamp::parse(value)?)),
            None => Ok(Clock::System),
        }
    }

    /// Timestamp for the next entry.
    pub fn now(&self) -> Result<Timestamp, CommandError> {
        match self {
            Clock::Fixed(ts) => Ok(ts.clone()),
            Clock::System => Ok(Timestamp::parse(
                Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            )?),
        }
    }
}

/// Loads the field catalog named on the command line.
pub fn load_canonicalizer(fields: &str) -> Result<Canonicalizer, Box<dyn std::error::Error>> {
    let catalog = load_field_catalog_file(Path::new(fields))
        .map_err(|e| format!("Failed to load field metadata {}: {}", fields, e))?;
    Ok(Canonicalizer::new(catalog))
}

/// Serializes every record of `source` to stdout.
///
/// With `check_keys`, a record naming a field missing from the catalog stops
/// the run even when that field is empty.
pub fn emit_records<S: RecordSource>(
    source: &mut S,
    canonicalizer: &Canonicalizer,
    args: &EmitArgs,
    check_keys: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Clock::from_arg(args.timestamp.as_deref())?;
    let mut pipeline = Pipeline::new(canonicalizer, args.policy());
    let stdout = io::stdout();
    let mut writer = LogWriter::new(stdout.lock(), WriteOptions::default());

    while let Some(record) = source.next_record()? {
        if check_keys {
            canonicalizer.catalog().check_names(record.names())?;
        }
        pipeline.process(&record, clock.now()?, &mut writer)?;
    }
    writer.finish()?;

    let report = pipeline.into_report();
    tracing::info!(
        emitted = report.emitted,
        skipped = report.skipped.len(),
        "serialization finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = Clock::from_arg(Some("2021-01-01T00:00:00Z")).unwrap();
        assert_eq!(clock.now().unwrap().as_str(), "2021-01-01T00:00:00Z");
    }

    #[test]
    fn test_system_clock_has_second_precision() {
        let ts = Clock::System.now().unwrap();
        assert_eq!(ts.as_str().len(), "2021-01-01T00:00:00Z".len());
        assert!(ts.as_str().ends_with('Z'));
    }

    #[test]
    fn test_bad_fixed_timestamp() {
        assert!(matches!(
            Clock::from_arg(Some("yesterday")),
            Err(CommandError::Timestamp(_))
        ));
    }
}
