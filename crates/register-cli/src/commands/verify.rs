//! Verify command implementation.

use super::CommandError;
use crate::output::{format_json, format_table_row, print_table_header};
use register_log::{verify_log, LineOrder, LogReader, ReadMode};
use std::fs::File;
use std::io::BufReader;

pub fn run(
    log: String,
    strict: bool,
    permissive: bool,
    entry_first: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(&log).map_err(|e| format!("Failed to open log {}: {}", log, e))?;
    let mode = if permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let order = if entry_first {
        LineOrder::EntryFirst
    } else {
        LineOrder::ItemFirst
    };
    let mut reader = LogReader::with_order(BufReader::new(file), mode, order);
    let summary = verify_log(&mut reader)?;
    tracing::info!(
        entries = summary.entries,
        failures = summary.failures.len(),
        lines = reader.lines_read(),
        "verification finished"
    );

    if json_output {
        println!("{}", format_json(&summary));
    } else if summary.is_ok() {
        println!("{} entries verified", summary.entries);
    } else {
        print_table_header();
        for failure in &summary.failures {
            println!("{}", format_table_row(failure));
        }
        println!(
            "{} of {} entries failed verification",
            summary.failures.len(),
            summary.entries
        );
    }

    if strict && !summary.is_ok() {
        return Err(CommandError::VerificationFailed {
            failed: summary.failures.len(),
            entries: summary.entries,
        }
        .into());
    }

    Ok(())
}
