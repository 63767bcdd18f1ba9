//! TSV command implementation.

use super::{emit_records, load_canonicalizer, EmitArgs};
use register_ingest::TsvSource;
use std::path::Path;

pub fn run(fields: String, data: String, args: EmitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = load_canonicalizer(&fields)?;
    let mut source = TsvSource::open(Path::new(&data))
        .map_err(|e| format!("Failed to open {}: {}", data, e))?;

    // The header covers every row, so an unknown column is always fatal.
    canonicalizer
        .catalog()
        .check_names(source.header().iter().map(String::as_str))?;
    tracing::debug!(columns = source.header().len(), "header matches field metadata");

    emit_records(&mut source, &canonicalizer, &args, false)
}
