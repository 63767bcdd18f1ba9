//! YAML command implementation.

use super::{emit_records, load_canonicalizer, EmitArgs};
use register_ingest::YamlSource;
use std::path::Path;

pub fn run(fields: String, dir: String, args: EmitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = load_canonicalizer(&fields)?;
    let mut source = YamlSource::from_dir(Path::new(&dir))
        .map_err(|e| format!("Failed to read directory {}: {}", dir, e))?;
    if source.paths().is_empty() {
        tracing::warn!(dir = %dir, "no .yaml files found");
    }

    // Under --skip-invalid, unknown keys only matter when they carry a value.
    let check_keys = !args.skip_invalid;
    emit_records(&mut source, &canonicalizer, &args, check_keys)
}
