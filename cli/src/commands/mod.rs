pub mod fs;
pub mod import;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use geoimport::{Format, ImportConfig};

/// Explicit `--format`, else the input file's extension.
fn resolve_format(input: &Path, format: Option<Format>) -> Result<Format> {
    format.or_else(|| Format::from_extension(input))
        .ok_or_else(|| anyhow!("Cannot guess the format of {}; pass --format", input.display()))
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    match path {
        Some(path) => ImportConfig::from_json_file(path)
            .with_context(|| format!("[import] Failed to load config {}", path.display())),
        None => Ok(ImportConfig::default()),
    }
}
