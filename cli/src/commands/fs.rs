use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;

pub fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("[io] Failed to read {}", path.display()))
}

/// Write `contents` to a temp file next to `target`, then rename it into
/// place so a failed run never leaves a half-written session behind.
pub fn write_atomic(target: &Path, contents: &[u8], force: bool) -> Result<()> {
    assert_not_stdout(target)?;
    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    if !force && target.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
    }

    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    tmp.write_all(contents).context("write temp file")?;
    tmp.as_file().sync_all().ok(); // best-effort fsync file
    tmp.persist(target).with_context(|| format!("rename to {}", target.display()))?;
    let _ = File::open(parent).and_then(|f| f.sync_all());
    Ok(())
}
