use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::FixError;
use crate::normalize::normalize_with_report;
use crate::types::{FileOutcome, Mode};

/// Read, normalize and (in [`Mode::Write`]) replace one file.
///
/// Errors are folded into [`FileOutcome::Failed`] so a bad file never stops
/// the caller from moving on to the next one.
pub fn fix_file(path: &Path, mode: Mode) -> FileOutcome {
    match try_fix(path, mode) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(path = %path.display(), "fix failed: {e}");
            FileOutcome::Failed(e)
        }
    }
}

fn try_fix(path: &Path, mode: Mode) -> Result<FileOutcome, FixError> {
    let content = fs::read_to_string(path).map_err(|e| FixError::from_io(path, e))?;
    let normalized = normalize_with_report(&content);

    if normalized.text == content {
        tracing::debug!(path = %path.display(), "already normalized");
        return Ok(FileOutcome::Unchanged);
    }

    match mode {
        Mode::Check => Ok(FileOutcome::WouldFix {
            rewrites: normalized.rewrites,
        }),
        Mode::Write => {
            replace_atomically(path, &normalized.text)?;
            tracing::debug!(
                path = %path.display(),
                rewrites = normalized.rewrites.len(),
                "rewrote file"
            );
            Ok(FileOutcome::Fixed {
                rewrites: normalized.rewrites,
            })
        }
    }
}

/// Write `content` to a sibling temp file, fsync it, then rename it over
/// `path`. Readers see either the old file or the new one, never a prefix.
fn replace_atomically(path: &Path, content: &str) -> Result<(), FixError> {
    let io_err = |e: std::io::Error| FixError::from_io(path, e);

    // Rename over the link target, not the link, so symlinked scripts stay links.
    let target = fs::canonicalize(path).map_err(io_err)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target).map_err(io_err)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    fs::set_permissions(tmp.path(), permissions).map_err(io_err)?;
    tmp.persist(&target).map_err(|e| io_err(e.error))?;
    Ok(())
}
