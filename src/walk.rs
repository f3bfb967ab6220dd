use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;

use crate::error::FixError;

// Directories never descended into on a recursive walk: VCS internals,
// build output, dependency trees.
pub(crate) const SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    "__pycache__",
    ".venv",
    ".idea",
    ".cache",
];

/// Result of listing a directory: the scripts to fix, plus entries that
/// matched (or may have matched) but could not be read.
#[derive(Debug, Default)]
pub struct Listing {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, FixError)>,
}

/// List candidate files under `dir` whose file name ends with `suffix`,
/// sorted by path. Only `dir` itself is read unless `recursive` is set.
///
/// Hidden files are included and ignore files are not consulted: a check
/// script listed in `.gitignore` is still a check script. Symlinks to files
/// count as files; symlinked directories are not descended into.
pub fn candidates(dir: &Path, suffix: &str, recursive: bool) -> Result<Listing, FixError> {
    let meta = fs::metadata(dir).map_err(|e| FixError::from_io(dir, e))?;
    if !meta.is_dir() {
        return Err(FixError::config(
            None,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let matcher = suffix_matcher(suffix)?;

    let walker = WalkBuilder::new(dir)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .max_depth(if recursive { None } else { Some(1) })
        .filter_entry(|entry| {
            if entry.depth() > 0 && entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    return !SKIP_DIRS.contains(&name);
                }
            }
            true
        })
        .build();

    let mut listing = Listing::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = error_path(&e).unwrap_or(dir).to_path_buf();
                tracing::debug!(path = %path.display(), "unreadable walk entry: {e}");
                let kind = e.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
                let err = FixError::from_io(&path, io::Error::new(kind, e.to_string()));
                listing.unreadable.push((path, err));
                continue;
            }
        };

        if !entry.file_name().to_str().is_some_and(|name| matcher.is_match(name)) {
            continue;
        }

        match entry.file_type() {
            Some(ft) if ft.is_file() => listing.files.push(entry.into_path()),
            Some(ft) if ft.is_symlink() => match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => listing.files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let err = FixError::from_io(entry.path(), e);
                    listing.unreadable.push((entry.into_path(), err));
                }
            },
            _ => {}
        }
    }

    listing.files.sort();
    listing.unreadable.sort_by(|a, b| a.0.cmp(&b.0));
    tracing::debug!(
        dir = %dir.display(),
        suffix,
        recursive,
        count = listing.files.len(),
        unreadable = listing.unreadable.len(),
        "collected candidates"
    );
    Ok(listing)
}

/// Path an `ignore` error is about, if it carries one.
fn error_path(e: &ignore::Error) -> Option<&Path> {
    match e {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

/// `*<suffix>` against the bare file name, with glob metacharacters in the
/// suffix taken literally.
fn suffix_matcher(suffix: &str) -> Result<GlobMatcher, FixError> {
    if suffix.is_empty() {
        return Err(FixError::config(None, "suffix must not be empty"));
    }
    let pattern = format!("*{}", globset::escape(suffix));
    Glob::new(&pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| FixError::config(None, format!("suffix {suffix:?}: {e}")))
}
