use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::FixError;
use crate::types::Mode;

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bodyfix.toml";
pub const DEFAULT_SUFFIX: &str = ".http";

/// Everything a run needs. Built once at startup, then passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory whose check scripts are rewritten.
    pub dir: PathBuf,
    /// File-name suffix selecting the scripts.
    pub suffix: String,
    pub recursive: bool,
    /// Worker threads; 1 means process files inline.
    pub jobs: usize,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            suffix: DEFAULT_SUFFIX.to_string(),
            recursive: false,
            jobs: 1,
            mode: Mode::Write,
        }
    }
}

/// On-disk TOML shape. Every key optional; unknown keys are an error so a
/// typo doesn't silently fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    dir: Option<PathBuf>,
    suffix: Option<String>,
    recursive: Option<bool>,
    jobs: Option<usize>,
}

/// A parsed config file plus where it came from.
#[derive(Debug)]
pub struct LoadedFile {
    path: PathBuf,
    values: FileConfig,
}

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub suffix: Option<String>,
    pub recursive: bool,
    pub jobs: Option<usize>,
    pub check: bool,
}

/// Find and parse the config file: the explicit path if given (must
/// exist), else `bodyfix.toml` in `cwd` if present.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Option<LoadedFile>, FixError> {
    if let Some(path) = explicit {
        return load_file(path).map(Some);
    }
    let implicit = cwd.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        tracing::debug!(path = %implicit.display(), "using config file");
        return load_file(&implicit).map(Some);
    }
    Ok(None)
}

pub fn load_file(path: &Path) -> Result<LoadedFile, FixError> {
    let text = fs::read_to_string(path).map_err(|e| FixError::from_io(path, e))?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<LoadedFile, FixError> {
    let values: FileConfig =
        toml::from_str(text).map_err(|e| FixError::config(Some(path), e.message()))?;
    Ok(LoadedFile {
        path: path.to_path_buf(),
        values,
    })
}

impl Config {
    /// Merge CLI overrides over the config file over defaults, then validate.
    pub fn resolve(file: Option<LoadedFile>, overrides: Overrides) -> Result<Self, FixError> {
        let defaults = Self::default();
        let (origin, values) = match file {
            Some(loaded) => (Some(loaded.path), loaded.values),
            None => (None, FileConfig::default()),
        };

        // Relative dirs in a config file are relative to that file.
        let file_dir = values.dir.map(|dir| match origin.as_deref().and_then(Path::parent) {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        });

        let config = Self {
            dir: overrides.dir.or(file_dir).unwrap_or(defaults.dir),
            suffix: overrides
                .suffix
                .or(values.suffix)
                .unwrap_or(defaults.suffix),
            recursive: overrides.recursive || values.recursive.unwrap_or(defaults.recursive),
            jobs: overrides.jobs.or(values.jobs).unwrap_or(defaults.jobs),
            mode: if overrides.check {
                Mode::Check
            } else {
                defaults.mode
            },
        };

        if config.jobs == 0 {
            return Err(FixError::config(origin.as_deref(), "jobs must be at least 1"));
        }
        if config.suffix.is_empty() {
            return Err(FixError::config(origin.as_deref(), "suffix must not be empty"));
        }
        Ok(config)
    }
}
