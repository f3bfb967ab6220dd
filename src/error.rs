use std::path::{Path, PathBuf};

/// Every error bodyfix can produce. The normalizer itself is total; these
/// only come from touching the filesystem or resolving configuration.
#[derive(Debug)]
pub enum FixError {
    NotFound {
        path: PathBuf,
    },
    PermissionDenied {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is not valid UTF-8. Never rewritten.
    Encoding {
        path: PathBuf,
    },
    InvalidConfig {
        path: Option<PathBuf>,
        reason: String,
    },
}

impl std::fmt::Display for FixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "not found: {}", path.display()),
            Self::PermissionDenied { path } => {
                write!(f, "{} [permission denied]", path.display())
            }
            Self::IoError { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            Self::Encoding { path } => {
                write!(f, "{}: not valid UTF-8, left untouched", path.display())
            }
            Self::InvalidConfig {
                path: Some(path),
                reason,
            } => write!(f, "invalid config {}: {reason}", path.display()),
            Self::InvalidConfig { path: None, reason } => {
                write!(f, "invalid config: {reason}")
            }
        }
    }
}

impl std::error::Error for FixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl FixError {
    /// Classify an `io::Error` against the path that produced it.
    pub(crate) fn from_io(path: &Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::InvalidData => Self::Encoding {
                path: path.to_path_buf(),
            },
            _ => Self::IoError {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }

    pub(crate) fn config(path: Option<&Path>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.map(Path::to_path_buf),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error when it ends the run.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::IoError { .. } | Self::Encoding { .. } => 2,
            Self::InvalidConfig { .. } => 3,
            Self::PermissionDenied { .. } => 4,
        }
    }
}
