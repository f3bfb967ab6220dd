use serde::Serialize;

use crate::error::FixError;

/// Which pass produced a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteKind {
    /// `POST` / `header` / `body` collapsed to `POST … body …` + `header`.
    HeaderBody,
    /// `POST` / `body` collapsed to one line.
    BodyOnly,
}

impl std::fmt::Display for RewriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeaderBody => write!(f, "header+body"),
            Self::BodyOnly => write!(f, "body"),
        }
    }
}

/// One applied substitution. `line` is 1-based and points at the `POST`
/// line in the text that was handed to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub line: usize,
    pub kind: RewriteKind,
}

/// Normalizer output: the new text and what was done to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub rewrites: Vec<Rewrite>,
}

/// Whether a file may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    /// Dry run: report what would change, touch nothing.
    Check,
}

/// What happened to one candidate file.
#[derive(Debug)]
pub enum FileOutcome {
    Unchanged,
    Fixed { rewrites: Vec<Rewrite> },
    WouldFix { rewrites: Vec<Rewrite> },
    Failed(FixError),
}

impl FileOutcome {
    /// Rewrites applied (or pending, in check mode). Empty otherwise.
    #[must_use]
    pub fn rewrites(&self) -> &[Rewrite] {
        match self {
            Self::Fixed { rewrites } | Self::WouldFix { rewrites } => rewrites,
            Self::Unchanged | Self::Failed(_) => &[],
        }
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub scanned: usize,
    pub fixed: usize,
    pub would_fix: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub rewrites: usize,
}

impl Summary {
    pub(crate) fn record(&mut self, outcome: &FileOutcome) {
        self.scanned += 1;
        self.rewrites += outcome.rewrites().len();
        match outcome {
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Fixed { .. } => self.fixed += 1,
            FileOutcome::WouldFix { .. } => self.would_fix += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Process exit code: failures outrank pending check-mode fixes.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            2
        } else if self.would_fix > 0 {
            1
        } else {
            0
        }
    }
}
