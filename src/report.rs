use std::fmt::Write;
use std::path::Path;

use serde_json::{Value, json};

use crate::types::{FileOutcome, Mode, Rewrite, Summary};

#[must_use]
pub fn processing_line(path: &Path) -> String {
    format!("Processing {}", path.display())
}

/// Per-file result line, or `None` when there is nothing to say.
/// Failures are returned too; the caller routes them to stderr.
#[must_use]
pub fn outcome_line(path: &Path, outcome: &FileOutcome) -> Option<String> {
    match outcome {
        FileOutcome::Unchanged => None,
        FileOutcome::Fixed { rewrites } => Some(format!(
            "  Fixed {} ({})",
            path.display(),
            rewrite_list(rewrites)
        )),
        FileOutcome::WouldFix { rewrites } => Some(format!(
            "  Would fix {} ({})",
            path.display(),
            rewrite_list(rewrites)
        )),
        FileOutcome::Failed(e) => Some(format!("  Failed {e}")),
    }
}

/// Console lines for one file: what goes to stdout, and the failure line
/// (if any) for stderr. `quiet` silences stdout only.
#[must_use]
pub fn progress(path: &Path, outcome: &FileOutcome, quiet: bool) -> (Vec<String>, Option<String>) {
    if let FileOutcome::Failed(_) = outcome {
        let stdout = if quiet { vec![] } else { vec![processing_line(path)] };
        return (stdout, outcome_line(path, outcome));
    }
    if quiet {
        return (vec![], None);
    }
    let mut stdout = vec![processing_line(path)];
    stdout.extend(outcome_line(path, outcome));
    (stdout, None)
}

/// `2 rewrites: line 3 header+body, line 9 body`
fn rewrite_list(rewrites: &[Rewrite]) -> String {
    let mut out = String::new();
    let noun = if rewrites.len() == 1 { "rewrite" } else { "rewrites" };
    let _ = write!(out, "{} {noun}", rewrites.len());
    for (i, r) in rewrites.iter().enumerate() {
        let sep = if i == 0 { ": " } else { ", " };
        let _ = write!(out, "{sep}line {} {}", r.line, r.kind);
    }
    out
}

#[must_use]
pub fn summary_line(summary: &Summary, mode: Mode) -> String {
    let changed = match mode {
        Mode::Write => format!("{} fixed", summary.fixed),
        Mode::Check => format!("{} would be fixed", summary.would_fix),
    };
    format!(
        "POST/body fixes completed: {changed}, {} unchanged, {} failed ({} files)",
        summary.unchanged, summary.failed, summary.scanned
    )
}

/// Collects per-file entries for `--json` output.
#[derive(Debug, Default)]
pub struct JsonReport {
    files: Vec<Value>,
}

impl JsonReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &Path, outcome: &FileOutcome) {
        let status = match outcome {
            FileOutcome::Unchanged => "unchanged",
            FileOutcome::Fixed { .. } => "fixed",
            FileOutcome::WouldFix { .. } => "would_fix",
            FileOutcome::Failed(_) => "failed",
        };
        let mut entry = json!({
            "path": path.display().to_string(),
            "status": status,
            "rewrites": outcome.rewrites(),
        });
        if let FileOutcome::Failed(e) = outcome {
            entry["error"] = Value::String(e.to_string());
        }
        self.files.push(entry);
    }

    #[must_use]
    pub fn finish(self, dir: &Path, mode: Mode, summary: &Summary) -> Value {
        let mode = match mode {
            Mode::Write => "write",
            Mode::Check => "check",
        };
        json!({
            "dir": dir.display().to_string(),
            "mode": mode,
            "files": self.files,
            "summary": summary,
        })
    }
}
