#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions, // FixError in error.rs etc.
    clippy::missing_errors_doc,      // every error path is a FixError variant
    clippy::missing_panics_doc,      // same
)]

pub mod config;
pub mod error;
pub mod fix;
pub(crate) mod lines;
pub mod normalize;
pub mod report;
pub mod types;
pub mod walk;

use std::io::{self, Read, Write};
use std::path::Path;

use rayon::prelude::*;

pub use config::Config;
pub use error::FixError;
pub use normalize::{normalize, normalize_with_report};
pub use types::{FileOutcome, Mode, Normalized, Rewrite, RewriteKind, Summary};

/// Fix every candidate file under `config.dir`.
///
/// `on_file` sees each file with its outcome, in sorted path order, whether
/// or not the files were processed in parallel. Entries the walk could not
/// read come first, as failures. Per-file failures are reported through
/// `on_file` and counted; only failing to list the directory aborts the run.
pub fn run<F>(config: &Config, mut on_file: F) -> Result<Summary, FixError>
where
    F: FnMut(&Path, &FileOutcome),
{
    let walk::Listing { files, unreadable } =
        walk::candidates(&config.dir, &config.suffix, config.recursive)?;
    let mut summary = Summary::default();

    for (path, err) in unreadable {
        let outcome = FileOutcome::Failed(err);
        summary.record(&outcome);
        on_file(&path, &outcome);
    }

    if config.jobs > 1 && files.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .map_err(|e| FixError::config(None, format!("cannot start {} workers: {e}", config.jobs)))?;
        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| fix::fix_file(path, config.mode))
                .collect()
        });
        for (path, outcome) in files.iter().zip(&outcomes) {
            summary.record(outcome);
            on_file(path, outcome);
        }
    } else {
        for path in &files {
            let outcome = fix::fix_file(path, config.mode);
            summary.record(&outcome);
            on_file(path, &outcome);
        }
    }

    tracing::debug!(?summary, "run finished");
    Ok(summary)
}

/// Filter mode: normalize all of `input` into `output`. Returns the
/// number of rewrites applied.
pub fn normalize_stream<R: Read, W: Write>(mut input: R, mut output: W) -> io::Result<usize> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let normalized = normalize_with_report(&text);
    output.write_all(normalized.text.as_bytes())?;
    output.flush()?;
    Ok(normalized.rewrites.len())
}
