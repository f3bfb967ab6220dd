//! Integration tests exercising the full `run()` flow against a scratch
//! copy of `tests/fixtures/checks`.
//!
//! `tests/fixtures/fixed` holds what each script must look like afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use bodyfix::{Config, FileOutcome, Mode, RewriteKind, Summary};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Fresh writable copy of the fixture scripts.
fn scratch() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    copy_tree(&fixture("checks"), dir.path());
    dir
}

fn config(dir: &Path) -> Config {
    Config {
        dir: dir.to_path_buf(),
        ..Config::default()
    }
}

/// Run and keep `(file name relative to dir, rewrite lines)` for every
/// reported file.
fn run(config: &Config) -> (Summary, Vec<(String, Vec<usize>)>) {
    let mut seen = Vec::new();
    let summary = bodyfix::run(config, |path, outcome| {
        let rel = path
            .strip_prefix(&config.dir)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        let lines: Vec<usize> = outcome.rewrites().iter().map(|r| r.line).collect();
        seen.push((rel, lines));
    })
    .unwrap();
    (summary, seen)
}

fn read(dir: &Path, rel: &str) -> String {
    fs::read_to_string(dir.join(rel)).unwrap()
}

// ---------------------------------------------------------------------------
// Write mode
// ---------------------------------------------------------------------------

#[test]
fn fixes_scripts_in_place() {
    let dir = scratch();
    let (summary, seen) = run(&config(dir.path()));

    assert_eq!(
        seen,
        vec![
            ("health.http".to_string(), vec![]),
            ("login.http".to_string(), vec![4]),
            ("search.http".to_string(), vec![1, 5]),
        ]
    );
    assert_eq!(summary.scanned, 3);
    assert_eq!(summary.fixed, 2);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.rewrites, 3);
    assert_eq!(summary.exit_code(), 0);

    for name in ["health.http", "login.http", "search.http"] {
        assert_eq!(
            read(dir.path(), name),
            read(&fixture("fixed"), name),
            "{name} differs from its fixed fixture"
        );
    }

    // not in scope: subdirectory without --recursive, wrong suffix
    assert_eq!(
        read(dir.path(), "admin/users.http"),
        read(&fixture("checks"), "admin/users.http")
    );
    assert_eq!(
        read(dir.path(), "README.md"),
        read(&fixture("checks"), "README.md")
    );
}

#[test]
fn second_run_changes_nothing() {
    let dir = scratch();
    let cfg = Config {
        recursive: true,
        ..config(dir.path())
    };
    run(&cfg);

    let (summary, _) = run(&cfg);
    assert_eq!(summary.fixed, 0);
    assert_eq!(summary.unchanged, summary.scanned);
}

#[test]
fn recursive_run_reaches_subdirectories() {
    let dir = scratch();
    let cfg = Config {
        recursive: true,
        ..config(dir.path())
    };
    let (summary, seen) = run(&cfg);

    assert_eq!(seen[0].0, "admin/users.http");
    assert_eq!(summary.scanned, 4);
    assert_eq!(summary.fixed, 3);
    assert_eq!(
        read(dir.path(), "admin/users.http"),
        read(&fixture("fixed"), "admin/users.http")
    );
}

#[test]
fn custom_suffix_selects_other_files() {
    let dir = scratch();
    let cfg = Config {
        suffix: ".md".to_string(),
        ..config(dir.path())
    };
    let (summary, seen) = run(&cfg);

    assert_eq!(seen, vec![("README.md".to_string(), vec![1])]);
    assert_eq!(summary.fixed, 1);
    assert!(read(dir.path(), "README.md").starts_with("POST \"not a check script\" body "));
}

// ---------------------------------------------------------------------------
// Check mode
// ---------------------------------------------------------------------------

#[test]
fn check_mode_reports_without_writing() {
    let dir = scratch();
    let cfg = Config {
        mode: Mode::Check,
        ..config(dir.path())
    };

    let mut kinds = Vec::new();
    let summary = bodyfix::run(&cfg, |_, outcome| {
        if let FileOutcome::WouldFix { rewrites } = outcome {
            kinds.extend(rewrites.iter().map(|r| r.kind));
        }
    })
    .unwrap();

    assert_eq!(summary.would_fix, 2);
    assert_eq!(summary.fixed, 0);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(
        kinds,
        vec![
            RewriteKind::HeaderBody,
            RewriteKind::BodyOnly,
            RewriteKind::BodyOnly
        ]
    );
    for name in ["login.http", "search.http"] {
        assert_eq!(read(dir.path(), name), read(&fixture("checks"), name));
    }
}

// ---------------------------------------------------------------------------
// Parallel processing and failures
// ---------------------------------------------------------------------------

#[test]
fn parallel_run_matches_sequential_order_and_output() {
    let seq_dir = scratch();
    let par_dir = scratch();

    let (seq_summary, seq_seen) = run(&Config {
        recursive: true,
        ..config(seq_dir.path())
    });
    let (par_summary, par_seen) = run(&Config {
        recursive: true,
        jobs: 4,
        ..config(par_dir.path())
    });

    assert_eq!(seq_summary, par_summary);
    assert_eq!(seq_seen, par_seen);
    for name in ["login.http", "search.http", "admin/users.http"] {
        assert_eq!(read(seq_dir.path(), name), read(par_dir.path(), name));
    }
}

#[test]
fn bad_file_does_not_stop_the_run() {
    let dir = scratch();
    fs::write(dir.path().join("binary.http"), b"POST \"u\"\n  body \"\xff\"\n").unwrap();

    let mut failed = Vec::new();
    let summary = bodyfix::run(&config(dir.path()), |path, outcome| {
        if let FileOutcome::Failed(e) = outcome {
            failed.push((path.file_name().unwrap().to_owned(), e.to_string()));
        }
    })
    .unwrap();

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "binary.http");
    assert!(failed[0].1.contains("UTF-8"));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.fixed, 2);
    assert_eq!(summary.exit_code(), 2);
    assert_eq!(read(dir.path(), "login.http"), read(&fixture("fixed"), "login.http"));
}

#[test]
fn missing_directory_aborts_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = bodyfix::run(&config(&dir.path().join("checks")), |_, _| {}).unwrap_err();
    assert!(matches!(err, bodyfix::FixError::NotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn empty_directory_is_a_clean_run() {
    let dir = tempfile::tempdir().unwrap();
    let (summary, seen) = run(&config(dir.path()));
    assert!(seen.is_empty());
    assert_eq!(summary, Summary::default());
}

#[cfg(unix)]
#[test]
fn symlinked_script_is_fixed_through_its_target() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    let shared = tempfile::tempdir().unwrap();
    fs::copy(fixture("checks/health.http"), dir.path().join("plain.http")).unwrap();
    let target = shared.path().join("login.txt");
    fs::copy(fixture("checks/login.http"), &target).unwrap();
    symlink(&target, dir.path().join("login.http")).unwrap();

    let (summary, seen) = run(&config(dir.path()));
    assert_eq!(summary.scanned, 2);
    assert_eq!(seen[0].0, "login.http");
    assert!(!seen[0].1.is_empty());
    assert_eq!(fs::read_to_string(&target).unwrap(), read(&fixture("fixed"), "login.http"));
    let link = fs::symlink_metadata(dir.path().join("login.http")).unwrap();
    assert!(link.file_type().is_symlink());
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_fails_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("x.http"), "POST \"u\"\n").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let still_readable = fs::read_dir(&locked).is_ok();
    let mut failed = Vec::new();
    let summary = bodyfix::run(
        &Config {
            recursive: true,
            ..config(dir.path())
        },
        |path, outcome| {
            if let FileOutcome::Failed(_) = outcome {
                failed.push(path.to_path_buf());
            }
        },
    )
    .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    // running as root reads through mode 000
    if still_readable {
        return;
    }

    assert_eq!(failed.len(), 1);
    assert!(failed[0].starts_with(&locked));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.exit_code(), 2);
}
