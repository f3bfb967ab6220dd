use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use bodyfix::config::{self, Config, Overrides};
use bodyfix::report::{self, JsonReport};
use bodyfix::Mode;

/// bodyfix: move `body` clauses in HTTP check scripts onto their `POST` line.
///
/// `POST` / `header` / `body` blocks become `POST … body …` followed by the
/// header; `POST` / `body` pairs become a single line. Files are rewritten
/// in place only when something changed.
#[derive(Parser)]
#[command(name = "bodyfix", version, about)]
struct Cli {
    /// Directory holding the check scripts. Overrides the config file.
    dir: Option<PathBuf>,

    /// File-name suffix selecting scripts [default: .http].
    #[arg(long)]
    suffix: Option<String>,

    /// Descend into subdirectories.
    #[arg(long, short)]
    recursive: bool,

    /// Report files that would change without writing them. Exits 1 if any.
    #[arg(long)]
    check: bool,

    /// Worker threads [default: 1].
    #[arg(long, short)]
    jobs: Option<usize>,

    /// TOML config file [default: ./bodyfix.toml when present].
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Machine-readable JSON report.
    #[arg(long)]
    json: bool,

    /// Only print the summary line.
    #[arg(long, short)]
    quiet: bool,

    /// Normalize stdin to stdout instead of touching files.
    #[arg(long, conflicts_with_all = ["dir", "check", "json"])]
    stdin: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("BODYFIX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "bodyfix", &mut io::stdout());
        return;
    }

    if cli.stdin {
        if let Err(e) = bodyfix::normalize_stream(io::stdin().lock(), io::stdout().lock()) {
            eprintln!("stdin: {e}");
            process::exit(2);
        }
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    let mut json = cli.json.then(JsonReport::new);
    let quiet = cli.quiet;

    let result = bodyfix::run(&config, |path, outcome| {
        if let Some(json) = json.as_mut() {
            json.push(path, outcome);
            return;
        }
        let (stdout, stderr) = report::progress(path, outcome, quiet);
        for line in stdout {
            println!("{line}");
        }
        if let Some(line) = stderr {
            eprintln!("{line}");
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    if let Some(json) = json {
        let value = json.finish(&config.dir, config.mode, &summary);
        println!(
            "{}",
            serde_json::to_string_pretty(&value).expect("serde_json::Value is always serializable")
        );
    } else {
        println!("{}", report::summary_line(&summary, config.mode));
    }

    let code = summary.exit_code();
    if code != 0 {
        process::exit(code);
    }
}

fn load_config(cli: &Cli) -> Result<Config, bodyfix::FixError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let file = config::discover(cli.config.as_deref(), &cwd)?;
    let config = Config::resolve(
        file,
        Overrides {
            dir: cli.dir.clone(),
            suffix: cli.suffix.clone(),
            recursive: cli.recursive,
            jobs: cli.jobs,
            check: cli.check,
        },
    )?;
    if config.mode == Mode::Check {
        tracing::debug!("check mode: nothing will be written");
    }
    Ok(config)
}
