//! httpspec CLI - run .http test suites and report aggregate results

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use httpspec_core::{report, Config, RunReport};
use httpspec_runner::{
    discover, is_suite_file, render_summary, run_pool, ErrorSink, HttpTransport, Tally,
    DEFAULT_TIMEOUT,
};

#[derive(Parser)]
#[command(name = "httpspec")]
#[command(about = "Run .http test suites and report pass/fail/invalid counts")]
#[command(version)]
struct Cli {
    /// Test files or directories; no arguments searches the current directory
    paths: Vec<PathBuf>,

    /// Worker thread count (default: HTTP_THREAD_COUNT, then config file, then 1)
    #[arg(long)]
    threads: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, default_value = "terminal")]
    output: OutputFormat,

    /// Print the JSON Schema of the run report and exit
    #[arg(long)]
    schema: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    if cli.schema {
        println!("{}", report::generate_schema());
        return Ok(0);
    }

    let config = Config::load_default()?;
    let threads = resolve_threads(cli.threads, &config)?;
    let timeout = Duration::from_secs(
        cli.timeout
            .or(config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT.as_secs()),
    );

    let paths = collect_paths(&cli.paths)?;
    if cli.verbose {
        eprintln!(
            "Running {} files on {} worker(s), timeout {}s",
            paths.len(),
            threads,
            timeout.as_secs()
        );
    }

    // One client per worker so transport state is never shared across threads.
    let transports = (0..threads)
        .map(|_| HttpTransport::new(timeout))
        .collect::<Result<Vec<_>, _>>()?;

    let sink = match cli.output {
        OutputFormat::Terminal => ErrorSink::stderr(),
        OutputFormat::Json => ErrorSink::discard(),
    };
    let tally = Tally::new();
    let files = run_pool(&paths, transports, &sink, &tally);
    let counts = tally.snapshot();

    match cli.output {
        OutputFormat::Terminal => print!("{}", render_summary(&counts)),
        OutputFormat::Json => {
            let run_report = RunReport { counts, files };
            println!("{}", serde_json::to_string_pretty(&run_report)?);
        }
    }

    Ok(u8::from(!counts.is_success()))
}

/// `--threads` beats `HTTP_THREAD_COUNT` beats the config file; one worker
/// when nothing is configured. Zero is clamped to one.
fn resolve_threads(flag: Option<usize>, config: &Config) -> Result<usize> {
    if let Some(n) = flag {
        return Ok(n.max(1));
    }
    if let Ok(value) = std::env::var("HTTP_THREAD_COUNT") {
        let n: usize = value
            .trim()
            .parse()
            .with_context(|| format!("HTTP_THREAD_COUNT is not an integer: '{value}'"))?;
        if n == 0 {
            bail!("HTTP_THREAD_COUNT must be a positive integer");
        }
        return Ok(n);
    }
    Ok(config.threads.unwrap_or(1).max(1))
}

/// Expand positional arguments into the list of suite files to run.
///
/// Suite-extension paths are taken as files even if missing (the runner
/// classifies an unreadable file as invalid); anything else must be an
/// existing directory to search.
fn collect_paths(args: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if args.is_empty() {
        return Ok(discover(Path::new("."))?);
    }

    let mut paths = Vec::new();
    for arg in args {
        if is_suite_file(arg) {
            paths.push(arg.clone());
        } else if arg.is_dir() {
            paths.extend(discover(arg)?);
        } else {
            bail!(
                "invalid path '{}': not a test file or an existing directory",
                arg.display()
            );
        }
    }
    Ok(paths)
}
