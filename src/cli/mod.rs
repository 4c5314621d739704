//! # CLI Module
//!
//! Command-line interface for the duplicate file finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory, write duplicateFiles.json
//! dupe-finder ~/Documents
//!
//! # Larger ceiling, fewer workers, text to stdout
//! dupe-finder ~/Documents --max-file-size 524288000 --workers 4 --output text
//!
//! # Re-check every group with the full digest before reporting
//! dupe-finder ~/Documents --verify
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use dupe_finder::core::comparator::{verify_groups, DuplicateGroup};
use dupe_finder::core::hasher::DEFAULT_FINGERPRINT_LEN;
use dupe_finder::core::pipeline::{
    Pipeline, PipelineResult, DEFAULT_PROGRESS_INTERVAL, DEFAULT_WORKER_COUNT,
    VERBOSE_PROGRESS_INTERVAL,
};
use dupe_finder::core::reporter::{write_report, ExportFormat, DEFAULT_REPORT_FILE};
use dupe_finder::core::scanner::DEFAULT_MAX_FILE_SIZE;
use dupe_finder::error::Result;
use dupe_finder::events::{CollectEvent, Event, EventChannel, PipelineEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Dupe Finder - group files by content fingerprint
#[derive(Parser, Debug)]
#[command(name = "dupe-finder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    root: PathBuf,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Number of concurrent file processors
    #[arg(short, long, default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Records between progress notifications (default 10000, 100 with --verbose)
    #[arg(long)]
    progress_interval: Option<usize>,

    /// Path queue capacity (default: 4 per worker)
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Hex characters kept from each MD5 digest (1-32)
    #[arg(long, default_value_t = DEFAULT_FINGERPRINT_LEN)]
    fingerprint_len: usize,

    /// Follow symbolic links (no cycle detection)
    #[arg(long)]
    follow_symlinks: bool,

    /// Confirm each group with the full MD5 digest before reporting
    #[arg(long)]
    verify: bool,

    /// Output format
    #[arg(short, long, default_value = "json")]
    output: OutputFormat,

    /// Report file for JSON output
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    output_file: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// JSON array of {hash, filePaths} written to --output-file
    Json,
    /// One block per group on stdout
    Text,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Text => ExportFormat::Text,
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    dupe_finder::init_tracing(if cli.verbose { "info" } else { "warn" });

    let start_time = Instant::now();
    let outcome = run_scan(&cli);
    println!("Time taken: {:.2}s", start_time.elapsed().as_secs_f64());
    outcome
}

fn run_scan(cli: &Cli) -> Result<()> {
    let term = Term::stderr();

    let progress_interval = cli.progress_interval.unwrap_or(if cli.verbose {
        VERBOSE_PROGRESS_INTERVAL
    } else {
        DEFAULT_PROGRESS_INTERVAL
    });

    let mut builder = Pipeline::builder()
        .root(&cli.root)
        .max_file_size(cli.max_file_size)
        .worker_count(cli.workers)
        .progress_interval(progress_interval)
        .fingerprint_len(cli.fingerprint_len)
        .follow_symlinks(cli.follow_symlinks);
    if let Some(capacity) = cli.queue_capacity {
        builder = builder.queue_capacity(capacity);
    }
    let pipeline = builder.build();

    let (sender, receiver) = EventChannel::new();

    let progress = if cli.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {elapsed} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Error { path, message }) => {
                    if let Some(ref pb) = progress_clone {
                        if verbose {
                            pb.println(format!(
                                "{} {}: {}",
                                style("!").yellow(),
                                path.display(),
                                message
                            ));
                        }
                    }
                }
                Event::Collect(CollectEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!(
                            "{} files, ~{} unique hashes",
                            p.files_processed, p.unique_fingerprints
                        ));
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = result?;

    let mut groups = result.index.duplicate_groups();
    if cli.verify {
        let verified = verify_groups(&groups);
        info!(
            "verification split {} aliased groups, {} files unreadable",
            verified.aliased_groups,
            verified.unreadable.len()
        );
        groups = verified.groups;
    }

    print_summary(&term, &result, &groups);

    write_report(&groups, cli.output.into(), Some(&cli.output_file))?;

    if matches!(cli.output, OutputFormat::Json) {
        term.write_line(&format!(
            "  Report written to {}",
            style(display_path(&cli.output_file)).cyan()
        ))
        .ok();
    }

    Ok(())
}

fn print_summary(term: &Term, result: &PipelineResult, groups: &[DuplicateGroup]) {
    term.write_line(&format!("Processed {} files", style(result.files_processed).cyan()))
        .ok();

    if result.skipped.total() > 0 {
        term.write_line(&format!(
            "  {} skipped ({} unreadable)",
            style(result.skipped.total()).dim(),
            result.skipped.error_count()
        ))
        .ok();
    }

    if !result.walk_errors.is_empty() {
        term.write_line(&format!(
            "  {} directory entries could not be read",
            style(result.walk_errors.len()).yellow()
        ))
        .ok();
    }

    let duplicate_count: usize = groups.iter().map(|g| g.duplicate_count()).sum();
    term.write_line(&format!(
        "  {} duplicate groups, {} redundant files",
        style(groups.len()).cyan(),
        style(duplicate_count).cyan()
    ))
    .ok();
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
