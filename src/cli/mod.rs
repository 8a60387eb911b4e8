//! # CLI Module
//!
//! Command-line interface for the duplicate photo finder.
//!
//! ## Usage
//! ```bash
//! # Scan a directory for duplicates
//! photo-duplicates scan ~/Photos
//!
//! # With custom threshold
//! photo-duplicates scan ~/Photos --threshold 8
//!
//! # Show image details for both sides of each pair
//! photo-duplicates scan ~/Photos --details
//!
//! # JSON output
//! photo-duplicates scan ~/Photos --output json
//! ```
//!
//! Ctrl+C stops the scan between files; the pairs found so far are still
//! printed and the process exits with code 130.

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_duplicates::core::hasher::HashAlgorithmKind;
use photo_duplicates::core::metadata;
use photo_duplicates::core::pipeline::{Pipeline, ScanReport};
use photo_duplicates::error::Result;
use photo_duplicates::events::{Event, EventChannel, HashEvent, PipelineEvent, ScanEvent};
use photo_duplicates::DEFAULT_THRESHOLD;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Exit code after Ctrl+C (128 + SIGINT)
pub const EXIT_CODE_INTERRUPTED: u8 = 130;

/// Photo Duplicates - Find near-duplicate photos by perceptual hash
#[derive(Parser, Debug)]
#[command(name = "photo-duplicates")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory tree for duplicate photos
    Scan {
        /// Directory to scan
        root: PathBuf,

        /// Maximum Hamming distance for a match (lower = stricter, 0-64)
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// Hash algorithm to use
        #[arg(short, long, default_value = "perceptual")]
        algorithm: Algorithm,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Skip hidden files and directories
        #[arg(long)]
        exclude_hidden: bool,

        /// Follow symbolic links to directories
        #[arg(long)]
        follow_symlinks: bool,

        /// Hash on a single thread
        #[arg(long)]
        sequential: bool,

        /// Print image details for both sides of each pair
        #[arg(long)]
        details: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Perceptual Hash - Most robust to edits (default)
    Perceptual,
    /// Difference Hash - Good balance
    Difference,
    /// Average Hash - Fast, good for exact duplicates
    Average,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Average => HashAlgorithmKind::Average,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (original<TAB>duplicate per line)
    Minimal,
}

struct ScanOptions {
    root: PathBuf,
    threshold: u32,
    algorithm: HashAlgorithmKind,
    output: OutputFormat,
    exclude_hidden: bool,
    follow_symlinks: bool,
    sequential: bool,
    details: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            root,
            threshold,
            algorithm,
            output,
            exclude_hidden,
            follow_symlinks,
            sequential,
            details,
            verbose,
        } => run_scan(ScanOptions {
            root,
            threshold,
            algorithm: algorithm.into(),
            output,
            exclude_hidden,
            follow_symlinks,
            sequential,
            details,
            verbose,
        }),
    }
}

fn run_scan(options: ScanOptions) -> Result<ExitCode> {
    photo_duplicates::init_tracing(if options.verbose { "debug" } else { "warn" });

    let term = Term::stderr();
    let pretty = matches!(options.output, OutputFormat::Pretty);

    // Print header
    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Duplicates").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    // Build pipeline; configuration errors surface before any traversal
    let pipeline = Pipeline::builder()
        .root(&options.root)
        .algorithm(options.algorithm)
        .threshold(options.threshold)
        .include_hidden(!options.exclude_hidden)
        .follow_symlinks(options.follow_symlinks)
        .parallel(!options.sequential)
        .build()?;

    let token = pipeline.cancellation_token();
    if let Err(e) = ctrlc::set_handler(move || {
        if !token.is_cancelled() {
            eprintln!("\nInterrupted. Finishing with the pairs found so far...");
        }
        token.cancel();
    }) {
        tracing::warn!("Ctrl+C handler not installed: {}", e);
    }

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if pretty {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };

            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    pb.set_length(total_photos as u64);
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                Event::Pipeline(PipelineEvent::Cancelled { .. }) => {
                    pb.abandon_with_message("cancelled");
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }
            return Err(e);
        }
    };

    // Output results
    match options.output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, &options),
        OutputFormat::Json => print_json_results(&report, &options),
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    if report.cancelled {
        Ok(ExitCode::from(EXIT_CODE_INTERRUPTED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_pretty_results(term: &Term, report: &ScanReport, options: &ScanOptions) {
    term.write_line("").ok();
    if report.cancelled {
        term.write_line(&format!(
            "{} Scan Cancelled (partial results)",
            style("!").yellow().bold()
        ))
        .ok();
    } else {
        term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
            .ok();
    }
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} photos scanned in {:.1}s",
        style(report.total_photos).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} duplicate pairs found",
        style(report.pairs.len()).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} unique images kept as originals",
        style(report.representatives).cyan()
    ))
    .ok();

    if !report.skipped.is_empty() {
        term.write_line(&format!(
            "  {} files skipped",
            style(report.skipped.len()).yellow()
        ))
        .ok();

        if options.verbose {
            for skipped in &report.skipped {
                term.write_line(&format!(
                    "    {} {}: {}",
                    style("-").dim(),
                    display_path(&skipped.path),
                    style(&skipped.reason).dim()
                ))
                .ok();
            }
        }
    }

    term.write_line("").ok();

    if report.pairs.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
    } else {
        term.write_line(&format!("{}", style("Duplicate Pairs:").bold().underlined()))
            .ok();
        term.write_line("").ok();

        for (i, pair) in report.pairs.iter().enumerate() {
            term.write_line(&format!(
                "  {} {} (distance {}, {:.0}% similar)",
                style(format!("Pair {}:", i + 1)).bold(),
                style(format!("{}", pair.match_type)).yellow(),
                pair.distance,
                pair.similarity_percent()
            ))
            .ok();

            term.write_line(&format!(
                "    {} {}",
                style("★").green(),
                display_path(&pair.original)
            ))
            .ok();
            if options.details {
                print_details(term, &pair.original);
            }

            term.write_line(&format!(
                "    {} {}",
                style("○").dim(),
                display_path(&pair.duplicate)
            ))
            .ok();
            if options.details {
                print_details(term, &pair.duplicate);
            }

            term.write_line("").ok();
        }
    }

    // Footer
    term.write_line(&format!(
        "{}",
        style("Remember: No files were deleted. Review carefully before taking action.").dim()
    ))
    .ok();
}

fn print_details(term: &Term, path: &Path) {
    for line in metadata::describe_lines(path) {
        term.write_line(&format!("        {}", style(line).dim())).ok();
    }
}

fn print_json_results(report: &ScanReport, options: &ScanOptions) {
    // Paths go out as lossy strings; serde refuses non-UTF-8 paths
    let output = serde_json::json!({
        "root": options.root.to_string_lossy(),
        "threshold": options.threshold,
        "algorithm": options.algorithm,
        "total_photos": report.total_photos,
        "representatives": report.representatives,
        "skipped": report.skipped.iter().map(|s| {
            serde_json::json!({
                "path": s.path.to_string_lossy(),
                "reason": s.reason,
            })
        }).collect::<Vec<_>>(),
        "cancelled": report.cancelled,
        "duration_ms": report.duration_ms,
        "pairs": report.pairs.iter().map(|p| {
            let (original, duplicate) = p.to_string_pair();
            serde_json::json!({
                "original": original,
                "duplicate": duplicate,
                "distance": p.distance,
                "similarity": p.similarity_percent(),
                "match_type": format!("{}", p.match_type),
            })
        }).collect::<Vec<_>>()
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to render JSON report: {}", e),
    }
}

fn print_minimal_results(report: &ScanReport) {
    for pair in &report.pairs {
        println!("{}\t{}", pair.original.display(), pair.duplicate.display());
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(relative) => format!("~/{}", relative.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
