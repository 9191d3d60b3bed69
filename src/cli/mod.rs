//! # CLI Module
//!
//! Command-line interface for the device media sorter.
//!
//! ## Usage
//! ```bash
//! # Sort a folder of freshly downloaded files
//! media-sort process ~/Downloads/phone
//!
//! # Merge days until a folder holds 25 files, never exceed 300
//! media-sort process ~/Downloads/phone --min-per-folder 25 --max-per-folder 300
//!
//! # JSON output
//! media-sort process ~/Downloads/phone --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use device_media_sorter::core::pipeline::{Pipeline, PipelineResult};
use device_media_sorter::core::scanner::{LocalScanner, ScanConfig};
use device_media_sorter::error::{MediaSorterError, Result};
use device_media_sorter::events::{
    DedupEvent, Event, EventChannel, HashEvent, PipelineEvent, SplitEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Device Media Sorter - dedupe and file away a fresh download
#[derive(Parser, Debug)]
#[command(name = "media-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deduplicate, classify and split the files in a download folder
    Process {
        /// Folder holding the downloaded files
        folder: PathBuf,

        /// Files a dated folder must hold before a new day may start a new folder
        #[arg(long, default_value = "10")]
        min_per_folder: usize,

        /// Start a new dated folder at this size even within one day
        #[arg(long)]
        max_per_folder: Option<usize>,

        /// Hash files on all CPU cores
        #[arg(long)]
        parallel: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links to files
        #[arg(long)]
        follow_symlinks: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            folder,
            min_per_folder,
            max_per_folder,
            parallel,
            include_hidden,
            follow_symlinks,
            output,
            verbose,
        } => {
            let pipeline = Pipeline::builder()
                .min_files_per_folder(min_per_folder)
                .max_files_per_folder(max_per_folder)
                .parallel_hashing(parallel)
                .build();
            let scan_config = ScanConfig {
                follow_symlinks,
                include_hidden,
            };
            run_process(&folder, &pipeline, scan_config, output, verbose)
        }
    }
}

fn run_process(
    folder: &Path,
    pipeline: &Pipeline,
    scan_config: ScanConfig,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Device Media Sorter").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let scan = LocalScanner::new(scan_config).scan(folder)?;
    let mut scan_errors: Vec<String> = scan.errors.iter().map(|e| e.to_string()).collect();

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(scan.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| MediaSorterError::Config(e.to_string()))?
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Split(SplitEvent::Started { total_files, .. }) => {
                    pb.set_length(total_files as u64);
                    pb.set_position(0);
                }
                Event::Split(SplitEvent::FileMoved { .. }) => pb.inc(1),
                Event::Dedup(DedupEvent::DuplicateRemoved { path, .. }) if verbose => {
                    pb.println(format!("  removed duplicate {}", display_path(&path)));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => pb.finish_and_clear(),
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(scan.files, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, &scan_errors, verbose),
        OutputFormat::Json => print_json_results(&result, &scan_errors)?,
    }

    scan_errors.extend(result.errors);
    if scan_errors.is_empty() {
        Ok(())
    } else {
        Err(MediaSorterError::Incomplete {
            failures: scan_errors.len(),
        })
    }
}

fn print_pretty_results(term: &Term, result: &PipelineResult, scan_errors: &[String], verbose: bool) {
    term.write_line("").ok();
    let errors = result.errors.len() + scan_errors.len();
    let headline = if errors == 0 {
        format!("{} Done", style("✓").green().bold())
    } else {
        format!("{} Done with {} error(s)", style("!").yellow().bold(), errors)
    };
    term.write_line(&headline).ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files processed in {:.1}s",
        style(result.total_files).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicates removed",
        style(result.duplicates.len()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} logos, {} videos",
        style(result.split.logo_count).cyan(),
        style(result.split.video_count).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} dated folders",
        style(result.split.dated_folders.len()).cyan()
    ))
    .ok();

    if verbose {
        for folder in &result.split.dated_folders {
            term.write_line(&format!("    {}", style(folder).dim())).ok();
        }
    }

    if errors > 0 {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Errors:").bold().underlined()))
            .ok();
        for error in scan_errors.iter().chain(&result.errors) {
            term.write_line(&format!("  {} {}", style("✗").red(), error)).ok();
        }
    }
}

fn print_json_results(result: &PipelineResult, scan_errors: &[String]) -> Result<()> {
    let output = serde_json::json!({
        "total_files": result.total_files,
        "duplicates_removed": result.duplicates,
        "unreadable": result.unreadable,
        "logos": result.split.logo_count,
        "videos": result.split.video_count,
        "dated_folders": result.split.dated_folders,
        "files": result.files.iter().map(|f| {
            serde_json::json!({
                "path": f.path(),
                "kind": f.kind(),
                "logo": f.is_logo(),
                "color_depth": f.color_depth().map(|d| d.bits()),
                "hash": f.content_hash(),
            })
        }).collect::<Vec<_>>(),
        "errors": scan_errors.iter().chain(&result.errors).collect::<Vec<_>>(),
        "duration_ms": result.duration_ms,
    });

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| MediaSorterError::Config(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(&home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
