//! Check command - validate game records
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: check_files(), summarize(), report_results()
//! - Level 3: check_file()
//! - Level 4: progress bar and formatting utilities

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::input::load_game;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct CheckArgs {
    /// Record files to check
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of checking one file
#[derive(Clone, Debug, Serialize)]
struct FileReport {
    path: String,
    nodes: Option<usize>,
    board_size: Option<String>,
    warnings: Vec<String>,
    error: Option<String>,
}

impl FileReport {
    fn passed(&self, strict: bool) -> bool {
        self.error.is_none() && !(strict && !self.warnings.is_empty())
    }
}

/// Totals across all checked files
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
struct CheckSummary {
    total: usize,
    parsed: usize,
    with_warnings: usize,
    failed: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run check command
///
/// 1. Parse every file in parallel
/// 2. Summarize
/// 3. Report, then fail if any file did not pass
pub fn run(args: CheckArgs) -> Result<()> {
    tracing::info!("Checking {} file(s)", args.files.len());

    let progress = create_progress_bar(args.files.len(), args.json)?;
    let reports = check_files(&args.files, &progress);
    progress.finish_and_clear();

    let summary = summarize(&reports, args.strict);
    report_results(&reports, &summary, &args)?;

    if summary.failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", summary.failed, summary.total);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Check files on the rayon pool, keeping input order
fn check_files(files: &[PathBuf], progress: &ProgressBar) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| {
            let report = check_file(path);
            progress.inc(1);
            report
        })
        .collect()
}

fn summarize(reports: &[FileReport], strict: bool) -> CheckSummary {
    CheckSummary {
        total: reports.len(),
        parsed: reports.iter().filter(|r| r.error.is_none()).count(),
        with_warnings: reports.iter().filter(|r| !r.warnings.is_empty()).count(),
        failed: reports.iter().filter(|r| !r.passed(strict)).count(),
    }
}

fn report_results(reports: &[FileReport], summary: &CheckSummary, args: &CheckArgs) -> Result<()> {
    if args.json {
        println!("{}", render_json_results(reports, summary)?);
    } else {
        print_text_results(reports, summary, args.strict);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn check_file(path: &Path) -> FileReport {
    let display = path.display().to_string();
    match load_game(path) {
        Ok(game) => FileReport {
            path: display,
            nodes: Some(game.tree.node_count()),
            board_size: Some(game.info.size_value()),
            warnings: game.warnings.iter().map(|w| w.to_string()).collect(),
            error: None,
        },
        Err(e) => {
            tracing::warn!("{:#}", e);
            FileReport {
                path: display,
                nodes: None,
                board_size: None,
                warnings: Vec::new(),
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Bar over the file count; hidden for JSON output and single files
fn create_progress_bar(len: usize, json: bool) -> Result<ProgressBar> {
    if json || len < 2 {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} files | {elapsed_precise}",
    )?);
    Ok(bar)
}

fn render_json_results(reports: &[FileReport], summary: &CheckSummary) -> Result<String> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        summary: &'a CheckSummary,
        files: &'a [FileReport],
    }

    let output = JsonOutput {
        summary,
        files: reports,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn print_text_results(reports: &[FileReport], summary: &CheckSummary, strict: bool) {
    for report in reports {
        println!("{}", format_report_line(report, strict));
        for warning in &report.warnings {
            println!("    warning: {}", warning);
        }
    }

    println!("\n=== Check Results ===");
    println!("Files:         {}", summary.total);
    println!("Parsed:        {}", summary.parsed);
    println!("With warnings: {}", summary.with_warnings);
    println!("Failed:        {}", summary.failed);
}

fn format_report_line(report: &FileReport, strict: bool) -> String {
    match (&report.error, report.passed(strict)) {
        (Some(error), _) => format!("FAIL {}: {}", report.path, error),
        (None, false) => format!("FAIL {}: {} warning(s)", report.path, report.warnings.len()),
        (None, true) => format!(
            "ok   {} ({} nodes, size {})",
            report.path,
            report.nodes.unwrap_or(0),
            report.board_size.as_deref().unwrap_or("?")
        ),
    }
}
