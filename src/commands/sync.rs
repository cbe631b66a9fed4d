//! @acp:module "Sync Command"
//! @acp:summary "Merge annotation blocks into class files"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `docsync sync` and `docsync check`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use similar::TextDiff;

use crate::config::Config;
use crate::sync::{FileOutcome, FileReport, RunSummary, SyncExecutor};

/// Options for the sync command
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Project root
    pub root: PathBuf,
    /// Only process the class with this name
    pub class: Option<String>,
    /// Print diffs instead of writing
    pub dry_run: bool,
    /// CI mode - fail when any file would change
    pub check: bool,
    /// Verbose output
    pub verbose: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            class: None,
            dry_run: false,
            check: false,
            verbose: false,
        }
    }
}

/// Execute the sync command
pub fn execute_sync(options: SyncOptions, config: Config) -> Result<RunSummary> {
    if !options.root.is_dir() {
        bail!("Project root {} is not a directory", options.root.display());
    }

    let mut executor = SyncExecutor::new(&options.root, config);
    let files = executor.discover(options.class.as_deref());

    if files.is_empty() {
        match &options.class {
            Some(class) => println!("{} No class file named {}", style("!").yellow(), class),
            None => println!("{} No class files found", style("!").yellow()),
        }
        return Ok(RunSummary::default());
    }

    if options.verbose {
        eprintln!("Found {} files to process", files.len());
    }

    let write = !options.dry_run && !options.check;
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut summary = RunSummary::default();
    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        if let Some(name) = file.path.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }
        let report = executor.process_file(file, write);
        summary.record(&report);
        reports.push(report);
        progress.inc(1);
    }
    progress.finish_and_clear();

    for report in &reports {
        print_report(report, &options);
    }
    print_summary(&summary, &options);

    if options.check {
        if summary.patched > 0 {
            eprintln!(
                "\n{} {} file(s) have out-of-date annotations",
                style("✗").red(),
                summary.patched
            );
            std::process::exit(1);
        }
        println!("\n{} All annotations up to date", style("✓").green());
    } else if options.dry_run && summary.patched > 0 {
        eprintln!("\nRun without {} to write changes", style("--dry-run").cyan());
    }

    Ok(summary)
}

fn print_report(report: &FileReport, options: &SyncOptions) {
    let path = display_path(&report.path, &options.root);
    match report.outcome {
        FileOutcome::Patched => {
            if options.dry_run {
                let (old_header, new_header) = (format!("a/{}", path), format!("b/{}", path));
                let diff = TextDiff::from_lines(&report.original, &report.updated);
                print!(
                    "{}",
                    diff.unified_diff()
                        .context_radius(3)
                        .header(&old_header, &new_header)
                );
            } else if options.check {
                println!("{} {}", style("✗").red(), path);
            } else {
                println!("{} {}", style("✓").green(), path);
            }
        }
        FileOutcome::Unchanged => {
            if options.verbose {
                println!("  {} {}", style("=").dim(), path);
            }
        }
        outcome => {
            eprintln!("{} {} ({})", style("⚠").yellow(), path, outcome);
        }
    }

    if report.metadata_unavailable && options.verbose {
        eprintln!("  {} column facts unavailable, kept existing properties", style("→").cyan());
    }
}

fn print_summary(summary: &RunSummary, options: &SyncOptions) {
    let patched_label = if options.dry_run || options.check {
        "Would patch:"
    } else {
        "Patched:"
    };

    println!("\n{}", style("Sync Summary").bold());
    println!("============");
    println!("Files processed:         {}", summary.total());
    println!("{:<25}{}", patched_label, summary.patched);
    println!("Unchanged:               {}", summary.unchanged);
    if summary.skipped() > 0 {
        println!("Skipped:                 {}", summary.skipped());
        println!("  no match:              {}", summary.no_match);
        println!("  ambiguous:             {}", summary.ambiguous);
        println!("  malformed:             {}", summary.malformed);
        println!("  not writable:          {}", summary.not_writable);
    }
    if summary.metadata_unavailable > 0 {
        println!("Metadata unavailable:    {}", summary.metadata_unavailable);
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
