//! Command-line interface module for tidyup.
//!
//! This module handles:
//! - Argument parsing and validation
//! - Running the scan → classify → relocate pipeline
//! - Printing the run report

use crate::classifier::{Classifier, DEFAULT_PREFIX_DELIMITER, GroupingMode, PrefixRule};
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, RunSummary};
use crate::operation::{DryRunOperations, LiveOperations};
use crate::output::{OutputFormatter, render_planned_moves, render_summary};
use crate::scanner::{ScanOptions, scan_directory, validate_directory};
use clap::{ArgAction, Parser};
use log::info;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tidyup",
    version,
    about = "Organize files in a directory based on their extensions or names"
)]
pub struct Cli {
    /// Directory to tidy up
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub directory: PathBuf,

    /// Use the bare file extensions as folder names
    #[arg(long)]
    pub ext: bool,

    /// Group files by the start of their name
    #[arg(long)]
    pub name: bool,

    /// With --name, group by the first N characters instead of a delimiter
    #[arg(
        long,
        value_name = "N",
        requires = "name",
        conflicts_with = "delimiter",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub prefix_len: Option<u32>,

    /// With --name, the character that ends the prefix [default: -]
    #[arg(long, value_name = "CHAR", requires = "name")]
    pub delimiter: Option<char>,

    /// Ignore dotfiles (use --ignore-dotfiles=false to include them)
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ignore_dotfiles: bool,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validates the flag combination and resolves the target directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigConflict` when both `--ext` and `--name` are given.
    /// Nothing on disk is touched before this check.
    pub fn into_options(self) -> OrganizeResult<OrganizeOptions> {
        let mode = match (self.ext, self.name) {
            (true, true) => {
                return Err(OrganizeError::ConfigConflict {
                    reason: "Only one of --ext or --name can be used at a time".to_string(),
                });
            }
            (true, false) => GroupingMode::Extension {
                raw_folder_names: true,
            },
            (false, true) => GroupingMode::NamePrefix(match self.prefix_len {
                Some(len) => PrefixRule::Truncate(len as usize),
                None => PrefixRule::Delimiter(self.delimiter.unwrap_or(DEFAULT_PREFIX_DELIMITER)),
            }),
            (false, false) => GroupingMode::default(),
        };

        let directory =
            std::path::absolute(&self.directory).map_err(|e| OrganizeError::ListFailed {
                path: self.directory.clone(),
                source: e,
            })?;

        Ok(OrganizeOptions {
            directory,
            mode,
            ignore_dotfiles: self.ignore_dotfiles,
            dry_run: self.dry_run,
            show_progress: true,
        })
    }
}

/// Everything one run needs, after validation.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Absolute path of the directory to organize.
    pub directory: PathBuf,
    pub mode: GroupingMode,
    pub ignore_dotfiles: bool,
    pub dry_run: bool,
    /// Show a progress bar during live moves.
    pub show_progress: bool,
}

impl OrganizeOptions {
    /// Default options for `directory`: extension grouping, dotfiles
    /// ignored, live run.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            mode: GroupingMode::default(),
            ignore_dotfiles: true,
            dry_run: false,
            show_progress: false,
        }
    }
}

/// Runs the pipeline and prints the report.
///
/// # Examples
///
/// ```no_run
/// use tidyup::cli::{run_cli, OrganizeOptions};
///
/// let mut options = OrganizeOptions::new("/path/to/directory");
/// options.dry_run = true;
/// match run_cli(&options) {
///     Ok(summary) => println!("{} file(s)", summary.total_files()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(options: &OrganizeOptions) -> OrganizeResult<RunSummary> {
    if options.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            options.directory.display()
        ));
    } else {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            options.directory.display()
        ));
    }

    let summary = organize_directory(options)?;

    if summary.dry_run && !summary.moves.is_empty() {
        OutputFormatter::header("Files would be moved as follows:");
        OutputFormatter::plain(&render_planned_moves(&summary));
    }

    println!();
    OutputFormatter::plain(&render_summary(&summary));

    if summary.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    } else if !summary.is_empty() {
        OutputFormatter::success(&format!("Moved {} file(s).", summary.total_files()));
    }

    Ok(summary)
}

/// Scans, classifies and relocates the files of `options.directory`.
///
/// # Errors
///
/// Any error ends the run at once. In a live run, files moved before the
/// error stay moved.
pub fn organize_directory(options: &OrganizeOptions) -> OrganizeResult<RunSummary> {
    let directory = options.directory.as_path();
    validate_directory(directory)?;

    let entries = scan_directory(directory, &ScanOptions::new(options.ignore_dotfiles))?;

    let classifier = Classifier::new(options.mode);
    let grouping = classifier.classify(entries);
    info!(
        "{} file(s) in {} group(s) under {}",
        grouping.file_count(),
        grouping.len(),
        directory.display()
    );

    if options.dry_run {
        FileOrganizer::new(directory, classifier, DryRunOperations::new()).organize(&grouping)
    } else {
        let mut organizer = FileOrganizer::new(directory, classifier, LiveOperations::new());
        if options.show_progress && !grouping.is_empty() {
            organizer = organizer.with_progress(OutputFormatter::create_progress_bar(
                grouping.file_count() as u64,
            ));
        }
        organizer.organize(&grouping)
    }
}
