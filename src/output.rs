//! Output formatting and styling module.
//!
//! Report rendering is pure (`RunSummary` in, `String` out) so it can be
//! tested without capturing stdout; [`OutputFormatter`] takes care of the
//! colored console side.

use crate::file_organizer::RunSummary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::path::Path;

/// Name used for the directory in report headers: its last component, or
/// the full path when there is none (e.g. `/`).
pub fn directory_label(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| directory.display().to_string())
}

/// Renders the per-group summary of a run.
///
/// # Example
///
/// ```
/// use tidyup::file_organizer::{GroupResult, RunSummary};
/// use tidyup::output::render_summary;
/// use std::path::PathBuf;
///
/// let summary = RunSummary {
///     directory: PathBuf::from("/home/user/Downloads"),
///     dry_run: false,
///     groups: vec![GroupResult { folder: "images-png".into(), created: true, files_added: 2 }],
///     moves: Vec::new(),
/// };
/// let text = render_summary(&summary);
/// assert!(text.starts_with("Organization Summary for 'Downloads':"));
/// assert!(text.contains("  - Files added: 2"));
/// ```
pub fn render_summary(summary: &RunSummary) -> String {
    let label = directory_label(&summary.directory);

    if summary.is_empty() {
        return format!("No files organized in '{}'.\n", label);
    }

    let mut out = String::new();
    let title = if summary.dry_run {
        "Dry Run Summary"
    } else {
        "Organization Summary"
    };
    let _ = writeln!(out, "{} for '{}':", title, label);

    for group in &summary.groups {
        let status = match (group.created, summary.dry_run) {
            (true, true) => "Would be created",
            (true, false) => "Created",
            (false, _) => "Already existed",
        };
        let _ = writeln!(out, "- Folder: {}", group.folder);
        let _ = writeln!(out, "  - {}", status);
        let _ = writeln!(out, "  - Files added: {}", group.files_added);
    }

    out
}

/// Renders one `name -> folder/name` line per move.
pub fn render_planned_moves(summary: &RunSummary) -> String {
    summary
        .moves
        .iter()
        .map(|m| format!("{} -> {}\n", m.source_name(), m.destination_display()))
        .collect()
}

/// Console output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::error("Failed to organize file");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        print!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for file moves.
    ///
    /// Draws to stderr and stays hidden when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }
}
