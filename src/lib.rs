//! tidyup - group the files of a directory into subfolders
//!
//! This library scans a single directory, buckets its regular files by
//! extension or by name prefix, and moves each bucket into its own folder.
//! Name collisions are resolved with a `(n)` suffix, so no existing file is
//! ever overwritten. A dry run records the same moves without touching the
//! filesystem.

pub mod classifier;
pub mod cli;
pub mod file_organizer;
pub mod logging;
pub mod operation;
pub mod output;
pub mod resolver;
pub mod scanner;

pub use classifier::{Classifier, GroupKey, Grouping, GroupingMode, PrefixRule};
pub use file_organizer::{FileOrganizer, GroupResult, OrganizeError, OrganizeResult, RunSummary};
pub use operation::{DryRunOperations, FileOperations, LiveOperations, PlannedMove};
pub use resolver::DestinationResolver;
pub use scanner::{FileEntry, ScanOptions};

pub use cli::{OrganizeOptions, organize_directory, run_cli};
