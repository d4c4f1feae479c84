/// Relocation of grouped files into their destination folders.
///
/// This module drives the group → folder creation → per-file move pipeline.
/// Every side effect goes through a [`FileOperations`] implementation, so the
/// same code performs a live run or a dry run.
///
/// Before the first folder is created or file is moved, every destination
/// folder path is checked. If one is taken by something that is not a
/// directory (in name mode, `README` next to `README.md` makes the folder
/// `README` collide with the file itself), the run aborts with
/// `DirectoryCreationFailed` and nothing has changed on disk.
///
/// A run assumes it is the only writer in the target directory. Two runs
/// against the same directory at once are unsafe.
use crate::classifier::{Classifier, Grouping};
use crate::operation::{FileOperations, PlannedMove};
use crate::resolver::DestinationResolver;
use indicatif::ProgressBar;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Outcome of one group: its folder, whether the folder was new, and how
/// many files went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    pub folder: String,
    pub created: bool,
    pub files_added: usize,
}

/// Per-group outcomes of a completed run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The organized directory.
    pub directory: PathBuf,
    /// Whether nothing was actually changed.
    pub dry_run: bool,
    pub groups: Vec<GroupResult>,
    /// Every move, performed or intended.
    pub moves: Vec<PlannedMove>,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.files_added).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }

    pub fn group(&self, folder: &str) -> Option<&GroupResult> {
        self.groups.iter().find(|g| g.folder == folder)
    }
}

/// Errors that can occur while organizing a directory.
///
/// Every error ends the run. Moves completed before the failure stay in
/// place; nothing is rolled back.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target path does not exist.
    PathNotFound { path: PathBuf },
    /// The target path is not a directory.
    NotADirectory { path: PathBuf },
    /// Incompatible options were selected together.
    ConfigConflict { reason: String },
    /// Reading the target directory failed.
    ListFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination folder.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its destination folder.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Source and destination are on different filesystems.
    CrossDeviceMove {
        source: PathBuf,
        destination: PathBuf,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound { path } => {
                write!(f, "Path does not exist: {}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "The provided path is not a directory: {}", path.display())
            }
            Self::ConfigConflict { reason } => write!(f, "{}", reason),
            Self::ListFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::CrossDeviceMove {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot move {} to {}: source and destination are on different devices",
                    source.display(),
                    destination.display()
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ListFailed { source, .. } | Self::DirectoryCreationFailed { source, .. } => {
                Some(source)
            }
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            _ => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves grouped files into their folders inside a base directory.
///
/// # Examples
///
/// ```no_run
/// use tidyup::classifier::Classifier;
/// use tidyup::file_organizer::FileOrganizer;
/// use tidyup::operation::DryRunOperations;
/// use tidyup::scanner::{scan_directory, ScanOptions};
/// use std::path::Path;
///
/// let base = Path::new("/path/to/base");
/// let classifier = Classifier::default();
/// let grouping = classifier.classify(scan_directory(base, &ScanOptions::new(true))?);
///
/// let mut organizer = FileOrganizer::new(base, classifier, DryRunOperations::new());
/// let summary = organizer.organize(&grouping)?;
/// println!("{} file(s) would move", summary.total_files());
/// # Ok::<(), tidyup::OrganizeError>(())
/// ```
pub struct FileOrganizer<'a, O: FileOperations> {
    base_path: &'a Path,
    classifier: Classifier,
    operations: O,
    resolver: DestinationResolver,
    progress: Option<ProgressBar>,
}

impl<'a, O: FileOperations> FileOrganizer<'a, O> {
    pub fn new(base_path: &'a Path, classifier: Classifier, operations: O) -> Self {
        Self {
            base_path,
            classifier,
            operations,
            resolver: DestinationResolver::new(),
            progress: None,
        }
    }

    /// Ticks `progress` once per handled file.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn operations(&self) -> &O {
        &self.operations
    }

    /// Processes every group in `grouping` order.
    ///
    /// # Errors
    ///
    /// A folder path already taken by a non-directory fails the run before
    /// anything is touched. Otherwise stops at the first folder that cannot
    /// be created or file that cannot be moved; files moved before the
    /// failure are left where they are.
    pub fn organize(&mut self, grouping: &Grouping) -> OrganizeResult<RunSummary> {
        self.check_folders(grouping)?;

        let mut groups = Vec::with_capacity(grouping.len());

        for group in grouping.iter() {
            let folder = self.classifier.folder_name(&group.key);
            let folder_path = self.base_path.join(&folder);
            let created = self.ensure_folder(&folder_path)?;

            let mut files_added = 0;
            for entry in &group.entries {
                let operations = &self.operations;
                let destination = self
                    .resolver
                    .resolve(&folder_path, entry.file_name(), |p| operations.exists(p));
                self.operations.rename(&entry.path, &destination)?;
                files_added += 1;

                if let Some(progress) = &self.progress {
                    progress.set_message(entry.name.clone());
                    progress.inc(1);
                }
            }

            info!(
                "{}: {} file(s), {}",
                folder,
                files_added,
                if created { "created" } else { "existing" }
            );
            groups.push(GroupResult {
                folder,
                created,
                files_added,
            });
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        Ok(RunSummary {
            directory: self.base_path.to_path_buf(),
            dry_run: self.operations.is_dry_run(),
            groups,
            moves: self.operations.moves().to_vec(),
        })
    }

    /// Fails if any group's folder path is occupied by a non-directory.
    fn check_folders(&self, grouping: &Grouping) -> OrganizeResult<()> {
        for group in grouping.iter() {
            let folder_path = self.base_path.join(self.classifier.folder_name(&group.key));
            if self.operations.exists(&folder_path) && !self.operations.is_dir(&folder_path) {
                return Err(folder_taken(folder_path));
            }
        }
        Ok(())
    }

    /// Creates `folder_path` if missing and reports whether it was created.
    fn ensure_folder(&mut self, folder_path: &Path) -> OrganizeResult<bool> {
        if self.operations.is_dir(folder_path) {
            debug!("reusing {}", folder_path.display());
            return Ok(false);
        }

        if self.operations.exists(folder_path) {
            return Err(folder_taken(folder_path.to_path_buf()));
        }

        self.operations.create_dir(folder_path)?;
        Ok(true)
    }
}

fn folder_taken(path: PathBuf) -> OrganizeError {
    OrganizeError::DirectoryCreationFailed {
        path,
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "a non-directory entry already uses this name",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{GroupingMode, PrefixRule};
    use crate::operation::{DryRunOperations, LiveOperations};
    use crate::scanner::FileEntry;
    use std::fs;
    use tempfile::TempDir;

    fn grouping_for(classifier: &Classifier, base: &Path, names: &[&str]) -> Grouping {
        classifier.classify(
            names
                .iter()
                .map(|name| FileEntry::from_path(base.join(name)))
                .collect(),
        )
    }

    #[test]
    fn test_organize_creates_folders_and_moves_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        for name in ["a.png", "b.PNG", "notes.pdf"] {
            fs::write(base.join(name), name).expect("Failed to write test file");
        }

        let classifier = Classifier::default();
        let grouping = grouping_for(&classifier, base, &["a.png", "b.PNG", "notes.pdf"]);
        let mut organizer = FileOrganizer::new(base, classifier, LiveOperations::new());
        let summary = organizer.organize(&grouping).expect("organize failed");

        assert!(!summary.dry_run);
        assert_eq!(
            summary.groups,
            vec![
                GroupResult {
                    folder: "images-png".to_string(),
                    created: true,
                    files_added: 2,
                },
                GroupResult {
                    folder: "documents-pdf".to_string(),
                    created: true,
                    files_added: 1,
                },
            ]
        );
        assert!(base.join("images-png/a.png").is_file());
        assert!(base.join("images-png/b.PNG").is_file());
        assert!(base.join("documents-pdf/notes.pdf").is_file());
    }

    #[test]
    fn test_existing_folder_is_reused() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("images-jpg")).expect("Failed to create folder");
        fs::write(base.join("images-jpg/photo.jpg"), "old").expect("Failed to write file");
        fs::write(base.join("photo.jpg"), "new").expect("Failed to write file");

        let classifier = Classifier::default();
        let grouping = grouping_for(&classifier, base, &["photo.jpg"]);
        let mut organizer = FileOrganizer::new(base, classifier, LiveOperations::new());
        let summary = organizer.organize(&grouping).expect("organize failed");

        assert!(!summary.groups[0].created);
        assert_eq!(
            fs::read_to_string(base.join("images-jpg/photo.jpg")).expect("read old"),
            "old"
        );
        assert_eq!(
            fs::read_to_string(base.join("images-jpg/photo(1).jpg")).expect("read new"),
            "new"
        );
    }

    #[test]
    fn test_dry_run_claims_paths_in_memory() {
        // Paths do not exist on disk; only the claimed set prevents reuse.
        let base = Path::new("/nonexistent/tidyup-test");
        let classifier = Classifier::new(GroupingMode::NamePrefix(PrefixRule::Truncate(3)));
        let grouping = grouping_for(&classifier, base, &["abc1.txt", "abc2.txt"]);

        let mut organizer = FileOrganizer::new(base, classifier, DryRunOperations::new());
        let summary = organizer.organize(&grouping).expect("dry run failed");

        assert!(summary.dry_run);
        assert_eq!(summary.total_files(), 2);
        assert_eq!(
            organizer.operations().created_dirs(),
            &[base.join("abc")]
        );
        let destinations: Vec<_> = summary.moves.iter().map(|m| m.destination.clone()).collect();
        assert_eq!(
            destinations,
            vec![base.join("abc/abc1.txt"), base.join("abc/abc2.txt")]
        );
    }

    #[test]
    fn test_same_name_in_one_group_gets_distinct_destinations() {
        let base = Path::new("/nonexistent/tidyup-test");
        let classifier = Classifier::default();
        let mut grouping = Grouping::new();
        for dir in ["one", "two"] {
            let entry = FileEntry::from_path(base.join(dir).join("photo.jpg"));
            grouping.insert(classifier.group_key(&entry), entry);
        }

        let mut organizer = FileOrganizer::new(base, classifier, DryRunOperations::new());
        let summary = organizer.organize(&grouping).expect("dry run failed");

        assert_eq!(summary.moves[0].destination, base.join("images-jpg/photo.jpg"));
        assert_eq!(summary.moves[1].destination, base.join("images-jpg/photo(1).jpg"));
    }

    #[test]
    fn test_folder_name_taken_by_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("others-txt"), "blocker").expect("Failed to write file");
        fs::write(base.join("a.txt"), "a").expect("Failed to write file");

        let classifier = Classifier::default();
        let grouping = grouping_for(&classifier, base, &["a.txt"]);
        let mut organizer = FileOrganizer::new(base, classifier, LiveOperations::new());
        let result = organizer.organize(&grouping);

        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
        assert!(base.join("a.txt").is_file());
    }

    #[test]
    fn test_folder_clash_aborts_before_earlier_groups_move() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let names = ["Notes-1.txt", "README", "README.md"];
        for name in names {
            fs::write(base.join(name), name).expect("Failed to write file");
        }

        let classifier = Classifier::new(GroupingMode::NamePrefix(PrefixRule::default()));
        let grouping = grouping_for(&classifier, base, &names);
        let mut organizer = FileOrganizer::new(base, classifier, LiveOperations::new());
        let result = organizer.organize(&grouping);

        match result {
            Err(OrganizeError::DirectoryCreationFailed { path, .. }) => {
                assert_eq!(path, base.join("README"));
            }
            other => panic!("expected DirectoryCreationFailed, got {:?}", other),
        }
        assert!(organizer.operations().moves().is_empty());
        assert!(organizer.operations().created_dirs().is_empty());
        assert!(!base.join("Notes").exists());
        for name in names {
            assert!(base.join(name).is_file(), "{} should be untouched", name);
        }
    }

    #[test]
    fn test_failure_keeps_earlier_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.pdf"), "a").expect("Failed to write file");
        // b.txt is never written, so its move fails.

        let classifier = Classifier::default();
        let grouping = grouping_for(&classifier, base, &["a.pdf", "b.txt"]);
        let mut organizer = FileOrganizer::new(base, classifier, LiveOperations::new());
        let result = organizer.organize(&grouping);

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(base.join("documents-pdf/a.pdf").is_file());
        assert_eq!(organizer.operations().moves().len(), 1);
    }

    #[test]
    fn test_error_display_messages() {
        let not_dir = OrganizeError::NotADirectory {
            path: PathBuf::from("/tmp/file.txt"),
        };
        assert_eq!(
            not_dir.to_string(),
            "The provided path is not a directory: /tmp/file.txt"
        );

        let cross = OrganizeError::CrossDeviceMove {
            source: PathBuf::from("/a/x"),
            destination: PathBuf::from("/b/x"),
        };
        assert!(cross.to_string().contains("different devices"));
    }
}
