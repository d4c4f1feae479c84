//! The filesystem boundary of a run.
//!
//! All side effects of organizing a directory go through [`FileOperations`].
//! [`LiveOperations`] performs them, [`DryRunOperations`] only records them,
//! so the executor never branches on a dry-run flag.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A move decided by the executor, performed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Where the file was found.
    pub source: PathBuf,
    /// Where the file goes, after collision resolution.
    pub destination: PathBuf,
}

impl PlannedMove {
    /// Source base name, as shown in reports.
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }

    /// `folder/name` of the destination, as shown in reports.
    pub fn destination_display(&self) -> String {
        let name = display_name(&self.destination);
        match self.destination.parent().and_then(Path::file_name) {
            Some(folder) => format!("{}/{}", folder.to_string_lossy(), name),
            None => name,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Substitutable filesystem side effects.
pub trait FileOperations {
    /// Whether anything, including a dangling symlink, occupies `path`.
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    /// Whether `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    /// Creates a single directory level.
    fn create_dir(&mut self, path: &Path) -> OrganizeResult<()>;

    /// Moves `from` to `to`.
    fn rename(&mut self, from: &Path, to: &Path) -> OrganizeResult<()>;

    /// Moves handled so far, in order.
    fn moves(&self) -> &[PlannedMove];

    /// Directories created (or that would be created) so far, in order.
    fn created_dirs(&self) -> &[PathBuf];

    fn is_dry_run(&self) -> bool;
}

/// Performs every operation on the real filesystem.
#[derive(Debug, Default)]
pub struct LiveOperations {
    moves: Vec<PlannedMove>,
    created_dirs: Vec<PathBuf>,
}

impl LiveOperations {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileOperations for LiveOperations {
    fn create_dir(&mut self, path: &Path) -> OrganizeResult<()> {
        fs::create_dir(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("created directory {}", path.display());
        self.created_dirs.push(path.to_path_buf());
        Ok(())
    }

    /// Renames `from` to `to`, refusing to replace anything at `to`.
    ///
    /// `fs::rename` silently replaces an existing file on Unix, so the
    /// destination is re-checked right before the call.
    fn rename(&mut self, from: &Path, to: &Path) -> OrganizeResult<()> {
        if self.exists(to) {
            return Err(OrganizeError::FileMoveFailure {
                source: from.to_path_buf(),
                destination: to.to_path_buf(),
                source_error: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination appeared after it was resolved",
                ),
            });
        }

        fs::rename(from, to).map_err(|e| {
            if e.kind() == io::ErrorKind::CrossesDevices {
                OrganizeError::CrossDeviceMove {
                    source: from.to_path_buf(),
                    destination: to.to_path_buf(),
                }
            } else {
                OrganizeError::FileMoveFailure {
                    source: from.to_path_buf(),
                    destination: to.to_path_buf(),
                    source_error: e,
                }
            }
        })?;

        debug!("moved {} -> {}", from.display(), to.display());
        self.moves.push(PlannedMove {
            source: from.to_path_buf(),
            destination: to.to_path_buf(),
        });
        Ok(())
    }

    fn moves(&self) -> &[PlannedMove] {
        &self.moves
    }

    fn created_dirs(&self) -> &[PathBuf] {
        &self.created_dirs
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Records intended operations without touching the filesystem.
///
/// Existence checks still consult the disk, so collision probing sees the
/// same state a live run would.
#[derive(Debug, Default)]
pub struct DryRunOperations {
    moves: Vec<PlannedMove>,
    created_dirs: Vec<PathBuf>,
}

impl DryRunOperations {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileOperations for DryRunOperations {
    fn create_dir(&mut self, path: &Path) -> OrganizeResult<()> {
        info!("[dry run] would create directory {}", path.display());
        self.created_dirs.push(path.to_path_buf());
        Ok(())
    }

    fn rename(&mut self, from: &Path, to: &Path) -> OrganizeResult<()> {
        self.moves.push(PlannedMove {
            source: from.to_path_buf(),
            destination: to.to_path_buf(),
        });
        Ok(())
    }

    fn moves(&self) -> &[PlannedMove] {
        &self.moves
    }

    fn created_dirs(&self) -> &[PathBuf] {
        &self.created_dirs
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
