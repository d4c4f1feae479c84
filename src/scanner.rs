//! Directory scanning.
//!
//! Lists the immediate children of a directory and keeps the regular files,
//! optionally dropping dotfiles. No recursion, no side effects.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use log::{debug, trace};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot of a regular file taken at scan time.
///
/// The entry is not re-validated against the disk until it is moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name, lossily converted for display and grouping.
    pub name: String,
    /// Lower-cased extension including the leading dot, or empty.
    pub extension: String,
    /// Whether the name starts with `.`.
    pub is_dotfile: bool,
}

impl FileEntry {
    /// Builds an entry from a path, deriving name, extension and dotfile flag.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let is_dotfile = name.starts_with('.');

        Self {
            path,
            name,
            extension,
            is_dotfile,
        }
    }

    /// The raw file name as stored on disk.
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_else(|| OsStr::new(""))
    }

    /// The file name without its final extension.
    pub fn stem(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Options controlling which directory entries are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Drop entries whose name starts with `.` before any metadata lookup.
    pub ignore_dotfiles: bool,
}

impl ScanOptions {
    pub fn new(ignore_dotfiles: bool) -> Self {
        Self { ignore_dotfiles }
    }
}

/// Checks that `dir` exists and is a directory.
///
/// # Errors
///
/// * `PathNotFound` when nothing exists at `dir`
/// * `NotADirectory` when `dir` resolves to something else
/// * `ListFailed` when the metadata lookup fails for another reason
pub fn validate_directory(dir: &Path) -> OrganizeResult<()> {
    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(OrganizeError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(OrganizeError::PathNotFound {
            path: dir.to_path_buf(),
        }),
        Err(e) => Err(OrganizeError::ListFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// Lists the regular files directly inside `dir`.
///
/// Entries are returned sorted by file name so that the scan order, and
/// everything derived from it, does not depend on the platform's
/// `read_dir` order. Symlinks are followed for the file check; a link whose
/// target has vanished is skipped.
///
/// # Examples
///
/// ```no_run
/// use tidyup::scanner::{scan_directory, ScanOptions};
/// use std::path::Path;
///
/// let files = scan_directory(Path::new("/home/user/Downloads"), &ScanOptions::new(true))?;
/// for file in &files {
///     println!("{} ({})", file.name, file.extension);
/// }
/// # Ok::<(), tidyup::OrganizeError>(())
/// ```
pub fn scan_directory(dir: &Path, options: &ScanOptions) -> OrganizeResult<Vec<FileEntry>> {
    validate_directory(dir)?;

    let list_error = |source: io::Error| OrganizeError::ListFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let name = entry.file_name();

        if options.ignore_dotfiles && name.to_string_lossy().starts_with('.') {
            trace!("skipping dotfile {:?}", name);
            continue;
        }

        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("skipping {}: target not found", path.display());
                continue;
            }
            Err(e) => return Err(list_error(e)),
        };
        if !metadata.is_file() {
            trace!("skipping non-file {}", path.display());
            continue;
        }

        files.push(FileEntry::from_path(path));
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!("scanned {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}
