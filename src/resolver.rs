//! Collision-free destination paths.
//!
//! When `<folder>/<name>` is taken, the resolver tries `<stem>(1)<ext>`,
//! `<stem>(2)<ext>`, ... until it finds a path that is neither present on
//! disk nor already claimed earlier in the same run.

use log::trace;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Builds the `n`-th candidate name for `file_name`.
///
/// The stem and extension are split the way [`Path::file_stem`] and
/// [`Path::extension`] split them, so `a.tar.gz` becomes `a.tar(1).gz` and
/// `.hidden` becomes `.hidden(1)`.
///
/// # Examples
///
/// ```
/// use tidyup::resolver::numbered_name;
/// use std::ffi::OsStr;
///
/// assert_eq!(numbered_name(OsStr::new("photo.jpg"), 1), "photo(1).jpg");
/// assert_eq!(numbered_name(OsStr::new("README"), 3), "README(3)");
/// ```
pub fn numbered_name(file_name: &OsStr, n: u32) -> OsString {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);

    let mut name = OsString::from(stem);
    name.push(format!("({})", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Tracks destination paths claimed during one run.
#[derive(Debug, Default)]
pub struct DestinationResolver {
    claimed: HashSet<PathBuf>,
}

impl DestinationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a destination for `file_name` inside `folder` and claims it.
    ///
    /// `exists` reports whether a path is currently occupied on disk. A path
    /// is free only if `exists` says no and no earlier call returned it.
    pub fn resolve<F>(&mut self, folder: &Path, file_name: &OsStr, exists: F) -> PathBuf
    where
        F: Fn(&Path) -> bool,
    {
        let mut candidate = folder.join(file_name);
        let mut counter = 1;
        while self.claimed.contains(&candidate) || exists(&candidate) {
            trace!("{} is taken", candidate.display());
            candidate = folder.join(numbered_name(file_name, counter));
            counter += 1;
        }

        self.claimed.insert(candidate.clone());
        candidate
    }

    pub fn is_claimed(&self, path: &Path) -> bool {
        self.claimed.contains(path)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }
}
