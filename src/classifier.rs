/// File classification into destination groups.
///
/// Every scanned file is mapped to a [`GroupKey`] by the active
/// [`GroupingMode`], and every key maps to exactly one destination folder.
///
/// # Examples
///
/// ```
/// use tidyup::classifier::{Classifier, GroupingMode};
/// use tidyup::scanner::FileEntry;
/// use std::path::PathBuf;
///
/// let classifier = Classifier::new(GroupingMode::default());
/// let entry = FileEntry::from_path(PathBuf::from("/tmp/photo.JPG"));
/// let key = classifier.group_key(&entry);
/// assert_eq!(key.as_str(), "jpg");
/// assert_eq!(classifier.folder_name(&key), "images-jpg");
/// ```
use crate::scanner::FileEntry;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Folder name prefix for extensions missing from the curated table.
pub const FALLBACK_PREFIX: &str = "others-";

/// Delimiter used by name-prefix grouping unless configured otherwise.
pub const DEFAULT_PREFIX_DELIMITER: char = '-';

/// Curated extension to folder-name table, built once per process.
static FOLDER_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("png", "images-png"),
        ("jpg", "images-jpg"),
        ("jpeg", "images-jpeg"),
        ("mp4", "videos-mp4"),
        ("avi", "videos-avi"),
        ("pdf", "documents-pdf"),
    ])
});

/// Returns the descriptive folder name for an extension token (no dot).
///
/// Unknown tokens, including the empty token of extension-less files,
/// fall back to `others-<ext>`.
pub fn descriptive_folder_name(extension: &str) -> String {
    match FOLDER_NAMES.get(extension) {
        Some(name) => (*name).to_string(),
        None => format!("{}{}", FALLBACK_PREFIX, extension),
    }
}

/// How a file name is reduced to a name-prefix group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRule {
    /// Stem text before the first occurrence of the delimiter.
    /// The whole stem is used when the delimiter is absent or leads the stem.
    Delimiter(char),
    /// The first `n` characters of the stem.
    Truncate(usize),
}

/// Whether `name` can be used as a folder directly below the target
/// directory: exactly one normal path component, so not `.`, `..` or empty.
fn is_plain_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

impl Default for PrefixRule {
    fn default() -> Self {
        PrefixRule::Delimiter(DEFAULT_PREFIX_DELIMITER)
    }
}

impl PrefixRule {
    /// Applies the rule to a file stem.
    ///
    /// A prefix that cannot name a folder (`.` or `..`, as produced from
    /// `..-notes` or `.bashrc`) becomes the `others-` fallback.
    pub fn apply(&self, stem: &str) -> String {
        let prefix: String = match *self {
            PrefixRule::Delimiter(delimiter) => stem
                .split_once(delimiter)
                .map(|(head, _)| head)
                .unwrap_or(stem)
                .to_string(),
            PrefixRule::Truncate(len) => stem.chars().take(len).collect(),
        };

        let key = if prefix.is_empty() {
            stem.to_string()
        } else {
            prefix
        };
        if is_plain_folder_name(&key) {
            key
        } else {
            debug!("prefix {:?} of {:?} is not a folder name", key, stem);
            FALLBACK_PREFIX.to_string()
        }
    }
}

/// The grouping strategy of a run. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// Group by lower-cased extension.
    Extension {
        /// Use the bare extension as the folder name instead of the
        /// descriptive table.
        raw_folder_names: bool,
    },
    /// Group by a prefix of the file stem; the key is the folder name.
    NamePrefix(PrefixRule),
}

impl Default for GroupingMode {
    fn default() -> Self {
        GroupingMode::Extension {
            raw_folder_names: false,
        }
    }
}

/// Normalized token identifying the destination group of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bucket of a [`Grouping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: GroupKey,
    /// Files in scan order.
    pub entries: Vec<FileEntry>,
}

/// Files bucketed by group key.
///
/// Groups keep the order in which their key was first seen; entries keep
/// scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: Vec<Group>,
    index: HashMap<GroupKey, usize>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the group for `key`, creating the group if needed.
    pub fn insert(&mut self, key: GroupKey, entry: FileEntry) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].entries.push(entry),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(Group {
                    key,
                    entries: vec![entry],
                });
            }
        }
    }

    pub fn get(&self, key: &GroupKey) -> Option<&Group> {
        self.index.get(key).map(|&position| &self.groups[position])
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all groups.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

/// Maps files to group keys and group keys to folder names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    mode: GroupingMode,
}

impl Classifier {
    pub fn new(mode: GroupingMode) -> Self {
        Self { mode }
    }

    /// Computes the group key of a single file.
    pub fn group_key(&self, entry: &FileEntry) -> GroupKey {
        match self.mode {
            GroupingMode::Extension { .. } => {
                GroupKey::new(entry.extension.trim_start_matches('.'))
            }
            GroupingMode::NamePrefix(rule) => GroupKey::new(rule.apply(&entry.stem())),
        }
    }

    /// Computes the destination folder name for a group key.
    ///
    /// In raw extension mode the empty key cannot name a folder, so it takes
    /// the descriptive fallback instead.
    pub fn folder_name(&self, key: &GroupKey) -> String {
        match self.mode {
            GroupingMode::Extension {
                raw_folder_names: true,
            } if !key.as_str().is_empty() => key.as_str().to_string(),
            GroupingMode::Extension { .. } => descriptive_folder_name(key.as_str()),
            GroupingMode::NamePrefix(_) => key.as_str().to_string(),
        }
    }

    /// Buckets the scanned files into a [`Grouping`].
    pub fn classify(&self, entries: Vec<FileEntry>) -> Grouping {
        let mut grouping = Grouping::new();
        for entry in entries {
            let key = self.group_key(&entry);
            grouping.insert(key, entry);
        }
        debug!(
            "classified {} file(s) into {} group(s)",
            grouping.file_count(),
            grouping.len()
        );
        grouping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str) -> FileEntry {
        FileEntry::from_path(PathBuf::from("/data").join(name))
    }

    fn names(group: &Group) -> Vec<&str> {
        group.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_descriptive_folder_names() {
        assert_eq!(descriptive_folder_name("png"), "images-png");
        assert_eq!(descriptive_folder_name("jpg"), "images-jpg");
        assert_eq!(descriptive_folder_name("jpeg"), "images-jpeg");
        assert_eq!(descriptive_folder_name("mp4"), "videos-mp4");
        assert_eq!(descriptive_folder_name("avi"), "videos-avi");
        assert_eq!(descriptive_folder_name("pdf"), "documents-pdf");
        assert_eq!(descriptive_folder_name("txt"), "others-txt");
        assert_eq!(descriptive_folder_name(""), "others-");
    }

    #[test]
    fn test_extension_mode_groups_case_insensitively() {
        let classifier = Classifier::default();
        let grouping = classifier.classify(vec![entry("a.png"), entry("b.PNG"), entry("notes.pdf")]);

        assert_eq!(grouping.len(), 2);
        let png = grouping.get(&GroupKey::new("png")).expect("png group");
        assert_eq!(names(png), vec!["a.png", "b.PNG"]);
        assert_eq!(classifier.folder_name(&png.key), "images-png");
    }

    #[test]
    fn test_extension_less_files_form_their_own_group() {
        let classifier = Classifier::default();
        let grouping = classifier.classify(vec![entry("Makefile"), entry("README"), entry("a.txt")]);

        let bare = grouping.get(&GroupKey::new("")).expect("empty-extension group");
        assert_eq!(names(bare), vec!["Makefile", "README"]);
        assert_eq!(classifier.folder_name(&bare.key), "others-");
    }

    #[test]
    fn test_raw_extension_folder_names() {
        let classifier = Classifier::new(GroupingMode::Extension {
            raw_folder_names: true,
        });

        assert_eq!(classifier.folder_name(&GroupKey::new("png")), "png");
        assert_eq!(classifier.folder_name(&GroupKey::new("txt")), "txt");
        assert_eq!(classifier.folder_name(&GroupKey::new("")), "others-");
    }

    #[test]
    fn test_prefix_delimiter_rule() {
        let rule = PrefixRule::Delimiter('-');
        assert_eq!(rule.apply("report-draft"), "report");
        assert_eq!(rule.apply("report-final-v2"), "report");
        assert_eq!(rule.apply("summary"), "summary");
        assert_eq!(rule.apply("-leading"), "-leading");
    }

    #[test]
    fn test_prefix_truncate_rule_counts_characters() {
        let rule = PrefixRule::Truncate(10);
        assert_eq!(rule.apply("holiday_photos_2023"), "holiday_ph");
        assert_eq!(rule.apply("short"), "short");
        assert_eq!(PrefixRule::Truncate(3).apply("日本語のファイル"), "日本語");
    }

    #[test]
    fn test_dot_prefixes_fall_back_to_others() {
        assert_eq!(PrefixRule::Delimiter('-').apply("..-notes"), "others-");
        assert_eq!(PrefixRule::Delimiter('-').apply(".-x"), "others-");
        assert_eq!(PrefixRule::Truncate(1).apply(".bashrc"), "others-");
        assert_eq!(PrefixRule::Truncate(2).apply("..x"), "others-");
        // `...` has the stem `..`, which cannot be a folder either.
        assert_eq!(PrefixRule::Delimiter('-').apply(".."), "others-");
        assert_eq!(PrefixRule::Truncate(2).apply(".bashrc"), ".b");
    }

    #[test]
    fn test_name_mode_folders_stay_below_target() {
        let classifier = Classifier::new(GroupingMode::NamePrefix(PrefixRule::Delimiter('-')));
        let grouping = classifier.classify(vec![entry("..-notes.txt"), entry("..."), entry(".-a")]);

        assert_eq!(grouping.len(), 1);
        let folder = classifier.folder_name(&grouping.groups()[0].key);
        assert_eq!(folder, "others-");
        assert!(is_plain_folder_name(&folder));
        assert!(!is_plain_folder_name(".."));
        assert!(!is_plain_folder_name("."));
        assert!(!is_plain_folder_name(""));
    }

    #[test]
    fn test_name_mode_groups_by_prefix() {
        let classifier = Classifier::new(GroupingMode::NamePrefix(PrefixRule::default()));
        let grouping = classifier.classify(vec![
            entry("report-draft.txt"),
            entry("report-final.txt"),
            entry("invoice.pdf"),
        ]);

        assert_eq!(grouping.len(), 2);
        let report = &grouping.groups()[0];
        assert_eq!(report.key.as_str(), "report");
        assert_eq!(names(report), vec!["report-draft.txt", "report-final.txt"]);
        assert_eq!(classifier.folder_name(&report.key), "report");
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let classifier = Classifier::default();
        let grouping = classifier.classify(vec![entry("z.txt"), entry("a.png"), entry("b.txt")]);

        let keys: Vec<_> = grouping.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["txt", "png"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = Classifier::new(GroupingMode::NamePrefix(PrefixRule::Truncate(4)));
        let input = vec![entry("alpha-1.txt"), entry("beta.md"), entry("alpha-2.txt")];

        let first = classifier.classify(input.clone());
        let second = classifier.classify(input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_entry_lands_in_exactly_one_group() {
        let classifier = Classifier::default();
        let input = vec![entry("a.png"), entry("b"), entry("c.tar.gz"), entry("d.PDF")];

        let grouping = classifier.classify(input.clone());
        assert_eq!(grouping.file_count(), input.len());
        for file in &input {
            let hits = grouping
                .iter()
                .filter(|g| g.entries.contains(file))
                .count();
            assert_eq!(hits, 1, "{} should be in exactly one group", file.name);
        }
    }
}
