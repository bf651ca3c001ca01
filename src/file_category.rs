//! Extension-based classification of directory entries.
//!
//! A [`ClassificationMap`] maps a lowercase file extension to the name of the
//! folder the entry should be moved into. Extensions that are not mapped fall
//! back to [`FALLBACK_FOLDER`].
//!
//! # Examples
//!
//! ```
//! use tidyfolder::file_category::ClassificationMap;
//!
//! let map = ClassificationMap::from_pairs([("txt", "Documents"), ("png", "Images")]);
//! assert_eq!(map.folder_for("notes.TXT"), "Documents");
//! assert_eq!(map.folder_for("report.pdf"), "Others");
//! ```
use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};

/// Folder used for entries whose extension is not in the map.
pub const FALLBACK_FOLDER: &str = "Others";

/// Reasons a folder name from the map cannot be used under the target directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FolderNameError {
    /// The folder name is empty.
    #[error("folder name is empty")]
    Empty,
    /// The folder name is `.`, `..`, absolute, or spans several path segments.
    #[error("'{0}' is not a single folder name")]
    NotSingleSegment(String),
}

/// Returns the classification key of an entry name.
///
/// This is the text after the last `.`, lowercased. Names without a dot use
/// the whole name, so `Makefile` classifies as `makefile` and `.bashrc` as
/// `bashrc`.
///
/// ```
/// use tidyfolder::file_category::extension_of;
///
/// assert_eq!(extension_of("archive.tar.GZ"), "gz");
/// assert_eq!(extension_of("README"), "readme");
/// ```
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// Resolves `folder` to a path directly under `base`.
///
/// Only a single normal path component is accepted; anything that would
/// escape or nest below `base` is rejected.
pub fn folder_path(base: &Path, folder: &str) -> Result<PathBuf, FolderNameError> {
    if folder.is_empty() {
        return Err(FolderNameError::Empty);
    }

    let mut components = Path::new(folder).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) if segment == folder => Ok(base.join(segment)),
        _ => Err(FolderNameError::NotSingleSegment(folder.to_string())),
    }
}

/// Immutable extension → folder lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationMap {
    folders: HashMap<String, String>,
}

impl ClassificationMap {
    /// Builds a map from raw configuration entries. Keys are lowercased and a
    /// leading dot is dropped, so `".JPG"` and `"jpg"` are the same key.
    pub fn new(entries: HashMap<String, String>) -> Self {
        let folders = entries
            .into_iter()
            .map(|(ext, folder)| (normalize_key(&ext), folder))
            .collect();
        Self { folders }
    }

    /// Convenience constructor, mostly for tests and examples.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Looks up the folder for an extension. The extension must already be
    /// lowercase (see [`extension_of`]).
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.folders.get(extension).map(String::as_str)
    }

    /// Returns the destination folder for an entry name, falling back to
    /// [`FALLBACK_FOLDER`].
    pub fn folder_for(&self, entry_name: &str) -> &str {
        self.lookup(&extension_of(entry_name))
            .unwrap_or(FALLBACK_FOLDER)
    }

    /// Unique folder names declared as values, in sorted order.
    pub fn declared_folders(&self) -> BTreeSet<&str> {
        self.folders.values().map(String::as_str).collect()
    }

    /// Number of mapped extensions.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Returns true if no extension is mapped.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

fn normalize_key(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}
