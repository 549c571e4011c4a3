//! Remote configuration descriptors and the naming convention that links a
//! game title to an entry in the remote config repository.
//!
//! The remote repository holds one directory per game.  Directory names are
//! derived from the game title but are not guaranteed to match it exactly
//! (punctuation, casing and suffixes such as `_Config` vary), so titles and
//! entries are compared in a normalized form: lowercase ASCII letters and
//! digits only.

use serde::Serialize;

/// A resolved remote configuration for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteDescriptor {
    root: String,
    entry: String,
}

impl RemoteDescriptor {
    /// Creates a descriptor for `entry` under the repository `root`.
    ///
    /// A trailing `/` on either part is removed.
    pub fn new(root: impl Into<String>, entry: impl Into<String>) -> Self {
        let root = root.into().trim_end_matches('/').to_string();
        let entry = entry.into().trim_end_matches('/').to_string();
        Self { root, entry }
    }

    /// The repository root the listing was taken from.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The matched listing entry, without its trailing separator.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Full remote URL of the configuration.
    pub fn url(&self) -> String {
        format!("{}/{}", self.root, self.entry)
    }
}

/// Reduces a title or listing entry to lowercase ASCII alphanumerics.
pub fn normalize_title(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Default naming convention: the normalized listing `entry` must start with
/// the normalized `title`.
///
/// A title that normalizes to nothing (e.g. entirely non-ASCII) never matches,
/// otherwise it would select the first entry of every listing.
pub fn title_matches_entry(title: &str, entry: &str) -> bool {
    let title = normalize_title(title);
    !title.is_empty() && normalize_title(entry).starts_with(&title)
}
