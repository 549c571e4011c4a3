//! RemoteLocator: finds the remote config entry that belongs to a game.
//!
//! The remote repository has one directory per game directly under its root,
//! named loosely after the title (`Okami_Config/`, `Shadow_of_the_Colossus/`).
//! Lookup lists the root and picks the first entry accepted by a predicate.

use std::sync::Arc;

use pcsx2cfg_core::output::svn::strip_dir_separator;
use pcsx2cfg_core::{output_line, title_matches_entry, RemoteDescriptor};
use tracing::{debug, warn};

use crate::application::ports::VersionControlClient;

/// Locates remote config entries under a single repository root.
pub struct RemoteLocator {
    vcs: Arc<dyn VersionControlClient>,
    root: String,
}

impl RemoteLocator {
    /// Creates a locator.  Surrounding whitespace is trimmed from `root`; an
    /// empty `root` disables lookups.
    pub fn new(vcs: Arc<dyn VersionControlClient>, root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            vcs,
            root: root.trim().to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// `true` when a repository root is configured.
    pub fn is_enabled(&self) -> bool {
        !self.root.is_empty()
    }

    /// Looks up `title` with the default title/entry matching rule.
    pub fn find_for_title(&self, title: &str) -> Option<RemoteDescriptor> {
        self.find_remote_path(title, title_matches_entry)
    }

    /// Lists the root and returns the first entry `predicate(title, entry)`
    /// accepts, with its trailing `/` removed.
    ///
    /// Returns `None` when the root is empty, nothing matches, or the listing
    /// could not be obtained.
    pub fn find_remote_path<P>(&self, title: &str, predicate: P) -> Option<RemoteDescriptor>
    where
        P: Fn(&str, &str) -> bool,
    {
        if !self.is_enabled() {
            debug!(title, "remote lookups disabled");
            return None;
        }

        let listing = match self.vcs.list(&self.root) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(title, root = %self.root, error = %e, "remote listing failed");
                return None;
            }
        };

        let line = output_line(&listing, |line| {
            let entry = line.trim();
            !entry.is_empty() && predicate(title, entry)
        })?;
        let entry = strip_dir_separator(line.trim());

        debug!(title, entry, "found remote config");
        Some(RemoteDescriptor::new(self.root.as_str(), entry))
    }
}
