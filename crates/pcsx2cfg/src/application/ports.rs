//! Capability traits for the external collaborators.
//!
//! Each trait has exactly one production adapter in
//! `infrastructure::tools` and an in-memory double in
//! `infrastructure::tools::mock`.  Unit tests in this crate additionally use
//! the `mockall`-generated `Mock*` types.
//!
//! All methods are synchronous and block until the underlying process exits.

use std::io;
use std::path::{Path, PathBuf};

use pcsx2cfg_core::Game;
use thiserror::Error;

/// Error type shared by every external tool adapter.
///
/// Only launch problems are errors.  Exit codes are not interpreted; callers
/// judge success from the captured output or from the filesystem afterwards.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The executable is missing or could not be started.
    #[error("failed to launch {}: {source}", program.display())]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process started but did not run to completion, for example
    /// because waiting for it or reading its output failed.
    #[error("failed while waiting for {}: {source}", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Version-control client holding the remote configs.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControlClient: Send + Sync {
    /// Checks `url` out into `target`.  Returns the client's stdout.
    fn checkout(&self, url: &str, target: &Path) -> Result<String, ToolError>;

    /// `info` of the working copy at `working_copy`.
    fn info(&self, working_copy: &Path) -> Result<String, ToolError>;

    /// `info -r HEAD` of the remote `url`.
    fn info_head(&self, url: &str) -> Result<String, ToolError>;

    /// Updates the working copy at `working_copy` in place.
    fn update(&self, working_copy: &Path) -> Result<String, ToolError>;

    /// Lists the entries directly under `url`, one per line.
    fn list(&self, url: &str) -> Result<String, ToolError>;
}

/// Archive extraction tool.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Extracts `archive` into `output_dir`.  A missing archive is skipped.
    fn extract(&self, archive: &Path, output_dir: &Path) -> Result<(), ToolError>;
}

/// Recursive, forced directory removal.
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryRemover: Send + Sync {
    /// Deletes `dir` and everything below it.  A missing directory is skipped.
    fn remove(&self, dir: &Path) -> Result<(), ToolError>;
}

/// The emulator's own configuration UI.
#[cfg_attr(test, mockall::automock)]
pub trait ExternalEditor: Send + Sync {
    /// Runs `emulator` against `config_dir` and waits for it to exit.
    fn launch(&self, emulator: &Path, config_dir: &Path, game: &Game) -> Result<(), ToolError>;
}
