//! ManageConfigUseCase: the per-game configuration lifecycle.
//!
//! [`ConfigLifecycleManager`] owns the four transitions a config directory can
//! go through and the queries that classify it:
//!
//! ```text
//!                 create                     remove
//! Unconfigured ──────────►  LocalOnly  ───────────────► Unconfigured
//!      │
//!      │ download            update (no-op when current)
//!      └─────────► RemoteTracked ◄──────┐
//!                       │  └────────────┘
//!                       └───── remove ─────────────────► Unconfigured
//! ```
//!
//! There is no `LocalOnly → RemoteTracked` edge.  A download aimed at a
//! locally created config is rejected and the directory is left untouched; the
//! caller has to remove it first.
//!
//! Every external effect goes through a trait from
//! [`ports`](crate::application::ports).  The only direct filesystem writes
//! made here are copying a baseline directory, stripping checkout metadata
//! from a freshly created config, and writing the launch options file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pcsx2cfg_core::domain::launch_args::{parse_launch_args, render_ini, LAUNCH_OPTIONS_SECTION};
use pcsx2cfg_core::{revisions_differ, ConfigLayout, ConfigState, Game, RemoteDescriptor, REMOTE_MARKER_DIR};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::application::ports::{
    ArchiveExtractor, DirectoryRemover, ExternalEditor, ToolError, VersionControlClient,
};

/// File written into a new config when the game carries launch parameters.
pub const LAUNCH_OPTIONS_FILE: &str = "launch_options.ini";

/// Error type for lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("a config for '{title}' already exists and overwriting was not confirmed")]
    OverwriteNotConfirmed { title: String },

    #[error("removing the config for '{title}' was not confirmed")]
    RemovalNotConfirmed { title: String },

    #[error("baseline config not found at {}", path.display())]
    BaselineMissing { path: PathBuf },

    #[error("no emulator executable is configured for '{title}'")]
    NoEmulator { title: String },

    #[error("extracting {} produced no files", archive.display())]
    EmptyExtraction { archive: PathBuf },

    #[error("config directory {} still exists after removal", path.display())]
    RemovalIncomplete { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Result of [`ConfigLifecycleManager::download_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// The checkout completed and the config is now remote-tracked.
    Downloaded,
    /// The config was already remote-tracked; nothing was done.
    AlreadyTracked,
    /// A local, untracked config exists; nothing was done.
    Rejected,
    /// The checkout printed nothing, left no working copy, or could not be
    /// launched.  A partially populated directory is left as-is.
    Failed,
}

impl DownloadOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, DownloadOutcome::Downloaded | DownloadOutcome::AlreadyTracked)
    }
}

/// Result of [`ConfigLifecycleManager::update_game_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated,
    AlreadyCurrent,
    NotTracked,
}

/// The external collaborators a [`ConfigLifecycleManager`] drives.
#[derive(Clone)]
pub struct Toolset {
    pub vcs: Arc<dyn VersionControlClient>,
    pub extractor: Arc<dyn ArchiveExtractor>,
    pub remover: Arc<dyn DirectoryRemover>,
    pub editor: Arc<dyn ExternalEditor>,
}

/// How the baseline is materialized into a new config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaselineKind {
    Directory,
    Archive,
}

/// Creates, syncs, removes and inspects per-game configs.
pub struct ConfigLifecycleManager {
    layout: ConfigLayout,
    baseline: PathBuf,
    default_emulator: Option<PathBuf>,
    tools: Toolset,
}

impl ConfigLifecycleManager {
    /// Creates a manager.
    ///
    /// `baseline` is either a directory that is copied, or an archive that is
    /// extracted, into every newly created config.
    pub fn new(layout: ConfigLayout, baseline: impl Into<PathBuf>, tools: Toolset) -> Self {
        Self {
            layout,
            baseline: baseline.into(),
            default_emulator: None,
            tools,
        }
    }

    /// Emulator used by [`launch_external_editor`](Self::launch_external_editor)
    /// for games that do not name their own.
    pub fn with_default_emulator(mut self, emulator: impl Into<PathBuf>) -> Self {
        self.default_emulator = Some(emulator.into());
        self
    }

    pub fn layout(&self) -> &ConfigLayout {
        &self.layout
    }

    /// Local configuration directory of `game`.
    pub fn config_path(&self, game: &Game) -> PathBuf {
        self.layout.config_path(game)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn state(&self, game: &Game) -> ConfigState {
        self.layout.state(game)
    }

    /// `true` when the config directory exists.
    pub fn is_configured(&self, game: &Game) -> bool {
        self.config_path(game).is_dir()
    }

    /// `true` when the config directory exists and is a checkout.
    pub fn is_remote_tracked(&self, game: &Game) -> bool {
        self.state(game).is_remote_tracked()
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// Populates `game`'s config from the baseline.
    ///
    /// An existing config is only replaced when `overwrite_confirmed` is set.
    /// Checkout metadata carried by the baseline is stripped, so the result
    /// is always [`ConfigState::LocalOnly`].
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::OverwriteNotConfirmed`] if a config exists and the
    ///   caller did not confirm.
    /// - [`LifecycleError::BaselineMissing`] if the baseline does not exist;
    ///   nothing is written in that case.
    /// - [`LifecycleError::EmptyExtraction`] if an archive baseline unpacked
    ///   nothing; the empty directory is removed again.
    /// - [`LifecycleError::Tool`] / [`LifecycleError::Io`] for removal,
    ///   extraction and copy failures.
    pub fn create_config(&self, game: &Game, overwrite_confirmed: bool) -> Result<(), LifecycleError> {
        let target = self.config_path(game);
        let exists = target.is_dir();
        if exists && !overwrite_confirmed {
            return Err(LifecycleError::OverwriteNotConfirmed {
                title: game.title().to_string(),
            });
        }

        let kind = self.baseline_kind()?;
        if exists {
            info!(title = game.title(), path = %target.display(), "replacing existing config");
            self.remove_existing(&target)?;
        }

        fs::create_dir_all(&target).map_err(|source| LifecycleError::Io {
            path: target.clone(),
            source,
        })?;

        match kind {
            BaselineKind::Directory => {
                let copied = copy_tree(&self.baseline, &target)?;
                debug!(files = copied, "copied baseline directory");
            }
            BaselineKind::Archive => {
                self.tools.extractor.extract(&self.baseline, &target)?;
                if is_empty_dir(&target) {
                    warn!(archive = %self.baseline.display(), "extraction produced no files");
                    if let Err(e) = fs::remove_dir(&target) {
                        warn!(path = %target.display(), error = %e, "could not remove empty config");
                    }
                    return Err(LifecycleError::EmptyExtraction {
                        archive: self.baseline.clone(),
                    });
                }
            }
        }

        let marker = target.join(REMOTE_MARKER_DIR);
        if marker.is_dir() {
            fs::remove_dir_all(&marker).map_err(|source| LifecycleError::Io {
                path: marker.clone(),
                source,
            })?;
        }

        if let Some(raw) = game.launch_args() {
            let settings = parse_launch_args(raw);
            if !settings.is_empty() {
                let path = target.join(LAUNCH_OPTIONS_FILE);
                fs::write(&path, render_ini(LAUNCH_OPTIONS_SECTION, &settings))
                    .map_err(|source| LifecycleError::Io { path, source })?;
            }
        }

        info!(title = game.title(), path = %target.display(), "created config");
        Ok(())
    }

    /// Checks `remote` out as `game`'s config.
    ///
    /// Only an [`Unconfigured`](ConfigState::Unconfigured) game is checked
    /// out.  Launch failures are reported as [`DownloadOutcome::Failed`]
    /// rather than as an error.
    pub fn download_config(&self, game: &Game, remote: &RemoteDescriptor) -> DownloadOutcome {
        let target = self.config_path(game);

        match ConfigState::probe(&target) {
            ConfigState::RemoteTracked => {
                debug!(title = game.title(), "config already remote-tracked");
                return DownloadOutcome::AlreadyTracked;
            }
            ConfigState::LocalOnly => {
                warn!(
                    title = game.title(),
                    path = %target.display(),
                    "refusing to download over a local config; remove it first"
                );
                return DownloadOutcome::Rejected;
            }
            ConfigState::Unconfigured => {}
        }

        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "could not create configs directory");
                return DownloadOutcome::Failed;
            }
        }

        let url = remote.url();
        let output = match self.tools.vcs.checkout(&url, &target) {
            Ok(output) => output,
            Err(e) => {
                warn!(title = game.title(), error = %e, "checkout could not be run");
                return DownloadOutcome::Failed;
            }
        };

        if output.trim().is_empty() || !ConfigState::probe(&target).is_remote_tracked() {
            warn!(title = game.title(), %url, "checkout produced no working copy");
            return DownloadOutcome::Failed;
        }

        info!(title = game.title(), %url, "downloaded config");
        DownloadOutcome::Downloaded
    }

    /// Pulls the latest revision of a remote-tracked config if it is stale.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Tool`] if the client cannot be launched.
    pub fn update_game_config(
        &self,
        game: &Game,
        remote: &RemoteDescriptor,
    ) -> Result<UpdateOutcome, LifecycleError> {
        let target = self.config_path(game);
        if !ConfigState::probe(&target).is_remote_tracked() {
            return Ok(UpdateOutcome::NotTracked);
        }

        if !self.working_copy_is_stale(&target, remote)? {
            debug!(title = game.title(), "config is current");
            return Ok(UpdateOutcome::AlreadyCurrent);
        }

        self.tools.vcs.update(&target)?;
        info!(title = game.title(), url = %remote.url(), "updated config");
        Ok(UpdateOutcome::Updated)
    }

    /// `true` when `game` is remote-tracked and its `Last Changed Rev`
    /// differs from `HEAD` of `remote` (or either side is unreadable).
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Tool`] if the client cannot be launched.
    pub fn needs_update(&self, game: &Game, remote: &RemoteDescriptor) -> Result<bool, LifecycleError> {
        let target = self.config_path(game);
        if !ConfigState::probe(&target).is_remote_tracked() {
            return Ok(false);
        }
        self.working_copy_is_stale(&target, remote)
    }

    /// Deletes `game`'s config directory.  Does nothing if it is absent.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Tool`] if the removal command cannot be launched.
    /// - [`LifecycleError::RemovalIncomplete`] if the directory survived.
    pub fn remove_config(&self, game: &Game) -> Result<(), LifecycleError> {
        let target = self.config_path(game);
        if !target.is_dir() {
            debug!(title = game.title(), "no config to remove");
            return Ok(());
        }
        self.remove_existing(&target)?;
        info!(title = game.title(), path = %target.display(), "removed config");
        Ok(())
    }

    /// Runs the emulator's configuration UI against `game`'s config and
    /// blocks until it exits.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::NoEmulator`] if neither the game nor the manager
    ///   names an emulator.
    /// - [`LifecycleError::Tool`] if the emulator cannot be launched.
    pub fn launch_external_editor(&self, game: &Game) -> Result<(), LifecycleError> {
        let emulator = game
            .emulator_path()
            .map(Path::to_path_buf)
            .or_else(|| self.default_emulator.clone())
            .ok_or_else(|| LifecycleError::NoEmulator {
                title: game.title().to_string(),
            })?;

        let target = self.config_path(game);
        info!(title = game.title(), emulator = %emulator.display(), "launching emulator settings");
        self.tools.editor.launch(&emulator, &target, game)?;
        debug!(title = game.title(), "emulator settings closed");
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn baseline_kind(&self) -> Result<BaselineKind, LifecycleError> {
        if self.baseline.is_dir() {
            Ok(BaselineKind::Directory)
        } else if self.baseline.is_file() {
            Ok(BaselineKind::Archive)
        } else {
            Err(LifecycleError::BaselineMissing {
                path: self.baseline.clone(),
            })
        }
    }

    fn remove_existing(&self, target: &Path) -> Result<(), LifecycleError> {
        self.tools.remover.remove(target)?;
        if target.exists() {
            return Err(LifecycleError::RemovalIncomplete {
                path: target.to_path_buf(),
            });
        }
        Ok(())
    }

    fn working_copy_is_stale(&self, target: &Path, remote: &RemoteDescriptor) -> Result<bool, LifecycleError> {
        let head = self.tools.vcs.info_head(&remote.url())?;
        let local = self.tools.vcs.info(target)?;
        Ok(revisions_differ(&head, &local))
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).map_or(true, |mut entries| entries.next().is_none())
}

/// Recursively copies `source` into `target`, skipping checkout metadata.
///
/// Returns the number of files copied.
fn copy_tree(source: &Path, target: &Path) -> Result<u64, LifecycleError> {
    let mut copied = 0;
    let walker = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != REMOTE_MARKER_DIR);

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            LifecycleError::Io {
                path,
                source: e.into(),
            }
        })?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|source| LifecycleError::Io { path: dest, source })?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|source| LifecycleError::Io { path: dest, source })?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
