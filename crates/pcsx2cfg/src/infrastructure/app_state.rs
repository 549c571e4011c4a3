//! Composition root: builds application services from the configuration.
//!
//! [`AppContext`] owns one [`ConfigLifecycleManager`] and one
//! [`RemoteLocator`] wired to the production tool adapters, and opens a
//! [`GameSession`] per game.  Front ends (the CLI today) hold a single
//! context for the lifetime of the process.

use std::path::Path;
use std::sync::Arc;

use pcsx2cfg_core::{ConfigLayout, ConfigState, Game, RemoteDescriptor};
use serde::Serialize;

use crate::application::locate_remote::RemoteLocator;
use crate::application::manage_config::{ConfigLifecycleManager, Toolset};
use crate::application::ports::VersionControlClient;
use crate::application::session::{ActionAvailability, GameSession};
use crate::infrastructure::storage::config::{AppConfig, ResolvedPaths};
use crate::infrastructure::tools::{
    EmulatorEditor, SevenZipExtractor, SvnClient, SystemDirectoryRemover,
};

/// Shared application services.
pub struct AppContext {
    pub paths: ResolvedPaths,
    pub manager: Arc<ConfigLifecycleManager>,
    pub locator: Arc<RemoteLocator>,
}

impl AppContext {
    /// Wires the production adapters described by `config`.
    ///
    /// Relative paths in `config` are resolved against `working_dir`.
    pub fn from_config(config: &AppConfig, working_dir: &Path) -> Self {
        let paths = config.resolve(working_dir);
        let vcs: Arc<dyn VersionControlClient> =
            Arc::new(SvnClient::from_install_dir(paths.svn_dir.as_deref()));
        let toolset = Toolset {
            vcs: Arc::clone(&vcs),
            extractor: Arc::new(SevenZipExtractor::new(&paths.seven_zip)),
            remover: Arc::new(SystemDirectoryRemover::new()),
            editor: Arc::new(EmulatorEditor::new(config.tools.editor_args.clone())),
        };
        Self::with_toolset(paths, &config.remote.root_url, toolset)
    }

    /// Wires arbitrary adapters; the locator shares `toolset.vcs`.
    pub fn with_toolset(paths: ResolvedPaths, root_url: &str, toolset: Toolset) -> Self {
        let locator = Arc::new(RemoteLocator::new(Arc::clone(&toolset.vcs), root_url));
        let mut manager = ConfigLifecycleManager::new(
            ConfigLayout::new(&paths.configs_root),
            &paths.baseline,
            toolset,
        );
        if let Some(emulator) = &paths.default_emulator {
            manager = manager.with_default_emulator(emulator);
        }
        Self {
            paths,
            manager: Arc::new(manager),
            locator,
        }
    }

    /// Opens a session for `game`, starting its remote lookup.
    ///
    /// Must be called from within a tokio runtime.
    pub fn session(&self, game: Game) -> GameSession {
        GameSession::start(game, Arc::clone(&self.manager), Arc::clone(&self.locator))
    }
}

// ── Data Transfer Objects (Presentation layer) ────────────────────────────────

/// Machine-readable status of one game, as printed by `status --json`.
#[derive(Debug, Clone, Serialize)]
pub struct GameStatusDto {
    pub title: String,
    pub config_path: String,
    pub state: ConfigState,
    pub remote_url: Option<String>,
    pub actions: ActionAvailability,
}

impl GameStatusDto {
    pub fn new(
        session: &GameSession,
        config_path: &Path,
        remote: Option<&RemoteDescriptor>,
        actions: ActionAvailability,
    ) -> Self {
        Self {
            title: session.game().title().to_string(),
            config_path: config_path.display().to_string(),
            state: session.state(),
            remote_url: remote.map(RemoteDescriptor::url),
            actions,
        }
    }
}
