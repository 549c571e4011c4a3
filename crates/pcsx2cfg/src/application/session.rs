//! GameSession: the async, per-game view used by front ends.
//!
//! A session is opened for one game and lives as long as the user works with
//! that game.  Opening it starts the remote lookup immediately; the answer is
//! needed to decide whether the Download/Update action is available, and the
//! listing can be slow, so it runs in the background while the caller does
//! other work.
//!
//! ```text
//!   GameSession::start ──► spawn_blocking(find_for_title)
//!          │                          │
//!          │                          ▼
//!          │               watch::Sender::send(Some(result))
//!          ▼                          │
//!   remote().await  ◄─────────────────┘   (any number of waiters)
//! ```
//!
//! The lookup runs exactly once per session.  Lifecycle calls are blocking
//! (they start external processes and wait for them), so every session
//! operation hands them to tokio's blocking pool.

use std::sync::Arc;

use pcsx2cfg_core::{ConfigState, Game, RemoteDescriptor};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::application::locate_remote::RemoteLocator;
use crate::application::manage_config::{
    ConfigLifecycleManager, DownloadOutcome, LifecycleError, UpdateOutcome,
};

// ── Remote lookup ─────────────────────────────────────────────────────────────

/// `None` while pending, `Some(result)` once the lookup finished.
type LookupSlot = Option<Option<RemoteDescriptor>>;

/// Handle to a one-shot remote lookup that many callers can await.
#[derive(Clone)]
pub struct RemoteLookup {
    rx: watch::Receiver<LookupSlot>,
}

impl RemoteLookup {
    /// Runs `locator.find_for_title(title)` on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(locator: Arc<RemoteLocator>, title: String) -> Self {
        let (tx, rx) = watch::channel(None);
        tokio::task::spawn_blocking(move || {
            let found = locator.find_for_title(&title);
            debug!(title = %title, found = found.is_some(), "remote lookup finished");
            // All receivers may already be gone.
            let _ = tx.send(Some(found));
        });
        Self { rx }
    }

    /// A lookup that has already resolved to `value`.
    pub fn ready(value: Option<RemoteDescriptor>) -> Self {
        let (_tx, rx) = watch::channel(Some(value));
        Self { rx }
    }

    /// Waits for the lookup result.
    ///
    /// A lookup task that died before publishing counts as "no remote".
    pub async fn wait(&self) -> Option<RemoteDescriptor> {
        let mut rx = self.rx.clone();
        let result = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone().flatten(),
            Err(_) => {
                warn!("remote lookup ended without a result");
                None
            }
        };
        result
    }

    /// The result if the lookup has finished, without waiting.
    pub fn peek(&self) -> Option<Option<RemoteDescriptor>> {
        self.rx.borrow().clone()
    }
}

// ── Availability model ────────────────────────────────────────────────────────

/// Which of Download/Update the sync action currently means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Download,
    Update,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncAction::Download => write!(f, "Download"),
            SyncAction::Update => write!(f, "Update"),
        }
    }
}

/// Which actions a front end should offer for the session's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionAvailability {
    pub create: bool,
    pub sync: bool,
    pub sync_label: SyncAction,
    pub remove: bool,
    pub edit: bool,
}

/// Result of [`GameSession::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "outcome")]
pub enum SyncOutcome {
    /// No remote config exists for the game.
    NoRemote,
    Download(DownloadOutcome),
    Update(UpdateOutcome),
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Per-game session context.
pub struct GameSession {
    game: Game,
    manager: Arc<ConfigLifecycleManager>,
    remote: RemoteLookup,
}

impl GameSession {
    /// Opens a session and starts the remote lookup.
    pub fn start(game: Game, manager: Arc<ConfigLifecycleManager>, locator: Arc<RemoteLocator>) -> Self {
        let remote = RemoteLookup::spawn(locator, game.title().to_string());
        Self::with_lookup(game, manager, remote)
    }

    /// Opens a session around an existing lookup handle.
    pub fn with_lookup(game: Game, manager: Arc<ConfigLifecycleManager>, remote: RemoteLookup) -> Self {
        Self { game, manager, remote }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Current state; recomputed from the filesystem on every call.
    pub fn state(&self) -> ConfigState {
        self.manager.state(&self.game)
    }

    /// Waits for the remote lookup.
    pub async fn remote(&self) -> Option<RemoteDescriptor> {
        self.remote.wait().await
    }

    /// The remote lookup result if it has finished.
    pub fn remote_if_ready(&self) -> Option<Option<RemoteDescriptor>> {
        self.remote.peek()
    }

    /// Computes which actions are available.  Does not wait for the lookup:
    /// while it is pending `sync` is `false`.
    pub async fn availability(&self) -> ActionAvailability {
        let state = self.state();
        let sync_label = if state.is_remote_tracked() {
            SyncAction::Update
        } else {
            SyncAction::Download
        };

        let sync = match self.remote_if_ready() {
            None | Some(None) => false,
            Some(Some(remote)) => match state {
                ConfigState::Unconfigured => true,
                ConfigState::LocalOnly => false,
                ConfigState::RemoteTracked => {
                    let game = self.game.clone();
                    let needs = self
                        .run_blocking(move |m| m.needs_update(&game, &remote))
                        .await;
                    match needs {
                        Ok(Ok(stale)) => stale,
                        Ok(Err(e)) | Err(e) => {
                            warn!(title = self.game.title(), error = %e, "staleness check failed");
                            false
                        }
                    }
                }
            },
        };

        ActionAvailability {
            create: true,
            sync,
            sync_label,
            remove: state.is_configured(),
            edit: state.is_configured(),
        }
    }

    /// Creates the config from the baseline.
    pub async fn create(&self, overwrite_confirmed: bool) -> Result<(), LifecycleError> {
        let game = self.game.clone();
        self.run_blocking(move |m| m.create_config(&game, overwrite_confirmed))
            .await?
    }

    /// Downloads the config if it is not tracked yet, otherwise updates it.
    ///
    /// Waits for the remote lookup first.
    pub async fn sync(&self) -> Result<SyncOutcome, LifecycleError> {
        let Some(remote) = self.remote().await else {
            return Ok(SyncOutcome::NoRemote);
        };
        let game = self.game.clone();
        self.run_blocking(move |m| {
            if m.is_remote_tracked(&game) {
                m.update_game_config(&game, &remote).map(SyncOutcome::Update)
            } else {
                Ok(SyncOutcome::Download(m.download_config(&game, &remote)))
            }
        })
        .await?
    }

    /// Deletes the config.  Requires explicit confirmation.
    pub async fn remove(&self, confirmed: bool) -> Result<(), LifecycleError> {
        if !confirmed {
            return Err(LifecycleError::RemovalNotConfirmed {
                title: self.game.title().to_string(),
            });
        }
        let game = self.game.clone();
        self.run_blocking(move |m| m.remove_config(&game)).await?
    }

    /// Runs the emulator's settings UI and waits for it to close.
    pub async fn launch_editor(&self) -> Result<(), LifecycleError> {
        let game = self.game.clone();
        self.run_blocking(move |m| m.launch_external_editor(&game))
            .await?
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T, LifecycleError>
    where
        T: Send + 'static,
        F: FnOnce(&ConfigLifecycleManager) -> T + Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        tokio::task::spawn_blocking(move || f(&manager))
            .await
            .map_err(|e| LifecycleError::Task(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::manage_config::Toolset;
    use crate::application::ports::{
        MockArchiveExtractor, MockDirectoryRemover, MockExternalEditor, MockVersionControlClient,
    };
    use pcsx2cfg_core::ConfigLayout;

    fn remote() -> RemoteDescriptor {
        RemoteDescriptor::new("svn://configs.example/pcsx2", "Okami_Config")
    }

    fn idle_manager(configs_root: &std::path::Path) -> Arc<ConfigLifecycleManager> {
        Arc::new(ConfigLifecycleManager::new(
            ConfigLayout::new(configs_root),
            configs_root.join("inis"),
            Toolset {
                vcs: Arc::new(MockVersionControlClient::new()),
                extractor: Arc::new(MockArchiveExtractor::new()),
                remover: Arc::new(MockDirectoryRemover::new()),
                editor: Arc::new(MockExternalEditor::new()),
            },
        ))
    }

    #[tokio::test]
    async fn test_sync_unavailable_until_lookup_resolves() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = watch::channel(None);
        let session = GameSession::with_lookup(
            Game::new("Okami").unwrap(),
            idle_manager(tmp.path()),
            RemoteLookup { rx },
        );

        // Act
        let pending = session.availability().await;
        tx.send(Some(Some(remote()))).unwrap();
        let resolved = session.availability().await;

        // Assert
        assert!(!pending.sync);
        assert_eq!(pending.sync_label, SyncAction::Download);
        assert!(pending.create);
        assert!(resolved.sync);
    }

    #[tokio::test]
    async fn test_remove_without_confirmation_touches_nothing() {
        // The mock remover has no expectations and would panic if called.
        let tmp = tempfile::tempdir().unwrap();
        let manager = idle_manager(tmp.path());
        let game = Game::new("Okami").unwrap();
        std::fs::create_dir_all(manager.config_path(&game)).unwrap();
        let session = GameSession::with_lookup(game, manager, RemoteLookup::ready(None));

        let result = session.remove(false).await;

        assert!(matches!(result, Err(LifecycleError::RemovalNotConfirmed { .. })));
        assert!(session.state().is_configured());
    }

    #[tokio::test]
    async fn test_ready_lookup_resolves_immediately() {
        let lookup = RemoteLookup::ready(Some(remote()));

        assert_eq!(lookup.peek(), Some(Some(remote())));
        assert_eq!(lookup.wait().await, Some(remote()));
    }

    #[tokio::test]
    async fn test_pending_lookup_peeks_as_none() {
        let (tx, rx) = watch::channel(None);
        let lookup = RemoteLookup { rx };

        assert_eq!(lookup.peek(), None);

        tx.send(Some(Some(remote()))).unwrap();
        assert_eq!(lookup.wait().await, Some(remote()));
    }

    #[tokio::test]
    async fn test_dropped_lookup_counts_as_absent() {
        let (tx, rx) = watch::channel(None);
        let lookup = RemoteLookup { rx };
        drop(tx);

        assert_eq!(lookup.wait().await, None);
    }

    #[tokio::test]
    async fn test_many_waiters_see_the_same_result() {
        let (tx, rx) = watch::channel(None);
        let lookup = RemoteLookup { rx };
        let a = lookup.clone();
        let b = lookup.clone();

        let waiters = tokio::spawn(async move { (a.wait().await, b.wait().await) });
        tx.send(Some(Some(remote()))).unwrap();

        let (ra, rb) = waiters.await.unwrap();
        assert_eq!(ra, Some(remote()));
        assert_eq!(rb, Some(remote()));
    }

    #[test]
    fn test_sync_action_labels() {
        assert_eq!(SyncAction::Download.to_string(), "Download");
        assert_eq!(SyncAction::Update.to_string(), "Update");
    }
}
