//! Games and the derived configuration state of their settings directory.
//!
//! A [`Game`] is owned by the host launcher; this crate only reads it.  The
//! [`ConfigLayout`] turns a game title into the absolute path of its settings
//! directory, and [`ConfigState::probe`] inspects that directory to decide
//! whether the game is unconfigured, configured locally, or tracked by a
//! remote checkout.
//!
//! # Why is `ConfigState` never stored?
//!
//! The directory can change underneath us: the user may delete it by hand, or
//! the emulator's own UI may create it.  Recomputing the state from the
//! filesystem on every query means the answer always reflects what is on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Name of the metadata folder a version-control checkout leaves in the
/// working copy root.  Its presence marks a config as remote-tracked.
pub const REMOTE_MARKER_DIR: &str = ".svn";

/// Characters that are not allowed in a directory name on Windows, which is
/// the strictest platform the emulator runs on.
const INVALID_DIR_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Error type for game construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The title was empty or whitespace only.
    #[error("game title must not be empty")]
    EmptyTitle,
}

// ── Game ──────────────────────────────────────────────────────────────────────

/// A game as seen by the configurator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    title: String,
    emulator_path: Option<PathBuf>,
    launch_args: Option<String>,
}

impl Game {
    /// Creates a game with the given title.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyTitle`] if nothing remains after trimming.
    pub fn new(title: impl Into<String>) -> Result<Self, GameError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(GameError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_string(),
            emulator_path: None,
            launch_args: None,
        })
    }

    /// Associates the emulator executable used to launch this game.
    pub fn with_emulator(mut self, path: impl Into<PathBuf>) -> Self {
        self.emulator_path = Some(path.into());
        self
    }

    /// Associates the emulator command-line parameters used for this game.
    ///
    /// Blank parameter strings are ignored.
    pub fn with_launch_args(mut self, args: impl Into<String>) -> Self {
        let args = args.into();
        self.launch_args = if args.trim().is_empty() { None } else { Some(args) };
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn emulator_path(&self) -> Option<&Path> {
        self.emulator_path.as_deref()
    }

    pub fn launch_args(&self) -> Option<&str> {
        self.launch_args.as_deref()
    }
}

/// Converts a game title into a directory name that is valid on every
/// platform.
///
/// Reserved characters and control characters are dropped, surrounding
/// whitespace and trailing dots are trimmed, and an empty result becomes `_`.
pub fn config_dir_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !c.is_control() && !INVALID_DIR_CHARS.contains(c))
        .collect();
    let trimmed = cleaned.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Maps games to their local configuration directories.
///
/// All per-game directories live directly under `configs_root`, which is
/// normally `<emulator_dir>/<configs_subdir>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    configs_root: PathBuf,
}

impl ConfigLayout {
    pub fn new(configs_root: impl Into<PathBuf>) -> Self {
        Self {
            configs_root: configs_root.into(),
        }
    }

    /// The directory that holds every per-game config directory.
    pub fn configs_root(&self) -> &Path {
        &self.configs_root
    }

    /// Absolute path of `game`'s configuration directory.
    pub fn config_path(&self, game: &Game) -> PathBuf {
        self.configs_root.join(config_dir_name(game.title()))
    }

    /// Derived state of `game`'s configuration directory.
    pub fn state(&self, game: &Game) -> ConfigState {
        ConfigState::probe(&self.config_path(game))
    }
}

// ── ConfigState ───────────────────────────────────────────────────────────────

/// Configuration state of a game, derived from the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigState {
    /// The config directory does not exist.
    Unconfigured,
    /// The config directory exists without checkout metadata.
    LocalOnly,
    /// The config directory is a working copy of a remote config.
    RemoteTracked,
}

impl ConfigState {
    /// Inspects `config_dir` and classifies it.
    pub fn probe(config_dir: &Path) -> Self {
        if !config_dir.is_dir() {
            ConfigState::Unconfigured
        } else if has_remote_marker(config_dir) {
            ConfigState::RemoteTracked
        } else {
            ConfigState::LocalOnly
        }
    }

    /// `true` for every state in which the directory exists.
    pub fn is_configured(self) -> bool {
        !matches!(self, ConfigState::Unconfigured)
    }

    pub fn is_remote_tracked(self) -> bool {
        matches!(self, ConfigState::RemoteTracked)
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigState::Unconfigured => "not configured",
            ConfigState::LocalOnly => "configured (local)",
            ConfigState::RemoteTracked => "configured (remote)",
        };
        f.write_str(label)
    }
}

/// Returns `true` if `dir` contains the checkout metadata folder.
pub fn has_remote_marker(dir: &Path) -> bool {
    dir.join(REMOTE_MARKER_DIR).is_dir()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_new_trims_title() {
        let game = Game::new("  Okami  ").expect("valid title");
        assert_eq!(game.title(), "Okami");
    }

    #[test]
    fn test_game_new_rejects_blank_title() {
        assert_eq!(Game::new("   "), Err(GameError::EmptyTitle));
    }

    #[test]
    fn test_with_launch_args_ignores_blank_string() {
        let game = Game::new("Okami").unwrap().with_launch_args("   ");
        assert_eq!(game.launch_args(), None);
    }

    #[test]
    fn test_config_dir_name_strips_reserved_characters() {
        assert_eq!(
            config_dir_name("Ratchet & Clank: Up Your Arsenal"),
            "Ratchet & Clank Up Your Arsenal"
        );
        assert_eq!(config_dir_name("What? <Yes>/No*"), "What YesNo");
    }

    #[test]
    fn test_config_dir_name_trims_trailing_dots() {
        assert_eq!(config_dir_name("Shadow of the Colossus..."), "Shadow of the Colossus");
    }

    #[test]
    fn test_config_dir_name_falls_back_for_fully_invalid_title() {
        assert_eq!(config_dir_name("???"), "_");
    }

    #[test]
    fn test_layout_config_path_joins_sanitized_title() {
        // Arrange
        let layout = ConfigLayout::new("/emu/inis_games");
        let game = Game::new("Jak: The Lost Frontier").unwrap();

        // Act
        let path = layout.config_path(&game);

        // Assert
        assert_eq!(path, PathBuf::from("/emu/inis_games/Jak The Lost Frontier"));
    }

    #[test]
    fn test_probe_missing_directory_is_unconfigured() {
        let tmp = tempfile::tempdir().unwrap();
        let state = ConfigState::probe(&tmp.path().join("absent"));
        assert_eq!(state, ConfigState::Unconfigured);
        assert!(!state.is_configured());
    }

    #[test]
    fn test_probe_plain_directory_is_local_only() {
        let tmp = tempfile::tempdir().unwrap();
        let state = ConfigState::probe(tmp.path());
        assert_eq!(state, ConfigState::LocalOnly);
        assert!(state.is_configured());
        assert!(!state.is_remote_tracked());
    }

    #[test]
    fn test_probe_directory_with_marker_is_remote_tracked() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join(REMOTE_MARKER_DIR)).unwrap();
        assert_eq!(ConfigState::probe(tmp.path()), ConfigState::RemoteTracked);
    }

    #[test]
    fn test_probe_marker_file_is_not_a_marker() {
        // A stray `.svn` *file* is not checkout metadata.
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(REMOTE_MARKER_DIR), "x").unwrap();
        assert_eq!(ConfigState::probe(tmp.path()), ConfigState::LocalOnly);
    }

    #[test]
    fn test_probe_regular_file_is_unconfigured() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Okami");
        std::fs::write(&file, "not a dir").unwrap();
        assert_eq!(ConfigState::probe(&file), ConfigState::Unconfigured);
    }

    #[test]
    fn test_config_state_display_labels() {
        assert_eq!(ConfigState::Unconfigured.to_string(), "not configured");
        assert_eq!(ConfigState::LocalOnly.to_string(), "configured (local)");
        assert_eq!(ConfigState::RemoteTracked.to_string(), "configured (remote)");
    }
}
