//! TOML-based configuration persistence for the configurator.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\PCSX2Configurator\config.toml`
//! - Linux:    `~/.config/pcsx2cfg/config.toml`
//! - macOS:    `~/Library/Application Support/PCSX2Configurator/config.toml`
//!
//! The file mirrors the layout of a launcher installation: the launcher
//! directory holds the bundled tools, the emulator directory sits somewhere
//! below it, and the per-game configs live under the emulator directory.
//!
//! ```toml
//! [paths]
//! launcher_dir = "D:/LaunchBox"
//! emulator_dir = "Emulators/PCSX2"   # relative to launcher_dir
//! configs_subdir = "inis_games"      # relative to emulator_dir
//!
//! [remote]
//! root_url = "svn://configs.example/pcsx2"
//! ```
//!
//! # Serde default values
//!
//! Every field carries a `#[serde(default = "...")]` and every section a
//! `#[serde(default)]`, so an empty or partial file is valid and a missing
//! file yields [`AppConfig::default()`].
//!
//! # Relative paths
//!
//! Paths are stored as written.  [`AppConfig::resolve`] turns them into
//! absolute [`ResolvedPaths`]: `launcher_dir` against the working directory,
//! `emulator_dir` and the tool paths against `launcher_dir`, and the config
//! paths against `emulator_dir`.

use std::path::{Path, PathBuf};

use pcsx2cfg_core::domain::paths::resolve;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Installation layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Launcher installation directory.  Relative to the working directory.
    #[serde(default = "default_launcher_dir")]
    pub launcher_dir: PathBuf,
    /// Emulator installation directory.  Relative to `launcher_dir`.
    #[serde(default = "default_emulator_dir")]
    pub emulator_dir: PathBuf,
    /// Directory holding one config directory per game.  Relative to
    /// `emulator_dir`.
    #[serde(default = "default_configs_subdir")]
    pub configs_subdir: PathBuf,
    /// Baseline copied (directory) or extracted (archive) into new configs.
    /// Relative to `emulator_dir`.
    #[serde(default = "default_baseline")]
    pub baseline: PathBuf,
    /// Emulator executable used when a game names none.  Relative to
    /// `emulator_dir`; empty means none.
    #[serde(default)]
    pub default_emulator: PathBuf,
}

/// External tool locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// Subversion installation (the client is `bin/svn` below it).  Relative
    /// to `launcher_dir`; empty means `svn` from `PATH`.
    #[serde(default = "default_svn_dir")]
    pub svn_dir: PathBuf,
    /// 7-Zip executable.  Relative to `launcher_dir`.
    #[serde(default = "default_seven_zip")]
    pub seven_zip: PathBuf,
    /// Arguments passed to the emulator when opening its settings.
    /// `{config_dir}` and `{title}` are expanded.
    #[serde(default = "default_editor_args")]
    pub editor_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Repository root listing one directory per game.  Empty disables remote
    /// lookups.
    #[serde(default)]
    pub root_url: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_launcher_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_emulator_dir() -> PathBuf {
    PathBuf::from("Emulators").join("PCSX2")
}
fn default_configs_subdir() -> PathBuf {
    PathBuf::from("inis_games")
}
fn default_baseline() -> PathBuf {
    PathBuf::from("inis")
}
fn default_svn_dir() -> PathBuf {
    PathBuf::from("SVN")
}
fn default_seven_zip() -> PathBuf {
    PathBuf::from("7-Zip").join("7z.exe")
}
fn default_editor_args() -> Vec<String> {
    vec!["--cfgpath".to_string(), "{config_dir}".to_string()]
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            launcher_dir: default_launcher_dir(),
            emulator_dir: default_emulator_dir(),
            configs_subdir: default_configs_subdir(),
            baseline: default_baseline(),
            default_emulator: PathBuf::new(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            svn_dir: default_svn_dir(),
            seven_zip: default_seven_zip(),
            editor_args: default_editor_args(),
        }
    }
}

// ── Resolved paths ────────────────────────────────────────────────────────────

/// Absolute paths derived from an [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub launcher_dir: PathBuf,
    pub emulator_dir: PathBuf,
    pub configs_root: PathBuf,
    pub baseline: PathBuf,
    pub default_emulator: Option<PathBuf>,
    /// `None` means the client is looked up on `PATH`.
    pub svn_dir: Option<PathBuf>,
    pub seven_zip: PathBuf,
}

impl AppConfig {
    /// Resolves every configured path, with `working_dir` as the base for a
    /// relative `launcher_dir`.
    pub fn resolve(&self, working_dir: &Path) -> ResolvedPaths {
        let launcher_dir = resolve(working_dir, &self.paths.launcher_dir);
        let emulator_dir = resolve(&launcher_dir, &self.paths.emulator_dir);
        let non_empty = |p: &Path| !p.as_os_str().is_empty();

        ResolvedPaths {
            configs_root: resolve(&emulator_dir, &self.paths.configs_subdir),
            baseline: resolve(&emulator_dir, &self.paths.baseline),
            default_emulator: Some(self.paths.default_emulator.as_path())
                .filter(|p| non_empty(p))
                .map(|p| resolve(&emulator_dir, p)),
            svn_dir: Some(self.tools.svn_dir.as_path())
                .filter(|p| non_empty(p))
                .map(|p| resolve(&launcher_dir, p)),
            seven_zip: resolve(&launcher_dir, &self.tools.seven_zip),
            emulator_dir,
            launcher_dir,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the application's config directory under the platform base.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PCSX2Configurator"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pcsx2cfg"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PCSX2Configurator")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
