//! pcsx2cfg: command-line front end for the per-game config manager.
//!
//! # Usage
//!
//! ```text
//! pcsx2cfg [OPTIONS] <COMMAND>
//!
//! Commands:
//!   status       <TITLE> [--json]                  Show config state and available actions
//!   create       <TITLE> [--force] [--launch-args] Create a config from the baseline
//!   sync         <TITLE>                           Download or update the remote config
//!   remove       <TITLE> --yes                     Delete the config
//!   edit         <TITLE> [--emulator <EXE>]        Open the emulator's settings UI
//!   find-remote  <TITLE>                           Print the matching remote URL
//!   init-config                                    Write a default config file
//!
//! Options:
//!   --config <FILE>        Config file [env: PCSX2CFG_CONFIG]
//!   --emulator-dir <DIR>   Override paths.emulator_dir [env: PCSX2CFG_EMULATOR_DIR]
//! ```
//!
//! # Logging
//!
//! `RUST_LOG` takes precedence; otherwise `general.log_level` from the config
//! file is used.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AppConfig (storage::config)
//!  └─ AppContext::from_config()   -- svn / 7z / rm adapters, manager, locator
//!  └─ AppContext::session(game)   -- starts the remote lookup
//!       └─ GameSession::{create, sync, remove, launch_editor}
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pcsx2cfg::application::manage_config::{DownloadOutcome, LifecycleError, UpdateOutcome};
use pcsx2cfg::application::session::SyncOutcome;
use pcsx2cfg::infrastructure::app_state::{AppContext, GameStatusDto};
use pcsx2cfg::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig,
};
use pcsx2cfg_core::Game;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Per-game PCSX2 configuration manager.
#[derive(Debug, Parser)]
#[command(
    name = "pcsx2cfg",
    about = "Create, download, update, remove and edit per-game PCSX2 configs",
    version
)]
struct Cli {
    /// Path of the TOML config file.  Defaults to the platform config
    /// directory.
    #[arg(long, global = true, env = "PCSX2CFG_CONFIG")]
    config: Option<PathBuf>,

    /// Emulator installation directory, overriding `paths.emulator_dir`.
    #[arg(long, global = true, env = "PCSX2CFG_EMULATOR_DIR")]
    emulator_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the config state of a game and which actions are available.
    Status {
        title: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Create a config from the baseline.
    Create {
        title: String,
        /// Replace an existing config.
        #[arg(long)]
        force: bool,
        /// Emulator launch parameters to persist with the config.
        #[arg(long, allow_hyphen_values = true)]
        launch_args: Option<String>,
    },
    /// Download the remote config, or update it if already downloaded.
    Sync { title: String },
    /// Delete the config.
    Remove {
        title: String,
        /// Confirm the removal.
        #[arg(long)]
        yes: bool,
    },
    /// Open the emulator's settings UI for the game's config.
    Edit {
        title: String,
        /// Emulator executable; defaults to `paths.default_emulator`.
        #[arg(long)]
        emulator: Option<PathBuf>,
    },
    /// Print the remote config URL matching the title.
    FindRemote { title: String },
    /// Write a config file with default values.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    fn title(&self) -> Option<&str> {
        match self {
            Command::Status { title, .. }
            | Command::Create { title, .. }
            | Command::Sync { title }
            | Command::Remove { title, .. }
            | Command::Edit { title, .. }
            | Command::FindRemote { title } => Some(title),
            Command::InitConfig { .. } => None,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path().context("locating the config file")?,
    };
    let loaded = load_config_from(&config_path);

    // Logging needs the configured level, so it starts before the load error
    // (if any) is reported.
    let log_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config =
        loaded.with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(dir) = &cli.emulator_dir {
        config.paths.emulator_dir = dir.clone();
    }

    if let Command::InitConfig { force } = cli.command {
        return init_config(&config_path, &config, force);
    }

    let working_dir = std::env::current_dir().context("reading the working directory")?;
    let ctx = AppContext::from_config(&config, &working_dir);
    info!(
        configs_root = %ctx.paths.configs_root.display(),
        remote = config.remote.root_url.as_str(),
        "configurator ready"
    );

    let Some(title) = cli.command.title().map(str::to_string) else {
        return Ok(());
    };
    let mut game = Game::new(title.as_str()).context("invalid game title")?;

    match cli.command {
        Command::Status { json, .. } => status(&ctx, game, json).await,
        Command::Create {
            force, launch_args, ..
        } => {
            if let Some(args) = launch_args {
                game = game.with_launch_args(args);
            }
            let session = ctx.session(game);
            match session.create(force).await {
                Err(LifecycleError::OverwriteNotConfirmed { title }) => {
                    bail!("a config for '{title}' already exists; pass --force to replace it")
                }
                other => other.context("creating config")?,
            }
            println!("created {}", ctx.manager.config_path(session.game()).display());
            Ok(())
        }
        Command::Sync { .. } => {
            let session = ctx.session(game);
            let outcome = session.sync().await.context("syncing config")?;
            report_sync(outcome)
        }
        Command::Remove { yes, .. } => {
            let session = ctx.session(game);
            match session.remove(yes).await {
                Err(LifecycleError::RemovalNotConfirmed { title }) => {
                    bail!("refusing to remove the config for '{title}' without --yes")
                }
                other => other.context("removing config")?,
            }
            println!("removed {}", ctx.manager.config_path(session.game()).display());
            Ok(())
        }
        Command::Edit { emulator, .. } => {
            if let Some(exe) = emulator {
                game = game.with_emulator(exe);
            }
            let session = ctx.session(game);
            session
                .launch_editor()
                .await
                .context("launching the emulator settings")
        }
        Command::FindRemote { .. } => match ctx.session(game).remote().await {
            Some(remote) => {
                println!("{}", remote.url());
                Ok(())
            }
            None => bail!("no remote config found for '{title}'"),
        },
        Command::InitConfig { .. } => Ok(()),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn status(ctx: &AppContext, game: Game, json: bool) -> anyhow::Result<()> {
    let config_path = ctx.manager.config_path(&game);
    let session = ctx.session(game);
    let remote = session.remote().await;
    let actions = session.availability().await;
    let dto = GameStatusDto::new(&session, &config_path, remote.as_ref(), actions);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dto).context("serializing status")?
        );
        return Ok(());
    }

    println!("{}: {}", dto.title, dto.state);
    println!("  path:   {}", dto.config_path);
    println!(
        "  remote: {}",
        dto.remote_url.as_deref().unwrap_or("(none)")
    );
    let a = dto.actions;
    println!(
        "  actions: create={} {}={} remove={} edit={}",
        a.create, a.sync_label, a.sync, a.remove, a.edit
    );
    Ok(())
}

fn report_sync(outcome: SyncOutcome) -> anyhow::Result<()> {
    match outcome {
        SyncOutcome::NoRemote => bail!("no remote config exists for this game"),
        SyncOutcome::Download(DownloadOutcome::Downloaded) => println!("downloaded"),
        SyncOutcome::Download(DownloadOutcome::AlreadyTracked) => println!("already downloaded"),
        SyncOutcome::Download(DownloadOutcome::Rejected) => {
            bail!("a local config exists; remove it before downloading")
        }
        SyncOutcome::Download(DownloadOutcome::Failed) => bail!("download failed"),
        SyncOutcome::Update(UpdateOutcome::Updated) => println!("updated"),
        SyncOutcome::Update(UpdateOutcome::AlreadyCurrent) => println!("already up to date"),
        SyncOutcome::Update(UpdateOutcome::NotTracked) => bail!("config is not remote-tracked"),
    }
    Ok(())
}

fn init_config(path: &std::path::Path, config: &AppConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    save_config_to(path, config)
        .with_context(|| format!("writing config to {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_create_with_launch_args() {
        let cli = Cli::try_parse_from([
            "pcsx2cfg",
            "create",
            "Okami",
            "--force",
            "--launch-args",
            "--fullscreen --nogui",
        ])
        .expect("parse");

        match cli.command {
            Command::Create {
                title,
                force,
                launch_args,
            } => {
                assert_eq!(title, "Okami");
                assert!(force);
                assert_eq!(launch_args.as_deref(), Some("--fullscreen --nogui"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pcsx2cfg",
            "status",
            "Ico",
            "--json",
            "--emulator-dir",
            "/opt/pcsx2",
        ])
        .expect("parse");

        assert_eq!(cli.emulator_dir, Some(PathBuf::from("/opt/pcsx2")));
        assert_eq!(cli.command.title(), Some("Ico"));
    }

    #[test]
    fn test_cli_remove_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["pcsx2cfg", "remove", "Ico"]).expect("parse");

        assert!(matches!(cli.command, Command::Remove { yes: false, .. }));
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let result = init_config(&path, &AppConfig::default(), false);

        assert!(result.is_err());
    }
}
