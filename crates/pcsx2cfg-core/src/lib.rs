//! # pcsx2cfg-core
//!
//! Shared library for the PCSX2 per-game configurator containing the domain
//! model, local path derivation, and the parsers for the plain-text output of
//! the external tools the configurator drives.
//!
//! This crate has zero dependencies on process spawning, UI frameworks, or
//! configuration files.  The only filesystem access it performs is read-only
//! probing (does a directory exist, does it carry checkout metadata).
//!
//! # Architecture overview
//!
//! Every game owns a directory of emulator settings.  That directory can be in
//! one of three states:
//!
//! ```text
//! Unconfigured ──create──►  LocalOnly
//!      │                        │
//!      └──download──► RemoteTracked ──update──► RemoteTracked
//!                           │
//!                 remove ◄──┴──► Unconfigured
//! ```
//!
//! This crate defines:
//!
//! - **`domain`** – `Game`, the path layout that maps a title to its config
//!   directory, the derived `ConfigState`, the remote naming convention, and
//!   the launch-parameter to INI conversion.
//!
//! - **`output`** – Line-oriented parsers for the version-control client's
//!   `info` and `list` output, including the staleness comparison that decides
//!   whether an update pull is needed.

pub mod domain;
pub mod output;

pub use domain::game::{ConfigLayout, ConfigState, Game, GameError, REMOTE_MARKER_DIR};
pub use domain::remote::{normalize_title, title_matches_entry, RemoteDescriptor};
pub use output::svn::{last_changed_rev, output_line, revisions_differ};
