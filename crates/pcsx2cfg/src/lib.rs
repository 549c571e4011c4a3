//! pcsx2cfg library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does pcsx2cfg do?
//!
//! It manages the per-game settings directories of the PCSX2 emulator.  For
//! any game it can:
//!
//! 1. Create a config from a baseline (a directory or an archive).
//! 2. Download a config from a remote Subversion repository, or pull the
//!    latest revision of one that was downloaded before.
//! 3. Remove a config.
//! 4. Open the emulator's own settings UI pointed at the game's config.
//!
//! Every external program (the Subversion client, 7-Zip, the directory
//! removal command, the emulator) is reached through a small trait in
//! `application::ports`, so the lifecycle logic can be tested with in-memory
//! doubles.
//!
//! # Concurrency
//!
//! Nothing here locks the config directory.  Running two configurator
//! instances against the same game at the same time is unsupported.

/// Application layer: lifecycle use cases, remote lookup and sessions.
pub mod application;

/// Infrastructure layer: process adapters and configuration storage.
pub mod infrastructure;
