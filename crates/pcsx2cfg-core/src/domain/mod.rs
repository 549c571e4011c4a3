//! Domain entities for the configurator.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies.  Code in outer layers (application, infrastructure, CLI)
//! depends on the domain, but the domain never depends on them, so every type
//! here can be unit-tested without spawning a process.

/// Games, the config directory layout, and the derived `ConfigState`.
pub mod game;

/// Converts emulator command-line parameters into INI key/value settings.
pub mod launch_args;

/// Root-relative path resolution.
pub mod paths;

/// Remote configuration descriptors and the title naming convention.
pub mod remote;
