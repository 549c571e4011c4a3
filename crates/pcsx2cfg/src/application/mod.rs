//! Application layer use cases for the configurator.
//!
//! Use cases in this layer orchestrate domain objects to fulfil a user goal
//! and depend only on the capability traits in [`ports`], never on a concrete
//! process adapter.
//!
//! # Sub-modules
//!
//! - **`ports`**         – Traits for the external collaborators (version
//!   control, archive extraction, directory removal, the emulator editor).
//!
//! - **`manage_config`** – The config lifecycle: create, download, update,
//!   remove, launch the editor.
//!
//! - **`locate_remote`** – Finds a game's entry in the remote listing.
//!
//! - **`session`**       – Per-game session context holding the one-shot
//!   remote lookup and deciding which actions are currently available.

pub mod locate_remote;
pub mod manage_config;
pub mod ports;
pub mod session;
