//! Infrastructure layer for the configurator.
//!
//! Contains OS-facing adapters: the external tool runner and one adapter per
//! tool, TOML configuration storage, and the wiring that assembles them into
//! application services.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pcsx2cfg_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod app_state;
pub mod storage;
pub mod tools;
