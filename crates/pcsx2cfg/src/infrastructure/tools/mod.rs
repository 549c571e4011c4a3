//! External tool adapters.
//!
//! Every adapter builds a [`runner::ToolInvocation`] and hands it to
//! [`runner::ToolRunner`], which starts the process and blocks until it
//! exits.  One adapter exists per capability trait in
//! [`ports`](crate::application::ports):
//!
//! | Trait                  | Adapter                   | Tool                  |
//! |------------------------|---------------------------|-----------------------|
//! | `VersionControlClient` | [`SvnClient`]             | `svn`                 |
//! | `ArchiveExtractor`     | [`SevenZipExtractor`]     | `7z`                  |
//! | `DirectoryRemover`     | [`SystemDirectoryRemover`]| `rmdir /s /q`, `rm -rf` |
//! | `ExternalEditor`       | [`EmulatorEditor`]        | the emulator          |
//!
//! The `mock` module provides in-memory doubles for tests.

pub mod editor;
pub mod mock;
pub mod remove_dir;
pub mod runner;
pub mod seven_zip;
pub mod svn;

pub use editor::EmulatorEditor;
pub use remove_dir::SystemDirectoryRemover;
pub use runner::{ToolInvocation, ToolRunner};
pub use seven_zip::SevenZipExtractor;
pub use svn::SvnClient;
