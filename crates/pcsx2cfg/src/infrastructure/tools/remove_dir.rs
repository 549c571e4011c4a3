//! Forced recursive directory removal through the system shell tools.
//!
//! Windows: `cmd /c rmdir /s /q <dir>`.  Elsewhere: `rm -rf -- <dir>`.
//! The system tools remove read-only files inside a checkout's metadata
//! directory, which `std::fs::remove_dir_all` refuses to do on Windows.

use std::path::Path;

use tracing::debug;

use crate::application::ports::{DirectoryRemover, ToolError};
use crate::infrastructure::tools::runner::{ToolInvocation, ToolRunner};

/// [`DirectoryRemover`] backed by the platform's shell tools.
#[derive(Debug, Clone, Default)]
pub struct SystemDirectoryRemover {
    runner: ToolRunner,
}

impl SystemDirectoryRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocation(dir: &Path) -> ToolInvocation {
        #[cfg(windows)]
        {
            ToolInvocation::new("cmd")
                .args(["/c", "rmdir", "/s", "/q"])
                .arg(dir)
        }
        #[cfg(not(windows))]
        {
            ToolInvocation::new("rm").args(["-rf", "--"]).arg(dir)
        }
    }
}

impl DirectoryRemover for SystemDirectoryRemover {
    fn remove(&self, dir: &Path) -> Result<(), ToolError> {
        if !dir.exists() {
            debug!(path = %dir.display(), "directory already absent");
            return Ok(());
        }
        self.runner.run(&Self::invocation(dir))?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_remove_deletes_nested_tree() {
        // Arrange
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Okami");
        std::fs::create_dir_all(dir.join(".svn").join("pristine")).unwrap();
        std::fs::write(dir.join("PCSX2_vm.ini"), "[vm]").unwrap();

        // Act
        SystemDirectoryRemover::new().remove(&dir).unwrap();

        // Assert
        assert!(!dir.exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn test_remove_missing_directory_is_ok() {
        let tmp = tempfile::tempdir().unwrap();

        assert!(SystemDirectoryRemover::new()
            .remove(&tmp.path().join("absent"))
            .is_ok());
    }

    #[test]
    fn test_invocation_ends_option_parsing_before_path() {
        let inv = SystemDirectoryRemover::invocation(Path::new("-odd name"));

        let args: Vec<_> = inv
            .arguments()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, vec!["-rf", "--", "-odd name"]);
    }
}
