//! 7-Zip adapter: `7z x <archive> -o<dir> -y`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ports::{ArchiveExtractor, ToolError};
use crate::infrastructure::tools::runner::{ToolInvocation, ToolRunner};

/// [`ArchiveExtractor`] backed by the 7-Zip command-line tool.
#[derive(Debug, Clone)]
pub struct SevenZipExtractor {
    program: PathBuf,
    runner: ToolRunner,
}

impl SevenZipExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            runner: ToolRunner::new(),
        }
    }

    /// `x <archive> -o<output_dir> -y`; the output switch is a single token.
    pub fn invocation(&self, archive: &Path, output_dir: &Path) -> ToolInvocation {
        let mut output_switch = OsString::from("-o");
        output_switch.push(output_dir.as_os_str());
        ToolInvocation::new(&self.program)
            .arg("x")
            .arg(archive)
            .arg(output_switch)
            .arg("-y")
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn extract(&self, archive: &Path, output_dir: &Path) -> Result<(), ToolError> {
        if !archive.exists() {
            debug!(archive = %archive.display(), "archive missing, nothing to extract");
            return Ok(());
        }
        self.runner.run(&self.invocation(archive, output_dir))?;
        Ok(())
    }
}
