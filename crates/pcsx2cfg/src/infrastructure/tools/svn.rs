//! Subversion command-line client adapter.
//!
//! The launcher ships its own client under `<svn_dir>/bin/`.  When no
//! installation directory is configured, `svn` is taken from `PATH`.
//!
//! | Operation   | Command line                                 | Working dir      |
//! |-------------|----------------------------------------------|------------------|
//! | checkout    | `svn checkout --non-interactive <url> <dir>` | -                |
//! | info        | `svn info --non-interactive`                 | working copy     |
//! | info HEAD   | `svn info --non-interactive -r HEAD <url>`   | -                |
//! | update      | `svn update --non-interactive`               | working copy     |
//! | list        | `svn list --non-interactive <url>`           | -                |

use std::path::{Path, PathBuf};

use crate::application::ports::{ToolError, VersionControlClient};
use crate::infrastructure::tools::runner::{ToolInvocation, ToolRunner};

#[cfg(windows)]
const SVN_EXECUTABLE: &str = "svn.exe";
#[cfg(not(windows))]
const SVN_EXECUTABLE: &str = "svn";

/// Never prompt for credentials or certificate approval.
const NON_INTERACTIVE: &str = "--non-interactive";

/// Subversion sub-commands issued by the configurator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvnCommand<'a> {
    Checkout { url: &'a str, target: &'a Path },
    Info { working_copy: &'a Path },
    InfoHead { url: &'a str },
    Update { working_copy: &'a Path },
    List { url: &'a str },
}

impl SvnCommand<'_> {
    /// Builds the invocation of `program` for this command.
    pub fn invocation(&self, program: &Path) -> ToolInvocation {
        let base = ToolInvocation::new(program).capture();
        match *self {
            // `target` is passed as given, so a relative path resolves
            // against the caller's working directory exactly once.
            SvnCommand::Checkout { url, target } => {
                base.args(["checkout", NON_INTERACTIVE, url]).arg(target)
            }
            SvnCommand::Info { working_copy } => base
                .args(["info", NON_INTERACTIVE])
                .working_dir(working_copy),
            SvnCommand::InfoHead { url } => base.args(["info", NON_INTERACTIVE, "-r", "HEAD", url]),
            SvnCommand::Update { working_copy } => base
                .args(["update", NON_INTERACTIVE])
                .working_dir(working_copy),
            SvnCommand::List { url } => base.args(["list", NON_INTERACTIVE, url]),
        }
    }
}

/// [`VersionControlClient`] backed by the `svn` executable.
#[derive(Debug, Clone)]
pub struct SvnClient {
    program: PathBuf,
    runner: ToolRunner,
}

impl SvnClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            runner: ToolRunner::new(),
        }
    }

    /// Client inside an installation directory, or from `PATH` when `None`.
    pub fn from_install_dir(svn_dir: Option<&Path>) -> Self {
        match svn_dir {
            Some(dir) => Self::new(dir.join("bin").join(SVN_EXECUTABLE)),
            None => Self::new(SVN_EXECUTABLE),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, command: SvnCommand<'_>) -> Result<String, ToolError> {
        self.runner.run(&command.invocation(&self.program))
    }
}

impl VersionControlClient for SvnClient {
    fn checkout(&self, url: &str, target: &Path) -> Result<String, ToolError> {
        self.run(SvnCommand::Checkout { url, target })
    }

    fn info(&self, working_copy: &Path) -> Result<String, ToolError> {
        self.run(SvnCommand::Info { working_copy })
    }

    fn info_head(&self, url: &str) -> Result<String, ToolError> {
        self.run(SvnCommand::InfoHead { url })
    }

    fn update(&self, working_copy: &Path) -> Result<String, ToolError> {
        self.run(SvnCommand::Update { working_copy })
    }

    fn list(&self, url: &str) -> Result<String, ToolError> {
        self.run(SvnCommand::List { url })
    }
}
