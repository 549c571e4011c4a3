//! Blocking launcher for external command-line tools.
//!
//! Every tool the configurator drives (the Subversion client, 7-Zip, the
//! directory remover, the emulator) is started through [`ToolRunner::run`].
//!
//! - Arguments are passed as a list, never through a shell, so paths with
//!   spaces need no quoting.
//! - stdin is closed and stderr is discarded.
//! - stdout is either captured (decoded lossily as UTF-8) or discarded.
//! - On Windows no console window is created.
//! - The exit status is logged and otherwise ignored; callers decide success
//!   from the returned output or from the filesystem.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::application::ports::ToolError;

/// One external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    capture_stdout: bool,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            capture_stdout: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Capture stdout instead of discarding it.
    pub fn capture(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn captures_stdout(&self) -> bool {
        self.capture_stdout
    }
}

/// Runs [`ToolInvocation`]s and waits for them to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolRunner;

impl ToolRunner {
    pub fn new() -> Self {
        Self
    }

    /// Launches `invocation` and blocks until the process exits.
    ///
    /// Returns the captured stdout, or an empty string when capture is off.
    ///
    /// # Errors
    ///
    /// - [`ToolError::LaunchFailed`] if the program cannot be started.
    /// - [`ToolError::Wait`] if waiting for it or reading its output fails.
    pub fn run(&self, invocation: &ToolInvocation) -> Result<String, ToolError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .stdout(if invocation.capture_stdout {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }
        hide_console_window(&mut command);

        debug!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            cwd = ?invocation.working_dir,
            "starting tool"
        );

        let child = command.spawn().map_err(|source| ToolError::LaunchFailed {
            program: invocation.program.clone(),
            source,
        })?;
        let output = child.wait_with_output().map_err(|source| ToolError::Wait {
            program: invocation.program.clone(),
            source,
        })?;

        debug!(
            program = %invocation.program.display(),
            exit_code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "tool exited"
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_command: &mut Command) {}
