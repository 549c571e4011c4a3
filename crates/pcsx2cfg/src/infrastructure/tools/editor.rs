//! Opens the emulator's own settings UI against a game's config directory.
//!
//! The argument template is configurable; `{config_dir}` expands to the
//! game's config directory and `{title}` to the game title.  The emulator is
//! started from its own directory so it finds its plugins.

use std::ffi::OsString;
use std::path::Path;

use pcsx2cfg_core::Game;

use crate::application::ports::{ExternalEditor, ToolError};
use crate::infrastructure::tools::runner::{ToolInvocation, ToolRunner};

pub const CONFIG_DIR_PLACEHOLDER: &str = "{config_dir}";
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// [`ExternalEditor`] that runs the emulator executable.
#[derive(Debug, Clone)]
pub struct EmulatorEditor {
    arg_template: Vec<String>,
    runner: ToolRunner,
}

impl EmulatorEditor {
    pub fn new(arg_template: Vec<String>) -> Self {
        Self {
            arg_template,
            runner: ToolRunner::new(),
        }
    }

    pub fn invocation(&self, emulator: &Path, config_dir: &Path, game: &Game) -> ToolInvocation {
        let args = self
            .arg_template
            .iter()
            .map(|arg| expand(arg, config_dir, game.title()));
        let mut inv = ToolInvocation::new(emulator).args(args);
        if let Some(dir) = emulator.parent().filter(|p| !p.as_os_str().is_empty()) {
            inv = inv.working_dir(dir);
        }
        inv
    }
}

impl ExternalEditor for EmulatorEditor {
    fn launch(&self, emulator: &Path, config_dir: &Path, game: &Game) -> Result<(), ToolError> {
        self.runner.run(&self.invocation(emulator, config_dir, game))?;
        Ok(())
    }
}

fn expand(arg: &str, config_dir: &Path, title: &str) -> OsString {
    // An argument that is exactly the placeholder keeps non-UTF-8 paths intact.
    if arg == CONFIG_DIR_PLACEHOLDER {
        return config_dir.as_os_str().to_os_string();
    }
    arg.replace(CONFIG_DIR_PLACEHOLDER, &config_dir.to_string_lossy())
        .replace(TITLE_PLACEHOLDER, title)
        .into()
}
