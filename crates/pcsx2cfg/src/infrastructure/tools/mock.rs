//! In-memory tool doubles for tests.
//!
//! [`FakeVersionControl`] simulates a repository root with one directory per
//! game.  A checkout writes the published files plus a `.svn` directory that
//! records the revision and URL, so the real [`ConfigState`] probing works on
//! the result.  The other doubles act on the real filesystem (removal,
//! extraction) or only record what they were asked to do (editor).
//!
//! [`ConfigState`]: pcsx2cfg_core::ConfigState

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pcsx2cfg_core::{Game, REMOTE_MARKER_DIR};

use crate::application::ports::{
    ArchiveExtractor, DirectoryRemover, ExternalEditor, ToolError, VersionControlClient,
};

const REV_FILE: &str = "rev";
const URL_FILE: &str = "url";

fn unavailable(program: &str) -> ToolError {
    ToolError::LaunchFailed {
        program: PathBuf::from(program),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

/// Reports a filesystem error inside a double as a tool that started and then
/// failed before finishing, which is what [`ToolError::Wait`] covers.
fn failed_mid_run(program: &'static str) -> impl Fn(std::io::Error) -> ToolError {
    move |source| ToolError::Wait {
        program: PathBuf::from(program),
        source,
    }
}

// ── Version control ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct RemoteEntry {
    name: String,
    files: Vec<(String, String)>,
    revision: u32,
}

#[derive(Debug, Default)]
struct RepoState {
    entries: Vec<RemoteEntry>,
    next_revision: u32,
    unavailable: bool,
    calls: Vec<String>,
}

/// A fake Subversion server and client in one.
#[derive(Debug, Clone)]
pub struct FakeVersionControl {
    root: String,
    state: Arc<Mutex<RepoState>>,
}

impl FakeVersionControl {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
            state: Arc::new(Mutex::new(RepoState {
                next_revision: 1,
                ..RepoState::default()
            })),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Adds (or replaces) the directory `entry` under the root and commits.
    pub fn publish(&self, entry: &str, files: &[(&str, &str)]) {
        let mut state = self.state.lock().expect("lock poisoned");
        let revision = state.next_revision;
        state.next_revision += 1;
        let files = files
            .iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect();
        match state.entries.iter().position(|e| e.name == entry) {
            Some(idx) => {
                state.entries[idx].files = files;
                state.entries[idx].revision = revision;
            }
            None => state.entries.push(RemoteEntry {
                name: entry.to_string(),
                files,
                revision,
            }),
        }
    }

    /// Commits a change to `entry` without touching its files.
    ///
    /// Panics if `entry` was never published.
    pub fn bump_revision(&self, entry: &str) {
        let mut state = self.state.lock().expect("lock poisoned");
        let revision = state.next_revision;
        state.next_revision += 1;
        let found = state
            .entries
            .iter_mut()
            .find(|e| e.name == entry)
            .expect("entry was never published");
        found.revision = revision;
    }

    /// Makes every call fail as if the client executable were missing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().expect("lock poisoned").unavailable = unavailable;
    }

    /// Calls made so far, e.g. `"update /tmp/.../Okami"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("lock poisoned").calls.clone()
    }

    /// Number of calls whose sub-command is `command`.
    pub fn call_count(&self, command: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(command))
            .count()
    }

    fn begin(&self, call: String) -> Result<std::sync::MutexGuard<'_, RepoState>, ToolError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.calls.push(call);
        if state.unavailable {
            return Err(unavailable("svn"));
        }
        Ok(state)
    }

    fn entry_for_url<'a>(&self, state: &'a RepoState, url: &str) -> Option<&'a RemoteEntry> {
        let name = url.strip_prefix(self.root.as_str())?.strip_prefix('/')?;
        state.entries.iter().find(|e| e.name == name.trim_end_matches('/'))
    }
}

fn write_working_copy(target: &Path, url: &str, entry: &RemoteEntry) -> std::io::Result<String> {
    let marker = target.join(REMOTE_MARKER_DIR);
    fs::create_dir_all(&marker)?;
    let mut out = String::new();
    for (name, body) in &entry.files {
        fs::write(target.join(name), body)?;
        out.push_str(&format!("A    {}\n", target.join(name).display()));
    }
    fs::write(marker.join(REV_FILE), entry.revision.to_string())?;
    fs::write(marker.join(URL_FILE), url)?;
    Ok(out)
}


impl VersionControlClient for FakeVersionControl {
    fn checkout(&self, url: &str, target: &Path) -> Result<String, ToolError> {
        let state = self.begin(format!("checkout {url} {}", target.display()))?;
        let Some(entry) = self.entry_for_url(&state, url) else {
            // The real client reports a missing URL on stderr only.
            return Ok(String::new());
        };
        let mut out = write_working_copy(target, url, entry).map_err(failed_mid_run("svn"))?;
        out.push_str(&format!("Checked out revision {}.\n", entry.revision));
        Ok(out)
    }

    fn info(&self, working_copy: &Path) -> Result<String, ToolError> {
        let _state = self.begin(format!("info {}", working_copy.display()))?;
        let rev_file = working_copy.join(REMOTE_MARKER_DIR).join(REV_FILE);
        Ok(match fs::read_to_string(rev_file) {
            Ok(rev) => format!(
                "Path: .\r\nWorking Copy Root Path: {}\r\nLast Changed Rev: {}\r\n",
                working_copy.display(),
                rev.trim()
            ),
            Err(_) => String::new(),
        })
    }

    fn info_head(&self, url: &str) -> Result<String, ToolError> {
        let state = self.begin(format!("info-head {url}"))?;
        Ok(match self.entry_for_url(&state, url) {
            Some(entry) => format!(
                "URL: {url}\nRevision: {}\nLast Changed Rev: {}\n",
                state.next_revision - 1,
                entry.revision
            ),
            None => String::new(),
        })
    }

    fn update(&self, working_copy: &Path) -> Result<String, ToolError> {
        let state = self.begin(format!("update {}", working_copy.display()))?;
        let url = fs::read_to_string(working_copy.join(REMOTE_MARKER_DIR).join(URL_FILE))
            .map_err(failed_mid_run("svn"))?;
        let Some(entry) = self.entry_for_url(&state, url.trim()) else {
            return Ok(String::new());
        };
        write_working_copy(working_copy, url.trim(), entry).map_err(failed_mid_run("svn"))?;
        Ok(format!("Updated to revision {}.\n", entry.revision))
    }

    fn list(&self, url: &str) -> Result<String, ToolError> {
        let state = self.begin(format!("list {url}"))?;
        if url.trim_end_matches('/') != self.root {
            return Ok(String::new());
        }
        Ok(state
            .entries
            .iter()
            .map(|e| format!("{}/\r\n", e.name))
            .collect())
    }
}

// ── Archive extraction ────────────────────────────────────────────────────────

/// Extractor that writes a fixed set of files instead of unpacking.
#[derive(Debug, Clone, Default)]
pub struct FakeArchiveExtractor {
    files: Vec<(String, String)>,
    extracted: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl FakeArchiveExtractor {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(n, b)| (n.to_string(), b.to_string()))
                .collect(),
            extracted: Arc::default(),
        }
    }

    /// `(archive, output_dir)` pairs seen so far.
    pub fn extracted(&self) -> Vec<(PathBuf, PathBuf)> {
        self.extracted.lock().expect("lock poisoned").clone()
    }
}

impl ArchiveExtractor for FakeArchiveExtractor {
    fn extract(&self, archive: &Path, output_dir: &Path) -> Result<(), ToolError> {
        self.extracted
            .lock()
            .expect("lock poisoned")
            .push((archive.to_path_buf(), output_dir.to_path_buf()));
        for (name, body) in &self.files {
            fs::write(output_dir.join(name), body).map_err(failed_mid_run("7z"))?;
        }
        Ok(())
    }
}

// ── Directory removal ─────────────────────────────────────────────────────────

/// Remover using `std::fs::remove_dir_all`; counts its calls.
#[derive(Debug, Clone, Default)]
pub struct FakeDirectoryRemover {
    removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeDirectoryRemover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().expect("lock poisoned").clone()
    }
}

impl DirectoryRemover for FakeDirectoryRemover {
    fn remove(&self, dir: &Path) -> Result<(), ToolError> {
        self.removed
            .lock()
            .expect("lock poisoned")
            .push(dir.to_path_buf());
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(failed_mid_run("rm"))?;
        }
        Ok(())
    }
}

// ── Editor ────────────────────────────────────────────────────────────────────

/// One recorded editor launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorLaunch {
    pub emulator: PathBuf,
    pub config_dir: PathBuf,
    pub title: String,
}

/// Editor that records launches and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct FakeEditor {
    launches: Arc<Mutex<Vec<EditorLaunch>>>,
}

impl FakeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> Vec<EditorLaunch> {
        self.launches.lock().expect("lock poisoned").clone()
    }
}

impl ExternalEditor for FakeEditor {
    fn launch(&self, emulator: &Path, config_dir: &Path, game: &Game) -> Result<(), ToolError> {
        self.launches
            .lock()
            .expect("lock poisoned")
            .push(EditorLaunch {
                emulator: emulator.to_path_buf(),
                config_dir: config_dir.to_path_buf(),
                title: game.title().to_string(),
            });
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
