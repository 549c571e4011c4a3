//! Integration tests for the config lifecycle.
//!
//! These tests wire a real `ConfigLifecycleManager` and `RemoteLocator` to the
//! in-memory tool doubles and check the state invariants against the real
//! filesystem of a temporary emulator directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pcsx2cfg::application::manage_config::{
    DownloadOutcome, LifecycleError, Toolset, UpdateOutcome, LAUNCH_OPTIONS_FILE,
};
use pcsx2cfg::infrastructure::app_state::AppContext;
use pcsx2cfg::infrastructure::storage::config::ResolvedPaths;
use pcsx2cfg::infrastructure::tools::mock::{
    FakeArchiveExtractor, FakeDirectoryRemover, FakeEditor, FakeVersionControl,
};
use pcsx2cfg_core::{ConfigState, Game, RemoteDescriptor, REMOTE_MARKER_DIR};
use tempfile::TempDir;

const ROOT: &str = "svn://configs.example/pcsx2";

struct Harness {
    _tmp: TempDir,
    vcs: FakeVersionControl,
    remover: FakeDirectoryRemover,
    ctx: AppContext,
}

fn harness_with_root(root_url: &str) -> Harness {
    let tmp = tempfile::tempdir().expect("tempdir");
    let emulator_dir = tmp.path().join("Emulators").join("PCSX2");
    let baseline = emulator_dir.join("inis");
    fs::create_dir_all(&baseline).unwrap();
    fs::write(baseline.join("PCSX2_ui.ini"), "[ui]\n").unwrap();
    fs::write(baseline.join("GSdx.ini"), "Renderer=12\n").unwrap();

    let paths = ResolvedPaths {
        launcher_dir: tmp.path().to_path_buf(),
        configs_root: emulator_dir.join("inis_games"),
        baseline,
        default_emulator: Some(emulator_dir.join("pcsx2")),
        svn_dir: None,
        seven_zip: tmp.path().join("7-Zip").join("7z"),
        emulator_dir,
    };

    let vcs = FakeVersionControl::new(ROOT);
    let remover = FakeDirectoryRemover::new();
    let toolset = Toolset {
        vcs: Arc::new(vcs.clone()),
        extractor: Arc::new(FakeArchiveExtractor::default()),
        remover: Arc::new(remover.clone()),
        editor: Arc::new(FakeEditor::new()),
    };

    Harness {
        _tmp: tmp,
        vcs,
        remover,
        ctx: AppContext::with_toolset(paths, root_url, toolset),
    }
}

fn harness() -> Harness {
    harness_with_root(ROOT)
}

fn game(title: &str) -> Game {
    Game::new(title).unwrap()
}

fn remote(entry: &str) -> RemoteDescriptor {
    RemoteDescriptor::new(ROOT, entry)
}

/// Checks both directory-based equivalences for `game`.
fn assert_state_invariants(h: &Harness, game: &Game) {
    let path = h.ctx.manager.config_path(game);
    let exists = path.is_dir();
    let marked = path.join(REMOTE_MARKER_DIR).is_dir();

    assert_eq!(h.ctx.manager.is_configured(game), exists);
    assert_eq!(h.ctx.manager.is_remote_tracked(game), exists && marked);
}

// ── State equivalences ────────────────────────────────────────────────────────

#[test]
fn test_state_invariants_hold_through_every_transition() {
    let h = harness();
    h.vcs.publish("Okami_Config", &[("PCSX2_vm.ini", "[vm]")]);
    let okami = game("Okami");
    let m = &h.ctx.manager;

    assert_state_invariants(&h, &okami);
    assert_eq!(m.state(&okami), ConfigState::Unconfigured);

    m.create_config(&okami, false).unwrap();
    assert_state_invariants(&h, &okami);

    m.remove_config(&okami).unwrap();
    assert_state_invariants(&h, &okami);

    assert!(m.download_config(&okami, &remote("Okami_Config")).is_success());
    assert_state_invariants(&h, &okami);

    m.update_game_config(&okami, &remote("Okami_Config")).unwrap();
    assert_state_invariants(&h, &okami);

    m.remove_config(&okami).unwrap();
    assert_state_invariants(&h, &okami);
}

// ── create / remove ───────────────────────────────────────────────────────────

#[test]
fn test_create_yields_configured_but_untracked() {
    // Arrange
    let h = harness();
    let ico = game("Ico");

    // Act
    h.ctx.manager.create_config(&ico, false).unwrap();

    // Assert
    assert!(h.ctx.manager.is_configured(&ico));
    assert!(!h.ctx.manager.is_remote_tracked(&ico));
    let path = h.ctx.manager.config_path(&ico);
    assert_eq!(fs::read_to_string(path.join("GSdx.ini")).unwrap(), "Renderer=12\n");
}

#[test]
fn test_remove_yields_unconfigured() {
    let h = harness();
    let ico = game("Ico");
    h.ctx.manager.create_config(&ico, false).unwrap();

    h.ctx.manager.remove_config(&ico).unwrap();

    assert!(!h.ctx.manager.is_configured(&ico));
    assert_eq!(h.remover.removed(), vec![h.ctx.manager.config_path(&ico)]);
}

#[test]
fn test_create_over_existing_requires_confirmation() {
    let h = harness();
    let ico = game("Ico");
    h.ctx.manager.create_config(&ico, false).unwrap();

    let err = h.ctx.manager.create_config(&ico, false).unwrap_err();

    assert!(matches!(err, LifecycleError::OverwriteNotConfirmed { .. }));
    assert!(h.ctx.manager.create_config(&ico, true).is_ok());
}

#[test]
fn test_create_persists_launch_options() {
    let h = harness();
    let okami = game("Okami").with_launch_args("--fullscreen --cfgpath \"D:\\cfg\"");

    h.ctx.manager.create_config(&okami, false).unwrap();

    let ini = fs::read_to_string(h.ctx.manager.config_path(&okami).join(LAUNCH_OPTIONS_FILE)).unwrap();
    assert_eq!(ini, "[LaunchOptions]\nfullscreen=true\ncfgpath=D:\\cfg\n");
}

#[test]
fn test_local_only_then_remove_then_create_is_local_only_with_fresh_content() {
    // Arrange: a LocalOnly config carrying a user edit
    let h = harness();
    let ico = game("Ico");
    let m = &h.ctx.manager;
    m.create_config(&ico, false).unwrap();
    let path = m.config_path(&ico);
    fs::write(path.join("GSdx.ini"), "Renderer=13\n").unwrap();

    // Act
    m.remove_config(&ico).unwrap();
    m.create_config(&ico, false).unwrap();

    // Assert
    assert_eq!(m.state(&ico), ConfigState::LocalOnly);
    assert_eq!(fs::read_to_string(path.join("GSdx.ini")).unwrap(), "Renderer=12\n");
}

// ── download ──────────────────────────────────────────────────────────────────

#[test]
fn test_download_with_matching_remote_yields_tracked() {
    // Arrange
    let h = harness();
    h.vcs.publish("Okami_Config", &[("PCSX2_vm.ini", "[vm]")]);
    let okami = game("Okami");
    let found = h.ctx.locator.find_for_title(okami.title()).expect("remote match");

    // Act
    let outcome = h.ctx.manager.download_config(&okami, &found);

    // Assert
    assert_eq!(outcome, DownloadOutcome::Downloaded);
    assert!(h.ctx.manager.is_remote_tracked(&okami));
    assert!(h.ctx.manager.config_path(&okami).join("PCSX2_vm.ini").is_file());
}

#[test]
fn test_download_without_remote_entry_fails_and_changes_nothing() {
    let h = harness();
    let okami = game("Okami");

    let outcome = h.ctx.manager.download_config(&okami, &remote("Okami_Config"));

    assert_eq!(outcome, DownloadOutcome::Failed);
    assert!(!outcome.is_success());
    assert_eq!(h.ctx.manager.state(&okami), ConfigState::Unconfigured);
}

#[test]
fn test_download_with_unavailable_client_fails() {
    let h = harness();
    h.vcs.publish("Okami_Config", &[]);
    h.vcs.set_unavailable(true);
    let okami = game("Okami");

    let outcome = h.ctx.manager.download_config(&okami, &remote("Okami_Config"));

    assert_eq!(outcome, DownloadOutcome::Failed);
    assert!(!h.ctx.manager.is_configured(&okami));
}

#[test]
fn test_download_over_local_config_is_rejected() {
    let h = harness();
    h.vcs.publish("Ico", &[("PCSX2_vm.ini", "[vm]")]);
    let ico = game("Ico");
    h.ctx.manager.create_config(&ico, false).unwrap();

    let outcome = h.ctx.manager.download_config(&ico, &remote("Ico"));

    assert_eq!(outcome, DownloadOutcome::Rejected);
    assert_eq!(h.ctx.manager.state(&ico), ConfigState::LocalOnly);
    assert_eq!(h.vcs.call_count("checkout"), 0);
}

#[test]
fn test_download_twice_is_already_tracked() {
    let h = harness();
    h.vcs.publish("Ico", &[]);
    let ico = game("Ico");

    h.ctx.manager.download_config(&ico, &remote("Ico"));
    let second = h.ctx.manager.download_config(&ico, &remote("Ico"));

    assert_eq!(second, DownloadOutcome::AlreadyTracked);
    assert_eq!(h.vcs.call_count("checkout"), 1);
}

// ── update ────────────────────────────────────────────────────────────────────

#[test]
fn test_update_at_same_revision_makes_no_update_call() {
    // Arrange
    let h = harness();
    h.vcs.publish("Okami_Config", &[("PCSX2_vm.ini", "[vm]")]);
    let okami = game("Okami");
    h.ctx.manager.download_config(&okami, &remote("Okami_Config"));

    // Act
    let outcome = h
        .ctx
        .manager
        .update_game_config(&okami, &remote("Okami_Config"))
        .unwrap();

    // Assert
    assert_eq!(outcome, UpdateOutcome::AlreadyCurrent);
    assert_eq!(h.vcs.call_count("update"), 0);
}

#[test]
fn test_update_after_remote_commit_pulls_new_content() {
    // Arrange
    let h = harness();
    h.vcs.publish("Okami_Config", &[("PCSX2_vm.ini", "[vm]\nEE=0\n")]);
    let okami = game("Okami");
    h.ctx.manager.download_config(&okami, &remote("Okami_Config"));
    h.vcs.publish("Okami_Config", &[("PCSX2_vm.ini", "[vm]\nEE=1\n")]);

    // Act
    assert!(h.ctx.manager.needs_update(&okami, &remote("Okami_Config")).unwrap());
    let outcome = h
        .ctx
        .manager
        .update_game_config(&okami, &remote("Okami_Config"))
        .unwrap();

    // Assert
    assert_eq!(outcome, UpdateOutcome::Updated);
    assert_eq!(h.vcs.call_count("update"), 1);
    let vm = h.ctx.manager.config_path(&okami).join("PCSX2_vm.ini");
    assert_eq!(fs::read_to_string(vm).unwrap(), "[vm]\nEE=1\n");
    assert!(!h.ctx.manager.needs_update(&okami, &remote("Okami_Config")).unwrap());
}

#[test]
fn test_update_of_local_config_is_not_tracked() {
    let h = harness();
    let ico = game("Ico");
    h.ctx.manager.create_config(&ico, false).unwrap();

    let outcome = h.ctx.manager.update_game_config(&ico, &remote("Ico")).unwrap();

    assert_eq!(outcome, UpdateOutcome::NotTracked);
    assert!(h.vcs.calls().is_empty());
}

// ── remote lookup ─────────────────────────────────────────────────────────────

#[test]
fn test_locator_matches_foo_config_case_insensitively() {
    // Arrange: listing ["Bar/", "Foo_Config/"], title "foo"
    let h = harness();
    h.vcs.publish("Bar", &[]);
    h.vcs.publish("Foo_Config", &[]);

    // Act
    let found = h.ctx.locator.find_remote_path("foo", |title, entry| {
        entry.to_lowercase().starts_with(&title.to_lowercase())
    });

    // Assert
    assert_eq!(found.map(|r| r.entry().to_string()).as_deref(), Some("Foo_Config"));
}

#[test]
fn test_locator_with_empty_listing_finds_nothing() {
    let h = harness();

    assert!(h.ctx.locator.find_remote_path("foo", |_, _| true).is_none());
}

#[test]
fn test_locator_disabled_without_root() {
    let h = harness_with_root("");
    h.vcs.publish("Okami_Config", &[]);

    assert!(h.ctx.locator.find_for_title("Okami").is_none());
    assert_eq!(h.vcs.call_count("list"), 0);
}

// ── editor ────────────────────────────────────────────────────────────────────

#[test]
fn test_editor_launch_uses_default_emulator() {
    let h = harness();
    let editor = FakeEditor::new();
    let toolset = Toolset {
        vcs: Arc::new(h.vcs.clone()),
        extractor: Arc::new(FakeArchiveExtractor::default()),
        remover: Arc::new(h.remover.clone()),
        editor: Arc::new(editor.clone()),
    };
    let ctx = AppContext::with_toolset(h.ctx.paths.clone(), ROOT, toolset);
    let ico = game("Ico");

    ctx.manager.launch_external_editor(&ico).unwrap();

    let launches = editor.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].emulator, h.ctx.paths.emulator_dir.join("pcsx2"));
    assert_eq!(launches[0].config_dir, ctx.manager.config_path(&ico));
    assert_eq!(launches[0].title, "Ico");
}

#[test]
fn test_archive_baseline_is_extracted() {
    // Arrange
    let h = harness();
    let archive: PathBuf = h.ctx.paths.emulator_dir.join("inis.7z");
    fs::write(&archive, b"7z").unwrap();
    let extractor = FakeArchiveExtractor::with_files(&[("PCSX2_ui.ini", "[ui]\n")]);
    let mut paths = h.ctx.paths.clone();
    paths.baseline = archive.clone();
    let ctx = AppContext::with_toolset(
        paths,
        ROOT,
        Toolset {
            vcs: Arc::new(h.vcs.clone()),
            extractor: Arc::new(extractor.clone()),
            remover: Arc::new(h.remover.clone()),
            editor: Arc::new(FakeEditor::new()),
        },
    );
    let ico = game("Ico");

    // Act
    ctx.manager.create_config(&ico, false).unwrap();

    // Assert
    let target = ctx.manager.config_path(&ico);
    assert_eq!(extractor.extracted(), vec![(archive, target.clone())]);
    assert!(Path::new(&target).join("PCSX2_ui.ini").is_file());
    assert_eq!(ctx.manager.state(&ico), ConfigState::LocalOnly);
}
