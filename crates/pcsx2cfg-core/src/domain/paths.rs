//! Root-relative path resolution.
//!
//! Every path in the configuration file may be written relative to a root
//! (the launcher directory, or the emulator directory).  Resolution is purely
//! lexical: `.` and `..` components are folded without touching the
//! filesystem, so paths that do not exist yet resolve the same way as paths
//! that do.

use std::path::{Component, Path, PathBuf};

/// Resolves `path` against `root`.
///
/// Absolute paths are returned unchanged (after normalization); relative
/// paths are joined onto `root` first.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Folds `.` and `..` components lexically.
///
/// A `..` that would climb above the root of an absolute path is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
