//! Subversion client output.
//!
//! Two commands matter:
//!
//! - `svn info` prints `Key: Value` lines.  The `Last Changed Rev` line is the
//!   staleness key: when it differs between the working copy and `HEAD`, an
//!   update is needed.
//!
//! - `svn list <url>` prints one entry per line; directory entries end in `/`.
//!
//! ```text
//! Path: .
//! URL: svn://configs.example/pcsx2/Okami_Config
//! Revision: 412
//! Last Changed Rev: 398        ◄── compared
//! Last Changed Date: 2019-03-02 10:11:12 +0100
//! ```
//!
//! Output is handled line by line and both `\n` and `\r\n` endings are
//! accepted, because the Windows build of the client emits the latter.

use tracing::debug;

/// Prefix of the `svn info` line that carries the last changed revision.
pub const LAST_CHANGED_REV_PREFIX: &str = "Last Changed Rev";

/// Returns the first line of `output` that satisfies `predicate`.
pub fn output_line<'a, P>(output: &'a str, predicate: P) -> Option<&'a str>
where
    P: Fn(&str) -> bool,
{
    output.lines().find(|line| predicate(line))
}

/// Extracts the value of the `Last Changed Rev` line, if present.
pub fn last_changed_rev(info_output: &str) -> Option<&str> {
    let line = output_line(info_output, |l| l.starts_with(LAST_CHANGED_REV_PREFIX))?;
    let rest = &line[LAST_CHANGED_REV_PREFIX.len()..];
    let value = rest.trim_start().strip_prefix(':').unwrap_or(rest).trim();
    Some(value)
}

/// Decides whether the working copy is behind `HEAD`.
///
/// If either output lacks a `Last Changed Rev` line (unexpected client output,
/// or a tool that printed nothing) the comparison is ambiguous and the answer
/// is `true`.
pub fn revisions_differ(head_info: &str, local_info: &str) -> bool {
    match (last_changed_rev(head_info), last_changed_rev(local_info)) {
        (Some(head), Some(local)) => head != local,
        (head, local) => {
            debug!(?head, ?local, "last changed revision missing, assuming stale");
            true
        }
    }
}

/// Strips the trailing directory separator from a listing entry.
pub fn strip_dir_separator(entry: &str) -> &str {
    entry.strip_suffix('/').unwrap_or(entry)
}
