//! Launch-parameter conversion.
//!
//! Launchers store per-game emulator parameters as a single command-line
//! string such as `--fullscreen --nogui --cfgpath "D:\cfg"`.  When a config is
//! created those parameters are persisted next to the emulator settings as INI
//! key/value pairs:
//!
//! ```text
//! --fullscreen --nogui --gs=ogl      [LaunchOptions]
//!                             ──►    fullscreen=true
//!                                    nogui=true
//!                                    gs=ogl
//! ```
//!
//! Flags without a value become `true`.  A value may follow the flag after a
//! space or after `=`; every bare word up to the next flag belongs to it.

use tracing::debug;

/// INI section the converted parameters are written under.
pub const LAUNCH_OPTIONS_SECTION: &str = "LaunchOptions";

/// Parses a launcher command line into ordered `(key, value)` settings.
///
/// Repeating a flag replaces the earlier value but keeps its position.
pub fn parse_launch_args(raw: &str) -> Vec<(String, String)> {
    let mut settings: Vec<(String, Vec<String>)> = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(flag) = token.strip_prefix('-') {
            let flag = flag.trim_start_matches('-');
            if flag.is_empty() {
                continue;
            }
            let (key, inline_value) = match flag.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (flag, None),
            };
            let values: Vec<String> = inline_value
                .filter(|v| !v.is_empty())
                .map(|v| vec![unquote(v).to_string()])
                .unwrap_or_default();

            match settings.iter().position(|(k, _)| k == key) {
                Some(idx) => settings[idx].1 = values,
                None => settings.push((key.to_string(), values)),
            }
        } else if let Some((_, values)) = settings.last_mut() {
            values.push(unquote(token).to_string());
        } else {
            debug!(token, "ignoring launch argument before the first flag");
        }
    }

    settings
        .into_iter()
        .map(|(key, values)| {
            let value = if values.is_empty() {
                "true".to_string()
            } else {
                values.join(" ")
            };
            (key, value)
        })
        .collect()
}

/// Renders settings as an INI document with a single section.
pub fn render_ini(section: &str, settings: &[(String, String)]) -> String {
    let mut out = format!("[{section}]\n");
    for (key, value) in settings {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn unquote(token: &str) -> &str {
    token.trim_matches('"')
}
