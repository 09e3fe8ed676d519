// ModSleuth - app/session.rs
//
// Session persistence: remember the last game directory and modlist path
// so repeated runs need no arguments.
//
// - Saved atomically (write temp, rename) so a crash during save never
//   corrupts the previous good session.
// - Load errors are silently discarded; a corrupt or incompatible session
//   just means starting fresh.
// - The data directory is created on first save.

use crate::util::constants::SESSION_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// Persistent session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    /// Directory analysed by the last `analyze` run.
    #[serde(default)]
    pub game_directory: Option<PathBuf>,

    /// Modlist sorted by the last `sort` run.
    #[serde(default)]
    pub modlist_path: Option<PathBuf>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            game_directory: None,
            modlist_path: None,
        }
    }
}

/// Resolve the session file path from the platform data directory.
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Save `data` to `path` atomically (write temp, then rename).
///
/// Returns a descriptive error string; callers log it and carry on.
pub fn save(data: &SessionData, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!(
                "cannot create session directory '{}': {e}",
                parent.display()
            )
        })?;
    }

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("failed to serialise session: {e}"))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes())
        .map_err(|e| format!("failed to write session temp file '{}': {e}", tmp.display()))?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        format!("failed to finalise session file '{}': {e}", path.display())
    })?;

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load and validate a `SessionData` from `path`.
///
/// Returns `None` on any error (not found, malformed JSON, version mismatch).
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::debug!(path = %path.display(), "Session file loaded");
    Some(data)
}

/// Load the session at `path`, apply `update`, and save it back.
///
/// Failures are logged at warn level and otherwise ignored; losing the
/// session never fails a run.
pub fn update<F>(path: &Path, update: F)
where
    F: FnOnce(&mut SessionData),
{
    let mut data = load(path).unwrap_or_default();
    update(&mut data);
    if let Err(e) = save(&data, path) {
        tracing::warn!(error = %e, "Could not save session");
    }
}
