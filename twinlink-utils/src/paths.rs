//! Path utilities for twinlink
//!
//! The work directory is handed to the backend process on its command line;
//! the backend creates its scene socket inside it. Log files follow the XDG
//! state directory convention.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Application identifier for XDG directories
const APP_NAME: &str = "twinlink";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the work directory shared with the backend
///
/// Location: `$XDG_RUNTIME_DIR/twinlink` or `/tmp/twinlink-$UID`
pub fn work_dir() -> PathBuf {
    if let Ok(xdg_runtime) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(xdg_runtime).join(APP_NAME)
    } else {
        // Fallback to /tmp with UID for security
        // SAFETY: getuid() is always safe to call
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/{}-{}", APP_NAME, uid))
    }
}

/// Socket path the backend creates for a scene file
///
/// The backend names its socket after the scene file's stem:
/// `<work_dir>/<stem>.json.sock`, so `scene.json` becomes
/// `<work_dir>/scene.json.sock`.
pub fn scene_socket_path(work_dir: &Path, scene_path: &Path) -> PathBuf {
    let stem = scene_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    work_dir.join(format!("{}.json.sock", stem))
}

/// Get the state directory (persistent state)
///
/// Location: `$XDG_STATE_HOME/twinlink` or `~/.local/state/twinlink`
pub fn state_dir() -> PathBuf {
    project_dirs()
        .and_then(|p| p.state_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(fallback_state_dir)
}

/// Get the log directory
///
/// Location: `$XDG_STATE_HOME/twinlink/log` or `~/.local/state/twinlink/log`
pub fn log_dir() -> PathBuf {
    state_dir().join("log")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

fn fallback_state_dir() -> PathBuf {
    home_dir().join(".local").join("state").join(APP_NAME)
}
