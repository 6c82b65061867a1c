//! Backend process supervision
//!
//! Spawns the simulation backend with the scene parameters on its command
//! line and reaps it on teardown. The backend owns all scene state; this
//! side only tracks the child process handle.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

use twinlink_utils::{Result, TwinError};

/// Backend binary name
const BACKEND_BINARY: &str = "digitaltwin";

/// Find the backend binary
///
/// Search order:
/// 1. Same directory as the current executable
/// 2. PATH environment variable
pub fn find_backend_binary() -> Result<PathBuf> {
    if let Ok(current_exe) = std::env::current_exe() {
        if let Some(parent) = current_exe.parent() {
            let candidate = parent.join(BACKEND_BINARY);
            if candidate.is_file() {
                tracing::debug!("Found backend binary at: {:?}", candidate);
                return Ok(candidate);
            }
        }
    }

    if let Ok(path) = which::which(BACKEND_BINARY) {
        tracing::debug!("Found backend binary in PATH: {:?}", path);
        return Ok(path);
    }

    Err(TwinError::BackendNotFound(format!(
        "{} not found next to the executable or in PATH",
        BACKEND_BINARY
    )))
}

/// Build the backend invocation: `<program> <scene> <width> <height> <work_dir>`
fn build_command(
    program: &Path,
    scene_path: &Path,
    width: u32,
    height: u32,
    work_dir: &Path,
) -> Command {
    let mut command = Command::new(program);
    command
        .arg(scene_path)
        .arg(width.to_string())
        .arg(height.to_string())
        .arg(work_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    command
}

/// A running backend process owned by one session
pub struct Backend {
    child: Child,
}

impl Backend {
    /// Start the backend for a scene
    pub fn spawn(
        program: &Path,
        scene_path: &Path,
        width: u32,
        height: u32,
        work_dir: &Path,
    ) -> Result<Self> {
        tracing::info!(
            program = %program.display(),
            scene = %scene_path.display(),
            width,
            height,
            work_dir = %work_dir.display(),
            "Starting backend"
        );

        let child = build_command(program, scene_path, width, height, work_dir)
            .spawn()
            .map_err(|e| TwinError::Spawn(format!("{}: {}", program.display(), e)))?;

        tracing::info!(pid = ?child.id(), "Backend started");
        Ok(Self { child })
    }

    /// OS process id, while the child has not been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Kill the backend and wait for it to exit, bounded by `grace`
    ///
    /// A backend that outlives the grace period is a fatal teardown error,
    /// not something to ignore silently.
    pub async fn shutdown(mut self, grace: Duration) -> Result<()> {
        if self.child.try_wait()?.is_none() {
            self.child.start_kill()?;
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(status) => {
                let status = status?;
                tracing::info!(%status, "Backend exited");
                Ok(())
            }
            Err(_) => Err(TwinError::Teardown { grace }),
        }
    }

    #[cfg(test)]
    fn from_child(child: Child) -> Self {
        Self { child }
    }
}
