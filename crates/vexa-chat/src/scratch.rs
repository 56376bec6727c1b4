//! Per-request scratch files for uploaded audio.
//!
//! A [`ScratchFile`] removes its file when dropped, so every exit path of
//! an audio turn (success, error, timeout cancellation) cleans up.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::ChatError;

/// Directory that scratch files are created in.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scratch directory under the OS temp dir.
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a new, uniquely named file.
    ///
    /// Names combine a millisecond timestamp with a random suffix and the
    /// file is opened with `create_new`, so concurrent requests sharing the
    /// directory never collide.
    pub async fn persist(&self, bytes: &[u8]) -> Result<ScratchFile, ChatError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| scratch_error("create scratch dir", &self.root, e))?;

        let name = format!(
            "audio_{}_{}.wav",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        );
        let path = self.root.join(name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| scratch_error("create scratch file", &path, e))?;

        // Guard from here on so a failed write still cleans up.
        let guard = ScratchFile {
            path,
            armed: true,
        };

        file.write_all(bytes)
            .await
            .map_err(|e| scratch_error("write scratch file", guard.path(), e))?;
        file.flush()
            .await
            .map_err(|e| scratch_error("flush scratch file", guard.path(), e))?;

        tracing::debug!(path = %guard.path().display(), bytes = bytes.len(), "Scratch file persisted");
        Ok(guard)
    }
}

fn scratch_error(action: &str, path: &Path, err: std::io::Error) -> ChatError {
    ChatError::Scratch(format!("{} {}: {}", action, path.display(), err))
}

// =============================================================================
// ScratchFile
// =============================================================================

/// Owned scratch file, deleted on drop unless already removed.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now and report failure.
    ///
    /// On error the guard stays armed and the drop handler retries.
    pub async fn remove(mut self) -> Result<(), ChatError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                self.armed = false;
                tracing::debug!(path = %self.path.display(), "Scratch file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.armed = false;
                Ok(())
            }
            Err(e) => Err(scratch_error("remove scratch file", &self.path, e)),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Scratch file removed on drop");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file");
            }
        }
    }
}
