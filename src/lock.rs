//! Single-instance guard.
//!
//! A lock file at a fixed path marks a running dialog.  The lock is purely
//! advisory: no PID is recorded and a file left behind by a crashed
//! instance is never cleaned up automatically, so every later launch
//! reports "already running" until the file is removed by hand.

use log::{debug, info, warn};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Well-known lock path shared by every instance.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/obquit.lock";

/// Errors produced while taking or dropping the lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("cannot create lock file {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("cannot remove lock file {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// A held lock.  Dropping it removes the lock file.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    held: bool,
}

impl InstanceLock {
    /// Try to take the lock at `path`.
    ///
    /// Returns `Ok(None)` when another instance already holds it.  The file
    /// is created with `create_new`, so two racing launches can't both
    /// succeed.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Option<Self>, LockError> {
        let path = path.as_ref().to_path_buf();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                info!("lock acquired at {}", path.display());
                Ok(Some(Self { path, held: true }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("lock {} already exists", path.display());
                Ok(None)
            }
            Err(source) => Err(LockError::Create { path, source }),
        }
    }

    /// Remove the lock file.  A file that is already gone counts as
    /// released.
    pub fn release(mut self) -> Result<(), LockError> {
        self.held = false;
        remove(&self.path)
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if self.held {
            if let Err(e) = remove(&self.path) {
                warn!("{}", e);
            }
        }
    }
}

fn remove(path: &Path) -> Result<(), LockError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("lock released at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LockError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
