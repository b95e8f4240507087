use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Advisory file lock serializing writers to one todo file.
///
/// Uses platform-native flock (Unix) on a dedicated lock file next to the
/// todo file. The lock is released when the guard is dropped; the lock file
/// stays on disk so every waiter locks the same inode.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: {source}")]
    LockFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FileLock {
    /// Acquire the lock, waiting as long as another writer holds it
    pub fn acquire(lock_path: &Path) -> Result<Self, LockError> {
        let file = open_lock_file(lock_path)?;
        lock(&file, true).map_err(|e| LockError::LockFailed {
            path: lock_path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %lock_path.display(), "lock acquired");
        Ok(FileLock {
            _file: file,
            path: lock_path.to_path_buf(),
        })
    }

    /// Try to acquire the lock without waiting.
    /// Returns `Ok(None)` if another holder has it.
    pub fn try_acquire(lock_path: &Path) -> Result<Option<Self>, LockError> {
        let file = open_lock_file(lock_path)?;
        match lock(&file, false) {
            Ok(()) => Ok(Some(FileLock {
                _file: file,
                path: lock_path.to_path_buf(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(LockError::LockFailed {
                path: lock_path.to_path_buf(),
                source: e,
            }),
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // flock is released when the descriptor closes with `_file`
        tracing::debug!(path = %self.path.display(), "lock released");
    }
}

fn open_lock_file(lock_path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| LockError::CreateError {
            path: lock_path.to_path_buf(),
            source: e,
        })
}

/// Take an exclusive flock on the file, blocking or not
#[cfg(unix)]
fn lock(file: &File, blocking: bool) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let mut op = libc::LOCK_EX;
    if !blocking {
        op |= libc::LOCK_NB;
    }
    loop {
        let result = unsafe { libc::flock(fd, op) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn lock(_file: &File, _blocking: bool) -> Result<(), std::io::Error> {
    // On non-Unix platforms, just succeed (advisory locking)
    Ok(())
}
