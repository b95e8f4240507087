use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{FileLock, LockError};
use crate::model::store::Store;
use crate::ops::store_ops::{self, EditError};

/// Error type for todo file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo file unavailable at {path}: {source}")]
    Unavailable { path: PathBuf, source: io::Error },
    #[error("todo file {path} is not valid UTF-8 (line {line}); fix or remove that line")]
    InvalidUtf8 { path: PathBuf, line: usize },
    #[error("todo file unavailable: {0}")]
    Lock(#[from] LockError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Handle on one todo file and its co-located lock file.
///
/// Reads through [`TodoStore::load`] take no lock. Every write goes through
/// a [`StoreTxn`], which holds the lock from its fresh read until commit.
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TodoStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `.<name>.lock` in the todo file's directory
    pub fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todo.txt".to_string());
        let dir = self.path.parent().unwrap_or(Path::new("."));
        dir.join(format!(".{}.lock", name))
    }

    /// Read the whole file without locking. A missing file is an empty store.
    pub fn load(&self) -> Result<Store, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => Ok(Store::from_content(&content)),
                Err(e) => {
                    let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
                    let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
                    tracing::warn!(path = %self.path.display(), line, "todo file is not valid UTF-8");
                    Err(StoreError::InvalidUtf8 {
                        path: self.path.clone(),
                        line,
                    })
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Store::default()),
            Err(e) => Err(StoreError::Unavailable {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Take the exclusive lock and read a fresh snapshot under it
    pub fn begin(&self) -> Result<StoreTxn<'_>, StoreError> {
        let lock = FileLock::acquire(&self.lock_path())?;
        let store = self.load()?;
        Ok(StoreTxn {
            target: self,
            _lock: lock,
            store,
            dirty: false,
        })
    }

    /// Append one line under the lock
    pub fn append(&self, line: &str) -> Result<(), StoreError> {
        let mut txn = self.begin()?;
        txn.append(line);
        txn.commit()
    }

    /// Replace one line under the lock, provided it still reads `expected`
    pub fn replace_line(&self, index: usize, expected: &str, new_line: &str) -> Result<(), StoreError> {
        let mut txn = self.begin()?;
        txn.expect_line(index, expected)?;
        txn.replace_line(index, new_line)?;
        txn.commit()
    }

    /// Delete one line under the lock, provided it still reads `expected`
    pub fn delete_line(&self, index: usize, expected: &str) -> Result<(), StoreError> {
        let mut txn = self.begin()?;
        txn.expect_line(index, expected)?;
        txn.delete_line(index)?;
        txn.commit()
    }

    fn write(&self, store: &Store) -> Result<(), StoreError> {
        atomic_write(&self.path, store.to_content().as_bytes()).map_err(|e| {
            StoreError::Unavailable {
                path: self.path.clone(),
                source: e,
            }
        })
    }
}

/// A locked read-modify-write of the todo file.
///
/// Edits apply to an in-memory snapshot; nothing reaches disk until
/// [`StoreTxn::commit`]. Dropping the transaction discards the edits and
/// releases the lock.
pub struct StoreTxn<'a> {
    target: &'a TodoStore,
    _lock: FileLock,
    store: Store,
    dirty: bool,
}

impl StoreTxn<'_> {
    pub fn append(&mut self, line: &str) {
        store_ops::append(&mut self.store, line);
        self.dirty = true;
    }

    pub fn replace_line(&mut self, index: usize, new_line: &str) -> Result<(), StoreError> {
        store_ops::replace_line(&mut self.store, index, new_line)?;
        self.dirty = true;
        Ok(())
    }

    pub fn delete_line(&mut self, index: usize) -> Result<String, StoreError> {
        let removed = store_ops::delete_line(&mut self.store, index)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn expect_line(&self, index: usize, expected: &str) -> Result<(), StoreError> {
        store_ops::expect_line(&self.store, index, expected).map_err(|e| {
            tracing::warn!(index, error = %e, "line no longer matches what was listed");
            StoreError::from(e)
        })
    }

    /// Write the snapshot atomically if anything changed, then unlock
    pub fn commit(self) -> Result<(), StoreError> {
        if self.dirty {
            self.target.write(&self.store)?;
            tracing::info!(
                path = %self.target.path.display(),
                lines = self.store.len(),
                "todo file written"
            );
        }
        Ok(())
    }
}

/// Write to a temp file in the same directory, then rename over the target.
/// Readers see either the old or the new contents, never a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
