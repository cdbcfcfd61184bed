//! Snapshot persistence channel for the cart.
//!
//! A store is read once when a [`CartStore`](super::CartStore) opens and
//! written after every mutation. Stores hold exactly one [`CartSnapshot`],
//! keyed by a fixed store name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::CartSnapshot;

/// Default store name for the cart snapshot.
pub const CART_STORE_NAME: &str = "cart-storage";

/// Errors raised by a snapshot store.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A key-value slot holding one cart snapshot.
pub trait SnapshotStore {
    /// Read the stored snapshot, or `None` if nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the store cannot be read or decoded.
    fn load(&self) -> Result<Option<CartSnapshot>, PersistError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the snapshot cannot be encoded or written.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<Option<CartSnapshot>, PersistError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistError> {
        (**self).save(snapshot)
    }
}

/// Snapshot stored as pretty-printed JSON at `<dir>/<name>.json`.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store named `name` inside `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.json")),
        }
    }

    /// Store using [`CART_STORE_NAME`].
    #[must_use]
    pub fn cart(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, CART_STORE_NAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<CartSnapshot>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: CartSnapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot.normalized()))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    encoded: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-process store holding the encoded snapshot.
///
/// Clones share the same slot, so a test can keep a handle, drop the cart,
/// and reopen a new cart on the same data to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail with [`PersistError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful writes.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Raw encoded snapshot, if any.
    #[must_use]
    pub fn encoded(&self) -> Option<String> {
        self.lock().encoded.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<CartSnapshot>, PersistError> {
        let Some(encoded) = self.encoded() else {
            return Ok(None);
        };
        let snapshot: CartSnapshot = serde_json::from_str(&encoded)?;
        Ok(Some(snapshot.normalized()))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(snapshot)?;
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(PersistError::Unavailable("writes disabled".to_string()));
        }
        inner.encoded = Some(encoded);
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use rust_decimal_macros::dec;

    fn sample() -> CartSnapshot {
        CartSnapshot::new(vec![
            CartLine::new("p1", dec!(10.50), 2),
            CartLine::new("p2", dec!(3.25), 1).with_title("Sticker"),
        ])
    }

    #[test]
    fn test_file_store_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::cart(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::cart(dir.path().join("nested"));

        store.save(&sample()).unwrap();
        assert!(store.path().ends_with("cart-storage.json"));
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::cart(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(PersistError::Serialization(_))));
    }

    #[test]
    fn test_memory_store_shared_between_clones() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save(&sample()).unwrap();

        assert_eq!(handle.load().unwrap(), Some(sample()));
        assert_eq!(handle.writes(), 1);
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        assert!(matches!(
            store.save(&sample()),
            Err(PersistError::Unavailable(_))
        ));
        assert_eq!(store.writes(), 0);
    }
}
