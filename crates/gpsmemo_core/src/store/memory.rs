//! HashMap-backed blob store for tests and ephemeral sessions.

use super::{BlobError, BlobResult, BlobStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory blob store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.storage.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let storage = self.storage.read().map_err(|_| BlobError::Poisoned)?;
        Ok(storage.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        let mut storage = self.storage.write().map_err(|_| BlobError::Poisoned)?;
        storage.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryBlobStore;
    use crate::store::BlobStore;

    #[test]
    fn clones_share_storage() {
        let store = InMemoryBlobStore::new();
        let handle = store.clone();
        store.set("k", b"v1").unwrap();
        store.set("k", b"v2").unwrap();

        assert_eq!(handle.get("k").unwrap().as_deref(), Some(&b"v2"[..]));
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.get("missing").unwrap(), None);
    }
}
