use std::sync::atomic::{AtomicUsize, Ordering};

use musicnbrain_drafts::{KeyValueStore, MemoryStore, StoreError};

/// Memory store that counts writes to the draft form key.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    form_writes: AtomicUsize,
}

impl CountingStore {
    pub fn form_writes(&self) -> usize {
        self.form_writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == "musicnbrain_draft" {
            self.form_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key)
    }
}

/// Storage that is never available, as in a locked-down private window.
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}
