use std::sync::{Arc, Mutex};

use crate::store::KnowledgeStore;
use crate::storage::{Result, StoreError};

/// Cloneable handle that serializes every operation behind one lock.
///
/// Readers take the same lock as writers, so no caller can observe an index
/// half-updated by another thread.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<KnowledgeStore>>,
}

impl SharedStore {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with<T>(&self, f: impl FnOnce(&mut KnowledgeStore) -> Result<T>) -> Result<T> {
        let mut store = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut store)
    }

    /// Read-only variant of [`with`](Self::with) for queries that cannot fail
    pub fn read<T>(&self, f: impl FnOnce(&KnowledgeStore) -> T) -> Result<T> {
        let store = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Principal;
    use std::thread;

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let shared = SharedStore::default();
        let owners = ["alice", "bob", "carol", "dave"];

        let handles: Vec<_> = owners
            .iter()
            .map(|&name| {
                let store = shared.clone();
                thread::spawn(move || {
                    let me = Principal::from(name);
                    for i in 0..50 {
                        store
                            .with(|s| {
                                let r = s.add_record(&me, format!("r{}", i), "")?;
                                s.add_flashcard(&me, r, "q", "a")?;
                                if i % 3 == 0 {
                                    s.remove_record(&me, r)?;
                                }
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        shared
            .read(|s| {
                // 17 of every 50 iterations removed their record
                assert_eq!(s.record_count(), 4 * 33);
                assert_eq!(s.flashcard_count(), 4 * 33);
                assert!(s.verify().is_ok());
            })
            .unwrap();
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let shared = SharedStore::default();
        let clone = shared.clone();
        let _ = thread::spawn(move || {
            clone
                .with(|_| -> Result<()> { panic!("boom") })
                .unwrap();
        })
        .join();

        assert!(matches!(
            shared.read(|s| s.record_count()),
            Err(StoreError::LockPoisoned)
        ));
    }
}
