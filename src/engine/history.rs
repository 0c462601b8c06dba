//! Cross-session learner state: which words were already asked and which
//! were answered wrong.
//!
//! Both types are cheap handles around shared storage. Cloning a handle
//! shares the underlying set, so several sessions can point at the same
//! history. Every mutation is one locked insert or remove.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::deck::record::WordRecord;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ids already presented. Grows until explicitly reset.
#[derive(Clone, Debug, Default)]
pub struct AskedHistory {
    ids: Arc<Mutex<HashSet<u32>>>,
}

impl AskedHistory {
    pub fn register(&self, ids: impl IntoIterator<Item = u32>) {
        let mut set = lock(&self.ids);
        for id in ids {
            set.insert(id);
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        lock(&self.ids).contains(&id)
    }

    pub fn snapshot(&self) -> HashSet<u32> {
        lock(&self.ids).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.ids).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.ids).is_empty()
    }

    pub fn reset(&self) {
        lock(&self.ids).clear();
    }
}

/// Full records of every word answered wrong, unique by id, in the order
/// they were first missed.
#[derive(Clone, Debug, Default)]
pub struct MissedLedger {
    entries: Arc<Mutex<Vec<WordRecord>>>,
}

impl MissedLedger {
    /// Adds `record` unless its id is already present. Returns whether it
    /// was added.
    pub fn record(&self, record: &WordRecord) -> bool {
        let mut entries = lock(&self.entries);
        if entries.iter().any(|r| r.id == record.id) {
            return false;
        }
        entries.push(record.clone());
        true
    }

    /// Drops the entry for `id`. Returns whether one existed.
    pub fn remove(&self, id: u32) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|r| r.id != id);
        entries.len() != before
    }

    pub fn contains(&self, id: u32) -> bool {
        lock(&self.entries).iter().any(|r| r.id == id)
    }

    pub fn records(&self) -> Vec<WordRecord> {
        lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}
