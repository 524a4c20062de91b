use std::collections::HashMap;
use std::sync::RwLock;

use marketledger_core::ExpectedRevision;

use super::r#trait::{Ledger, LedgerError, WriteBatch};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    /// Bumped on every write to the key; starts at 1.
    revision: u64,
}

/// In-memory ledger with per-key revisions.
///
/// Intended for tests/dev. `commit_batch` validates the batch's read set and applies
/// all writes under one lock, so a batch is published entirely or not at all.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|m| m.contains_key(key))
            .unwrap_or(false)
    }

    fn write_entry(entries: &mut HashMap<String, Entry>, key: String, value: Vec<u8>) {
        let entry = entries.entry(key).or_insert(Entry {
            value: Vec::new(),
            revision: 0,
        });
        entry.value = value;
        entry.revision += 1;
    }
}

impl Ledger for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::io(key, "lock poisoned"))?;

        entries
            .get(key)
            .map(|e| e.value.clone())
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::io(key, "lock poisoned"))?;

        Self::write_entry(&mut entries, key.to_string(), value);
        Ok(())
    }

    fn get_with_revision(
        &self,
        key: &str,
    ) -> Result<(Option<Vec<u8>>, ExpectedRevision), LedgerError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LedgerError::io(key, "lock poisoned"))?;

        Ok(match entries.get(key) {
            Some(e) => (Some(e.value.clone()), ExpectedRevision::Exact(e.revision)),
            None => (None, ExpectedRevision::Absent),
        })
    }

    fn commit_batch(&self, batch: WriteBatch) -> Result<(), LedgerError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LedgerError::io(batch.write_keys(), "lock poisoned"))?;

        // Validate the whole read set before touching anything.
        for (key, expected) in batch.reads() {
            let actual = entries.get(key).map(|e| e.revision);
            if !expected.matches(actual) {
                return Err(LedgerError::Conflict(key.clone()));
            }
        }

        for (key, value) in batch.into_writes() {
            Self::write_entry(&mut entries, key, value);
        }

        Ok(())
    }
}
