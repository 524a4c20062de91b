use std::sync::Arc;

use thiserror::Error;

use marketledger_core::ExpectedRevision;

/// Ledger operation error.
///
/// `NotFound` is kept distinct from `Io` so callers can tell "absent" apart
/// from "could not ask".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("key not found: {0}")]
    NotFound(String),

    /// A key read by the committing transaction was written by someone else
    /// in the meantime.
    #[error("write conflict on key: {0}")]
    Conflict(String),

    /// The ledger could not be read or written. `key` names the key (or, for
    /// a batch, the comma-separated write set) the failure happened at.
    #[error("ledger i/o failure on '{key}': {reason}")]
    Io { key: String, reason: String },
}

impl LedgerError {
    pub fn io(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Everything one transaction wants to publish.
///
/// `reads` carries what the transaction observed (for ledgers that validate
/// it); `writes` are applied in order, so a later write to the same key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    reads: Vec<(String, ExpectedRevision)>,
    writes: Vec<(String, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&mut self, key: impl Into<String>, revision: ExpectedRevision) {
        self.reads.push((key.into(), revision));
    }

    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.push((key.into(), value));
    }

    pub fn reads(&self) -> &[(String, ExpectedRevision)] {
        &self.reads
    }

    /// Keys written by this batch, comma-separated, in write order.
    pub fn write_keys(&self) -> String {
        let keys: Vec<&str> = self.writes.iter().map(|(key, _)| key.as_str()).collect();
        keys.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }
}

/// Transactional key-value ledger.
///
/// Only `get` and `put` are required. Implementations that track per-key
/// revisions should override `get_with_revision` and `commit_batch` so that
/// conflicting transactions are rejected instead of silently overwriting each
/// other; the defaults assume the platform serializes transactions itself.
pub trait Ledger: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError>;

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Read a key together with the revision to validate at commit time.
    ///
    /// Absent keys come back as `Ok((None, _))`, not as an error.
    fn get_with_revision(
        &self,
        key: &str,
    ) -> Result<(Option<Vec<u8>>, ExpectedRevision), LedgerError> {
        match self.get(key) {
            Ok(value) => Ok((Some(value), ExpectedRevision::Any)),
            Err(LedgerError::NotFound(_)) => Ok((None, ExpectedRevision::Any)),
            Err(e) => Err(e),
        }
    }

    /// Publish a batch. The default applies writes one by one and ignores
    /// the read set.
    fn commit_batch(&self, batch: WriteBatch) -> Result<(), LedgerError> {
        for (key, value) in batch.into_writes() {
            self.put(&key, value)?;
        }
        Ok(())
    }
}

impl<L> Ledger for Arc<L>
where
    L: Ledger + ?Sized,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn get_with_revision(
        &self,
        key: &str,
    ) -> Result<(Option<Vec<u8>>, ExpectedRevision), LedgerError> {
        (**self).get_with_revision(key)
    }

    fn commit_batch(&self, batch: WriteBatch) -> Result<(), LedgerError> {
        (**self).commit_batch(batch)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Bare get/put ledger relying entirely on the default methods.
    #[derive(Default)]
    struct PlainLedger(Mutex<HashMap<String, Vec<u8>>>);

    impl Ledger for PlainLedger {
        fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
            self.0
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| LedgerError::NotFound(key.to_string()))
        }

        fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn default_get_with_revision_maps_absence_to_none() {
        let ledger = PlainLedger::default();
        assert_eq!(
            ledger.get_with_revision("missing").unwrap(),
            (None, ExpectedRevision::Any)
        );
    }

    #[test]
    fn default_commit_applies_writes_in_order() {
        let ledger = Arc::new(PlainLedger::default());
        let mut batch = WriteBatch::new();
        batch.expect("ignored", ExpectedRevision::Exact(42));
        batch.put("k", b"first".to_vec());
        batch.put("k", b"second".to_vec());
        assert_eq!(batch.reads().len(), 1);
        assert_eq!(batch.write_keys(), "k,k");
        assert!(!batch.is_empty());

        ledger.commit_batch(batch).unwrap();
        assert_eq!(ledger.get("k").unwrap(), b"second");
    }
}
