use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use marketledger_core::ExpectedRevision;

use super::r#trait::{Ledger, LedgerError, WriteBatch};

#[derive(Debug, Default)]
struct Staged {
    /// First revision observed per key read from the underlying ledger.
    reads: BTreeMap<String, ExpectedRevision>,
    /// Pending writes in program order.
    writes: Vec<(String, Vec<u8>)>,
}

/// One operation's view of the ledger.
///
/// Reads go through to the underlying ledger (or see this transaction's own
/// pending writes); writes are staged and only become visible to others on
/// [`commit`](Self::commit). Dropping the transaction discards them.
#[derive(Debug)]
pub struct LedgerTransaction<'a, L: ?Sized> {
    ledger: &'a L,
    staged: Mutex<Staged>,
}

impl<'a, L> LedgerTransaction<'a, L>
where
    L: Ledger + ?Sized,
{
    pub fn begin(ledger: &'a L) -> Self {
        Self {
            ledger,
            staged: Mutex::new(Staged::default()),
        }
    }

    pub fn pending_writes(&self) -> usize {
        self.staged.lock().map(|s| s.writes.len()).unwrap_or(0)
    }

    /// Publish every staged write in one batch, along with the read set.
    ///
    /// Returns the number of writes published.
    pub fn commit(self) -> Result<usize, LedgerError> {
        let poisoned = self.staged.is_poisoned();
        let staged = self
            .staged
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let count = staged.writes.len();
        let mut batch = WriteBatch::new();
        for (key, revision) in staged.reads {
            batch.expect(key, revision);
        }
        for (key, value) in staged.writes {
            batch.put(key, value);
        }

        if poisoned {
            return Err(LedgerError::io(batch.write_keys(), "lock poisoned"));
        }
        if batch.is_empty() {
            return Ok(0);
        }

        self.ledger.commit_batch(batch)?;
        Ok(count)
    }
}

impl<L> Ledger for LedgerTransaction<'_, L>
where
    L: Ledger + ?Sized,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| LedgerError::io(key, "lock poisoned"))?;

        if let Some((_, value)) = staged.writes.iter().rev().find(|(k, _)| k == key) {
            return Ok(value.clone());
        }

        let (value, revision) = self.ledger.get_with_revision(key)?;
        staged.reads.entry(key.to_string()).or_insert(revision);
        value.ok_or_else(|| LedgerError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| LedgerError::io(key, "lock poisoned"))?;

        staged.writes.push((key.to_string(), value));
        Ok(())
    }
}
