//! Sequence allocation on top of plain ledger keys.
//!
//! The ledger has no atomic counter primitive, so each counter is a decimal
//! string under a well-known key. Allocation is split in two steps:
//!
//! ```text
//! peek_next(counter) -> Reservation { index = current value }
//!   ... caller writes the record at `index` ...
//! reservation.commit() -> writes index + 1
//! ```
//!
//! Nothing here locks or retries. Two transactions that peek the same value
//! will both try to write the same record key; whether that is detected is up
//! to the ledger the allocator runs against (see `InMemoryLedger::commit_batch`).

use marketledger_core::Counter;

use crate::command_dispatcher::DispatchError;
use crate::ledger::{Ledger, LedgerError};

/// Reads and advances the three record counters.
#[derive(Debug)]
pub struct SequenceAllocator<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L> SequenceAllocator<'a, L>
where
    L: Ledger + ?Sized,
{
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Current value of a counter (the number of records created so far).
    pub fn current(&self, counter: Counter) -> Result<u64, DispatchError> {
        let bytes = match self.ledger.get(counter.key()) {
            Ok(bytes) => bytes,
            Err(LedgerError::NotFound(_)) => {
                return Err(DispatchError::UninitializedCounter { key: counter.key() });
            }
            Err(e) => return Err(e.into()),
        };

        parse_counter(&bytes).ok_or_else(|| DispatchError::MalformedRecord {
            key: counter.key().to_string(),
            reason: format!(
                "counter value '{}' is not a decimal number",
                String::from_utf8_lossy(&bytes)
            ),
        })
    }

    /// Reserve the next index of a counter without advancing it yet.
    pub fn peek_next(&self, counter: Counter) -> Result<Reservation<'a, L>, DispatchError> {
        let index = self.current(counter)?;
        Ok(Reservation {
            ledger: self.ledger,
            counter,
            index,
        })
    }
}

/// An index handed out by [`SequenceAllocator::peek_next`].
#[must_use = "the counter only advances when the reservation is committed"]
#[derive(Debug)]
pub struct Reservation<'a, L: ?Sized> {
    ledger: &'a L,
    counter: Counter,
    index: u64,
}

impl<L> Reservation<'_, L>
where
    L: Ledger + ?Sized,
{
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Advance the counter past the reserved index. Returns the new value.
    pub fn commit(self) -> Result<u64, DispatchError> {
        let next = self
            .index
            .checked_add(1)
            .ok_or_else(|| DispatchError::MalformedRecord {
                key: self.counter.key().to_string(),
                reason: "counter overflow".to_string(),
            })?;

        self.ledger
            .put(self.counter.key(), next.to_string().into_bytes())?;
        tracing::debug!(counter = self.counter.key(), value = next, "counter advanced");
        Ok(next)
    }
}

/// Counters are stored as their plain decimal form ("0", "1", ...).
fn parse_counter(bytes: &[u8]) -> Option<u64> {
    let text = core::str::from_utf8(bytes).ok()?;
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
