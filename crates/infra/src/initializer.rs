//! First-time setup: seeding the record counters.

use marketledger_core::Counter;

use crate::command_dispatcher::DispatchError;
use crate::config::ReinitPolicy;
use crate::ledger::{Ledger, LedgerError};

/// What `Initializer::run` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// No counter existed; all three were seeded to zero.
    Seeded,
    /// Counters existed and were reset to zero (`ReinitPolicy::Reset`).
    Reset,
}

/// Seeds `productsLength`, `ordersLength` and `usersLength` to `"0"`.
#[derive(Debug)]
pub struct Initializer<'a, L: ?Sized> {
    ledger: &'a L,
    policy: ReinitPolicy,
}

impl<'a, L> Initializer<'a, L>
where
    L: Ledger + ?Sized,
{
    pub fn new(ledger: &'a L, policy: ReinitPolicy) -> Self {
        Self { ledger, policy }
    }

    pub fn run(&self) -> Result<InitOutcome, DispatchError> {
        let existing = self.first_existing_counter()?;

        let outcome = match (existing, self.policy) {
            (None, _) => InitOutcome::Seeded,
            (Some(counter), ReinitPolicy::Refuse) => {
                return Err(DispatchError::AlreadyInitialized { key: counter.key() });
            }
            (Some(_), ReinitPolicy::Reset) => {
                tracing::warn!(
                    "resetting counters; existing records become unreachable by index"
                );
                InitOutcome::Reset
            }
        };

        for counter in Counter::ALL {
            self.ledger.put(counter.key(), b"0".to_vec())?;
        }

        Ok(outcome)
    }

    fn first_existing_counter(&self) -> Result<Option<Counter>, DispatchError> {
        for counter in Counter::ALL {
            match self.ledger.get(counter.key()) {
                Ok(_) => return Ok(Some(counter)),
                Err(LedgerError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    #[test]
    fn seeds_all_counters_to_zero() {
        let ledger = InMemoryLedger::new();
        let outcome = Initializer::new(&ledger, ReinitPolicy::Refuse).run().unwrap();

        assert_eq!(outcome, InitOutcome::Seeded);
        for counter in Counter::ALL {
            assert_eq!(ledger.get(counter.key()).unwrap(), b"0");
        }
    }

    #[test]
    fn refuse_policy_keeps_existing_counters() {
        let ledger = InMemoryLedger::new();
        Initializer::new(&ledger, ReinitPolicy::Refuse).run().unwrap();
        ledger.put("ordersLength", b"3".to_vec()).unwrap();

        let err = Initializer::new(&ledger, ReinitPolicy::Refuse).run().unwrap_err();
        assert_eq!(err, DispatchError::AlreadyInitialized { key: "productsLength" });
        assert_eq!(ledger.get("ordersLength").unwrap(), b"3");
    }

    #[test]
    fn refuse_policy_detects_partial_seed() {
        let ledger = InMemoryLedger::new();
        ledger.put("usersLength", b"1".to_vec()).unwrap();

        let err = Initializer::new(&ledger, ReinitPolicy::Refuse).run().unwrap_err();
        assert_eq!(err, DispatchError::AlreadyInitialized { key: "usersLength" });
        assert!(!ledger.contains_key("productsLength"));
    }

    #[test]
    fn reset_policy_zeroes_counters() {
        let ledger = InMemoryLedger::new();
        ledger.put("productsLength", b"7".to_vec()).unwrap();

        let outcome = Initializer::new(&ledger, ReinitPolicy::Reset).run().unwrap();
        assert_eq!(outcome, InitOutcome::Reset);
        assert_eq!(ledger.get("productsLength").unwrap(), b"0");
        assert_eq!(ledger.get("usersLength").unwrap(), b"0");
    }
}
