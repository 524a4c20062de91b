//! Per-entity create/read logic over the ledger.
//!
//! Every create follows the same shape:
//!
//! ```text
//! read counter -> build record at index -> put record -> advance counter
//! ```
//!
//! The store performs no rollback of its own. It is meant to run against a
//! [`LedgerTransaction`](crate::ledger::LedgerTransaction) so that a failure
//! part-way through publishes nothing.

use marketledger_auth::RegisterUser;
use marketledger_core::{Counter, LedgerKey, Record};
use marketledger_products::{CreateProduct, Product};
use marketledger_sales::{Order, PlaceOrder};

use crate::command_dispatcher::DispatchError;
use crate::ledger::{Ledger, LedgerError};
use crate::sequence::SequenceAllocator;

/// What a successful create wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Ledger key of the new record.
    pub key: String,
    /// Counter value the record was created at.
    pub index: u64,
}

/// Create/read operations for products, users and orders.
#[derive(Debug)]
pub struct EntityStore<'a, L: ?Sized> {
    ledger: &'a L,
}

impl<'a, L> EntityStore<'a, L>
where
    L: Ledger + ?Sized,
{
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    fn sequences(&self) -> SequenceAllocator<'a, L> {
        SequenceAllocator::new(self.ledger)
    }

    pub fn create_product(&self, cmd: CreateProduct) -> Result<Receipt, DispatchError> {
        let reservation = self.sequences().peek_next(Counter::Products)?;
        let index = reservation.index();
        let key = LedgerKey::product(index).to_string();

        let product = cmd.into_product();
        self.write_record(&key, &product)?;
        reservation.commit()?;

        Ok(Receipt { key, index })
    }

    /// Store a user's hash under `login@password`.
    ///
    /// The users counter only tracks how many registrations happened; it does
    /// not appear in the key. Registering the same credentials twice replaces
    /// the stored hash and still advances the counter.
    pub fn create_user(&self, cmd: RegisterUser) -> Result<Receipt, DispatchError> {
        let reservation = self.sequences().peek_next(Counter::Users)?;
        let index = reservation.index();
        let key = cmd.key().to_string();

        self.write_record(&key, &cmd.record())?;
        reservation.commit()?;

        Ok(Receipt { key, index })
    }

    /// Place an order for the user stored under `cmd.user_key`.
    ///
    /// Whatever bytes that key holds become the order's `user` field; products
    /// are embedded as given and the total is not recomputed.
    pub fn create_order(&self, cmd: PlaceOrder) -> Result<Receipt, DispatchError> {
        let user = match self.ledger.get(&cmd.user_key) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(LedgerError::NotFound(_)) => {
                return Err(DispatchError::UnknownUser { key: cmd.user_key });
            }
            Err(e) => return Err(e.into()),
        };

        let reservation = self.sequences().peek_next(Counter::Orders)?;
        let index = reservation.index();
        let key = LedgerKey::order(index).to_string();

        let order = cmd.into_order(index, user);
        self.write_record(&key, &order)?;
        reservation.commit()?;

        Ok(Receipt { key, index })
    }

    /// Raw lookup. The caller knows what kind of record the key holds.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, DispatchError> {
        Ok(self.ledger.get(key)?)
    }

    pub fn product(&self, index: u64) -> Result<Product, DispatchError> {
        self.read_record(&LedgerKey::product(index).to_string())
    }

    pub fn order(&self, index: u64) -> Result<Order, DispatchError> {
        self.read_record(&LedgerKey::order(index).to_string())
    }

    /// Number of records of a kind created since the last seed.
    pub fn count(&self, counter: Counter) -> Result<u64, DispatchError> {
        self.sequences().current(counter)
    }

    fn read_record<R: Record>(&self, key: &str) -> Result<R, DispatchError> {
        let bytes = self.read(key)?;
        R::decode(&bytes).map_err(|e| DispatchError::from_domain(key, e))
    }

    fn write_record<R: Record>(&self, key: &str, record: &R) -> Result<(), DispatchError> {
        let bytes = record
            .encode()
            .map_err(|e| DispatchError::from_domain(key, e))?;
        self.ledger.put(key, bytes)?;
        Ok(())
    }
}
