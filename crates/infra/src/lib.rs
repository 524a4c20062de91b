//! Infrastructure layer: ledger boundary, sequencing, entity store and the
//! operation surface exposed to the ledger platform.

pub mod command;
pub mod command_dispatcher;
pub mod config;
pub mod entity_store;
pub mod initializer;
pub mod ledger;
pub mod sequence;


pub use command::{QueryCommand, WriteCommand};
pub use command_dispatcher::{DispatchError, OperationDispatcher, Phase};
pub use config::{ConfigError, MarketConfig, ReinitPolicy};
pub use entity_store::{EntityStore, Receipt};
pub use initializer::{InitOutcome, Initializer};
pub use ledger::{InMemoryLedger, Ledger, LedgerError, LedgerTransaction};
pub use sequence::{Reservation, SequenceAllocator};
