//! Transactional key-value ledger boundary.
//!
//! The real ledger (replication, consensus, ordering) lives outside this
//! workspace. This module defines the narrow surface the marketplace needs from
//! it, an in-memory implementation for tests/dev, and a transaction overlay
//! that stages one operation's writes and publishes them in a single commit.

pub mod in_memory;
pub mod r#trait;
pub mod transaction;

pub use in_memory::InMemoryLedger;
pub use r#trait::{Ledger, LedgerError, WriteBatch};
pub use transaction::LedgerTransaction;
