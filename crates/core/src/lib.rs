//! `marketledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no ledger access): the record
//! codec, the ledger key scheme, value objects and the domain error model.

pub mod error;
pub mod key;
pub mod record;
pub mod revision;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use key::{Counter, LedgerKey};
pub use record::Record;
pub use revision::ExpectedRevision;
pub use value_object::Price;
