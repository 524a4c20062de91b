//! Products domain module.
//!
//! This crate contains the catalog record, the command that creates it and the
//! snapshot layout orders embed, implemented purely as deterministic domain
//! logic (no ledger access).

pub mod product;

pub use product::{CreateProduct, Product, ProductSnapshot};
