//! Sales domain module.
//!
//! Orders embed product snapshots by value and carry a caller-trusted total;
//! nothing in this crate looks at the live catalog.

pub mod order;

pub use order::{Order, OrderState, PlaceOrder};
