//! Ledger key scheme.
//!
//! Records are addressed by plain string keys. Products and orders use a fixed
//! prefix followed by their sequence index in decimal (no padding); the three
//! counters live under well-known names.

use core::fmt;

/// One of the three sequence counters.
///
/// A counter holds the number of records of its kind created so far, which is
/// also the index the next record of that kind will be stored under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Counter {
    Products,
    Orders,
    Users,
}

impl Counter {
    /// Every counter, in seeding order.
    pub const ALL: [Counter; 3] = [Counter::Products, Counter::Orders, Counter::Users];

    /// The well-known ledger key holding this counter.
    pub fn key(self) -> &'static str {
        match self {
            Counter::Products => "productsLength",
            Counter::Orders => "ordersLength",
            Counter::Users => "usersLength",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Key of a counter-addressed record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    Product(u64),
    Order(u64),
}

impl LedgerKey {
    pub fn product(index: u64) -> Self {
        Self::Product(index)
    }

    pub fn order(index: u64) -> Self {
        Self::Order(index)
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerKey::Product(n) => write!(f, "product{n}"),
            LedgerKey::Order(n) => write!(f, "order{n}"),
        }
    }
}
