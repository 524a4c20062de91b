use serde::{Deserialize, Serialize};

use marketledger_core::{DomainError, Price, Record};
use marketledger_products::ProductSnapshot;

/// Order status, stored as a small integer.
///
/// Only `Placed` is produced today; fulfilment states are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderState {
    Placed,
}

impl From<OrderState> for u8 {
    fn from(value: OrderState) -> Self {
        match value {
            OrderState::Placed => 1,
        }
    }
}

impl TryFrom<u8> for OrderState {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OrderState::Placed),
            other => Err(DomainError::malformed(format!("unknown order state {other}"))),
        }
    }
}

/// Customer order, stored under `order<N>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Decimal form of the order's own sequence index.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Whatever was stored under the referenced user key.
    pub user: String,
    /// Snapshots supplied by the caller, not references to `product<N>` keys.
    pub products: Vec<ProductSnapshot>,
    /// Parallel to `products`; the lengths are not required to match.
    pub quantities: Vec<i64>,
    #[serde(rename = "totalprice")]
    pub total_price: Price,
    #[serde(rename = "trackingid")]
    pub tracking_id: String,
    pub state: OrderState,
}

impl Record for Order {
    const KIND: &'static str = "order";
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrder {
    /// Raw ledger key of the ordering user (`login@password`).
    pub user_key: String,
    pub products: Vec<ProductSnapshot>,
    pub quantities: Vec<i64>,
    pub total_price: Price,
}

impl PlaceOrder {
    /// Build the order stored at `index` for a user whose record holds `user`.
    pub fn into_order(self, index: u64, user: impl Into<String>) -> Order {
        Order {
            reference: index.to_string(),
            user: user.into(),
            products: self.products,
            quantities: self.quantities,
            total_price: self.total_price,
            tracking_id: String::new(),
            state: OrderState::Placed,
        }
    }
}
