use serde::{Deserialize, Deserializer, Serialize};

use marketledger_core::{Price, Record};

/// Catalog entry, stored under `product<N>`.
///
/// The same layout is embedded by value in orders (see `marketledger-sales`),
/// so field names are part of the stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Caller-supplied external identifier (opaque).
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: String,
    pub price: Price,
    /// Current stock count.
    pub quantity: u64,
    /// Stock threshold below which replenishment is implied.
    pub critical: u64,
    /// Quantity currently on order. Only restocking logic changes it.
    #[serde(default)]
    pub provision: u64,
}

impl Product {
    /// Build a freshly created product (nothing on order yet).
    pub fn new(
        reference: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        quantity: u64,
        critical: u64,
    ) -> Self {
        Self {
            reference: reference.into(),
            description: description.into(),
            price,
            quantity,
            critical,
            provision: 0,
        }
    }
}

impl Record for Product {
    const KIND: &'static str = "product";
}

/// Product as embedded in an order, exactly as the caller described it.
///
/// Snapshots are not checked against the catalog, so decoding is lenient:
/// missing or `null` fields take their zero value and counts may be negative.
/// The field names match [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSnapshot {
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub critical: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub provision: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub reference: String,
    pub description: String,
    pub price: Price,
    pub quantity: u64,
    pub critical: u64,
}

impl CreateProduct {
    pub fn into_product(self) -> Product {
        Product::new(
            self.reference,
            self.description,
            self.price,
            self.quantity,
            self.critical,
        )
    }
}
