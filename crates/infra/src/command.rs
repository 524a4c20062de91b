//! Named operations and their typed arguments.
//!
//! The platform invokes operations by name with positional string arguments.
//! Each name maps to one variant here; arity and argument types are checked
//! once, while parsing, before anything touches the ledger.

use serde::de::DeserializeOwned;

use marketledger_auth::RegisterUser;
use marketledger_core::Price;
use marketledger_products::CreateProduct;
use marketledger_sales::PlaceOrder;

use crate::command_dispatcher::{DispatchError, Phase};

/// A state-changing operation (the `invoke` phase).
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCommand {
    AddProduct(CreateProduct),
    AddOrder(PlaceOrder),
    AddUser(RegisterUser),
}

/// A read-only operation (the `query` phase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCommand {
    Read { key: String },
}

impl WriteCommand {
    pub const ADD_PRODUCT: &'static str = "addProduct";
    pub const ADD_ORDER: &'static str = "addOrder";
    pub const ADD_USER: &'static str = "addUser";

    pub fn name(&self) -> &'static str {
        match self {
            WriteCommand::AddProduct(_) => Self::ADD_PRODUCT,
            WriteCommand::AddOrder(_) => Self::ADD_ORDER,
            WriteCommand::AddUser(_) => Self::ADD_USER,
        }
    }

    pub fn parse(function: &str, args: &[String]) -> Result<Self, DispatchError> {
        match function {
            Self::ADD_PRODUCT => {
                let [reference, description, price, quantity, critical] =
                    positional::<5>(Self::ADD_PRODUCT, args)?;
                let op = Self::ADD_PRODUCT;
                Ok(WriteCommand::AddProduct(CreateProduct {
                    reference: reference.clone(),
                    description: description.clone(),
                    price: parse_price(op, 2, "price", price)?,
                    quantity: parse_count(op, 3, "quantity", quantity)?,
                    critical: parse_count(op, 4, "critical", critical)?,
                }))
            }
            Self::ADD_ORDER => {
                let [user_key, products, quantities, total_price] =
                    positional::<4>(Self::ADD_ORDER, args)?;
                let op = Self::ADD_ORDER;
                Ok(WriteCommand::AddOrder(PlaceOrder {
                    user_key: user_key.clone(),
                    products: parse_json_list(op, 1, "products", products)?,
                    quantities: parse_json_list(op, 2, "quantities", quantities)?,
                    total_price: parse_price(op, 3, "totalPrice", total_price)?,
                }))
            }
            Self::ADD_USER => {
                let [login, password, hash] = positional::<3>(Self::ADD_USER, args)?;
                Ok(WriteCommand::AddUser(RegisterUser {
                    login: login.clone(),
                    password: password.clone(),
                    hash: hash.clone(),
                }))
            }
            other => Err(DispatchError::UnknownOperation {
                phase: Phase::Invoke,
                name: other.to_string(),
            }),
        }
    }
}

impl QueryCommand {
    pub const READ: &'static str = "read";

    pub fn name(&self) -> &'static str {
        match self {
            QueryCommand::Read { .. } => Self::READ,
        }
    }

    pub fn parse(function: &str, args: &[String]) -> Result<Self, DispatchError> {
        match function {
            Self::READ => {
                let [key] = positional::<1>(Self::READ, args)?;
                Ok(QueryCommand::Read { key: key.clone() })
            }
            other => Err(DispatchError::UnknownOperation {
                phase: Phase::Query,
                name: other.to_string(),
            }),
        }
    }
}

/// Check the argument count and hand the arguments back as a fixed array.
pub(crate) fn positional<'a, const N: usize>(
    operation: &'static str,
    args: &'a [String],
) -> Result<&'a [String; N], DispatchError> {
    args.try_into().map_err(|_| DispatchError::Arity {
        operation,
        expected: N,
        actual: args.len(),
    })
}

fn parse_price(
    operation: &'static str,
    index: usize,
    name: &'static str,
    text: &str,
) -> Result<Price, DispatchError> {
    text.parse::<Price>()
        .map_err(|e| DispatchError::invalid_argument(operation, index, name, e.to_string()))
}

fn parse_count(
    operation: &'static str,
    index: usize,
    name: &'static str,
    text: &str,
) -> Result<u64, DispatchError> {
    text.parse::<u64>().map_err(|e| {
        DispatchError::invalid_argument(
            operation,
            index,
            name,
            format!("'{text}' is not a non-negative integer: {e}"),
        )
    })
}

/// A JSON array argument; `null` stands for an empty list.
fn parse_json_list<T: DeserializeOwned>(
    operation: &'static str,
    index: usize,
    name: &'static str,
    text: &str,
) -> Result<Vec<T>, DispatchError> {
    serde_json::from_str::<Option<Vec<T>>>(text)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            DispatchError::invalid_argument(operation, index, name, format!("malformed JSON: {e}"))
        })
}
