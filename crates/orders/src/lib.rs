use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod error;
pub mod item;
pub mod order;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use error::{ItemError, OrderError, PersistenceError, ValidationError};
pub use item::{Cut, GrindCount, GrindCountInput, Item, ItemDraft, Seasoning};
pub use order::{ItemRemoval, NewOrder, Order, OrderDraft, OrderStatus};

/// Row id of an order, assigned by the database in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
