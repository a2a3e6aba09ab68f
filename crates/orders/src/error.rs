//! Domain-specific error types for order intake and the kitchen queue.
//! Input validation, missing targets and storage failures are kept apart so
//! the HTTP layer can map each to its own response.

use crate::OrderId;

/// Input rejected before anything touches the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Customer name is required")]
    MissingCustomerName,
    #[error("At least one item is required")]
    NoItems,
    #[error("Item #{position}: {reason}")]
    InvalidItem { position: usize, reason: ItemError },
}

/// Problems with a single line item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("description is required")]
    MissingDescription,
    #[error("cut is required")]
    MissingCut,
    #[error("unknown cut: '{0}'")]
    UnknownCut(String),
    #[error("seasoning is required")]
    MissingSeasoning,
    #[error("unknown seasoning: '{0}'")]
    UnknownSeasoning(String),
    #[error("grind count is required for ground cuts")]
    MissingGrindCount,
    #[error("grind count is not a number: '{0}'")]
    InvalidGrindCount(String),
    #[error("grind count must be between 1 and 10, got {0}")]
    GrindCountOutOfRange(i64),
}

/// Database persistence and stored-data corruption errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to encode or decode order items: {0}")]
    ItemsEncoding(#[from] serde_json::Error),
    #[error("Invalid order status in database: {0}")]
    InvalidStatus(String),
}

/// Errors from store operations that address an existing order.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),
    #[error("Order {order_id} has no item at index {index} (it has {len})")]
    ItemOutOfRange {
        order_id: OrderId,
        index: usize,
        len: usize,
    },
    #[error("Order persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(PersistenceError::Database(err))
    }
}

impl From<serde_json::Error> for OrderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(PersistenceError::ItemsEncoding(err))
    }
}
