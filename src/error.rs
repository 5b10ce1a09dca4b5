//! Errors returned by the order workflow.

use crate::model::{CustomerId, OrderId, ProductId};
use std::fmt::{self, Display};
use thiserror::Error;

/// A requested line that the stock cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortage {
    pub product_id: ProductId,
    pub requested: u32,
    pub available: u32,
}

impl Display for Shortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (requested {}, available {})",
            self.product_id, self.requested, self.available
        )
    }
}

/// Errors that can occur while creating or looking up an order.
///
/// Every variant means nothing was changed: no stock was decremented and no
/// order was stored.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// `missing` lists the requested ids absent from the catalog snapshot.
    #[error("One or more products does not exist: {}", join(.missing))]
    ProductNotFound { missing: Vec<ProductId> },

    /// One entry per line the stock cannot cover.
    #[error("One or more products are not available in the requested quantity: {}", join(.shortages))]
    InsufficientStock { shortages: Vec<Shortage> },

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Order has no lines")]
    EmptyOrder,

    #[error("Quantity must be positive for {0}")]
    InvalidQuantity(ProductId),

    #[error("Product requested more than once: {0}")]
    DuplicateProduct(ProductId),

    /// The catalog answered with a product nobody asked for.
    #[error("Catalog returned unrequested product: {0}")]
    CatalogMismatch(ProductId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Storage error: {0}")]
    StorageError(String),
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
