//! # Collaborator Interfaces
//!
//! The workflow talks to storage only through the traits in this module:
//!
//! - [`CustomerDirectory`] resolves customers.
//! - [`StockCatalog`] reads stock snapshots.
//! - [`OrderLedger`] looks up stored orders.
//! - [`UnitOfWork`] opens an [`OrderTransaction`], the atomic boundary in which
//!   stock is decremented and the order is stored.
//!
//! Two families of implementations exist: the actor clients in
//! [`crate::clients`] together with [`ActorUnitOfWork`], and
//! [`SqliteStore`](crate::sqlite::SqliteStore).

pub mod actor;

pub use actor::{ActorTransaction, ActorUnitOfWork};

use crate::model::{Customer, CustomerId, NewOrder, Order, OrderId, ProductId, QuantityUpdate, StockItem};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by storage collaborators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The stock changed since it was read and no longer covers the decrement.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Looks up customers.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;
}

/// Read side of the product catalog.
#[async_trait]
pub trait StockCatalog: Send + Sync {
    /// Returns the stock items among `ids` that exist. Unknown ids are simply
    /// left out; callers detect them by comparing counts.
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<StockItem>, StoreError>;
}

/// Read side of the order store.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

/// Opens atomic boundaries.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError>;
}

/// Stock decrement and order persistence that become visible together or not
/// at all.
///
/// Dropping a transaction without calling [`commit`](Self::commit) undoes
/// whatever it did.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Applies every update, each one only if the current stock still covers
    /// its `decrement()`. After an error the transaction is only good for
    /// [`rollback`](Self::rollback).
    async fn update_quantities(&mut self, updates: &[QuantityUpdate]) -> Result<(), StoreError>;

    /// Stores the order and returns it with its assigned id.
    async fn create_order(&mut self, order: NewOrder) -> Result<Order, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
