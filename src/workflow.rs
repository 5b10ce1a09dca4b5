//! # Order Creation Workflow
//!
//! Turns a [`CreateOrder`] request into a stored [`Order`]:
//!
//! ```text
//! validate_request -> CustomerDirectory -> StockCatalog -> validate_stock
//!     -> plan_decrements -> begin -> update_quantities -> create_order -> commit
//! ```
//!
//! Nothing is mutated before `begin`. Every failure after it rolls the
//! transaction back, so a request either decrements stock *and* stores the order
//! or changes nothing. The store re-checks each decrement when applying it,
//! which keeps concurrent requests from overselling even though they may all
//! have validated against the same snapshot.

use crate::error::{OrderError, Shortage};
use crate::model::{CreateOrder, NewOrder, Order, OrderId};
use crate::store::{CustomerDirectory, OrderLedger, StockCatalog, StoreError, UnitOfWork};
use crate::validation::{plan_decrements, requested_ids, validate_request, validate_stock};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Orchestrates order creation over injected collaborators.
#[derive(Clone)]
pub struct OrderWorkflow {
    customers: Arc<dyn CustomerDirectory>,
    catalog: Arc<dyn StockCatalog>,
    ledger: Arc<dyn OrderLedger>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl OrderWorkflow {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        catalog: Arc<dyn StockCatalog>,
        ledger: Arc<dyn OrderLedger>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            customers,
            catalog,
            ledger,
            unit_of_work,
        }
    }

    /// Wires every collaborator to one store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CustomerDirectory + StockCatalog + OrderLedger + UnitOfWork + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Creates an order, decrementing stock for every line.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyOrder`], [`OrderError::InvalidQuantity`],
    ///   [`OrderError::DuplicateProduct`] for malformed requests.
    /// - [`OrderError::CustomerNotFound`] if the customer does not exist.
    /// - [`OrderError::ProductNotFound`] if any product does not exist.
    /// - [`OrderError::InsufficientStock`] if any line exceeds the stock, either
    ///   at validation time or when the decrement is applied.
    /// - [`OrderError::TransactionFailed`] if the store could not complete the
    ///   transaction.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, lines = request.lines.len()))]
    pub async fn create_order(&self, request: CreateOrder) -> Result<Order, OrderError> {
        debug!(?request, "create_order called");
        validate_request(&request.lines)?;

        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await
            .map_err(read_error)?
            .ok_or_else(|| {
                warn!("Customer not found");
                OrderError::CustomerNotFound(request.customer_id)
            })?;

        let ids = requested_ids(&request.lines);
        let stock = self.catalog.find_all_by_id(&ids).await.map_err(read_error)?;
        let lines = validate_stock(&request.lines, &stock).inspect_err(|e| {
            warn!(error = %e, "Stock validation failed");
        })?;
        let updates = plan_decrements(&stock, &request.lines);

        let mut tx = self.unit_of_work.begin().await.map_err(write_error)?;
        let draft = NewOrder { customer, lines };
        let applied: Result<Order, StoreError> = async {
            tx.update_quantities(&updates).await?;
            tx.create_order(draft).await
        }
        .await;
        let order = match applied {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Rolling back");
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                return Err(write_error(e));
            }
        };
        tx.commit().await.map_err(write_error)?;

        info!(order_id = %order.id, total = %order.total(), "Order created");
        Ok(order)
    }

    /// Looks up a stored order.
    #[instrument(skip(self))]
    pub async fn find_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.ledger
            .find_by_id(id)
            .await
            .map_err(read_error)?
            .ok_or(OrderError::OrderNotFound(id))
    }
}

fn read_error(e: StoreError) -> OrderError {
    OrderError::StorageError(e.to_string())
}

/// Errors raised inside the transaction. A decrement refused because stock
/// moved since validation is still a shortage to the caller.
fn write_error(e: StoreError) -> OrderError {
    match e {
        StoreError::InsufficientStock {
            product_id,
            requested,
            available,
        } => OrderError::InsufficientStock {
            shortages: vec![Shortage {
                product_id,
                requested,
                available,
            }],
        },
        StoreError::UnknownProduct(id) => OrderError::ProductNotFound { missing: vec![id] },
        StoreError::Backend(msg) => OrderError::TransactionFailed(msg),
    }
}
