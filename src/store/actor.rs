//! # Actor-backed Unit of Work
//!
//! The actors have no shared transaction, so the atomic boundary is built from
//! compensating actions:
//!
//! 1. `update_quantities` sends one `ReserveStock` per product. Each reservation
//!    is an atomic conditional decrement inside the product actor.
//! 2. If any reservation fails, the ones already granted are released before
//!    the error is returned.
//! 3. `create_order` stores the order. That is the commit point: from then on
//!    the reservations are final.
//! 4. `rollback`, or dropping the transaction before the order was stored,
//!    releases every outstanding reservation.
//!
//! The reservations live in a task spawned by `begin`, not in the
//! [`ActorTransaction`] handle. A step that reached the task runs to completion
//! even if its caller stops waiting. Leftover reservations are released only
//! after the handle is gone and no step is in flight.

use super::{OrderTransaction, StoreError, UnitOfWork};
use crate::clients::{OrderClient, ProductClient};
use crate::model::{NewOrder, Order, ProductId, QuantityUpdate};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

/// Opens [`ActorTransaction`]s over the product and order actors.
#[derive(Clone)]
pub struct ActorUnitOfWork {
    products: ProductClient,
    orders: OrderClient,
}

impl ActorUnitOfWork {
    pub fn new(products: ProductClient, orders: OrderClient) -> Self {
        Self { products, orders }
    }
}

#[async_trait]
impl UnitOfWork for ActorUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn OrderTransaction>, StoreError> {
        Ok(Box::new(ActorTransaction::start(
            self.products.clone(),
            self.orders.clone(),
        )))
    }
}

type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

enum Step {
    Reserve {
        updates: Vec<QuantityUpdate>,
        respond_to: Reply<()>,
    },
    Store {
        order: NewOrder,
        respond_to: Reply<Order>,
    },
    Commit {
        respond_to: Reply<()>,
    },
    Release {
        respond_to: Reply<()>,
    },
}

/// Owns the stock reserved so far and hands it back unless an order was stored.
struct Reservations {
    products: ProductClient,
    orders: OrderClient,
    reserved: Vec<(ProductId, u32)>,
    receiver: mpsc::Receiver<Step>,
}

impl Reservations {
    async fn run(mut self) {
        while let Some(step) = self.receiver.recv().await {
            match step {
                Step::Reserve {
                    updates,
                    respond_to,
                } => {
                    let result = self.reserve(&updates).await;
                    let _ = respond_to.send(result);
                }
                Step::Store { order, respond_to } => {
                    let result = self.store(order).await;
                    let _ = respond_to.send(result);
                }
                Step::Commit { respond_to } => {
                    let result = self.commit().await;
                    let _ = respond_to.send(result);
                }
                Step::Release { respond_to } => {
                    let result = self.release_all().await;
                    let _ = respond_to.send(result);
                }
            }
        }

        if !self.reserved.is_empty() {
            warn!(
                count = self.reserved.len(),
                "Transaction dropped with reservations outstanding"
            );
            // release_all logs its own failures.
            let _ = self.release_all().await;
        }
    }

    async fn reserve(&mut self, updates: &[QuantityUpdate]) -> Result<(), StoreError> {
        for update in updates {
            let units = update.decrement();
            if units == 0 {
                continue;
            }
            match self.products.reserve_stock(update.product_id, units).await {
                Ok(left) => {
                    debug!(product_id = %update.product_id, units, left, "Reserved");
                    self.reserved.push((update.product_id, units));
                }
                Err(e) => {
                    warn!(product_id = %update.product_id, units, error = %e, "Reservation refused");
                    let _ = self.release_all().await;
                    return Err(store_error(update.product_id, e));
                }
            }
        }
        Ok(())
    }

    async fn store(&mut self, order: NewOrder) -> Result<Order, StoreError> {
        let order = self
            .orders
            .store_order(order)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.reserved.clear();
        Ok(order)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if self.reserved.is_empty() {
            return Ok(());
        }
        // Reservations without a stored order cannot be committed.
        self.release_all().await?;
        Err(StoreError::Backend("commit without a stored order".into()))
    }

    async fn release_all(&mut self) -> Result<(), StoreError> {
        let mut first_failure = None;
        for (product_id, units) in self.reserved.drain(..) {
            if let Err(e) = self.products.release_stock(product_id, units).await {
                error!(%product_id, units, error = %e, "Failed to release reserved stock");
                first_failure.get_or_insert(StoreError::Backend(e.to_string()));
            }
        }
        first_failure.map_or(Ok(()), Err)
    }
}

fn store_error(product_id: ProductId, err: ProductError) -> StoreError {
    match err {
        ProductError::InsufficientStock {
            requested,
            available,
        } => StoreError::InsufficientStock {
            product_id,
            requested,
            available,
        },
        ProductError::NotFound(_) => StoreError::UnknownProduct(product_id),
        other => StoreError::Backend(other.to_string()),
    }
}

/// Handle to one unit of work. Dropping it without committing or rolling back
/// releases whatever stock is still reserved.
pub struct ActorTransaction {
    sender: mpsc::Sender<Step>,
}

impl ActorTransaction {
    /// Spawns the task that owns the reservations. Must be called from within a
    /// tokio runtime.
    pub fn start(products: ProductClient, orders: OrderClient) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        let reservations = Reservations {
            products,
            orders,
            reserved: Vec::new(),
            receiver,
        };
        tokio::spawn(reservations.run());
        Self { sender }
    }

    async fn request<T>(&self, step: impl FnOnce(Reply<T>) -> Step) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(step(respond_to))
            .await
            .map_err(|_| StoreError::Backend("transaction task stopped".into()))?;
        response
            .await
            .map_err(|_| StoreError::Backend("transaction task dropped the reply".into()))?
    }
}

#[async_trait]
impl OrderTransaction for ActorTransaction {
    async fn update_quantities(&mut self, updates: &[QuantityUpdate]) -> Result<(), StoreError> {
        let updates = updates.to_vec();
        self.request(|respond_to| Step::Reserve {
            updates,
            respond_to,
        })
        .await
    }

    async fn create_order(&mut self, order: NewOrder) -> Result<Order, StoreError> {
        self.request(|respond_to| Step::Store { order, respond_to })
            .await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.request(|respond_to| Step::Commit { respond_to }).await
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.request(|respond_to| Step::Release { respond_to }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, CustomerId, OrderId, OrderLine, ProductCreate};
    use crate::store::OrderLedger;
    use crate::{order_actor, product_actor};
    use rust_decimal::Decimal;
    use std::time::Duration;

    async fn setup(stock: &[u32]) -> (ProductClient, OrderClient, Vec<ProductId>) {
        let (product_actor, product_client) = product_actor::new(32);
        let (order_actor, order_client) = order_actor::new(32);
        tokio::spawn(product_actor.run(()));
        tokio::spawn(order_actor.run(()));
        let products = ProductClient::new(product_client);
        let mut ids = Vec::new();
        for (n, quantity) in stock.iter().enumerate() {
            let id = products
                .create_product(ProductCreate::new(format!("p{n}"), Decimal::ONE, *quantity))
                .await
                .unwrap();
            ids.push(id);
        }
        (products, OrderClient::new(order_client), ids)
    }

    fn update(product_id: ProductId, observed: u32, quantity: u32) -> QuantityUpdate {
        QuantityUpdate {
            product_id,
            observed,
            quantity,
        }
    }

    fn draft(product_id: ProductId, quantity: u32) -> NewOrder {
        NewOrder {
            customer: Customer::new(CustomerId(1), "Alice", "alice@example.com"),
            lines: vec![OrderLine {
                product_id,
                price: Decimal::ONE,
                quantity,
            }],
        }
    }

    /// Polls `check_stock` until it reports `expected` or the attempts run out.
    async fn settled_stock(products: &ProductClient, id: ProductId, expected: u32) -> u32 {
        let mut level = products.check_stock(id).await.unwrap();
        for _ in 0..50 {
            if level == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            level = products.check_stock(id).await.unwrap();
        }
        level
    }

    #[tokio::test]
    async fn refused_reservation_releases_earlier_ones() {
        let (products, orders, ids) = setup(&[10, 1]).await;
        let mut tx = ActorTransaction::start(products.clone(), orders);

        let err = tx
            .update_quantities(&[update(ids[0], 10, 4), update(ids[1], 5, 0)])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::InsufficientStock {
                product_id: ids[1],
                requested: 5,
                available: 1
            }
        );
        assert_eq!(products.check_stock(ids[0]).await.unwrap(), 10);
        assert_eq!(products.check_stock(ids[1]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rollback_returns_reserved_stock() {
        let (products, orders, ids) = setup(&[10]).await;
        let mut tx: Box<dyn OrderTransaction> =
            Box::new(ActorTransaction::start(products.clone(), orders));

        tx.update_quantities(&[update(ids[0], 10, 7)]).await.unwrap();
        assert_eq!(products.check_stock(ids[0]).await.unwrap(), 7);

        tx.rollback().await.unwrap();
        assert_eq!(products.check_stock(ids[0]).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn stored_order_makes_reservations_final() {
        let (products, orders, ids) = setup(&[10]).await;
        let mut tx: Box<dyn OrderTransaction> =
            Box::new(ActorTransaction::start(products.clone(), orders.clone()));

        tx.update_quantities(&[update(ids[0], 10, 6)]).await.unwrap();
        let order = tx.create_order(draft(ids[0], 4)).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(orders.find_by_id(order.id).await.unwrap(), Some(order));
        assert_eq!(products.check_stock(ids[0]).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn dropped_transaction_releases_in_background() {
        let (products, orders, ids) = setup(&[10]).await;
        let mut tx = ActorTransaction::start(products.clone(), orders);
        tx.update_quantities(&[update(ids[0], 10, 2)]).await.unwrap();
        drop(tx);

        assert_eq!(settled_stock(&products, ids[0], 10).await, 10);
    }

    #[tokio::test]
    async fn cancelled_reservation_is_still_released() {
        let (products, orders, ids) = setup(&[10]).await;
        let mut tx = ActorTransaction::start(products.clone(), orders);

        // The reservation is handed off, then the caller stops waiting for it.
        let updates = [update(ids[0], 10, 6)];
        tokio::select! {
            biased;
            _ = tx.update_quantities(&updates) => panic!("reservation finished before the caller gave up"),
            _ = async {} => {}
        }
        drop(tx);

        assert_eq!(settled_stock(&products, ids[0], 10).await, 10);
    }

    #[tokio::test]
    async fn cancelled_order_insert_keeps_its_stock_decrement() {
        let (products, orders, ids) = setup(&[10]).await;
        let mut tx = ActorTransaction::start(products.clone(), orders.clone());
        tx.update_quantities(&[update(ids[0], 10, 4)]).await.unwrap();

        tokio::select! {
            biased;
            _ = tx.create_order(draft(ids[0], 6)) => panic!("order insert finished before the caller gave up"),
            _ = async {} => {}
        }
        drop(tx);

        let mut stored = None;
        for _ in 0..50 {
            stored = orders.find_by_id(OrderId(1)).await.unwrap();
            if stored.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(stored.is_some());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(products.check_stock(ids[0]).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn unknown_product_maps_to_unknown_product() {
        let (products, orders, _) = setup(&[]).await;
        let mut tx = ActorTransaction::start(products, orders);
        let err = tx
            .update_quantities(&[update(ProductId(9), 3, 1)])
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownProduct(ProductId(9)));
    }
}
