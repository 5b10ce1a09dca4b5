//! # Order Client
//!
//! High-level API for the `Order` actor.
use crate::model::{NewOrder, Order, OrderId};
use crate::order_actor::OrderLedgerError;
use crate::store::{OrderLedger, StoreError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Storing an order here does not check customers or stock; that is the job of
/// [`OrderWorkflow`](crate::workflow::OrderWorkflow).
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(customer_id = %draft.customer.id, lines = draft.lines.len()))]
    pub async fn store_order(&self, draft: NewOrder) -> Result<Order, OrderLedgerError> {
        debug!(?draft, "store_order called");
        let id = self
            .inner
            .create(draft.clone())
            .await
            .map_err(Self::map_error)?;
        info!(order_id = %id, "Order stored");
        Ok(Order::new(id, draft))
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderLedgerError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(err) = e.entity_error::<OrderLedgerError>() {
            return err.clone();
        }
        match e {
            FrameworkError::NotFound(id) => OrderLedgerError::NotFound(id),
            other => OrderLedgerError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl OrderLedger for OrderClient {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.get(id)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
