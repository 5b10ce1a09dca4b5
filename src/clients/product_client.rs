//! # Product Client
//!
//! High-level API for the `Product` actor: catalog reads, price changes and
//! stock reservations.
use crate::model::{ProductCreate, ProductId, ProductUpdate, StockItem};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::store::{StockCatalog, StoreError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<StockItem>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<StockItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Changes the catalog price. Orders already placed keep their price.
    #[instrument(skip(self))]
    pub async fn set_price(&self, id: ProductId, price: Decimal) -> Result<StockItem, ProductError> {
        debug!("Sending request");
        self.inner
            .update(id, ProductUpdate { price })
            .await
            .map_err(Self::map_error)
    }

    /// Returns the quantity available.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Checking stock");
        match self.action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` units out of stock and returns what is left. Fails with
    /// [`ProductError::InsufficientStock`] and leaves the stock alone if fewer
    /// units are available.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Reserving stock");
        match self.action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::ReserveStock(left) => Ok(left),
            other => Err(unexpected(other)),
        }
    }

    /// Puts `quantity` previously reserved units back.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!("Releasing stock");
        match self.action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::ReleaseStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    async fn action(
        &self,
        id: ProductId,
        action: ProductAction,
    ) -> Result<ProductActionResult, ProductError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("mismatched action result: {result:?}"))
}

#[async_trait]
impl ActorClient<StockItem> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<StockItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(err) = e.entity_error::<ProductError>() {
            return err.clone();
        }
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl StockCatalog for ProductClient {
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<StockItem>, StoreError> {
        self.get_many(ids.to_vec())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
