//! # ActorClient Trait
//!
//! Shared read/delete operations for resource-specific client wrappers.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait implemented by domain clients (`CustomerClient`, `ProductClient`, ...)
/// so they inherit `get`, `get_many` and `delete` with their own error type.
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Customer { id: u32 }
/// #[derive(Debug)] struct CustomerCreate;
/// #[derive(Debug)] struct CustomerUpdate;
/// #[derive(Debug)] enum CustomerAction {}
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct CustomerError(String);
/// impl From<String> for CustomerError { fn from(s: String) -> Self { CustomerError(s) } }
///
/// #[async_trait]
/// impl ActorEntity for Customer {
///     type Id = u32; type Create = CustomerCreate; type Update = CustomerUpdate;
///     type Action = CustomerAction; type ActionResult = (); type Context = (); type Error = CustomerError;
///     fn from_create_params(id: u32, _: CustomerCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: CustomerUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: CustomerAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct CustomerClient { inner: ResourceClient<Customer> }
///
/// #[async_trait]
/// impl ActorClient<Customer> for CustomerClient {
///     type Error = CustomerError;
///     fn inner(&self) -> &ResourceClient<Customer> { &self.inner }
///     fn map_error(e: FrameworkError) -> Self::Error { CustomerError(e.to_string()) }
/// }
///
/// async fn usage(client: CustomerClient) {
///     let _ = client.get(1).await;
///     let _ = client.get_many(vec![1, 2]).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every existing entity among `ids`, preserving their order.
    #[tracing::instrument(skip(self))]
    async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get_many(ids).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
