//! # Customer Client
//!
//! High-level API for the `Customer` actor.
use crate::customer_actor::CustomerError;
use crate::model::{Customer, CustomerCreate, CustomerId};
use crate::store::{CustomerDirectory, StoreError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Customer actor.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_customer(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(err) = e.entity_error::<CustomerError>() {
            return err.clone();
        }
        match e {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            other => CustomerError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl CustomerDirectory for CustomerClient {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        self.get(id)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn directory_lookup_goes_through_get() {
        let mut mock = MockClient::<Customer>::new();
        let alice = Customer::new(CustomerId(1), "Alice", "alice@example.com");
        mock.expect_get(CustomerId(1)).return_ok(Some(alice.clone()));
        mock.expect_get(CustomerId(2)).return_ok(None);

        let client = CustomerClient::new(mock.client());
        assert_eq!(client.find_by_id(CustomerId(1)).await.unwrap(), Some(alice));
        assert_eq!(client.find_by_id(CustomerId(2)).await.unwrap(), None);
        mock.verify();
    }

    #[tokio::test]
    async fn closed_actor_surfaces_as_backend_error() {
        let mut mock = MockClient::<Customer>::new();
        mock.expect_get(CustomerId(1))
            .return_err(FrameworkError::ActorClosed);

        let client = CustomerClient::new(mock.client());
        let err = client.find_by_id(CustomerId(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        mock.verify();
    }
}
