use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::config::ActorConfig;
use crate::store::ActorUnitOfWork;
use crate::workflow::OrderWorkflow;
use crate::{customer_actor, order_actor, product_actor};
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the actor-backed store.
///
/// # Example
///
/// ```rust
/// use order_intake::config::ActorConfig;
/// use order_intake::lifecycle::OrderSystem;
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let system = OrderSystem::start(&ActorConfig { buffer_size: 32 });
///     let workflow = system.workflow();
///     // ... create customers, products and orders ...
///     drop(workflow);
///     system.shutdown().await
/// }
/// ```
pub struct OrderSystem {
    pub customer_client: CustomerClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates the three resource actors and spawns each on its own task.
    pub fn start(config: &ActorConfig) -> Self {
        let (customer_actor, customer_client) = customer_actor::new(config.buffer_size);
        let (product_actor, product_client) = product_actor::new(config.buffer_size);
        let (order_actor, order_client) = order_actor::new(config.buffer_size);

        let handles = vec![
            tokio::spawn(customer_actor.run(())),
            tokio::spawn(product_actor.run(())),
            tokio::spawn(order_actor.run(())),
        ];
        info!(buffer_size = config.buffer_size, "Order system started");

        Self {
            customer_client: CustomerClient::new(customer_client),
            product_client: ProductClient::new(product_client),
            order_client: OrderClient::new(order_client),
            handles,
        }
    }

    /// Builds a workflow over the actor clients.
    pub fn workflow(&self) -> OrderWorkflow {
        OrderWorkflow::new(
            Arc::new(self.customer_client.clone()),
            Arc::new(self.product_client.clone()),
            Arc::new(self.order_client.clone()),
            Arc::new(ActorUnitOfWork::new(
                self.product_client.clone(),
                self.order_client.clone(),
            )),
        )
    }

    /// Drops the clients and waits for every actor to stop.
    ///
    /// Returns an error if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.customer_client);
        drop(self.product_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
