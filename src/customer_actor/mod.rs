//! # Customer Actor
//!
//! Owns the customer records the workflow resolves buyers against. Plain CRUD,
//! no context dependencies and no custom actions.
//!
//! ## Usage
//!
//! ```rust
//! use order_intake::clients::CustomerClient;
//! use order_intake::customer_actor;
//! use order_intake::model::CustomerCreate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = customer_actor::new(32);
//!     let client = CustomerClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_customer(CustomerCreate::new("Alice", "alice@example.com"))
//!         .await?;
//!     assert_eq!(id.to_string(), "customer_1");
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Customer;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Customer actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Customer>, ResourceClient<Customer>) {
    ResourceActor::new(buffer_size)
}
