//! # Product Actor
//!
//! Owns the catalog and its stock levels. Besides CRUD it handles three custom
//! actions, see [`ProductAction`].
//!
//! ## Reservations
//!
//! The actor drains its mailbox one message at a time, so `ReserveStock` is a
//! conditional decrement no other request can interleave with: two orders
//! racing for the last units cannot both get them. `ReleaseStock` puts units
//! back when an order that reserved them fails.
//!
//! ```rust
//! use order_intake::clients::ProductClient;
//! use order_intake::model::ProductCreate;
//! use order_intake::product_actor;
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = product_actor::new(32);
//!     let client = ProductClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_product(ProductCreate::new("Widget", Decimal::new(2999, 2), 100))
//!         .await?;
//!     assert_eq!(client.reserve_stock(id, 5).await?, 95);
//!     assert!(client.reserve_stock(id, 500).await.is_err());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::StockItem;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<StockItem>, ResourceClient<StockItem>) {
    ResourceActor::new(buffer_size)
}
