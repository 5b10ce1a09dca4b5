//! Typed wrappers around each actor's `ResourceClient`. They also implement the
//! collaborator traits of [`crate::store`], so the workflow can run against the
//! actors directly.

pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use customer_client::CustomerClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
