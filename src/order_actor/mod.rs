//! # Order Actor
//!
//! Stores placed orders. It has no context dependencies: checking the customer
//! and reserving stock happen in the workflow before the order reaches this
//! actor, so storing an order is the last step of a successful creation.
//! Orders cannot be updated.

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
