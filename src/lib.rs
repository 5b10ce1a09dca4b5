//! # Order Intake
//!
//! Records purchase orders against a product catalog without ever selling more
//! stock than exists.
//!
//! ## Core Flow
//!
//! [`workflow::OrderWorkflow::create_order`] resolves the customer, validates
//! every requested line against a stock snapshot, then decrements stock and
//! stores the order inside one unit of work. Order lines keep the price they
//! were validated with.
//!
//! ## Stores
//!
//! The workflow depends only on the traits in [`store`]. Two implementations
//! ship with the crate:
//!
//! - **Actors** - one [`ResourceActor`](actor_framework::ResourceActor) per
//!   resource ([`customer_actor`], [`product_actor`], [`order_actor`]), reached
//!   through the typed [`clients`] and started by [`lifecycle::OrderSystem`].
//!   Stock is reserved with atomic actor actions and released again if the
//!   order cannot be stored.
//! - **SQLite** - [`sqlite::SqliteStore`], where the unit of work is a database
//!   transaction.
//!
//! ## Testing
//!
//! See [`actor_framework::mock`] for testing clients without spawning actors.

pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod sqlite;
pub mod store;
pub mod validation;
pub mod workflow;

pub use error::OrderError;
pub use workflow::OrderWorkflow;
