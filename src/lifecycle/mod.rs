//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the resource actors, plus logging setup.
//!
//! ## The OrderSystem
//!
//! [`OrderSystem::start`] creates the customer, product and order actors, spawns
//! each on its own Tokio task and keeps their clients. None of the actors needs
//! another one: coordination lives in the
//! [`OrderWorkflow`](crate::workflow::OrderWorkflow), which
//! [`OrderSystem::workflow`] builds over the clients.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of each channel.
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`.
//! 3. **Await completion** - wait for all actor tasks to finish.
//!
//! Clones of the clients held elsewhere (workflows, transactions) keep their
//! actor alive, so drop those before calling [`OrderSystem::shutdown`].
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber. Actors log lifecycle events and
//! every request with an `entity_type` field; the workflow adds a
//! `create_order` span carrying the customer id.
//!
//! ```bash
//! RUST_LOG=info cargo run      # outcomes only
//! RUST_LOG=debug cargo run     # full payloads
//! ```

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use self::tracing::*;
