//! # Actor Framework
//!
//! Building blocks for type-safe resource actors on Tokio. Each resource type
//! (customers, stock items, orders) gets its own [`ResourceActor`] task that owns
//! the entities outright and handles CRUD requests plus resource-specific
//! actions one message at a time.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the business rules of one resource.
//! 2. **Runtime** ([`ResourceActor`]): the message loop and the store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed request/response.
//!
//! ## Concurrency Model
//!
//! - One Tokio task per actor; requests to one actor never interleave.
//! - Actors run in parallel with each other.
//! - An action is therefore an atomic read-modify-write on its entity, which is
//!   what makes conditional stock reservations safe without locks.
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`ResourceActor::run`] rather than to
//! [`ResourceActor::new`], so actors can be built first and wired afterwards.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers client requests from scripted expectations. See
//! the [`mock`] module.
//!
//! Further reading: [Actors with Tokio](https://ryhl.io/blog/actors-with-tokio/).

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
