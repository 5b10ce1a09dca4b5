//! # ActorEntity Trait
//!
//! The contract every resource (customers, stock items, orders) implements so the
//! generic [`ResourceActor`](crate::ResourceActor) can own it. Associated types fix
//! the id, the create/update payloads, the custom actions and the error type of
//! each resource, so a stock reservation can never be sent to the customer actor.
//!
//! `on_create` and `on_delete` are provided hooks that default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// Hooks are async and receive the actor's `Context`, which is injected when the
/// actor is started (`run(context)`) rather than when it is built.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier; generated by the actor from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload used to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `ReserveStock`).
    type Action: Send + Sync + Debug;

    /// Result returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into every hook. `()` when there are none.
    type Context: Send + Sync;

    /// One error enum per actor, shared by every operation of that actor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from its generated id and the create payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update payload in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handles a resource-specific action. A returned error leaves the entity as
    /// the handler left it, so handlers must validate before mutating.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
