//! [`ActorEntity`] implementation for [`Order`].

use super::error::OrderLedgerError;
use crate::model::{NewOrder, Order, OrderId};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = NewOrder;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = OrderLedgerError;

    fn from_create_params(id: OrderId, draft: NewOrder) -> Result<Self, Self::Error> {
        if draft.lines.is_empty() {
            return Err(OrderLedgerError::ValidationError("order has no lines".into()));
        }
        if let Some(line) = draft.lines.iter().find(|line| line.quantity == 0) {
            return Err(OrderLedgerError::ValidationError(format!(
                "zero quantity for {}",
                line.product_id
            )));
        }
        Ok(Order::new(id, draft))
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
