//! [`ActorEntity`] implementation for [`StockItem`], including the stock
//! reservation actions.

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::model::{ProductCreate, ProductId, ProductUpdate, StockItem};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price.is_sign_negative() {
        return Err(ProductError::ValidationError(format!(
            "price must not be negative: {price}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for StockItem {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name must not be empty".into()));
        }
        validate_price(params.price)?;
        Ok(Self::new(id, params.name, params.price, params.quantity))
    }

    /// Price changes never reach existing orders; their lines keep the price
    /// they were validated with.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        validate_price(update.price)?;
        self.price = update.price;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, Self::Error> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.quantity)),
            ProductAction::ReserveStock(0) | ProductAction::ReleaseStock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::ReserveStock(requested) => {
                if requested > self.quantity {
                    return Err(ProductError::InsufficientStock {
                        requested,
                        available: self.quantity,
                    });
                }
                self.quantity -= requested;
                Ok(ProductActionResult::ReserveStock(self.quantity))
            }
            ProductAction::ReleaseStock(units) => {
                self.quantity = self.quantity.saturating_add(units);
                Ok(ProductActionResult::ReleaseStock(self.quantity))
            }
        }
    }
}
