//! Order types: the incoming request, the validated lines and the persisted order.

use crate::model::{Customer, CustomerId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// One product/quantity pair as asked for by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl RequestedLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Input of [`OrderWorkflow::create_order`](crate::workflow::OrderWorkflow::create_order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub lines: Vec<RequestedLine>,
}

/// A validated line. `price` is the unit price at the moment the order was
/// validated and never follows later catalog changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Draft handed to the ledger inside the unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
}

/// A persisted order.
///
/// # Actor Framework
/// Implements [`ActorEntity`](actor_framework::ActorEntity) with [`NewOrder`] as
/// its create payload. Orders are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(id: OrderId, draft: NewOrder) -> Self {
        Self {
            id,
            customer: draft.customer,
            lines: draft.lines,
        }
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::total).sum()
    }
}

/// New stock level for one product, along with the level observed when the
/// order was validated. Stores apply `decrement()` only if the stock still
/// covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub product_id: ProductId,
    pub observed: u32,
    pub quantity: u32,
}

impl QuantityUpdate {
    pub fn decrement(&self) -> u32 {
        self.observed.saturating_sub(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn line(product: u32, price: &str, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId(product),
            price: Decimal::from_str(price).unwrap(),
            quantity,
        }
    }

    #[test]
    fn totals_are_exact_decimal_sums() {
        let order = Order::new(
            OrderId(1),
            NewOrder {
                customer: Customer::new(CustomerId(1), "Ada", "ada@example.com"),
                lines: vec![line(1, "0.10", 3), line(2, "19.99", 2)],
            },
        );
        assert_eq!(order.lines[0].total(), Decimal::from_str("0.30").unwrap());
        assert_eq!(order.total(), Decimal::from_str("40.28").unwrap());
    }

    #[test]
    fn ids_display_with_resource_prefix() {
        assert_eq!(CustomerId(7).to_string(), "customer_7");
        assert_eq!(ProductId(2).to_string(), "product_2");
        assert_eq!(OrderId(11).to_string(), "order_11");
    }

    #[test]
    fn decrement_is_observed_minus_new_quantity() {
        let update = QuantityUpdate {
            product_id: ProductId(1),
            observed: 10,
            quantity: 7,
        };
        assert_eq!(update.decrement(), 3);
    }
}
