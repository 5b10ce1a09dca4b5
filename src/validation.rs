//! # Stock Validation
//!
//! Pure checks run before anything is mutated. Nothing here does I/O.

use crate::error::{OrderError, Shortage};
use crate::model::{OrderLine, ProductId, QuantityUpdate, RequestedLine, StockItem};
use std::collections::{HashMap, HashSet};

/// Rejects requests that cannot be valid whatever the stock: no lines, a zero
/// quantity, or the same product on two lines.
pub fn validate_request(lines: &[RequestedLine]) -> Result<(), OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            return Err(OrderError::InvalidQuantity(line.product_id));
        }
        if !seen.insert(line.product_id) {
            return Err(OrderError::DuplicateProduct(line.product_id));
        }
    }
    Ok(())
}

/// Distinct product ids of a request, in first-seen order.
pub fn requested_ids(lines: &[RequestedLine]) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(lines.len());
    lines
        .iter()
        .map(|line| line.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Checks `requested` against the stock snapshot `stock` returned by the
/// catalog for the requested ids.
///
/// - Fewer snapshot items than distinct requested ids means at least one
///   product does not exist: [`OrderError::ProductNotFound`] listing the ids
///   the snapshot lacks.
/// - Every line is checked before failing; all shortages come back together in
///   one [`OrderError::InsufficientStock`].
/// - On success the lines follow request order and carry the snapshot price.
pub fn validate_stock(
    requested: &[RequestedLine],
    stock: &[StockItem],
) -> Result<Vec<OrderLine>, OrderError> {
    let ids = requested_ids(requested);
    let by_id: HashMap<ProductId, &StockItem> = stock.iter().map(|item| (item.id, item)).collect();

    if stock.len() != ids.len() {
        let missing = ids
            .iter()
            .copied()
            .filter(|id| !by_id.contains_key(id))
            .collect();
        return Err(OrderError::ProductNotFound { missing });
    }
    if let Some(stray) = stock.iter().find(|item| !ids.contains(&item.id)) {
        return Err(OrderError::CatalogMismatch(stray.id));
    }

    let mut lines = Vec::with_capacity(requested.len());
    let mut shortages = Vec::new();
    for line in requested {
        let item = by_id
            .get(&line.product_id)
            .ok_or(OrderError::CatalogMismatch(line.product_id))?;
        if line.quantity > item.quantity {
            shortages.push(Shortage {
                product_id: line.product_id,
                requested: line.quantity,
                available: item.quantity,
            });
            continue;
        }
        lines.push(OrderLine {
            product_id: line.product_id,
            price: item.price,
            quantity: line.quantity,
        });
    }

    if !shortages.is_empty() {
        return Err(OrderError::InsufficientStock { shortages });
    }
    Ok(lines)
}

/// New quantity for every product in the snapshot: observed stock minus the
/// total requested for it. Products without a request line keep their level.
pub fn plan_decrements(stock: &[StockItem], requested: &[RequestedLine]) -> Vec<QuantityUpdate> {
    stock
        .iter()
        .map(|item| {
            let wanted: u32 = requested
                .iter()
                .filter(|line| line.product_id == item.id)
                .map(|line| line.quantity)
                .sum();
            QuantityUpdate {
                product_id: item.id,
                observed: item.quantity,
                quantity: item.quantity.saturating_sub(wanted),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item(id: u32, price: i64, quantity: u32) -> StockItem {
        StockItem::new(ProductId(id), format!("p{id}"), Decimal::new(price, 2), quantity)
    }

    fn line(id: u32, quantity: u32) -> RequestedLine {
        RequestedLine::new(ProductId(id), quantity)
    }

    #[test]
    fn empty_request_is_rejected() {
        assert_eq!(validate_request(&[]), Err(OrderError::EmptyOrder));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert_eq!(
            validate_request(&[line(1, 2), line(2, 0)]),
            Err(OrderError::InvalidQuantity(ProductId(2)))
        );
    }

    #[test]
    fn repeated_product_is_rejected() {
        assert_eq!(
            validate_request(&[line(1, 2), line(2, 1), line(1, 3)]),
            Err(OrderError::DuplicateProduct(ProductId(1)))
        );
    }

    #[test]
    fn valid_request_yields_lines_with_snapshot_prices() {
        let stock = [item(2, 250, 3), item(1, 500, 10)];
        let lines = validate_stock(&[line(1, 3), line(2, 3)], &stock).unwrap();

        assert_eq!(
            lines,
            vec![
                OrderLine {
                    product_id: ProductId(1),
                    price: Decimal::new(500, 2),
                    quantity: 3
                },
                OrderLine {
                    product_id: ProductId(2),
                    price: Decimal::new(250, 2),
                    quantity: 3
                },
            ]
        );
    }

    #[test]
    fn missing_product_is_detected_by_count() {
        let err = validate_stock(&[line(1, 1), line(2, 1)], &[item(1, 500, 10)]).unwrap_err();
        assert_eq!(
            err,
            OrderError::ProductNotFound {
                missing: vec![ProductId(2)]
            }
        );
    }

    #[test]
    fn all_shortages_are_reported_together() {
        let stock = [item(1, 100, 10), item(2, 100, 1), item(3, 100, 0)];
        let err = validate_stock(&[line(1, 11), line(2, 1), line(3, 4)], &stock).unwrap_err();
        assert_eq!(
            err,
            OrderError::InsufficientStock {
                shortages: vec![
                    Shortage {
                        product_id: ProductId(1),
                        requested: 11,
                        available: 10
                    },
                    Shortage {
                        product_id: ProductId(3),
                        requested: 4,
                        available: 0
                    },
                ]
            }
        );
    }

    #[test]
    fn unrequested_snapshot_item_is_a_mismatch_not_a_panic() {
        let err = validate_stock(&[line(1, 1)], &[item(7, 100, 5)]).unwrap_err();
        assert_eq!(err, OrderError::CatalogMismatch(ProductId(7)));
    }

    #[test]
    fn plan_keeps_unrequested_products_unchanged() {
        let updates = plan_decrements(&[item(1, 100, 10), item(2, 100, 4)], &[line(1, 3)]);
        assert_eq!(updates[0].quantity, 7);
        assert_eq!(updates[0].decrement(), 3);
        assert_eq!(updates[1].quantity, 4);
        assert_eq!(updates[1].decrement(), 0);
    }

    proptest! {
        #[test]
        fn success_iff_every_line_is_covered(
            pairs in proptest::collection::vec((0u32..20, 1u32..20), 1..8)
        ) {
            let stock: Vec<StockItem> = pairs
                .iter()
                .enumerate()
                .map(|(i, (available, _))| item(i as u32 + 1, 100, *available))
                .collect();
            let requested: Vec<RequestedLine> = pairs
                .iter()
                .enumerate()
                .map(|(i, (_, wanted))| line(i as u32 + 1, *wanted))
                .collect();
            let covered = pairs.iter().all(|(available, wanted)| wanted <= available);

            match validate_stock(&requested, &stock) {
                Ok(lines) => {
                    prop_assert!(covered);
                    prop_assert_eq!(lines.len(), requested.len());
                    for (order_line, request) in lines.iter().zip(&requested) {
                        prop_assert_eq!(order_line.product_id, request.product_id);
                        prop_assert_eq!(order_line.quantity, request.quantity);
                    }
                }
                Err(OrderError::InsufficientStock { shortages }) => {
                    prop_assert!(!covered);
                    let expected = pairs.iter().filter(|(a, w)| w > a).count();
                    prop_assert_eq!(shortages.len(), expected);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn planned_quantities_never_underflow(
            available in 0u32..50,
            wanted in 1u32..50,
        ) {
            let stock = [item(1, 100, available)];
            let updates = plan_decrements(&stock, &[line(1, wanted)]);
            prop_assert!(updates[0].quantity <= available);
            if wanted <= available {
                prop_assert_eq!(updates[0].quantity, available - wanted);
            }
        }
    }
}
