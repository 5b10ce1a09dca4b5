//! Order creation against the SQLite store (`sqlite::memory:`).

use async_trait::async_trait;
use order_intake::config::DatabaseConfig;
use order_intake::error::Shortage;
use order_intake::model::{
    CreateOrder, Customer, CustomerCreate, CustomerId, OrderId, ProductCreate, ProductId,
    RequestedLine,
};
use order_intake::sqlite::SqliteStore;
use order_intake::store::{CustomerDirectory, StoreError};
use order_intake::{OrderError, OrderWorkflow};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

fn price(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

async fn seeded(stock: &[(&str, u32)]) -> (Arc<SqliteStore>, CustomerId, Vec<ProductId>) {
    let store = SqliteStore::connect(&DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        busy_timeout: 5,
    })
    .await
    .unwrap();
    let customer = store
        .insert_customer(CustomerCreate::new("Alice", "alice@example.com"))
        .await
        .unwrap();
    let mut products = Vec::new();
    for (n, (unit_price, quantity)) in stock.iter().enumerate() {
        let id = store
            .insert_product(ProductCreate::new(format!("P{n}"), price(unit_price), *quantity))
            .await
            .unwrap();
        products.push(id);
    }
    (Arc::new(store), customer, products)
}

fn order(customer_id: CustomerId, lines: &[(ProductId, u32)]) -> CreateOrder {
    CreateOrder {
        customer_id,
        lines: lines
            .iter()
            .map(|(id, quantity)| RequestedLine::new(*id, *quantity))
            .collect(),
    }
}

async fn stock_of(store: &SqliteStore, id: ProductId) -> u32 {
    store.quantity_of(id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_order_is_persisted_with_snapshot_prices() {
    let (store, customer, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    let created = workflow
        .create_order(order(customer, &[(products[0], 3)]))
        .await
        .unwrap();
    assert_eq!(created.id, OrderId(1));
    assert_eq!(created.lines[0].price, price("5.00"));
    assert_eq!(stock_of(&store, products[0]).await, 7);

    store.set_price(products[0], price("9.99")).await.unwrap();
    let stored = workflow.find_order(created.id).await.unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.total(), price("15.00"));
}

#[tokio::test]
async fn test_unknown_customer_creates_nothing() {
    let (store, _, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    let err = workflow
        .create_order(order(CustomerId(404), &[(products[0], 1)]))
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::CustomerNotFound(CustomerId(404)));
    assert_eq!(stock_of(&store, products[0]).await, 10);
    assert_eq!(store.order_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_product_creates_nothing() {
    let (store, customer, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    let err = workflow
        .create_order(order(customer, &[(products[0], 1), (ProductId(2), 1)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::ProductNotFound {
            missing: vec![ProductId(2)]
        }
    );
    assert_eq!(stock_of(&store, products[0]).await, 10);
    assert_eq!(store.order_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shortage_creates_nothing() {
    let (store, customer, products) = seeded(&[("5.00", 10), ("1.00", 1)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    let err = workflow
        .create_order(order(customer, &[(products[0], 10), (products[1], 2)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        OrderError::InsufficientStock {
            shortages: vec![Shortage {
                product_id: products[1],
                requested: 2,
                available: 1
            }]
        }
    );
    assert_eq!(stock_of(&store, products[0]).await, 10);
    assert_eq!(store.order_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_second_order_beyond_remaining_stock_is_refused() {
    let (store, customer, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    workflow
        .create_order(order(customer, &[(products[0], 4)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&store, products[0]).await, 6);

    let err = workflow
        .create_order(order(customer, &[(products[0], 7)]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InsufficientStock {
            shortages: vec![Shortage {
                product_id: products[0],
                requested: 7,
                available: 6
            }]
        }
    );
    assert_eq!(stock_of(&store, products[0]).await, 6);
    assert_eq!(store.order_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_orders_never_oversell() {
    let (store, customer, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::from_store(store.clone());

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let workflow = workflow.clone();
        let request = order(customer, &[(products[0], 3)]);
        tasks.push(tokio::spawn(async move { workflow.create_order(request).await }));
    }
    let mut succeeded = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(matches!(e, OrderError::InsufficientStock { .. }), "{e}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(stock_of(&store, products[0]).await, 1);
    assert_eq!(store.order_count().await.unwrap(), 3);
}

/// Answers for a customer the database has never heard of, so the order
/// insert fails on its foreign key after stock was already decremented.
struct PhantomCustomers;

#[async_trait]
impl CustomerDirectory for PhantomCustomers {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(Some(Customer::new(id, "Ghost", "ghost@example.com")))
    }
}

#[tokio::test]
async fn test_failed_order_insert_rolls_back_stock() {
    let (store, _, products) = seeded(&[("5.00", 10)]).await;
    let workflow = OrderWorkflow::new(
        Arc::new(PhantomCustomers),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    let err = workflow
        .create_order(order(CustomerId(77), &[(products[0], 4)]))
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::TransactionFailed(_)), "{err}");
    assert_eq!(stock_of(&store, products[0]).await, 10);
    assert_eq!(store.order_count().await.unwrap(), 0);
}
