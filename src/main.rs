//! Demo: seeds one customer and one product, places an order that fits the
//! stock and one that does not, and logs both outcomes.
//!
//! `ORDER_STORE=sqlite DATABASE_URL=sqlite://orders.db?mode=rwc cargo run`
//! runs the same flow against SQLite.

use order_intake::config::{AppConfig, StoreBackend};
use order_intake::lifecycle::{setup_tracing, OrderSystem};
use order_intake::model::{
    CreateOrder, CustomerCreate, CustomerId, ProductCreate, ProductId, RequestedLine,
};
use order_intake::sqlite::SqliteStore;
use order_intake::OrderWorkflow;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env();
    setup_tracing(&config.log);

    info!(store = ?config.store, "Starting order intake demo");

    let customer = CustomerCreate::new("Alice", "alice@example.com");
    let product = ProductCreate::new("Widget", Decimal::new(500, 2), 10);

    match config.store {
        StoreBackend::Memory => {
            let system = OrderSystem::start(&config.actors);
            let customer_id = system
                .customer_client
                .create_customer(customer)
                .await
                .map_err(|e| e.to_string())?;
            let product_id = system
                .product_client
                .create_product(product)
                .await
                .map_err(|e| e.to_string())?;

            let workflow = system.workflow();
            place_orders(&workflow, customer_id, product_id).await;
            drop(workflow);

            system.shutdown().await?;
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::connect(&config.database)
                .await
                .map_err(|e| e.to_string())?;
            let customer_id = store
                .insert_customer(customer)
                .await
                .map_err(|e| e.to_string())?;
            let product_id = store
                .insert_product(product)
                .await
                .map_err(|e| e.to_string())?;

            let workflow = OrderWorkflow::from_store(Arc::new(store));
            place_orders(&workflow, customer_id, product_id).await;
        }
    }

    info!("Application completed successfully");
    Ok(())
}

async fn place_orders(workflow: &OrderWorkflow, customer_id: CustomerId, product_id: ProductId) {
    for quantity in [3, 8] {
        let request = CreateOrder {
            customer_id,
            lines: vec![RequestedLine::new(product_id, quantity)],
        };
        let span = tracing::info_span!("order_processing", quantity);
        match workflow.create_order(request).instrument(span).await {
            Ok(order) => info!(order_id = %order.id, total = %order.total(), "Order placed"),
            Err(e) => error!(error = %e, "Order rejected"),
        }
    }
}
