//! # Observability & Tracing
//!
//! With `RUST_LOG=info` an order shows up as:
//!
//! ```text
//! INFO create_order{customer_id=customer_1 lines=1}: Order stored order_id=order_1
//! INFO create_order{customer_id=customer_1 lines=1}: Order created order_id=order_1 total=15.00
//! ```
//!
//! `RUST_LOG=debug` adds the request payload and every actor message
//! (`GetMany`, `Action ... ReserveStock(3)`, `Create`).

use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `config.filter` when set. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn setup_tracing(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false); // entity_type and spans say where a line comes from

    let installed = if config.compact {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
