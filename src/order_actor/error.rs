//! Error types for the Order actor.

use thiserror::Error;

/// Errors that can occur while storing or reading orders.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderLedgerError {
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderLedgerError {
    fn from(msg: String) -> Self {
        OrderLedgerError::ActorCommunicationError(msg)
    }
}
