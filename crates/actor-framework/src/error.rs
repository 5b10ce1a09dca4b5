//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity errors travel boxed inside
//! [`FrameworkError::EntityError`] and can be recovered with
//! [`FrameworkError::entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Returns the typed entity error if this is an `EntityError` carrying an `E`.
    pub fn entity_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of stock")]
    struct OutOfStock;

    #[test]
    fn entity_error_downcasts_to_the_boxed_type() {
        let err = FrameworkError::EntityError(Box::new(OutOfStock));
        assert_eq!(err.entity_error::<OutOfStock>(), Some(&OutOfStock));
        assert!(err.entity_error::<std::io::Error>().is_none());
    }

    #[test]
    fn plumbing_errors_carry_no_entity_error() {
        assert!(FrameworkError::ActorClosed
            .entity_error::<OutOfStock>()
            .is_none());
    }
}
