//! Dispatch error types

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Faults raised by middleware while an event is being dispatched
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A middleware returned an error message
    #[error("Middleware failed: {0}")]
    Failed(String),

    /// A middleware returned an error from another library
    #[error("Middleware failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A middleware panicked
    #[error("Middleware panicked: {0}")]
    Panicked(PanicPayload),
}

impl DispatchError {
    /// Create a fault from a plain message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wrap an error from another library
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(error))
    }

    /// Whether this fault came from a panic rather than a returned error
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// The payload of a panic caught at the dispatch boundary
///
/// Kept intact so a deferred fault can be resumed with the original payload.
pub struct PanicPayload {
    message: String,
    payload: Box<dyn Any + Send>,
}

impl PanicPayload {
    pub fn new(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message, payload }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_inner(self) -> Box<dyn Any + Send> {
        self.payload
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PanicPayload").field(&self.message).finish()
    }
}

/// Result type returned by middleware
pub type Result<T> = std::result::Result<T, DispatchError>;
