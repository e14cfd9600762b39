use thiserror::Error;

use crate::subscription::SubscriptionId;

/// Error type returned by user callbacks
///
/// Anything implementing `std::error::Error` converts into it with `?` or
/// `.into()`, including plain strings.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by user callbacks
pub type CallbackResult = std::result::Result<(), CallbackError>;

/// Errors that can occur in the mediator
#[derive(Error, Debug)]
pub enum MediatorError {
    /// An argument could not be turned into a subscription or configuration
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A canceled subscription was triggered
    #[error("Cannot trigger a canceled subscription ({0})")]
    InvalidState(SubscriptionId),

    /// A user callback failed while being triggered
    ///
    /// The callback's own error is kept untouched as `source`.
    #[error("Callback of subscription {subscription} failed: {source}")]
    CallbackFailure {
        subscription: SubscriptionId,
        #[source]
        source: CallbackError,
    },
}

impl MediatorError {
    /// Returns the callback's own error if this is a `CallbackFailure`
    pub fn callback_error(&self) -> Option<&CallbackError> {
        match self {
            MediatorError::CallbackFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for mediator operations
pub type Result<T> = std::result::Result<T, MediatorError>;
