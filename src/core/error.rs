use thiserror::Error;

/// Errors raised by the recommendation core
///
/// Both kinds are deterministic caller bugs and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// Malformed snapshot input, e.g. a posting pointing at an unknown organization
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal call argument such as `top_k = 0`
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RecommendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
