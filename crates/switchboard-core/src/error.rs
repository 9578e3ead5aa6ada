//! Error types for the routing core.

use thiserror::Error;

/// Errors surfaced by gateway API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The gateway is not connected.
    #[error("gateway is not connected")]
    NotConnected,

    /// The call timed out.
    #[error("gateway call timed out")]
    Timeout,

    /// The gateway answered with an error code.
    #[error("gateway error ({retcode}): {message}")]
    Api {
        /// Protocol-level return code.
        retcode: i64,
        /// Human-readable error description.
        message: String,
    },

    /// Failed to serialize or deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for gateway API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = ApiError::Api {
            retcode: 100,
            message: "bad flag".into(),
        };
        assert_eq!(err.to_string(), "gateway error (100): bad flag");
        assert_eq!(ApiError::Timeout.to_string(), "gateway call timed out");
    }
}
