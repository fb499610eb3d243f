//! Client error types.

use colleago_core::SignedRequestError;

/// Error code the platform convention assigns to replies that cannot be
/// parsed as JSON.
pub const UNEXPECTED_REPLY_CODE: i64 = -1001;

/// Errors that can occur when using the Colleago client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error {code}: {message}")]
    Api {
        /// Platform error code.
        code: i64,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Signed-request validation failed.
    #[error("signed request rejected: {0}")]
    SignedRequest(#[from] SignedRequestError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The legacy envelope substituted when a reply is not valid JSON or
    /// does not carry the `{code, message}` shape.
    pub(crate) fn unexpected_reply(status: u16) -> Self {
        Self::Api {
            code: UNEXPECTED_REPLY_CODE,
            message: "Unexpected Reply".to_owned(),
            status,
        }
    }
}
