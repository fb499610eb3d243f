//! Error types for signed-request handling.

/// Result type for signed-request operations.
pub type Result<T> = std::result::Result<T, SignedRequestError>;

/// Reasons a signed request is rejected or cannot be produced.
///
/// Every variant is an expected, per-call outcome of untrusted input; nothing
/// here is fatal to the process. Callers that need to react differently to a
/// stale request than to a forged one should match on the variant rather than
/// collapsing to a boolean.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignedRequestError {
    /// The transport payload could not be decoded or split into parameters.
    #[error("malformed signed-request payload: {0}")]
    MalformedPayload(String),

    /// One or more required parameters are absent.
    ///
    /// The message lists parameter names only, never the values of other
    /// fields.
    #[error("missing required parameters: {}", .missing.join(", "))]
    MissingParameters {
        /// Names of the absent parameters.
        missing: Vec<String>,
    },

    /// The recomputed signature does not match the supplied one.
    #[error("signature mismatch")]
    InvalidSignature,

    /// The `issuedAt` parameter is present but not a parseable timestamp.
    #[error("issuedAt is not a valid timestamp: {value}")]
    InvalidTimestamp {
        /// The unparseable value as received.
        value: String,
    },

    /// The issue timestamp falls outside the validity window.
    ///
    /// Covers both stale and future-dated requests; `age_seconds` is negative
    /// when the timestamp lies in the future.
    #[error("signed request outside validity window (age {age_seconds}s)")]
    ExpiredSignature {
        /// Signed age of the request in whole seconds at validation time.
        age_seconds: i64,
    },

    /// The signer or verifier was constructed with unusable settings.
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),
}
