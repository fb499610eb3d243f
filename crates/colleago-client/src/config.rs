//! Client configuration.

use std::fmt;

use colleago_core::{SignatureEncoding, DEFAULT_SIGNATURE_WINDOW_SECS};

/// Default API hostname.
pub const DEFAULT_HOSTNAME: &str = "api.colleago.io";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for [`ColleagoClient`](crate::ColleagoClient).
///
/// `app_id` is an identifier only. `app_secret` is the shared HMAC key and
/// is treated as sensitive: it is redacted from `Debug` output and never
/// logged.
#[derive(Clone)]
pub struct ClientConfig {
    /// URL scheme; `https` unless pointed at a local test server.
    pub scheme: String,
    /// API hostname.
    pub hostname: String,
    /// Application identifier issued by the platform.
    pub app_id: String,
    /// Shared HMAC secret issued by the platform.
    pub app_secret: String,
    /// Request timeout in seconds (default 30).
    pub timeout_seconds: u64,
    /// Freshness window for inbound signed requests in seconds (default 60).
    pub signature_window_seconds: u64,
    /// Signature digest encoding for this deployment (default base64).
    pub signature_encoding: SignatureEncoding,
}

impl ClientConfig {
    /// Configuration with platform defaults for the given credentials.
    #[must_use]
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_owned(),
            hostname: DEFAULT_HOSTNAME.to_owned(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            signature_window_seconds: DEFAULT_SIGNATURE_WINDOW_SECS,
            signature_encoding: SignatureEncoding::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("hostname", &self.hostname)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<REDACTED>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("signature_window_seconds", &self.signature_window_seconds)
            .field("signature_encoding", &self.signature_encoding)
            .finish()
    }
}
