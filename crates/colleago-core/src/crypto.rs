//! Cryptographic primitives for signed requests.
//!
//! HMAC-SHA256 over the canonical query string, plus the digest-to-string
//! encodings admitted by the platform and a constant-time string comparison
//! used when matching signatures.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How the raw HMAC digest is rendered as a signature string.
///
/// Fixed per deployment at construction time: the signer and the verifier on
/// both sides of an exchange must use the same mode, byte for byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureEncoding {
    /// Standard base64 of the raw digest, padded. The platform default.
    #[default]
    Base64,
    /// Lowercase hex of the raw digest.
    Hex,
}

impl SignatureEncoding {
    /// Render a raw digest in this encoding.
    #[must_use]
    pub fn encode(self, digest: &[u8]) -> String {
        match self {
            Self::Base64 => BASE64_STANDARD.encode(digest),
            Self::Hex => hex::encode(digest),
        }
    }
}

/// Compute the raw HMAC-SHA256 digest of `message` keyed by `secret`.
///
/// # Panics
///
/// Never panics in practice: HMAC-SHA256 accepts keys of any size per
/// RFC 2104, so `new_from_slice` only fails if the Hmac implementation is
/// broken.
#[must_use]
pub(crate) fn hmac_sha256(secret: &str, message: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time string comparison.
///
/// Signatures here are hex/base64 ASCII rather than raw secret material, so
/// exact-match is what the protocol requires; comparing in constant time
/// additionally avoids leaking the match prefix length.
#[must_use]
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha256_known_vector() {
        let digest = hmac_sha256("key", "The quick brown fox jumps over the lazy dog");
        assert_eq!(
            hex::encode(&digest),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn hmac_sha256_is_deterministic() {
        assert_eq!(hmac_sha256("secret", "message"), hmac_sha256("secret", "message"));
    }

    #[test]
    fn hmac_sha256_different_inputs() {
        assert_ne!(hmac_sha256("secret", "message1"), hmac_sha256("secret", "message2"));
    }

    #[test]
    fn encodings_render_the_same_digest_differently() {
        let digest = hmac_sha256("key", "a=1&b=2");
        let hex_sig = SignatureEncoding::Hex.encode(&digest);
        let b64_sig = SignatureEncoding::Base64.encode(&digest);

        assert_eq!(
            hex_sig,
            "b3c18626e7ac81395c1d37966c7ee2258a6967a1b3fdefb4fa339bb19dc73b0e"
        );
        assert_eq!(b64_sig, "s8GGJuesgTlcHTeWbH7iJYppZ6Gz/e+0+jObsZ3HOw4=");
        assert_eq!(hex_sig.len(), 64);
        assert_eq!(b64_sig.len(), 44);
    }

    #[test]
    fn encoding_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&SignatureEncoding::Base64).unwrap(),
            "\"base64\""
        );
        assert_eq!(serde_json::to_string(&SignatureEncoding::Hex).unwrap(), "\"hex\"");
    }

    #[test]
    fn constant_time_eq_equal_strings() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(constant_time_eq("", ""));
        assert!(constant_time_eq("longer string here", "longer string here"));
    }

    #[test]
    fn constant_time_eq_different_strings() {
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
        assert!(!constant_time_eq("ab", "abc"));
        assert!(!constant_time_eq("abc", "ABC"));
    }
}
