//! RFC 3986 percent-encoding of canonical query components.
//!
//! Every character outside `A-Za-z0-9-_.~` is percent-encoded and space
//! becomes `%20`, never `+`. This is stricter than form-encoding and is
//! applied uniformly to keys and values on both the signing and verifying
//! side, so the HMAC input is byte-identical across implementations.

use std::borrow::Cow;

use crate::error::{Result, SignedRequestError};

/// Percent-encode a single key or value.
pub(crate) fn encode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

/// Percent-decode a single key or value.
///
/// Decoding happens field by field after splitting the payload on `&` and
/// `=`, never on the whole payload at once: a value containing a literal
/// `&` or `=` would otherwise change the parameter structure after a
/// single decode pass.
pub(crate) fn decode_component(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|err| {
            SignedRequestError::MalformedPayload(format!(
                "component is not valid UTF-8 after percent-decoding: {err}"
            ))
        })
}

/// Encode one `key=value` pair for the canonical string.
pub(crate) fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(value))
}
