//! Parameter sets exchanged in signed requests.
//!
//! A [`SignedRequestParams`] is an ordered mapping from parameter name to
//! string value. Keys iterate in lexicographic byte order regardless of
//! insertion order, which is the canonical ordering both sides of an
//! exchange sign over.

use std::collections::btree_map::{BTreeMap, Entry};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encode::{decode_component, encode_component, encode_pair};
use crate::error::{Result, SignedRequestError};

/// Parameter names that must be present on a complete inbound signed request.
pub const REQUIRED_PARAMS: [&str; 6] = [
    "appData",
    "issuedAt",
    "locale",
    "networkEID",
    "userEID",
    "signature",
];

/// Key under which the signature itself travels. Always excluded from the
/// canonical string the signature is computed over.
pub const SIGNATURE_PARAM: &str = "signature";

/// Timestamp format carried in `issuedAt`: ISO 8601 with millisecond
/// precision and an explicit numeric UTC offset, e.g.
/// `2014-04-02T13:20:09.066+0000`.
pub const ISSUED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

const ISSUED_AT_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Named string parameters of a signed request.
///
/// Values may be empty but never absent; an optional `role` key may appear
/// alongside the required set. The map is owned by the caller and is never
/// mutated by signing or verification — both operate on copies or filtered
/// views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedRequestParams {
    params: BTreeMap<String, String>,
}

impl SignedRequestParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a percent-encoded transport payload into a parameter set.
    ///
    /// The payload is split on `&` into segments and each segment on the
    /// first `=` into key and value, which are percent-decoded
    /// independently (never decode-then-split, so values containing a
    /// literal `&` or `=` survive).
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::MalformedPayload`] on segments without a `=`,
    /// duplicate keys, or components that do not decode to valid UTF-8.
    pub fn from_payload(payload: &str) -> Result<Self> {
        let mut params = BTreeMap::new();
        for segment in payload.split('&') {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(SignedRequestError::MalformedPayload(format!(
                    "segment {segment:?} is not a key=value pair"
                )));
            };
            let key = decode_component(key)?;
            let value = decode_component(value)?;
            match params.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(SignedRequestError::MalformedPayload(format!(
                        "duplicate parameter {:?}",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
        Ok(Self { params })
    }

    /// Insert or replace a parameter, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    /// Look up a parameter value by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The carried signature, if one is present.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_PARAM)
    }

    /// Whether a parameter with this name is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of parameters, the signature included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set holds no parameters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over all parameters in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The canonical string the signature is computed over: all parameters
    /// except `signature`, keys sorted lexicographically by byte value,
    /// each pair percent-encoded as `key=value` and joined with `&`.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        self.params
            .iter()
            .filter(|(key, _)| key.as_str() != SIGNATURE_PARAM)
            .map(|(key, value)| encode_pair(key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Serialize the set as a transport payload.
    ///
    /// Same shape as [`canonical_string`](Self::canonical_string), with the
    /// `signature` pair (when present) appended after all other parameters
    /// rather than sorted among them.
    #[must_use]
    pub fn to_payload(&self) -> String {
        let mut payload = self.canonical_string();
        if let Some(signature) = self.signature() {
            if !payload.is_empty() {
                payload.push('&');
            }
            payload.push_str(SIGNATURE_PARAM);
            payload.push('=');
            payload.push_str(&encode_component(signature));
        }
        payload
    }

    /// Names from [`REQUIRED_PARAMS`] that are absent from this set, in
    /// canonical order. Empty when the set is structurally complete.
    #[must_use]
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_PARAMS
            .iter()
            .filter(|key| !self.contains(key))
            .map(ToString::to_string)
            .collect()
    }

    /// Parse the `issuedAt` parameter into an absolute timestamp.
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::MissingParameters`] when the key is absent,
    /// [`SignedRequestError::InvalidTimestamp`] when it does not parse.
    pub fn issued_at(&self) -> Result<DateTime<Utc>> {
        let value = self
            .get("issuedAt")
            .ok_or_else(|| SignedRequestError::MissingParameters {
                missing: vec!["issuedAt".to_owned()],
            })?;
        parse_issued_at(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignedRequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SignedRequestParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.params
            .extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
    }
}

/// Parse an `issuedAt` timestamp string.
///
/// Accepts the millisecond [`ISSUED_AT_FORMAT`], the same format without a
/// fractional part, and RFC 3339 (colon offsets, `Z` suffix) as a fallback.
///
/// # Errors
///
/// [`SignedRequestError::InvalidTimestamp`] when no accepted format matches.
pub fn parse_issued_at(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(value, ISSUED_AT_FORMAT)
        .or_else(|_| DateTime::parse_from_str(value, ISSUED_AT_FORMAT_SECONDS))
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| SignedRequestError::InvalidTimestamp {
            value: value.to_owned(),
        })
}

/// Render a timestamp in the `issuedAt` wire format.
#[must_use]
pub fn format_issued_at(at: DateTime<Utc>) -> String {
    at.format(ISSUED_AT_FORMAT).to_string()
}
