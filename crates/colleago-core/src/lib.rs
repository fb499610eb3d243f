//! Signed-request construction and verification for the Colleago platform.
//!
//! This crate implements the shared-secret protocol a host network and a
//! third-party application use to authenticate payloads to each other:
//!
//! - **Parameters**: `SignedRequestParams`, the named string values of a
//!   request, with payload parsing and canonical serialization
//! - **Signing**: `RequestSigner`, HMAC-SHA256 over the canonical string,
//!   rendered as base64 or hex via `SignatureEncoding`
//! - **Verification**: `RequestVerifier`, structural, signature, and
//!   freshness-window checks with typed rejection reasons
//! - **Clocks**: `Clock`, `SystemClock`, `FixedClock` for deterministic
//!   window tests
//!
//! # Canonical form
//!
//! Both sides sign the same byte string: parameters sorted
//! lexicographically by key, `signature` excluded, keys and values
//! percent-encoded per RFC 3986 (space is `%20`, never `+`), pairs joined
//! as `key=value` with `&`. On the wire the signature pair is appended
//! after the sorted parameters. A request is fresh iff its `issuedAt` lies
//! at most the configured window (default 60 seconds) in the past and not
//! in the future at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
mod crypto;
mod encode;
pub mod error;
pub mod params;
pub mod signer;
pub mod verifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use crypto::SignatureEncoding;
pub use error::{Result, SignedRequestError};
pub use params::{
    format_issued_at, parse_issued_at, SignedRequestParams, ISSUED_AT_FORMAT, REQUIRED_PARAMS,
    SIGNATURE_PARAM,
};
pub use signer::RequestSigner;
pub use verifier::{RequestVerifier, DEFAULT_SIGNATURE_WINDOW_SECS};
