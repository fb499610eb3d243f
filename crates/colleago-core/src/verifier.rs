//! Verification of inbound signed requests.
//!
//! A verification call walks three checks in order and stops at the first
//! failure: structural completeness, signature match, then the issue-time
//! window. Each rejection reason maps to its own [`SignedRequestError`]
//! variant so callers can tell a forged signature from a stale one.

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::{Clock, SystemClock};
use crate::crypto::{constant_time_eq, SignatureEncoding};
use crate::error::{Result, SignedRequestError};
use crate::params::SignedRequestParams;
use crate::signer::RequestSigner;

/// Window applied when none is configured, in seconds.
pub const DEFAULT_SIGNATURE_WINDOW_SECS: u64 = 60;

/// Authenticates inbound parameter sets against a shared secret and a
/// backward-looking freshness window.
///
/// Configuration is fixed at construction, so a single verifier can serve
/// concurrent validation calls without locking. The clock is injectable for
/// deterministic window tests; production code uses the [`SystemClock`]
/// default.
///
/// A timestamp is accepted iff `0 <= now - issuedAt <= window`: requests
/// from the future are rejected outright, the window only reaches
/// backward. An optional signed skew adjustment is added to `now` before
/// the comparison for deployments with known clock drift; the default is
/// no adjustment.
#[derive(Debug, Clone)]
pub struct RequestVerifier<C: Clock = SystemClock> {
    signer: RequestSigner,
    window_seconds: u64,
    skew_adjustment_seconds: i64,
    clock: C,
}

impl RequestVerifier<SystemClock> {
    /// Create a verifier for the given shared secret with the default
    /// 60-second window, no skew adjustment, base64 signatures, and the
    /// system clock.
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::InvalidConfiguration`] when the secret is
    /// empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        Ok(Self {
            signer: RequestSigner::new(secret)?,
            window_seconds: DEFAULT_SIGNATURE_WINDOW_SECS,
            skew_adjustment_seconds: 0,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> RequestVerifier<C> {
    /// Switch the digest encoding expected signatures are rendered in.
    #[must_use]
    pub fn with_encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.signer = self.signer.with_encoding(encoding);
        self
    }

    /// Override the freshness window.
    #[must_use]
    pub fn with_window_seconds(mut self, seconds: u64) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Add a signed clock-skew adjustment to `now` before the window
    /// comparison. Positive values shift `now` forward.
    #[must_use]
    pub fn with_skew_adjustment_seconds(mut self, seconds: i64) -> Self {
        self.skew_adjustment_seconds = seconds;
        self
    }

    /// Replace the clock source.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> RequestVerifier<D> {
        RequestVerifier {
            signer: self.signer,
            window_seconds: self.window_seconds,
            skew_adjustment_seconds: self.skew_adjustment_seconds,
            clock,
        }
    }

    /// Validate a parameter set.
    ///
    /// The caller's set is only read, never mutated. The clock is sampled
    /// exactly once per call, before any comparison, so a verification
    /// cannot straddle the window boundary mid-check.
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::MissingParameters`] when required keys are
    /// absent, [`SignedRequestError::InvalidSignature`] on signature
    /// mismatch, [`SignedRequestError::InvalidTimestamp`] when `issuedAt`
    /// does not parse, and [`SignedRequestError::ExpiredSignature`] when it
    /// parses but falls outside the window in either direction.
    pub fn validate(&self, params: &SignedRequestParams) -> Result<()> {
        let now = self.adjusted_now()?;

        let missing = params.missing_required();
        if !missing.is_empty() {
            return Err(SignedRequestError::MissingParameters { missing });
        }

        let expected = self.signer.compute_signature(params)?;
        let supplied = params
            .signature()
            .ok_or_else(|| SignedRequestError::MissingParameters {
                missing: vec!["signature".to_owned()],
            })?;
        if !constant_time_eq(&expected, supplied) {
            return Err(SignedRequestError::InvalidSignature);
        }

        self.check_window(params.issued_at()?, now)
    }

    /// Validate a raw transport payload byte-for-byte.
    ///
    /// The stricter legacy calling convention: the payload is parsed and
    /// validated like [`validate`](Self::validate), and additionally
    /// re-serialized in canonical form and compared against the input
    /// string. A payload that decodes to valid parameters but was not
    /// canonically encoded (unsorted keys, signature not in final
    /// position, non-canonical escapes) is rejected as
    /// [`SignedRequestError::InvalidSignature`].
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::MalformedPayload`] when the payload does not
    /// split into parameters, plus every rejection
    /// [`validate`](Self::validate) can produce.
    pub fn validate_payload(&self, payload: &str) -> Result<()> {
        let params = SignedRequestParams::from_payload(payload)?;
        self.validate(&params)?;
        if !constant_time_eq(&params.to_payload(), payload) {
            return Err(SignedRequestError::InvalidSignature);
        }
        Ok(())
    }

    /// Boolean convenience over [`validate`](Self::validate), collapsing
    /// every rejection reason to `false`.
    #[must_use]
    pub fn is_valid(&self, params: &SignedRequestParams) -> bool {
        self.validate(params).is_ok()
    }

    fn check_window(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        let window = i64::try_from(self.window_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                SignedRequestError::InvalidConfiguration(format!(
                    "signature window of {} seconds is out of range",
                    self.window_seconds
                ))
            })?;

        let age = now.signed_duration_since(issued_at);
        if age < TimeDelta::zero() || age > window {
            return Err(SignedRequestError::ExpiredSignature {
                age_seconds: age.num_seconds(),
            });
        }
        Ok(())
    }

    fn adjusted_now(&self) -> Result<DateTime<Utc>> {
        let skew = TimeDelta::try_seconds(self.skew_adjustment_seconds).ok_or_else(|| {
            SignedRequestError::InvalidConfiguration(format!(
                "clock skew adjustment of {} seconds is out of range",
                self.skew_adjustment_seconds
            ))
        })?;
        self.clock.now().checked_add_signed(skew).ok_or_else(|| {
            SignedRequestError::InvalidConfiguration(
                "clock skew adjustment overflows the representable time range".to_owned(),
            )
        })
    }
}
