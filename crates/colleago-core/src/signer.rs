//! Signature production for outbound signed requests.

use std::fmt;

use crate::crypto::{hmac_sha256, SignatureEncoding};
use crate::error::{Result, SignedRequestError};
use crate::params::{SignedRequestParams, REQUIRED_PARAMS, SIGNATURE_PARAM};

/// Computes HMAC-SHA256 signatures over canonical parameter strings.
///
/// The secret and digest encoding are fixed at construction and the signer
/// holds no other state, so one instance can be shared freely across
/// threads and calls.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
    encoding: SignatureEncoding,
}

impl RequestSigner {
    /// Create a signer for the given shared secret, using the default
    /// [`SignatureEncoding::Base64`] digest encoding.
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::InvalidConfiguration`] when the secret is
    /// empty.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SignedRequestError::InvalidConfiguration(
                "signing secret must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            secret,
            encoding: SignatureEncoding::default(),
        })
    }

    /// Switch the digest encoding. Both sides of a deployment must use the
    /// same encoding; it is not negotiated per request.
    #[must_use]
    pub fn with_encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The digest encoding this signer renders signatures in.
    #[must_use]
    pub fn encoding(&self) -> SignatureEncoding {
        self.encoding
    }

    /// Compute the signature for a parameter set.
    ///
    /// Any `signature` entry already present is excluded from the canonical
    /// string, so signing an already-signed set reproduces the original
    /// signature.
    ///
    /// # Errors
    ///
    /// [`SignedRequestError::MissingParameters`] when the set carries no
    /// parameters to sign.
    pub fn compute_signature(&self, params: &SignedRequestParams) -> Result<String> {
        if params.is_empty() {
            return Err(SignedRequestError::MissingParameters {
                missing: REQUIRED_PARAMS.iter().map(ToString::to_string).collect(),
            });
        }
        let digest = hmac_sha256(&self.secret, &params.canonical_string());
        Ok(self.encoding.encode(&digest))
    }

    /// Return a copy of `params` with the `signature` parameter set.
    ///
    /// The caller's set is left untouched.
    ///
    /// # Errors
    ///
    /// Same conditions as [`compute_signature`](Self::compute_signature).
    pub fn sign(&self, params: &SignedRequestParams) -> Result<SignedRequestParams> {
        let signature = self.compute_signature(params)?;
        let mut signed = params.clone();
        signed.insert(SIGNATURE_PARAM, signature);
        Ok(signed)
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<REDACTED>")
            .field("encoding", &self.encoding)
            .finish()
    }
}
