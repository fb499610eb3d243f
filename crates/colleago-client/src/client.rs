//! Colleago HTTP client implementation.

use std::fmt;
use std::time::Duration;

use colleago_core::{RequestVerifier, SignedRequestParams};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Colleago API client.
///
/// Wraps the platform REST API: every request carries a
/// `Authorization: Bearer {app_id}_{app_secret}` header, replies are parsed
/// as JSON, and non-2xx replies are mapped onto the platform's
/// `{code, message}` error envelope. The client also validates inbound
/// signed requests with a verifier configured from the same credentials.
#[derive(Clone)]
pub struct ColleagoClient {
    client: Client,
    base_url: String,
    access_token: String,
    verifier: RequestVerifier,
}

/// Error envelope the platform returns on non-2xx replies.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    code: i64,
    message: String,
}

impl ColleagoClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`] when `app_id` or `app_secret` is
    /// empty, [`ClientError::Http`] when the underlying HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.app_id.is_empty() {
            return Err(ClientError::Configuration(
                "app_id must not be empty".to_owned(),
            ));
        }
        if config.app_secret.is_empty() {
            return Err(ClientError::Configuration(
                "app_secret must not be empty".to_owned(),
            ));
        }

        let verifier = RequestVerifier::new(&config.app_secret)?
            .with_encoding(config.signature_encoding)
            .with_window_seconds(config.signature_window_seconds);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}://{}", config.scheme, config.hostname.trim_end_matches('/')),
            access_token: format!("{}_{}", config.app_id, config.app_secret),
            verifier,
        })
    }

    /// Perform a GET request.
    ///
    /// `path` is the REST endpoint path starting with `/`, including any
    /// query parameters.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Api`] on
    /// an error reply.
    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        debug!(path, "GET request");
        let response = self
            .client
            .get(self.url(path))
            .header("authorization", self.bearer_header())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Perform a POST request with a JSON body.
    ///
    /// For action endpoints (generally those without a trailing slash) use
    /// [`post_action`](Self::post_action) instead, which submits form
    /// parameters rather than a JSON document.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Api`] on
    /// an error reply.
    pub async fn post(&self, path: &str, data: &Value) -> Result<Value, ClientError> {
        debug!(path, "POST request");
        let response = self
            .client
            .post(self.url(path))
            .header("authorization", self.bearer_header())
            .json(data)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Perform a POST request to an action endpoint with form-encoded
    /// parameters. Pass an empty slice when the action takes none.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Api`] on
    /// an error reply.
    pub async fn post_action(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        debug!(path, "POST action request");
        let response = self
            .client
            .post(self.url(path))
            .header("authorization", self.bearer_header())
            .form(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Perform a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Api`] on
    /// an error reply.
    pub async fn put(&self, path: &str, data: &Value) -> Result<Value, ClientError> {
        debug!(path, "PUT request");
        let response = self
            .client
            .put(self.url(path))
            .header("authorization", self.bearer_header())
            .json(data)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Perform a DELETE request.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure, [`ClientError::Api`] on
    /// an error reply.
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        debug!(path, "DELETE request");
        let response = self
            .client
            .delete(self.url(path))
            .header("authorization", self.bearer_header())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Perform a request with an arbitrary method and raw body, returning
    /// the status code and raw reply bytes without envelope handling.
    ///
    /// The typed wrappers cover the common endpoints; this is the escape
    /// hatch for anything else (binary downloads, unreleased endpoints).
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on transport failure. Error replies are NOT
    /// mapped onto the envelope here; the status code is returned as-is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<(u16, Vec<u8>), ClientError> {
        debug!(%method, path, "raw API request");
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header("authorization", self.bearer_header());
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok((status, body))
    }

    /// Validate an inbound signed request against this client's
    /// credentials.
    ///
    /// # Errors
    ///
    /// [`ClientError::SignedRequest`] carrying the rejection reason.
    pub fn validate_signed_request(
        &self,
        params: &SignedRequestParams,
    ) -> Result<(), ClientError> {
        Ok(self.verifier.validate(params)?)
    }

    /// Validate a raw signed-request payload byte-for-byte against this
    /// client's credentials.
    ///
    /// # Errors
    ///
    /// [`ClientError::SignedRequest`] carrying the rejection reason.
    pub fn validate_signed_payload(&self, payload: &str) -> Result<(), ClientError> {
        Ok(self.verifier.validate_payload(payload)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Parse a reply, mapping error statuses onto the platform envelope.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|_| {
                warn!(status = status.as_u16(), "API reply is not valid JSON");
                ClientError::unexpected_reply(status.as_u16())
            });
        }

        match serde_json::from_slice::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => {
                warn!(
                    status = status.as_u16(),
                    code = envelope.code,
                    "API returned an error"
                );
                Err(ClientError::Api {
                    code: envelope.code,
                    message: envelope.message,
                    status: status.as_u16(),
                })
            }
            Err(_) => {
                warn!(status = status.as_u16(), "API reply is not valid JSON");
                Err(ClientError::unexpected_reply(status.as_u16()))
            }
        }
    }
}

impl fmt::Debug for ColleagoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColleagoClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<REDACTED>")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
