//! Colleago client SDK.
//!
//! This crate provides the REST client third-party applications use to talk
//! to the Colleago platform API, plus signed-request validation wired to the
//! same credentials.
//!
//! # Example
//!
//! ```no_run
//! use colleago_client::{ClientConfig, ColleagoClient};
//!
//! # async fn example() -> Result<(), colleago_client::ClientError> {
//! let client = ColleagoClient::new(ClientConfig::new("my-app-id", "my-app-secret"))?;
//!
//! // Call the REST API.
//! let timeline = client
//!     .get("/networks/08e1e1eadc000e6c/timeline/?embed=messages.author")
//!     .await?;
//! println!("newest message: {}", timeline["messages"][0]["body"]);
//!
//! // Authenticate a signed request the platform delivered to this app.
//! let payload = "appData=&issuedAt=2014-04-02T13%3A20%3A09.066%2B0000\
//!                &locale=en-US&networkEID=08e1e1eadc000e6c\
//!                &userEID=08e1e1eead0dc968&signature=...";
//! client.validate_signed_payload(payload)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;

pub use client::ColleagoClient;
pub use config::{ClientConfig, DEFAULT_HOSTNAME, DEFAULT_TIMEOUT_SECONDS};
pub use error::{ClientError, UNEXPECTED_REPLY_CODE};

pub use colleago_core::{
    RequestSigner, RequestVerifier, SignatureEncoding, SignedRequestError, SignedRequestParams,
};
pub use reqwest::Method;
