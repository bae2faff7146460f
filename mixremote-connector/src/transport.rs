//! # Asynchronous HTTP Transport
//!
//! The connector issues every remote call through the [`AsyncHttpTransport`]
//! trait. Production code uses the reqwest-backed [`HttpTransport`];
//! tests substitute a mock that never touches the network.
//!
//! Constructing an [`HttpTransport`] is the startup capability check: if no
//! asynchronous HTTP client can be built for the configured endpoint, the
//! connector is never usable and construction fails loudly.

use crate::{config::Endpoint, error::ClientError, error::TransportError};
use async_trait::async_trait;

/// A trait abstracting over the asynchronous HTTP GET primitive.
///
/// This allows [`crate::client::ApiClient`] to be generic over the transport,
/// making it easy to use with both the live [`HttpTransport`] and a mock
/// implementation in tests.
#[async_trait]
pub trait AsyncHttpTransport: Send + Sync {
    /// Performs a GET request and returns the response body as text.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// The production transport: one reusable reqwest client for the lifetime
/// of the session.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds the transport for the given endpoint.
    ///
    /// Validates the configured base URL and constructs the underlying HTTP
    /// client. On failure an error-level notice is emitted and the transport
    /// is never created, leaving remote control disabled.
    pub fn new(endpoint: &Endpoint) -> Result<Self, ClientError> {
        if let Err(e) = reqwest::Url::parse(&endpoint.base_url) {
            tracing::error!(
                "remote control disabled: base URL `{}` is invalid: {}",
                endpoint.base_url,
                e
            );
            return Err(ClientError::InvalidEndpoint {
                url: endpoint.base_url.clone(),
                reason: e.to_string(),
            });
        }

        match reqwest::Client::builder().build() {
            Ok(http) => Ok(Self { http }),
            Err(e) => {
                tracing::error!("remote control disabled: no async HTTP transport: {}", e);
                Err(ClientError::TransportUnavailable(e))
            }
        }
    }
}

#[async_trait]
impl AsyncHttpTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response.text().await?)
    }
}
