//! Common traits and types for talking to Knox gateways

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;

/// An outbound GET request to a gateway
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    /// Fully built request URL
    pub url: String,

    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,

    /// Whether the server certificate must be verified
    pub verify_tls: bool,
}

impl GatewayRequest {
    /// Unauthenticated GET with certificate verification enabled
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            authorization: None,
            verify_tls: true,
        }
    }

    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn with_tls_verification(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }
}

impl fmt::Debug for GatewayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRequest")
            .field("url", &self.url)
            .field("authorization", &self.authorization.as_ref().map(|_| "[REDACTED]"))
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// Status and body of a gateway response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything able to perform a single GET against a gateway.
///
/// Implementations report transport failures as errors and every HTTP status,
/// including 4xx/5xx, as a response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse>;
}
