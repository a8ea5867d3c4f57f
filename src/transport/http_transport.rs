//! reqwest-based transport

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::GatewaySettings;
use crate::error::{AppError, Result};
use crate::transport::traits::{GatewayRequest, GatewayResponse, HttpTransport};

/// HTTP transport backed by two reqwest clients, one per TLS policy
pub struct ReqwestTransport {
    verifying: Client,
    insecure: Client,
}

impl ReqwestTransport {
    /// Create a new transport from gateway configuration
    pub fn new(config: &GatewaySettings) -> Result<Self> {
        Self::with_timeouts(config.timeout(), config.connect_timeout())
    }

    pub fn with_timeouts(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let verifying = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        // Knox gateways are often fronted by internally issued certificates
        let insecure = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            verifying,
            insecure,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        let client = if request.verify_tls {
            &self.verifying
        } else {
            &self.insecure
        };

        let mut builder = client.get(&request.url);
        if let Some(authorization) = &request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(url = %request.url, status = status, "Gateway request completed");

        Ok(GatewayResponse { status, body })
    }
}
