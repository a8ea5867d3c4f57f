//! Fetches access tokens from the selected Knox gateway

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::auth::{CredentialProvider, NegotiateCredentials};
use crate::config::{GatewayConfig, Settings};
use crate::error::{AppError, Result};
use crate::gateway::selector::GatewaySelector;
use crate::gateway::token::KnoxToken;
use crate::transport::{GatewayRequest, HttpTransport, ReqwestTransport};

/// Token endpoint path, relative to the gateway base URL
pub const TOKEN_PATH: &str = "knoxtoken/api/v1/token";

/// Query sent with every token request
pub const TOKEN_QUERY: &str = "knox.token.include.groups=true";

/// Build the token endpoint URL for a gateway base URL
pub fn token_url(base_url: &str) -> String {
    let separator = if base_url.ends_with('/') { "" } else { "/" };
    format!("{}{}{}?{}", base_url, separator, TOKEN_PATH, TOKEN_QUERY)
}

/// Fetches tokens through the first healthy gateway
pub struct TokenFetcher {
    gateways: GatewayConfig,
    selector: GatewaySelector,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialProvider>,
    verify_tls: bool,
}

impl TokenFetcher {
    /// Create a fetcher; token requests skip certificate verification
    pub fn new(
        gateways: GatewayConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            gateways,
            selector: GatewaySelector::new(transport.clone(), credentials.clone()),
            transport,
            credentials,
            verify_tls: false,
        }
    }

    /// Wire a fetcher from settings with the reqwest transport
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let gateways = settings.gateway_config()?;
        let transport = Arc::new(ReqwestTransport::new(&settings.gateway)?);
        let credentials = Arc::new(NegotiateCredentials::from_config(&settings.credentials)?);

        Ok(Self::new(gateways, transport, credentials).with_tls_verification(settings.gateway.verify_tls))
    }

    pub fn with_tls_verification(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self.selector = self.selector.with_tls_verification(verify_tls);
        self
    }

    /// Fetch a token from the first healthy configured gateway
    pub async fn fetch_token(&self) -> Result<KnoxToken> {
        self.fetch_token_from(&self.gateways).await
    }

    /// Fetch a token from the first healthy gateway among `gateways`.
    ///
    /// The candidate list is read on every call, so callers holding live
    /// configuration can pass the current value instead of rebuilding the
    /// fetcher.
    #[instrument(skip(self, gateways), fields(candidates = gateways.len()))]
    pub async fn fetch_token_from(&self, gateways: &GatewayConfig) -> Result<KnoxToken> {
        let base_url = self
            .selector
            .select_healthy_gateway(gateways)
            .await
            .ok_or_else(|| AppError::NoHealthyGateway(gateways.candidates().to_vec()))?;

        let url = token_url(&base_url);
        let authorization = self.credentials.authorization().await?;

        if !self.verify_tls {
            debug!(gateway = %base_url, "TLS certificate verification disabled for token request");
        }

        let request = GatewayRequest::get(url.clone())
            .with_authorization(Some(authorization))
            .with_tls_verification(self.verify_tls);

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Token request rejected");
            return Err(AppError::TokenEndpoint {
                status: response.status,
                body: response.body,
            });
        }

        let token = KnoxToken::parse(&response.body)?;
        info!(
            gateway = %base_url,
            expires_at = ?token.expires_at,
            "Fetched Knox token"
        );

        Ok(token)
    }

    /// Fetch only the raw access token string
    pub async fn fetch_jwt(&self) -> Result<String> {
        Ok(self.fetch_token().await?.into_access_token())
    }
}
