//! Gateway selection with ordered health probing

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::CredentialProvider;
use crate::config::GatewayConfig;
use crate::transport::{GatewayRequest, HttpTransport};

/// Outcome of probing a single candidate gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthProbeResult {
    Healthy,
    Unhealthy(UnhealthyReason),
}

/// Why a candidate was considered unhealthy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnhealthyReason {
    /// The gateway answered with something other than 200
    Status(u16),
    /// The request never produced a response
    Transport(String),
}

impl HealthProbeResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthProbeResult::Healthy)
    }
}

/// Picks the first healthy gateway among the configured candidates
pub struct GatewaySelector {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialProvider>,
    verify_tls: bool,
}

impl GatewaySelector {
    /// Create a new selector; probes skip certificate verification by default
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            transport,
            credentials,
            verify_tls: false,
        }
    }

    pub fn with_tls_verification(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Select a gateway.
    ///
    /// A single candidate is returned without probing. Otherwise candidates
    /// are probed one at a time in configured order and the first one
    /// answering 200 wins. `None` when every candidate failed.
    pub async fn select_healthy_gateway(&self, gateways: &GatewayConfig) -> Option<String> {
        let candidates = gateways.candidates();

        if let [only] = candidates {
            debug!(gateway = %only, "Single gateway configured, skipping health probe");
            return Some(only.clone());
        }

        let authorization = match self.credentials.authorization().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "No credentials for health probes, probing unauthenticated");
                None
            }
        };

        for candidate in candidates {
            let result = self.probe_with(candidate, authorization.clone()).await;
            if result.is_healthy() {
                info!(gateway = %candidate, "Selected healthy Knox gateway");
                return Some(candidate.clone());
            }
        }

        warn!(
            candidates = candidates.len(),
            "No healthy Knox gateway among configured candidates"
        );
        None
    }

    /// Probe a single candidate
    pub async fn probe(&self, candidate: &str) -> HealthProbeResult {
        let authorization = self.credentials.authorization().await.ok();
        self.probe_with(candidate, authorization).await
    }

    async fn probe_with(&self, candidate: &str, authorization: Option<String>) -> HealthProbeResult {
        let request = GatewayRequest::get(candidate)
            .with_authorization(authorization)
            .with_tls_verification(self.verify_tls);

        match self.transport.execute(request).await {
            Ok(response) if response.status == 200 => {
                debug!(gateway = %candidate, "Health probe passed");
                HealthProbeResult::Healthy
            }
            Ok(response) => {
                warn!(
                    gateway = %candidate,
                    status = response.status,
                    "Health probe failed"
                );
                HealthProbeResult::Unhealthy(UnhealthyReason::Status(response.status))
            }
            Err(e) => {
                warn!(gateway = %candidate, error = %e, "Health probe failed");
                HealthProbeResult::Unhealthy(UnhealthyReason::Transport(e.to_string()))
            }
        }
    }
}
