//! Gateway module - Failover selection and token fetching

pub mod selector;
pub mod token;
pub mod token_fetcher;

pub use selector::{GatewaySelector, HealthProbeResult, UnhealthyReason};
pub use token::{KnoxToken, TokenResponse};
pub use token_fetcher::{token_url, TokenFetcher, TOKEN_PATH, TOKEN_QUERY};
