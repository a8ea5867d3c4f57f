//! Common error types for the Knox token client

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Failure reported by an `HttpTransport` that is not backed by reqwest
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("No healthy Knox gateway available (tried: {})", .0.join(", "))]
    NoHealthyGateway(Vec<String>),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be shown to an end user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::NoHealthyGateway(_))
    }

    /// Message suitable for display to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoHealthyGateway(_) => {
                "Knox URL is not available. Check that at least one Knox gateway is reachable."
                    .to_string()
            }
            AppError::TokenEndpoint { status, .. } => {
                format!("Knox gateway rejected the token request ({})", status)
            }
            AppError::InvalidTokenResponse(_) => {
                "Knox gateway returned an unreadable token response".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
