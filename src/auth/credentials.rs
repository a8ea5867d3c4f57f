//! Credential providers producing `Authorization: Negotiate` values
//!
//! The Kerberos handshake itself happens outside this crate: a provider is
//! handed an already obtained SPNEGO token (or a file holding one) and only
//! formats it for the HTTP header.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use std::path::Path;

use crate::config::CredentialsConfig;
use crate::error::{AppError, Result};

/// Supplies the `Authorization` header value for gateway requests
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authorization(&self) -> Result<String>;
}

/// Static SPNEGO token sent with the `Negotiate` scheme
#[derive(Clone)]
pub struct NegotiateCredentials {
    token: String,
}

impl NegotiateCredentials {
    /// Use an already base64 encoded token
    pub fn from_base64(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Credentials("Negotiate token is empty".to_string()));
        }

        STANDARD
            .decode(token)
            .map_err(|e| AppError::Credentials(format!("Invalid base64 Negotiate token: {}", e)))?;

        Ok(Self {
            token: token.to_string(),
        })
    }

    /// Encode raw token bytes
    pub fn from_token_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(AppError::Credentials("Negotiate token is empty".to_string()));
        }

        Ok(Self {
            token: STANDARD.encode(bytes),
        })
    }

    /// Read raw token bytes from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            AppError::Credentials(format!(
                "Failed to read Negotiate token from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_token_bytes(&bytes)
    }

    /// Build from configuration; an inline token wins over a token file
    pub fn from_config(config: &CredentialsConfig) -> Result<Self> {
        if let Some(token) = &config.negotiate_token {
            return Self::from_base64(token);
        }

        if let Some(path) = &config.negotiate_token_file {
            return Self::from_file(path);
        }

        Err(AppError::Credentials(
            "No Negotiate token configured (set credentials.negotiate_token or credentials.negotiate_token_file)"
                .to_string(),
        ))
    }
}

impl fmt::Debug for NegotiateCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegotiateCredentials")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for NegotiateCredentials {
    async fn authorization(&self) -> Result<String> {
        Ok(format!("Negotiate {}", self.token))
    }
}
