//! Knox token response parsing

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::{AppError, Result};

/// Body returned by the Knox token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expiry as epoch milliseconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
}

/// Access token issued by a Knox gateway
#[derive(Clone, PartialEq, Eq)]
pub struct KnoxToken {
    access_token: String,
    pub token_type: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_id: Option<String>,
    pub target_url: Option<String>,
}

impl KnoxToken {
    /// Parse a token endpoint response body
    pub fn parse(body: &str) -> Result<Self> {
        let response: TokenResponse = serde_json::from_str(body)
            .map_err(|e| AppError::InvalidTokenResponse(e.to_string()))?;
        Self::try_from(response)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn into_access_token(self) -> String {
        self.access_token
    }

    /// Tokens without an expiry never report as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl TryFrom<TokenResponse> for KnoxToken {
    type Error = AppError;

    fn try_from(response: TokenResponse) -> Result<Self> {
        if response.access_token.trim().is_empty() {
            return Err(AppError::InvalidTokenResponse(
                "access_token is empty".to_string(),
            ));
        }

        let expires_at = match response.expires_in {
            Some(ms) => Some(Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
                AppError::InvalidTokenResponse(format!("expires_in out of range: {}", ms))
            })?),
            None => None,
        };

        Ok(Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at,
            token_id: response.token_id,
            target_url: response.target_url,
        })
    }
}

impl fmt::Debug for KnoxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnoxToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("token_id", &self.token_id)
            .field("target_url", &self.target_url)
            .finish()
    }
}
