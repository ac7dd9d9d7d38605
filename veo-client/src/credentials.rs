//! Credential providers
//!
//! The client asks its provider for a bearer token once per outbound call.
//! Providers may cache internally; the client never does.

use async_trait::async_trait;

use crate::error::{ClientError, Result};

/// Environment variable read by `EnvTokenProvider`
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_CLOUD_ACCESS_TOKEN";

/// Source of bearer tokens for the generation API
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns a bearer token, or `ClientError::Auth` when none is available
    async fn access_token(&self) -> Result<String>;
}

/// Provider returning a fixed token
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ClientError::Auth("access token is empty".to_string()));
        }
        Ok(token.to_string())
    }
}

/// Provider reading `GOOGLE_CLOUD_ACCESS_TOKEN` on every call
#[derive(Debug, Clone, Default)]
pub struct EnvTokenProvider;

#[async_trait]
impl CredentialProvider for EnvTokenProvider {
    async fn access_token(&self) -> Result<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ClientError::Auth(format!("{} environment variable not set", ACCESS_TOKEN_ENV))
            })
    }
}
