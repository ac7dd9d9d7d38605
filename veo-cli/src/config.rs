//! Configuration module
//!
//! Holds the API target, polling schedule, and credential source.

use std::sync::Arc;

use veo_client::{CredentialProvider, EnvTokenProvider, StaticTokenProvider, VeoClient};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API target and polling schedule
    pub jobs: veo_jobs::Config,

    /// Token passed on the command line; the environment is read otherwise
    pub access_token: Option<String>,
}

impl Config {
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match &self.access_token {
            Some(token) => Arc::new(StaticTokenProvider::new(token.clone())),
            None => Arc::new(EnvTokenProvider),
        }
    }

    pub fn client(&self) -> VeoClient {
        self.jobs.client(self.credentials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flag_token_wins() {
        let config = Config {
            jobs: veo_jobs::Config::new("my-project".to_string()),
            access_token: Some("ya29.flag".to_string()),
        };

        assert_eq!(config.credentials().access_token().await.unwrap(), "ya29.flag");
        assert_eq!(config.client().project_id(), "my-project");
    }
}
