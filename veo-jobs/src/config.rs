//! Job lifecycle configuration
//!
//! Defines the generation API target (project, region, model) and the
//! continuous polling schedule.

use std::sync::Arc;
use std::time::Duration;

use veo_client::{CredentialProvider, DEFAULT_LOCATION, DEFAULT_MODEL_ID, VeoClient};

/// Continuous polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay between two status checks of the same job
    pub poll_interval: Duration,

    /// Wait budget of one continuous polling loop, measured from its start
    pub max_wait: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Lifecycle configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Cloud project that owns the generation quota
    pub project_id: String,

    /// Vertex AI region (e.g., "us-central1")
    pub location: String,

    /// Veo model identifier
    pub model_id: String,

    /// API root override; derived from `location` when unset
    pub endpoint: Option<String>,

    pub polling: PollingConfig,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(project_id: String) -> Self {
        Self {
            project_id,
            location: DEFAULT_LOCATION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            endpoint: None,
            polling: PollingConfig::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - VEO_PROJECT_ID or GOOGLE_CLOUD_PROJECT (required)
    /// - VEO_LOCATION (optional, default: us-central1)
    /// - VEO_MODEL_ID (optional, default: veo-3.0-generate-preview)
    /// - VEO_ENDPOINT (optional)
    /// - VEO_POLL_INTERVAL (optional, seconds, default: 5)
    /// - VEO_MAX_WAIT (optional, seconds, default: 300)
    pub fn from_env() -> anyhow::Result<Self> {
        let project_id = std::env::var("VEO_PROJECT_ID")
            .or_else(|_| std::env::var("GOOGLE_CLOUD_PROJECT"))
            .map_err(|_| {
                anyhow::anyhow!("VEO_PROJECT_ID or GOOGLE_CLOUD_PROJECT environment variable not set")
            })?;

        Ok(Self::new(project_id).with_env_overrides())
    }

    /// Applies the optional environment variables read by `from_env`
    ///
    /// Unset or unparsable variables leave the current value in place.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(location) = std::env::var("VEO_LOCATION") {
            self.location = location;
        }

        if let Ok(model_id) = std::env::var("VEO_MODEL_ID") {
            self.model_id = model_id;
        }

        if let Ok(endpoint) = std::env::var("VEO_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(poll_interval) = env_secs("VEO_POLL_INTERVAL") {
            self.polling.poll_interval = poll_interval;
        }

        if let Some(max_wait) = env_secs("VEO_MAX_WAIT") {
            self.polling.max_wait = max_wait;
        }

        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.project_id.trim().is_empty() {
            anyhow::bail!("project_id cannot be empty");
        }

        if self.location.trim().is_empty() {
            anyhow::bail!("location cannot be empty");
        }

        if self.model_id.trim().is_empty() {
            anyhow::bail!("model_id cannot be empty");
        }

        let bad_endpoint = self
            .endpoint
            .as_deref()
            .is_some_and(|e| !e.starts_with("http://") && !e.starts_with("https://"));
        if bad_endpoint {
            anyhow::bail!("endpoint must start with http:// or https://");
        }

        if self.polling.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.polling.max_wait < self.polling.poll_interval {
            anyhow::bail!("max_wait must be at least one poll_interval");
        }

        Ok(())
    }

    /// Builds an HTTP client for the configured target
    pub fn client(&self, credentials: Arc<dyn CredentialProvider>) -> VeoClient {
        let client = VeoClient::new(self.project_id.clone(), credentials)
            .with_location(self.location.clone())
            .with_model(self.model_id.clone());

        match &self.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint.clone()),
            None => client,
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
