//! Veo HTTP Client
//!
//! A simple, type-safe HTTP client for the Vertex AI Veo long-running
//! prediction API.
//!
//! The client is stateless: every call fetches a token from its
//! `CredentialProvider`, performs exactly one HTTP round trip, and maps
//! non-success responses to typed errors. Retrying is left to the caller.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use veo_client::{EnvTokenProvider, OperationClient, VeoClient};
//! use veo_core::GenerationRequestBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VeoClient::new("my-project", Arc::new(EnvTokenProvider));
//!
//!     let request = GenerationRequestBuilder::new()
//!         .prompt("a dog running on the beach")
//!         .build()?;
//!
//!     let operation_name = client.submit(&request.payload).await?;
//!     println!("Submitted: {}", operation_name);
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod error;
mod operations;

// Re-export commonly used types
pub use credentials::{CredentialProvider, EnvTokenProvider, StaticTokenProvider};
pub use error::{ClientError, Result};
pub use operations::OperationClient;

use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default Vertex AI region
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Default Veo model
pub const DEFAULT_MODEL_ID: &str = "veo-3.0-generate-preview";

/// HTTP client for the Veo generation API
#[derive(Clone)]
pub struct VeoClient {
    /// API root including version (e.g., "https://us-central1-aiplatform.googleapis.com/v1")
    endpoint: String,
    project_id: String,
    location: String,
    model_id: String,
    credentials: Arc<dyn CredentialProvider>,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for VeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VeoClient")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl VeoClient {
    /// Create a new client for a project using the default region and model
    ///
    /// # Arguments
    /// * `project_id` - Google Cloud project that owns the generation quota
    /// * `credentials` - Source of bearer tokens
    pub fn new(project_id: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            endpoint: default_endpoint(DEFAULT_LOCATION),
            project_id: project_id.into(),
            location: DEFAULT_LOCATION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            credentials,
            client: Client::new(),
        }
    }

    /// Use another region
    ///
    /// The endpoint follows the region unless one was set explicitly with
    /// `with_endpoint` afterwards.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self.endpoint = default_endpoint(&self.location);
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Override the API root (e.g. for a proxy or a local test server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Use a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// URL of the model resource, without the `:method` suffix
    pub fn model_url(&self) -> String {
        format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}",
            self.endpoint, self.project_id, self.location, self.model_id
        )
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses are turned into an error with `on_error`, which
    /// receives the status code and the raw response body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        on_error: fn(u16, String) -> ClientError,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(on_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

fn default_endpoint(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com/v1", location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> VeoClient {
        VeoClient::new("my-project", Arc::new(StaticTokenProvider::new("token")))
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(
            client.endpoint(),
            "https://us-central1-aiplatform.googleapis.com/v1"
        );
        assert_eq!(client.model_id(), DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_model_url() {
        assert_eq!(
            client().model_url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-project/locations/us-central1/publishers/google/models/veo-3.0-generate-preview"
        );
    }

    #[test]
    fn test_location_moves_endpoint() {
        let client = client().with_location("europe-west4").with_model("veo-2.0-generate-001");
        assert_eq!(
            client.model_url(),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west4/publishers/google/models/veo-2.0-generate-001"
        );
    }

    #[test]
    fn test_endpoint_override_trims_trailing_slash() {
        let client = client().with_endpoint("http://localhost:8080/v1/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1");
    }
}
