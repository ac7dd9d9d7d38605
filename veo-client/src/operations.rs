//! Long-running operation endpoints

use async_trait::async_trait;
use tracing::debug;
use veo_core::domain::operation::Operation;
use veo_core::dto::generation::{FetchOperationRequest, GenerateVideoRequest, SubmitResponse};

use crate::VeoClient;
use crate::error::{ClientError, Result};

/// Submission and status queries against the generation API
///
/// Both calls are single round trips with no retry logic. Implemented by
/// `VeoClient`; other implementations exist to drive the job lifecycle in
/// tests.
#[async_trait]
pub trait OperationClient: Send + Sync {
    /// Submits a generation request
    ///
    /// # Returns
    /// The operation handle identifying the long-running operation
    async fn submit(&self, request: &GenerateVideoRequest) -> Result<String>;

    /// Fetches the current snapshot of an operation
    async fn check_status(&self, operation_name: &str) -> Result<Operation>;
}

#[async_trait]
impl OperationClient for VeoClient {
    async fn submit(&self, request: &GenerateVideoRequest) -> Result<String> {
        let token = self.credentials.access_token().await?;
        let url = format!("{}:predictLongRunning", self.model_url());

        debug!("Submitting generation request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let submitted: SubmitResponse = self
            .handle_response(response, |status, message| {
                ClientError::submission(status, message)
            })
            .await?;

        Ok(submitted.name)
    }

    async fn check_status(&self, operation_name: &str) -> Result<Operation> {
        let token = self.credentials.access_token().await?;
        let url = format!("{}:fetchPredictOperation", self.model_url());

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&FetchOperationRequest {
                operation_name: operation_name.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response, |status, message| {
            ClientError::status_check(status, message)
        })
        .await
    }
}
