//! Generation DTOs
//!
//! Bodies for the `predictLongRunning` submission and the
//! `fetchPredictOperation` status query.

use serde::{Deserialize, Serialize};

/// Body of a `predictLongRunning` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateVideoRequest {
    pub instances: Vec<PromptInstance>,
    pub parameters: GenerationParameters,
}

/// One prompt, optionally anchored on a source image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
}

/// Inline image payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

/// Generation parameters sent alongside the instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// Number of videos to produce (1-4)
    pub sample_count: u8,
    /// Video length in seconds (5-8)
    pub duration_seconds: u8,
    pub enhance_prompt: bool,
    /// Cloud Storage prefix for outputs; videos come back inline when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_uri: Option<String>,
}

/// Response of a `predictLongRunning` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Operation handle
    pub name: String,
}

/// Body of a `fetchPredictOperation` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOperationRequest {
    pub operation_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_wire_shape() {
        let request = GenerateVideoRequest {
            instances: vec![PromptInstance {
                prompt: Some("a dog running".to_string()),
                image: None,
            }],
            parameters: GenerationParameters {
                sample_count: 1,
                duration_seconds: 5,
                enhance_prompt: true,
                storage_uri: None,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "instances": [{ "prompt": "a dog running" }],
                "parameters": { "sampleCount": 1, "durationSeconds": 5, "enhancePrompt": true }
            })
        );
    }

    #[test]
    fn test_fetch_request_uses_operation_name_key() {
        let body = FetchOperationRequest {
            operation_name: "projects/p/operations/op-123".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "projects/p/operations/op-123");
    }
}
