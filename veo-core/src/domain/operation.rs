//! Remote operation snapshot types
//!
//! An `Operation` is fetched fresh on every status check and is never
//! modified locally; reconciliation only reads it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Snapshot of a long-running operation as reported by the generation API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Opaque operation handle
    pub name: String,
    /// Absent on the wire until the operation finishes
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
}

impl Operation {
    /// Classifies the snapshot into the three outcomes reconciliation cares about
    pub fn outcome(&self) -> OperationOutcome<'_> {
        if !self.done {
            return OperationOutcome::InProgress;
        }

        match &self.error {
            Some(error) => OperationOutcome::Failed(error),
            None => OperationOutcome::Succeeded(self.artifacts()),
        }
    }

    /// Produced videos, empty when the response carries none
    pub fn artifacts(&self) -> &[Video] {
        self.response
            .as_ref()
            .map(|r| r.predictions.as_slice())
            .unwrap_or(&[])
    }
}

/// Outcome view of an `Operation` snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationOutcome<'a> {
    InProgress,
    Succeeded(&'a [Video]),
    Failed(&'a OperationError),
}

/// Error payload reported by the remote operation itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationResponse {
    // Newer API versions name this field `videos`
    #[serde(default, alias = "videos")]
    pub predictions: Vec<Video>,
}

/// A produced video: either a storage reference or inline base64 bytes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "gcsUri")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Video {
    /// Decodes inline video bytes
    ///
    /// Returns `None` when the video is only available as a storage reference.
    pub fn decode_bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.bytes_base64_encoded
            .as_deref()
            .map(|encoded| STANDARD.decode(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_done_means_in_progress() {
        let op: Operation = serde_json::from_str(r#"{"name":"op-123"}"#).unwrap();
        assert!(!op.done);
        assert_eq!(op.outcome(), OperationOutcome::InProgress);
    }

    #[test]
    fn test_done_with_predictions() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op-123","done":true,"response":{"predictions":[{"uri":"gs://b/v.mp4"}]}}"#,
        )
        .unwrap();

        match op.outcome() {
            OperationOutcome::Succeeded(videos) => {
                assert_eq!(videos.len(), 1);
                assert_eq!(videos[0].uri.as_deref(), Some("gs://b/v.mp4"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_done_without_response_is_empty_success() {
        let op: Operation = serde_json::from_str(r#"{"name":"op-1","done":true}"#).unwrap();
        assert_eq!(op.outcome(), OperationOutcome::Succeeded(&[]));
    }

    #[test]
    fn test_error_wins_over_response() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op-1","done":true,"error":{"code":403,"message":"API not enabled"},"response":{"predictions":[]}}"#,
        )
        .unwrap();

        match op.outcome() {
            OperationOutcome::Failed(error) => {
                assert_eq!(error.code, 403);
                assert_eq!(error.message, "API not enabled");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_videos_alias_and_gcs_uri() {
        let op: Operation = serde_json::from_str(
            r#"{"name":"op-1","done":true,"response":{"videos":[{"gcsUri":"gs://b/a.mp4","mimeType":"video/mp4"}]}}"#,
        )
        .unwrap();

        let videos = op.artifacts();
        assert_eq!(videos[0].uri.as_deref(), Some("gs://b/a.mp4"));
        assert_eq!(videos[0].mime_type.as_deref(), Some("video/mp4"));
    }

    #[test]
    fn test_decode_inline_bytes() {
        let video = Video {
            bytes_base64_encoded: Some("AAEC".to_string()),
            ..Default::default()
        };
        assert_eq!(video.decode_bytes().unwrap().unwrap(), vec![0u8, 1, 2]);

        let reference = Video {
            uri: Some("gs://b/v.mp4".to_string()),
            ..Default::default()
        };
        assert!(reference.decode_bytes().is_none());
    }
}
