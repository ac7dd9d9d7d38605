//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::operation::Video;
use crate::dto::generation::GenerationParameters;
use crate::request::JobInputs;

/// Client-generated job identifier
pub type JobId = Uuid;

/// Local record of one video generation request and its outcome
///
/// `id`, `operation_name`, and the inputs are fixed at creation. The remaining
/// fields only change through reconciliation with the remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: JobId,
    pub operation_name: String,
    pub status: JobStatus,
    pub prompt: String,
    pub source_image: Option<SourceImageRef>,
    pub parameters: GenerationParameters,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub result: Option<Vec<Video>>,
    pub failure_reason: Option<String>,
}

impl GenerationJob {
    /// Creates a `Pending` job for an accepted submission
    pub fn pending(operation_name: impl Into<String>, inputs: JobInputs) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_name: operation_name.into(),
            status: JobStatus::Pending,
            prompt: inputs.prompt,
            source_image: inputs.source_image,
            parameters: inputs.parameters,
            created_at: Utc::now(),
            completed_at: None,
            last_polled_at: None,
            result: None,
            failure_reason: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Number of produced artifacts, zero unless completed
    pub fn video_count(&self) -> usize {
        self.result.as_ref().map_or(0, Vec::len)
    }
}

/// Job lifecycle status
///
/// `Pending` and `Running` are non-terminal. `Completed` and `Failed` are
/// terminal and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` respects the state machine
    ///
    /// Status never regresses: a running job cannot become pending again and
    /// a terminal job cannot move at all. Staying in the same non-terminal
    /// state is allowed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, _) => true,
            (JobStatus::Running, JobStatus::Pending) => false,
            (JobStatus::Running, _) => true,
            (JobStatus::Completed, _) | (JobStatus::Failed, _) => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Reference to the image a job was generated from
///
/// Only metadata is kept; the encoded bytes live in the submitted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImageRef {
    pub mime_type: String,
    pub size_bytes: usize,
    pub label: Option<String>,
}
