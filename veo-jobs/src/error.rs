//! Error types for job tracking

use std::time::Duration;

use thiserror::Error;
use veo_client::ClientError;
use veo_core::domain::job::{JobId, JobStatus};

/// Misuse of the job store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job {0} already exists")]
    DuplicateJob(JobId),

    #[error("Operation {0} is already tracked by another job")]
    DuplicateOperation(String),

    #[error("Invalid status transition for job {id}: {from} -> {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Patch for job {id} does not carry the outcome fields of status {status}")]
    InconsistentPatch { id: JobId, status: JobStatus },
}

/// Failures surfaced by the lifecycle manager
///
/// None of these mark a job `failed`: only an error payload from the remote
/// operation does that.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Job {job_id} did not finish within {}s; status unknown", .waited.as_secs())]
    PollTimeout { job_id: JobId, waited: Duration },

    #[error("Polling for job {0} was cancelled")]
    Cancelled(JobId),
}

impl LifecycleError {
    /// Whether we lost track of the job rather than learning it failed
    ///
    /// True for timeouts and failed status checks. The remote operation may
    /// still finish; a later check or a new polling loop can pick it up.
    pub fn is_status_unknown(&self) -> bool {
        match self {
            Self::PollTimeout { .. } => true,
            Self::Client(ClientError::StatusCheck { .. })
            | Self::Client(ClientError::RequestFailed(_))
            | Self::Client(ClientError::ParseError(_)) => true,
            _ => false,
        }
    }
}
