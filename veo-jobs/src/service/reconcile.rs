//! Operation reconciliation
//!
//! Translates a remote operation snapshot into a patch for the local job.

use chrono::{DateTime, Utc};
use veo_core::domain::job::{GenerationJob, JobStatus};
use veo_core::domain::operation::{Operation, OperationOutcome};

use crate::service::job_store::JobPatch;

/// Computes the patch a snapshot implies for a job
///
/// Terminal jobs never change, so they yield `None`. An unfinished operation
/// moves the job to `Running` and stamps `last_polled_at`. A finished one
/// completes the job with its artifacts (possibly none) or fails it with the
/// remote error message.
pub fn reconcile(job: &GenerationJob, snapshot: &Operation, now: DateTime<Utc>) -> Option<JobPatch> {
    if job.is_terminal() {
        return None;
    }

    let patch = match snapshot.outcome() {
        OperationOutcome::InProgress => JobPatch {
            status: Some(JobStatus::Running),
            last_polled_at: Some(now),
            ..Default::default()
        },
        OperationOutcome::Succeeded(videos) => JobPatch {
            status: Some(JobStatus::Completed),
            completed_at: Some(now),
            last_polled_at: Some(now),
            result: Some(videos.to_vec()),
            ..Default::default()
        },
        OperationOutcome::Failed(error) => JobPatch {
            status: Some(JobStatus::Failed),
            completed_at: Some(now),
            last_polled_at: Some(now),
            failure_reason: Some(error.message.clone()),
            ..Default::default()
        },
    };

    Some(patch)
}
