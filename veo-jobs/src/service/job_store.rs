//! Job store
//!
//! In-memory, insertion-ordered collection of generation jobs. This is the
//! only writer of job status; observers read snapshots or subscribe to the
//! event stream.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;
use veo_core::domain::job::{GenerationJob, JobId, JobStatus};
use veo_core::domain::operation::Video;

use crate::error::StoreError;

/// Default broadcast channel capacity.
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Change to the mutable fields of a job
///
/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub result: Option<Vec<Video>>,
    pub failure_reason: Option<String>,
}

/// Notification sent to store subscribers
#[derive(Debug, Clone)]
pub enum JobEvent {
    Created(GenerationJob),
    Updated(GenerationJob),
    /// A continuous polling loop ended without the job reaching a terminal state
    PollingStopped { id: JobId, reason: String },
}

struct StoreState {
    jobs: HashMap<JobId, GenerationJob>,
    order: Vec<JobId>,
    disposed: bool,
}

/// In-memory job store backed by a broadcast channel for observers
pub struct JobStore {
    state: Mutex<StoreState>,
    tx: broadcast::Sender<JobEvent>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            state: Mutex::new(StoreState {
                jobs: HashMap::new(),
                order: Vec::new(),
                disposed: false,
            }),
            tx,
        }
    }

    /// Subscribe to job events. Each observer calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }

    /// Adds a new job
    ///
    /// Fails if the id or the operation handle is already tracked. Silently
    /// ignored once the store is disposed.
    pub fn create(&self, job: GenerationJob) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.disposed {
            return Ok(());
        }

        if state.jobs.contains_key(&job.id) {
            return Err(StoreError::DuplicateJob(job.id));
        }

        if state
            .jobs
            .values()
            .any(|existing| existing.operation_name == job.operation_name)
        {
            return Err(StoreError::DuplicateOperation(job.operation_name));
        }

        debug!(job_id = %job.id, operation = %job.operation_name, "Job created");

        state.order.push(job.id);
        state.jobs.insert(job.id, job.clone());
        drop(state);

        // Broadcast, ok if no observers are listening
        let _ = self.tx.send(JobEvent::Created(job));
        Ok(())
    }

    /// Applies a patch to the mutable fields of a job
    ///
    /// A patch moving the job to a terminal status must set `completed_at`
    /// plus `result` (completed) or `failure_reason` (failed), and a
    /// non-terminal patch must set none of them.
    ///
    /// # Returns
    /// The updated job, or `None` when the store is disposed (the write is
    /// dropped without error)
    pub fn update(&self, id: JobId, patch: JobPatch) -> Result<Option<GenerationJob>, StoreError> {
        self.update_with(id, |_| Some(patch))
    }

    /// Computes a patch from the current job and applies it atomically
    ///
    /// `f` sees the job as stored at the moment of the write, so concurrent
    /// readers (a manual check racing a polling loop) never apply a patch
    /// built from a stale copy. Returning `None` leaves the job unchanged.
    pub fn update_with<F>(&self, id: JobId, f: F) -> Result<Option<GenerationJob>, StoreError>
    where
        F: FnOnce(&GenerationJob) -> Option<JobPatch>,
    {
        let mut state = self.state();
        if state.disposed {
            return Ok(None);
        }

        let job = state.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let Some(patch) = f(job) else {
            return Ok(Some(job.clone()));
        };

        let next = patch.status.unwrap_or(job.status);
        if job.status.is_terminal() || !job.status.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                id,
                from: job.status,
                to: next,
            });
        }

        // The job is non-terminal here, so its outcome fields are all unset
        let outcome_matches = patch.completed_at.is_some() == next.is_terminal()
            && patch.result.is_some() == (next == JobStatus::Completed)
            && patch.failure_reason.is_some() == (next == JobStatus::Failed);
        if !outcome_matches {
            return Err(StoreError::InconsistentPatch { id, status: next });
        }

        job.status = next;
        if let Some(completed_at) = patch.completed_at {
            job.completed_at = Some(completed_at);
        }
        if let Some(last_polled_at) = patch.last_polled_at {
            job.last_polled_at = Some(last_polled_at);
        }
        if let Some(result) = patch.result {
            job.result = Some(result);
        }
        if let Some(failure_reason) = patch.failure_reason {
            job.failure_reason = Some(failure_reason);
        }

        let updated = job.clone();
        drop(state);

        let _ = self.tx.send(JobEvent::Updated(updated.clone()));
        Ok(Some(updated))
    }

    /// Tells observers that polling for a job stopped before it finished
    pub fn report_polling_stopped(&self, id: JobId, reason: impl Into<String>) {
        if self.state().disposed {
            return;
        }
        let _ = self.tx.send(JobEvent::PollingStopped {
            id,
            reason: reason.into(),
        });
    }

    pub fn get(&self, id: JobId) -> Option<GenerationJob> {
        self.state().jobs.get(&id).cloned()
    }

    /// Snapshot of all jobs in creation order
    pub fn list(&self) -> Vec<GenerationJob> {
        let state = self.state();
        state
            .order
            .iter()
            .filter_map(|id| state.jobs.get(id).cloned())
            .collect()
    }

    /// Jobs still pending or running
    pub fn active(&self) -> Vec<GenerationJob> {
        self.list()
            .into_iter()
            .filter(|job| !job.is_terminal())
            .collect()
    }

    /// Jobs that completed or failed
    pub fn finished(&self) -> Vec<GenerationJob> {
        self.list()
            .into_iter()
            .filter(GenerationJob::is_terminal)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tears the store down
    ///
    /// Existing jobs stay readable. Later writes are dropped silently and no
    /// further events are sent.
    pub fn dispose(&self) {
        self.state().disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.state().disposed
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // Critical sections never panic midway, so a poisoned lock still
        // holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
