//! Lifecycle manager
//!
//! Submits generation requests and drives their long-running operations to
//! a terminal state. A job can be checked once on demand, swept as part of
//! a tick over all unfinished jobs, or followed by a continuous polling loop
//! running in its own task.
//!
//! Status checks that fail and loops that run out of budget stop polling but
//! never mark a job `failed`; only the remote operation's own error does.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};
use veo_client::OperationClient;
use veo_core::GenerationRequest;
use veo_core::domain::job::{GenerationJob, JobId, JobStatus};

use crate::config::PollingConfig;
use crate::error::{LifecycleError, StoreError};
use crate::service::{JobStore, reconcile};

type ActiveLoops = Arc<Mutex<HashSet<JobId>>>;

/// Marks a job as having an active polling loop until dropped
struct LoopGuard {
    active: ActiveLoops,
    id: JobId,
}

impl LoopGuard {
    /// Returns `None` if a loop is already registered for `id`
    fn acquire(active: &ActiveLoops, id: JobId) -> Option<Self> {
        let inserted = active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);

        inserted.then(|| Self {
            active: Arc::clone(active),
            id,
        })
    }
}

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Orchestrates submission and polling of generation jobs
pub struct LifecycleManager {
    client: Arc<dyn OperationClient>,
    store: Arc<JobStore>,
    config: PollingConfig,
    active: ActiveLoops,
    shutdown: watch::Sender<bool>,
}

impl LifecycleManager {
    /// Creates a new lifecycle manager
    ///
    /// # Arguments
    /// * `client` - Operation client used for submissions and status checks
    /// * `store` - Store receiving every job this manager creates
    /// * `config` - Continuous polling schedule
    pub fn new(
        client: Arc<dyn OperationClient>,
        store: Arc<JobStore>,
        config: PollingConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            client,
            store,
            config,
            active: Arc::new(Mutex::new(HashSet::new())),
            shutdown,
        }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// Submits a request and records a `Pending` job for it
    ///
    /// Nothing is recorded when the submission fails.
    ///
    /// # Returns
    /// The id of the new job, to be passed to `start_polling` or `check_now`
    pub async fn submit(&self, request: GenerationRequest) -> Result<JobId, LifecycleError> {
        let operation_name = self.client.submit(&request.payload).await?;

        let job = GenerationJob::pending(operation_name, request.inputs);
        let id = job.id;

        info!(
            job_id = %id,
            operation = %job.operation_name,
            "Generation request accepted"
        );

        self.store.create(job)?;
        Ok(id)
    }

    /// Checks a job's operation once, outside any polling loop
    ///
    /// Terminal jobs are returned as stored without contacting the API.
    pub async fn check_now(&self, id: JobId) -> Result<GenerationJob, LifecycleError> {
        let job = self.store.get(id).ok_or(StoreError::NotFound(id))?;

        if job.is_terminal() {
            return Ok(job);
        }

        self.poll_once(&job).await
    }

    /// Checks every unfinished job once
    ///
    /// Jobs followed by a continuous loop are skipped so that no job is
    /// queried twice in the same round.
    pub async fn tick(&self) -> Vec<(JobId, Result<GenerationJob, LifecycleError>)> {
        let mut results = Vec::new();

        for job in self.store.active() {
            if self.is_polling(job.id) {
                continue;
            }

            let outcome = self.poll_once(&job).await;
            if let Err(e) = &outcome {
                warn!(job_id = %job.id, "Status check failed: {}", e);
            }
            results.push((job.id, outcome));
        }

        results
    }

    /// Starts a continuous polling loop for a job
    ///
    /// The loop checks the operation, waits `poll_interval`, and repeats
    /// until the job is terminal, the wait budget runs out, a status check
    /// fails, or the manager shuts down. The wait budget is a hard deadline:
    /// a status check still pending when it passes is abandoned.
    ///
    /// # Returns
    /// The loop's task handle, or `None` if a loop is already active for
    /// this job (the call is then a no-op)
    pub fn start_polling(
        self: &Arc<Self>,
        id: JobId,
    ) -> Option<JoinHandle<Result<GenerationJob, LifecycleError>>> {
        let Some(guard) = LoopGuard::acquire(&self.active, id) else {
            debug!(job_id = %id, "Polling already active");
            return None;
        };

        let manager = Arc::clone(self);
        Some(tokio::spawn(async move {
            let _guard = guard;
            manager.run_polling(id).await
        }))
    }

    /// Whether a continuous polling loop is active for a job
    pub fn is_polling(&self, id: JobId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Stops all polling loops and disposes the store
    ///
    /// Status checks already in flight finish, but their results are
    /// discarded.
    pub fn shutdown(&self) {
        info!("Shutting down job lifecycle");
        self.shutdown.send_replace(true);
        self.store.dispose();
    }

    fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    async fn run_polling(&self, id: JobId) -> Result<GenerationJob, LifecycleError> {
        let started = Instant::now();
        let deadline = started + self.config.max_wait;
        let mut shutdown = self.shutdown.subscribe();

        info!(
            job_id = %id,
            "Starting continuous polling (interval: {:?}, budget: {:?})",
            self.config.poll_interval, self.config.max_wait
        );

        let outcome = loop {
            if *shutdown.borrow() {
                break Err(LifecycleError::Cancelled(id));
            }

            if Instant::now() >= deadline {
                break Err(LifecycleError::PollTimeout {
                    job_id: id,
                    waited: started.elapsed(),
                });
            }

            let Some(job) = self.store.get(id) else {
                break Err(StoreError::NotFound(id).into());
            };

            if job.is_terminal() {
                break Ok(job);
            }

            // A hung status check counts against the budget too
            match time::timeout_at(deadline, self.poll_once(&job)).await {
                Ok(Ok(job)) if job.is_terminal() => break Ok(job),
                Ok(Ok(job)) => debug!(job_id = %id, status = %job.status, "Operation in progress"),
                Ok(Err(e)) => break Err(e),
                Err(_) => {
                    break Err(LifecycleError::PollTimeout {
                        job_id: id,
                        waited: started.elapsed(),
                    });
                }
            }

            let pause = self
                .config
                .poll_interval
                .min(deadline.saturating_duration_since(Instant::now()));

            tokio::select! {
                _ = time::sleep(pause) => {}
                _ = shutdown.changed() => {}
            }
        };

        match &outcome {
            Ok(job) => debug!(job_id = %id, status = %job.status, "Polling finished"),
            Err(LifecycleError::Cancelled(_)) => debug!(job_id = %id, "Polling cancelled"),
            Err(e) => {
                warn!(job_id = %id, "Polling stopped: {}", e);
                self.store.report_polling_stopped(id, e.to_string());
            }
        }

        outcome
    }

    /// One status check plus its reconciliation into the store
    async fn poll_once(&self, job: &GenerationJob) -> Result<GenerationJob, LifecycleError> {
        let snapshot = self.client.check_status(&job.operation_name).await?;

        if self.is_shut_down() {
            debug!(job_id = %job.id, "Discarding status check after shutdown");
            return Ok(job.clone());
        }

        let now = Utc::now();
        let updated = self
            .store
            .update_with(job.id, |current| reconcile(current, &snapshot, now))?
            .unwrap_or_else(|| job.clone());

        match updated.status {
            JobStatus::Completed if !job.is_terminal() => info!(
                job_id = %job.id,
                videos = updated.video_count(),
                "Generation completed"
            ),
            JobStatus::Failed if !job.is_terminal() => warn!(
                job_id = %job.id,
                "Generation failed: {}",
                updated.failure_reason.as_deref().unwrap_or("unknown error")
            ),
            _ => {}
        }

        Ok(updated)
    }
}
