//! Service layer
//!
//! The job store holds every tracked job and is the single writer of job
//! status. Reconciliation decides how a remote snapshot changes a job.

mod job_store;
mod reconcile;

pub use job_store::{JobEvent, JobPatch, JobStore};
pub use reconcile::reconcile;
