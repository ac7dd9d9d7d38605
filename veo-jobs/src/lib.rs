//! Veo Jobs
//!
//! Tracks video generation jobs from submission to their terminal outcome.
//!
//! Architecture:
//! - Configuration: API target and polling schedule
//! - Services: In-memory job store and snapshot reconciliation
//! - Scheduler: Submission, manual checks, and continuous polling loops
//!
//! Jobs exist only in memory and are lost when the process exits.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;

pub use config::{Config, PollingConfig};
pub use error::{LifecycleError, StoreError};
pub use scheduler::LifecycleManager;
pub use service::{JobEvent, JobPatch, JobStore};
