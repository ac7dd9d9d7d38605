//! Scheduler layer
//!
//! This layer submits generation requests and drives each job's remote
//! operation to a terminal state, either on demand or through a continuous
//! polling loop per job.

pub mod lifecycle;

pub use lifecycle::LifecycleManager;
