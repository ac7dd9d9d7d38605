//! Core domain types
//!
//! This module contains the core domain structures used across Veo crates.
//! A `GenerationJob` is the local record of one submission; an `Operation` is
//! the remote system's read-only view of the same work.

pub mod job;
pub mod operation;
