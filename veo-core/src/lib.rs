//! Veo Core
//!
//! Core types and abstractions for Veo video generation jobs.
//!
//! This crate contains:
//! - Domain types: Generation jobs and remote operation snapshots
//! - DTOs: Wire payloads exchanged with the generation API
//! - Request building: Validated construction of generation requests

pub mod domain;
pub mod dto;
pub mod request;

pub use request::{GenerationRequest, GenerationRequestBuilder, JobInputs, ValidationError};
