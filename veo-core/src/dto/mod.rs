//! Data Transfer Objects for the generation API
//!
//! DTOs mirror the JSON bodies of the `predictLongRunning` and
//! `fetchPredictOperation` calls. Field names are camelCase on the wire.

pub mod generation;
