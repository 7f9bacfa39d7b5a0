//! runify library interface
//!
//! Builds a running-cadence playlist from an existing playlist on a music
//! streaming service. Exposes the pipeline stages for the binary and for
//! integration testing.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{Result, RunifyError};
