//! # runify common library
//!
//! Shared code for the runify crates:
//! - Error types
//! - Configuration file discovery and TOML loading
//! - Logging configuration

pub mod config;
pub mod error;

pub use error::{Error, Result};
