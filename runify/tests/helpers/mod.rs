//! Test Helper Utilities
//!
//! Shared utilities for testing runify

#![allow(dead_code)]

pub mod log_capture;
pub mod mock_service;

// Re-export commonly used items
pub use log_capture::{init_test_logging, LogCapture};
pub use mock_service::{MockCall, MockService};
