//! # stepsite Library
//!
//! This library exposes the stepsite modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod site;

pub use error::AppError;

// Re-export stepsite_core for convenience
pub use stepsite_core;
