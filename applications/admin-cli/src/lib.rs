//! Dining Admin console
//!
//! Command-line front end for the Custom Dining admin dashboard.
//!
//! This library exposes the configuration and command layer for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

pub use config::AdminConfig;
pub use error::{CliError, Result};
