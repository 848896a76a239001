//! Core functionality for the civicdispatch emergency-response system.
//!
//! This crate provides the shared error taxonomy, logging setup,
//! configuration loading and the activity log used across the workspace.

pub mod config;
pub mod error;
pub mod event;
pub mod logging;

pub use config::{Config, DispatchConfig, LoggingConfig, UnitSpec};
pub use error::{Error, Result};
pub use event::{ActivityLog, LogEntry};
