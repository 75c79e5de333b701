//! SenderNews Common - Shared types and utilities
//!
//! This crate provides common types, configuration, errors and logging
//! bootstrap shared by all SenderNews components.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
