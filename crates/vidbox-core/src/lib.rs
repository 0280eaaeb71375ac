//! Core types shared across the vidbox workspace: configuration, the
//! unified error type, and domain models.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
