//! Centralized error handling for the Marvel gallery client
//!
//! Errors are grouped by the layer that raises them:
//!
//! - **Source Errors**: remote character API connectivity, status codes and payloads
//! - **Storage Errors**: session store reads and writes
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! Most of these never reach a user. The character client degrades malformed
//! payloads to empty results and the gallery aggregator drops failed
//! partitions, so an `AppError` usually ends up in a log line.
//!
//! # Usage
//!
//! ```rust
//! use marvel_gallery::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
