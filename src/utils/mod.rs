//! Utility modules for the Marvel gallery client
//!
//! This module contains reusable helpers that are used
//! across different parts of the system.

pub mod url;

pub use url::UrlUtils;
