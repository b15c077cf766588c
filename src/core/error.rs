//! Error handling for the dashgen startup and template-store layer.
//!
//! This module defines the `Error` type raised while loading configuration and
//! registering templates, along with a convenient `Result` type alias. Errors
//! raised while serving a single request live in `crate::generation`.
//!
//! # Examples
//!
//! ```
//! use dashgen::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::manifest("missing `templates` list"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for dashgen startup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dashgen startup operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest contract violation
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new manifest error
    pub fn manifest<S: Into<String>>(msg: S) -> Self {
        Self::Manifest(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("Invalid CORS origin");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: Invalid CORS origin");
    }

    #[test]
    fn test_error_manifest_creation() {
        let error = Error::manifest("duplicate template");
        assert!(matches!(error, Error::Manifest(_)));
        assert_eq!(error.to_string(), "Manifest error: duplicate template");
    }

    #[test]
    fn test_error_template_creation() {
        let error = Error::template("Template not found");
        assert!(matches!(error, Error::Template(_)));
        assert_eq!(error.to_string(), "Template error: Template not found");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
        assert!(error.to_string().contains("File not found"));
    }
}
