//! Error types for farepath operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all farepath crates. Uses `thiserror` for derive macros.
//!
//! A route that cannot be found is not an error; the path engine reports it
//! as a normal outcome. The variants here cover the store, registration and
//! configuration failures that abort an operation.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in farepath operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file.
    #[error("I/O error on {}: {source}", path.display())]
    IoWithPath {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A route record could not be parsed. Fatal to a load.
    #[error("Malformed route record at line {line}: {message}")]
    Format {
        /// 1-based line number in the backing file.
        line: u64,
        /// What was wrong with the record.
        message: String,
    },

    /// A forward route between the two nodes is already registered.
    #[error("Route from {from} to {to} already exists with price {price}")]
    Conflict {
        /// Normalized origin.
        from: String,
        /// Normalized destination.
        to: String,
        /// Price of the existing route.
        price: u64,
    },

    /// Caller-supplied input was rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested item not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Wrap an I/O error without path context.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Wrap an I/O error together with the path it happened on.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// Create a record format error.
    pub fn format(line: u64, msg: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: msg.into(),
        }
    }

    /// Create a duplicate-route error.
    pub fn conflict(from: impl Into<String>, to: impl Into<String>, price: u64) -> Self {
        Self::Conflict {
            from: from.into(),
            to: to.into(),
            price,
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for either I/O variant.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::IoWithPath { .. })
    }

    /// True for malformed records.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// True for duplicate registrations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// True for rejected input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias using farepath's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message() {
        let err = Error::conflict("GRU", "EWR", 30);
        assert_eq!(
            err.to_string(),
            "Route from GRU to EWR already exists with price 30"
        );
        assert!(err.is_conflict());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_format_message_includes_line() {
        let err = Error::format(3, "expected 3 fields, found 2");
        assert!(err.to_string().contains("line 3"));
        assert!(err.is_format());
    }

    #[test]
    fn test_io_with_path() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(inner, "/tmp/routes.csv");
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/routes.csv"));
    }

    #[test]
    fn test_io_from() {
        let inner = std::io::Error::other("boom");
        let err: Error = inner.into();
        assert!(err.is_io());
    }
}
