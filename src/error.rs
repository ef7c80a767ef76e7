//! Error types for the Simword library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SimwordError`] enum.
//!
//! # Examples
//!
//! ```
//! use simword::error::{Result, SimwordError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SimwordError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Simword operations.
#[derive(Error, Debug)]
pub enum SimwordError {
    /// I/O errors (word list unreadable, index location unwritable, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No index exists at the requested location
    #[error("Not found: {0}")]
    NotFound(String),

    /// The index exists but is corrupt, incompatible or closed
    #[error("Index read error: {0}")]
    IndexRead(String),

    /// Malformed command invocation
    #[error("Usage error: {0}")]
    Usage(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SimwordError.
pub type Result<T> = std::result::Result<T, SimwordError>;

impl SimwordError {
    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SimwordError::NotFound(msg.into())
    }

    /// Create a new index read error.
    pub fn index_read<S: Into<String>>(msg: S) -> Self {
        SimwordError::IndexRead(msg.into())
    }

    /// Create a new usage error.
    pub fn usage<S: Into<String>>(msg: S) -> Self {
        SimwordError::Usage(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SimwordError::Storage(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SimwordError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SimwordError::Other(msg.into())
    }

    /// Whether this error signals a missing index rather than a broken one.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SimwordError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SimwordError::not_found("/tmp/idx");
        assert_eq!(error.to_string(), "Not found: /tmp/idx");
        assert!(error.is_not_found());

        let error = SimwordError::index_read("bad magic");
        assert_eq!(error.to_string(), "Index read error: bad magic");
        assert!(!error.is_not_found());

        let error = SimwordError::usage("expected 2 arguments");
        assert_eq!(error.to_string(), "Usage error: expected 2 arguments");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SimwordError::from(io_error);

        match error {
            SimwordError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
