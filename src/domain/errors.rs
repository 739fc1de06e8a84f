//! Domain error types
//!
//! `DomainError` covers the failures that halt a run. `LookupError` covers
//! a single ISBN lookup and never aborts the pipeline.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// The ISBN list could not be read
    Input(String),
    /// The flat table could not be read or written
    Storage(String),
    /// A report export could not be written
    Export(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Input(msg) => write!(f, "Input error: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
            DomainError::Export(msg) => write!(f, "Export error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<csv::Error> for DomainError {
    fn from(e: csv::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// Why a single ISBN could not be resolved to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service answered but did not know the ISBN
    NotFound,
    /// The request exceeded the configured timeout
    Timeout,
    /// Connection or protocol failure
    Transport(String),
    /// Non-success HTTP status
    Status(u16),
    /// The body was not the expected JSON mapping
    Decode(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "no data"),
            LookupError::Timeout => write!(f, "request timed out"),
            LookupError::Transport(msg) => write!(f, "request failed: {}", msg),
            LookupError::Status(code) => write!(f, "Open Library API returned status: {}", code),
            LookupError::Decode(msg) => write!(f, "failed to parse JSON: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_decode() {
            LookupError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            LookupError::Status(status.as_u16())
        } else {
            LookupError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DomainError::Input("books-isbns.txt missing".into()).to_string(),
            "Input error: books-isbns.txt missing"
        );
        assert_eq!(LookupError::NotFound.to_string(), "no data");
        assert_eq!(
            LookupError::Status(503).to_string(),
            "Open Library API returned status: 503"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: DomainError = io.into();
        assert!(matches!(err, DomainError::Storage(msg) if msg.contains("read-only")));
    }
}
