//! Error types for the LuckBox engine.
//!
//! Every operation returns the crate-wide [`Result`] alias. Errors are
//! never retried internally: each operation is deterministic given its
//! inputs, so a failure is never transient.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// LuckBox error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid cell state: {0}")]
    InvalidCellState(String),

    #[error("Catalog integrity error: {0}")]
    CatalogIntegrity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::UnknownTemplate("mystery_wheel".to_string());
        assert_eq!(err.to_string(), "Unknown template: mystery_wheel");

        let err = Error::InvalidCellState("cell 7 already revealed".to_string());
        assert!(err.to_string().contains("cell 7"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
