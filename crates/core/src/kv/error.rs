use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors that can occur in a key-value store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for key-value store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(msg) => RepositoryError::ConnectionFailed(msg),
            StoreError::OperationFailed(msg) => RepositoryError::QueryFailed(msg),
            StoreError::Serialization(msg) => RepositoryError::Serialization(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = StoreError::ConnectionFailed("refused".to_string());
        assert_eq!(error.to_string(), "Store connection failed: refused");
    }

    #[test]
    fn test_operation_failed_display() {
        let error = StoreError::OperationFailed("disk full".to_string());
        assert_eq!(error.to_string(), "Store operation failed: disk full");
    }

    #[test]
    fn test_store_errors_map_to_repository_errors() {
        assert_eq!(
            RepositoryError::from(StoreError::ConnectionFailed("x".to_string())),
            RepositoryError::ConnectionFailed("x".to_string())
        );
        assert_eq!(
            RepositoryError::from(StoreError::OperationFailed("y".to_string())),
            RepositoryError::QueryFailed("y".to_string())
        );
        assert_eq!(
            RepositoryError::from(StoreError::Serialization("z".to_string())),
            RepositoryError::Serialization("z".to_string())
        );
    }
}
