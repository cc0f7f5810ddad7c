//! Error types for the board store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidKey("a/b".into());
        assert_eq!(err.to_string(), "invalid key: \"a/b\"");

        let err = StoreError::Unavailable("quota exceeded".into());
        assert!(err.to_string().contains("quota exceeded"));
    }
}
