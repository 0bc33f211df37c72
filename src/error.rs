//! Error types for the deeplink cache

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// A value in an insert batch carried no sub-address
    #[error("Missing sub-address for value at index {index}")]
    MissingSubAddress { index: usize },

    /// A fixed path segment is not cached
    #[error("Not cached: {0}")]
    NotFound(String),

    /// A reference or bulk token matches no known grammar
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A child could not be attached at the requested position
    #[error("Invalid child: {0}")]
    InvalidChild(String),

    /// The tree violates its own shape invariants
    #[error("Corrupt cache: {0}")]
    CorruptCache(String),

    /// A value source failed to extract values from its document
    #[error("Extraction error: {0}")]
    Extraction(String),
}

impl CacheError {
    /// Errors caused by caller input rather than cache state
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CacheError::MissingSubAddress { .. } | CacheError::InvalidReference(_)
        )
    }

    /// Errors that mean "not cached, parse the source instead"
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    /// HTTP status a request handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            CacheError::MissingSubAddress { .. } => 422,
            CacheError::NotFound(_) => 404,
            CacheError::InvalidReference(_) => 400,
            CacheError::InvalidChild(_)
            | CacheError::CorruptCache(_)
            | CacheError::Extraction(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CacheError::MissingSubAddress { index: 0 }.is_client_error());
        assert!(CacheError::InvalidReference("A0".into()).is_client_error());
        assert!(!CacheError::NotFound("/CsvTest".into()).is_client_error());
        assert!(CacheError::NotFound("/CsvTest".into()).is_cache_miss());
        assert!(!CacheError::CorruptCache("leaf".into()).is_cache_miss());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CacheError::MissingSubAddress { index: 3 }.status_code(), 422);
        assert_eq!(CacheError::NotFound("x".into()).status_code(), 404);
        assert_eq!(CacheError::InvalidReference("x".into()).status_code(), 400);
        assert_eq!(CacheError::InvalidChild("x".into()).status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = CacheError::MissingSubAddress { index: 2 };
        assert_eq!(err.to_string(), "Missing sub-address for value at index 2");
    }
}
