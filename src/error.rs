//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A missing or expired key
//! is not an error; lookups report it as `None`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A typed value could not be encoded to or decoded from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value could not be parsed
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig("bad sweep".to_string());
        assert_eq!(err.to_string(), "Invalid config: bad sweep");
    }

    #[test]
    fn test_serialization_from_serde_json() {
        let json_err = serde_json::from_slice::<u32>(b"not json").unwrap_err();
        let err: CacheError = json_err.into();
        assert!(matches!(err, CacheError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
