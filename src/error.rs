//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Construction and `resize` are the only fallible operations; everything
/// else is a total function over its documented domain.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A constructor option or resize target was out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
