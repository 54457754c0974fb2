//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / quota check                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartEngine: logs it, keeps the in-memory cart, raises an error toast  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `StoreError` never aborts a cart mutation. For the current session the
//! in-memory cart stays authoritative.

use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is disabled or absent.
    ///
    /// ## When This Occurs
    /// - Storage switched off (private browsing, kiosk lock-down)
    /// - Backend handle poisoned by an earlier panic
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The write would go over the store's capacity.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Record names become file names, so they are restricted.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// File backend I/O failure (disk full, permissions).
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record is not a valid cart.
    #[error("Stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The cart could not be encoded.
    #[error("Cart could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable(reason.into())
    }

    /// True when the stored data itself is bad, as opposed to the store.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt(_))
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::QuotaExceeded {
            needed: 6000,
            quota: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded: 6000 bytes needed, 5000 allowed"
        );
        assert_eq!(
            StoreError::unavailable("disabled").to_string(),
            "Storage unavailable: disabled"
        );
    }

    #[test]
    fn test_is_corrupt() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(StoreError::Corrupt(json_err).is_corrupt());
        assert!(!StoreError::unavailable("x").is_corrupt());
    }
}
