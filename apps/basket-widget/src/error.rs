//! # Widget Errors and Shopper Notices
//!
//! Two things live here:
//! - [`WidgetError`]: startup failures (config, data directory)
//! - [`Notice`]: the toast text a cart or storage error turns into
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Basket                             │
//! │                                                                         │
//! │  Page                        CartEngine                                 │
//! │  ────                        ──────────                                 │
//! │                                                                         │
//! │  click "Add to cart"                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  add_from_attributes → CartResult<AddOutcome>                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad attributes? ─── CartError::InvalidProduct ───┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Save failed?  ───── StoreError::Io ─────────── Notice ────────►│  │
//! │  │         │                                   (error toast)        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ── success toast ─────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shoppers never see raw error text for storage failures; those details go
//! to the log.

use serde::Serialize;
use thiserror::Error;

use basket_core::{CartError, ValidationError};
use basket_store::StoreError;

use crate::notify::Severity;

// =============================================================================
// Widget Error
// =============================================================================

/// Errors raised while setting the widget up.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// A setting is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::WidgetConfig`].
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// No directory was configured and the platform has no data directory.
    #[error("No data directory available for the stored cart")]
    NoDataDir,
}

/// Result type for widget setup.
pub type WidgetResult<T> = Result<T, WidgetError>;

// =============================================================================
// Notice
// =============================================================================

/// A message for the toast surface.
///
/// ## Serialization
/// ```json
/// { "severity": "error", "message": "Your cart is empty!" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Notice {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice::new(Severity::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::new(Severity::Error, message)
    }

    /// Shown when the cart could not be written.
    pub fn save_failed(err: &StoreError) -> Self {
        match err {
            StoreError::QuotaExceeded { .. } => {
                Notice::error("Your cart is too large to save; it will be lost on reload")
            }
            _ => Notice::error("Your cart could not be saved; changes may be lost on reload"),
        }
    }

    /// Shown when the saved cart could not be read at start.
    pub fn restore_failed(err: &StoreError) -> Self {
        if err.is_corrupt() {
            Notice::error("Your saved cart could not be restored")
        } else {
            Notice::error("Saved cart is unavailable; changes will not be kept")
        }
    }
}

/// Converts cart errors into shopper-facing notices.
impl From<&CartError> for Notice {
    fn from(err: &CartError) -> Self {
        match err {
            CartError::InvalidProduct(reason) => Notice::error(format!(
                "Could not add this product: {}",
                describe_validation(reason)
            )),
            CartError::InvalidQuantity { .. } => Notice::error("Quantity must be at least 1"),
            CartError::EmptyCartCheckout => Notice::error("Your cart is empty!"),
            CartError::QuantityOverflow { .. } => {
                Notice::error("Cannot add more of this item")
            }
        }
    }
}

/// Short shopper wording for a rejected attribute.
fn describe_validation(err: &ValidationError) -> String {
    match err {
        ValidationError::Required { field } => format!("{} is missing", field),
        ValidationError::NotAnInteger { field, .. } => {
            format!("{} must be a whole number", field)
        }
        ValidationError::Negative { field } => format!("{} cannot be negative", field),
        ValidationError::MustBePositive { field } => format!("{} must be at least 1", field),
        ValidationError::TooLarge { field, .. } => format!("{} is too large", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_notices() {
        let notice = Notice::from(&CartError::EmptyCartCheckout);
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Your cart is empty!");

        let notice = Notice::from(&CartError::InvalidProduct(ValidationError::NotAnInteger {
            field: "price".into(),
            value: "12.5".into(),
        }));
        assert_eq!(
            notice.message,
            "Could not add this product: price must be a whole number"
        );
    }

    #[test]
    fn test_store_error_notices_hide_details() {
        let io = StoreError::Io(std::io::Error::other("disk on fire"));
        let notice = Notice::save_failed(&io);
        assert_eq!(notice.severity, Severity::Error);
        assert!(!notice.message.contains("disk"));

        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert_eq!(
            Notice::restore_failed(&StoreError::Corrupt(json_err)).message,
            "Your saved cart could not be restored"
        );
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_string(&Notice::info("Cart cleared")).unwrap();
        assert_eq!(json, r#"{"severity":"info","message":"Cart cleared"}"#);
    }

    #[test]
    fn test_widget_error_display() {
        assert_eq!(
            WidgetError::InvalidConfig("storage.key must not be empty".into()).to_string(),
            "Invalid configuration: storage.key must not be empty"
        );
    }
}
