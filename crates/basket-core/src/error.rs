//! # Error Types
//!
//! Domain-specific error types for basket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  basket-core errors (this file)                                        │
//! │  ├── CartError        - Cart rule violations                           │
//! │  └── ValidationError  - Product attribute failures                     │
//! │                                                                         │
//! │  basket-store errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  basket-widget                                                         │
//! │  └── notice_for()     - What the shopper sees (toast text)             │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → Notice → Toast                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown item references are deliberately absent: removing or updating an
//! id that is not in the cart is a no-op, not an error.

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart rule violations.
///
/// None of these are fatal to the page. The engine recovers locally and
/// shows the shopper a notification.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product read from the page is missing a field or has a bad price.
    ///
    /// ## When This Occurs
    /// - `data-id` or `data-name` attribute missing / blank
    /// - `data-price` is not a non-negative integer ("12.5", "abc", "-3")
    /// - quantity input is zero, negative or not a number
    ///
    /// The whole item is rejected; the cart is left untouched.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ValidationError),

    /// A quantity change would leave a row below 1.
    ///
    /// ## When This Occurs
    /// - `update_quantity(id, 0)` from a typed-in quantity field
    ///
    /// Decrement buttons never produce this; they stop at 1.
    #[error("Invalid quantity for {id}: {reason}")]
    InvalidQuantity {
        id: String,
        #[source]
        reason: ValidationError,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCartCheckout,

    /// Merging quantities would overflow the quantity type.
    #[error("Quantity for {id} cannot exceed {max}")]
    QuantityOverflow { id: String, max: u32 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when attributes supplied by the page don't meet requirements.
/// Used for early validation before the cart is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be a whole number.
    #[error("{field} must be a whole number, got '{value}'")]
    NotAnInteger { field: String, value: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value does not fit the field's range.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: u64 },
}

impl ValidationError {
    /// Creates a `Required` error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::QuantityOverflow {
            id: "x".to_string(),
            max: u32::MAX,
        };
        assert_eq!(err.to_string(), "Quantity for x cannot exceed 4294967295");
        assert_eq!(CartError::EmptyCartCheckout.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::NotAnInteger {
            field: "price".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price must be a whole number, got 'abc'");
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let cart_err: CartError = ValidationError::required("id").into();
        assert!(matches!(cart_err, CartError::InvalidProduct(_)));
        assert_eq!(cart_err.to_string(), "Invalid product: id is required");
    }
}
