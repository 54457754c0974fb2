//! # Validation Module
//!
//! Input validation for product data read off the page.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Page markup                                                  │
//! │  └── data-id / data-name / data-price / data-image attributes          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ProductAttributes → ProductRequest                           │
//! │  └── THIS MODULE: required fields, integer parsing                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart                                                         │
//! │  └── quantity ≥ 1, one row per id                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::validation::{parse_price, parse_quantity};
//!
//! assert_eq!(parse_price("500").unwrap().amount(), 500);
//! assert!(parse_price("12.5").is_err());
//!
//! assert_eq!(parse_quantity(None).unwrap(), 1);
//! assert!(parse_quantity(Some("0")).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::DEFAULT_ADD_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product identifier.
///
/// The id is the cart's unique key, so it is kept verbatim; only a blank
/// value is rejected.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    Ok(())
}

/// Validates a product display name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Parses a `data-price` attribute.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must be a whole number ("12.5" and "12 UAH" are rejected)
/// - Must be non-negative
///
/// ## Example
/// ```rust
/// use basket_core::validation::parse_price;
///
/// assert_eq!(parse_price(" 250 ").unwrap().amount(), 250);
/// assert!(parse_price("").is_err());
/// assert!(parse_price("-1").is_err());
/// assert!(parse_price("abc").is_err());
/// ```
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::required("price"));
    }

    let amount = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: "price".to_string(),
            value: raw.to_string(),
        })?;

    let price = Money::new(amount);
    validate_price(price)?;

    Ok(price)
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be at least 1; a zero-quantity row is never observable
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Parses an optional quantity input.
///
/// ## Rules
/// - Absent or blank → [`DEFAULT_ADD_QUANTITY`]
/// - Otherwise a whole number ≥ 1 that fits in `u32`
///
/// ## User Workflow
/// ```text
/// Product page quantity input: "3"
///      │
///      ▼
/// parse_quantity(Some("3")) ← THIS FUNCTION
///      │
///      ├── "abc"? → NotAnInteger
///      ├── "0"/"-2"? → MustBePositive
///      └── OK(3) → Cart::add
/// ```
pub fn parse_quantity(raw: Option<&str>) -> ValidationResult<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_ADD_QUANTITY),
        Some(raw) => raw,
    };

    let value = raw
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: "quantity".to_string(),
            value: raw.to_string(),
        })?;

    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::TooLarge {
        field: "quantity".to_string(),
        max: u64::from(u32::MAX),
    })
}
