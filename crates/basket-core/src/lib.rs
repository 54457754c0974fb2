//! # basket-core: Pure Cart Logic for the Storefront Basket
//!
//! This crate is the **heart** of the basket. It contains the line-item
//! rules and the derived money math as pure functions, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront page                              │   │
//! │  │   "Add to cart" buttons ──► Cart panel ──► Checkout button     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ UiEvent                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                basket-widget (CartEngine)                       │   │
//! │  │    dispatch, render, notify, open/close panel                   │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼─────────────────┐  ┌────────▼────────────────────┐  │
//! │  │   ★ basket-core (THIS CRATE) ★  │  │   basket-store              │  │
//! │  │   Money  Cart  LineItem         │  │   named record persistence  │  │
//! │  │   ShippingPolicy  validation    │  │                             │  │
//! │  └─────────────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product input and line item types
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart collection, shipping policy and derived totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for product attributes
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{Cart, Money, Product, ShippingPolicy};
//!
//! let mut cart = Cart::new();
//! let tome = Product::new("x", "Berserk Vol. 1", Money::new(500), "berserk.jpg").unwrap();
//!
//! cart.add(&tome, 1).unwrap();
//! cart.add(&tome, 1).unwrap();
//!
//! let totals = cart.totals(&ShippingPolicy::default());
//! assert_eq!(cart.len(), 1);
//! assert_eq!(totals.subtotal.amount(), 1000);
//! assert!(totals.shipping.is_zero());
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, CartSnapshot, CartTotals, QuantityChange, ShippingPolicy};
pub use error::{CartError, CartResult, ValidationError};
pub use money::Money;
pub use types::{LineItem, Product, ProductAttributes, ProductRequest};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Subtotal at or above which shipping is waived.
///
/// ## Business Reason
/// One rule for the whole storefront: `subtotal >= 1000` ships free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::new(1000);

/// Flat shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::new(50);

/// Quantity used when an "add to cart" trigger does not specify one.
pub const DEFAULT_ADD_QUANTITY: u32 = 1;
