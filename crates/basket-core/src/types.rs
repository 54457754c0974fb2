//! # Domain Types
//!
//! Core domain types used throughout the basket.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────┐   TryFrom   ┌─────────────────┐                 │
//! │  │ ProductAttributes │ ──────────► │ ProductRequest  │                 │
//! │  │  raw strings from │             │  Product + qty  │                 │
//! │  │  data-* attributes│             └────────┬────────┘                 │
//! │  └───────────────────┘                      │ Cart::add                │
//! │                                             ▼                          │
//! │                                    ┌─────────────────┐                 │
//! │                                    │    LineItem     │ ◄── persisted   │
//! │                                    │  id name price  │     record row  │
//! │                                    │  image quantity │                 │
//! │                                    └─────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    parse_price, parse_quantity, validate_price, validate_product_id, validate_product_name,
    ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A validated product, as offered by an "add to cart" trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product identifier; the cart's merge key.
    pub id: String,

    /// Display name shown in the panel and in notifications.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Opaque image reference (usually a URL).
    pub image: String,
}

impl Product {
    /// Creates a product, rejecting blank ids/names and negative prices.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> ValidationResult<Self> {
        let product = Product {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Checks the product invariants.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_id(&self.id)?;
        validate_product_name(&self.name)?;
        validate_price(self.price)
    }
}

// =============================================================================
// Product Attributes
// =============================================================================

/// Raw product data read off an "add to cart" button.
///
/// Every field is optional because markup can be incomplete; turning this
/// into a [`ProductRequest`] is where the checks happen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    /// Value of the product page's quantity input, when there is one.
    pub quantity: Option<String>,
}

impl ProductAttributes {
    /// Collects attributes from `(name, value)` pairs.
    ///
    /// Accepts both `data-id` style names and bare `id` names; the
    /// quantity may come from `data-quantity` or a `quantity` input.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::ProductAttributes;
    ///
    /// let attrs = ProductAttributes::from_pairs([
    ///     ("data-id", "x"),
    ///     ("data-name", "Berserk Vol. 1"),
    ///     ("data-price", "500"),
    ///     ("data-image", "berserk.jpg"),
    ///     ("class", "add-to-cart"),
    /// ]);
    /// assert_eq!(attrs.price.as_deref(), Some("500"));
    /// assert!(attrs.quantity.is_none());
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attrs = ProductAttributes::default();

        for (name, value) in pairs {
            let slot = match name.strip_prefix("data-").unwrap_or(name) {
                "id" => &mut attrs.id,
                "name" => &mut attrs.name,
                "price" => &mut attrs.price,
                "image" => &mut attrs.image,
                "quantity" => &mut attrs.quantity,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }

        attrs
    }

    /// Sets the quantity input value.
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }
}

/// A validated "add this many of this product" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRequest {
    pub product: Product,
    pub quantity: u32,
}

impl TryFrom<&ProductAttributes> for ProductRequest {
    type Error = ValidationError;

    /// ## Rules
    /// - `id`, `name`, `price` are required
    /// - `price` must parse as a non-negative integer
    /// - `image` is opaque; a missing image becomes an empty reference
    /// - `quantity` defaults to 1 and must be ≥ 1 when given
    fn try_from(attrs: &ProductAttributes) -> Result<Self, Self::Error> {
        let id = attrs
            .id
            .as_deref()
            .ok_or_else(|| ValidationError::required("id"))?;
        let name = attrs
            .name
            .as_deref()
            .ok_or_else(|| ValidationError::required("name"))?;
        let price = parse_price(
            attrs
                .price
                .as_deref()
                .ok_or_else(|| ValidationError::required("price"))?,
        )?;
        let quantity = parse_quantity(attrs.quantity.as_deref())?;

        let product = Product::new(id, name, price, attrs.image.clone().unwrap_or_default())?;

        Ok(ProductRequest { product, quantity })
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of the cart.
///
/// The serialized form is exactly the persisted record shape:
/// `{id, name, price, image, quantity}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a row from a product and quantity.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        LineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}
