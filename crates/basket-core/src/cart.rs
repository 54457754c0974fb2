//! # Cart
//!
//! The line-item collection and everything derived from it.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation            Effect on items             Derived values        │
//! │  ─────────            ───────────────             ──────────────        │
//! │                                                                         │
//! │  add(p, q)  ────────► merge into row p.id          subtotal = Σ p×q    │
//! │                       or push new row              shipping = policy   │
//! │                                                    total = sub + ship  │
//! │  remove(id) ────────► drop row (order kept)        item_count = Σ q    │
//! │                                                                         │
//! │  set_quantity(id, q)► row.quantity = q (q ≥ 1)                         │
//! │  increment / decrement ► ±1, decrement stops at 1                      │
//! │                                                                         │
//! │  clear()    ────────► items = []                                       │
//! │                                                                         │
//! │  NOTE: derived values are never stored, always recomputed.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::types::{LineItem, Product};
use crate::validation::{
    validate_price, validate_product_id, validate_product_name, validate_quantity,
};
use crate::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};

// =============================================================================
// Shipping Policy
// =============================================================================

/// Free-shipping rule: `subtotal >= free_threshold` ships free, anything
/// below pays `flat_fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub free_threshold: Money,
    pub flat_fee: Money,
}

impl ShippingPolicy {
    pub const fn new(free_threshold: Money, flat_fee: Money) -> Self {
        ShippingPolicy {
            free_threshold,
            flat_fee,
        }
    }

    /// Shipping charged for a given subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::{Money, ShippingPolicy};
    ///
    /// let policy = ShippingPolicy::default();
    /// assert_eq!(policy.shipping_for(Money::new(999)), Money::new(50));
    /// assert_eq!(policy.shipping_for(Money::new(1000)), Money::zero());
    /// ```
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_threshold {
            Money::zero()
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy::new(FREE_SHIPPING_THRESHOLD, FLAT_SHIPPING_FEE)
    }
}

// =============================================================================
// Derived Values
// =============================================================================

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub subtotal: Money,
    pub shipping: Money,
    /// `subtotal + shipping`, so an empty cart still carries the flat fee.
    pub total: Money,
    /// Sum of quantities (what the header badge shows).
    #[ts(type = "number")]
    pub item_count: u64,
}

impl CartTotals {
    /// True when the shipping fee was waived.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Read-only view of the cart for other page scripts (checkout flow, badge
/// counters elsewhere on the page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub shipping: Money,
    /// `subtotal + shipping`; an empty cart reports shipping 50 and total 50.
    pub total: Money,
    #[ts(type = "number")]
    pub item_count: u64,
}

/// What `Cart::add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new row was appended.
    Appended { quantity: u32 },
    /// The quantity was added to an existing row.
    Merged { quantity: u32 },
}

impl AddOutcome {
    /// Row quantity after the add.
    pub fn quantity(&self) -> u32 {
        match self {
            AddOutcome::Appended { quantity } | AddOutcome::Merged { quantity } => *quantity,
        }
    }
}

/// Before/after quantities of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    pub previous: u32,
    pub current: u32,
}

impl QuantityChange {
    /// True when nothing changed (e.g. decrement at 1).
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is ≥ 1
/// - Insertion order is kept; it carries no business meaning
///
/// Serializes as the bare item array. Deserializing goes through
/// [`Cart::from_items`], so a hand-edited record cannot break the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from stored rows.
    ///
    /// ## Behavior
    /// - Rows with quantity 0 are dropped
    /// - Rows with a blank id or name, or a negative price, are dropped
    /// - Repeated ids are merged into the first occurrence
    /// - Everything else is kept as-is, in order
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Cart::new();

        for item in items {
            if item.quantity == 0 || !Self::is_restorable(&item) {
                continue;
            }
            match cart.position(&item.id) {
                Some(pos) => {
                    let existing = &mut cart.items[pos];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }

        cart
    }

    /// Same checks `LineItem::from_product` relies on, applied to a stored row.
    fn is_restorable(item: &LineItem) -> bool {
        validate_product_id(&item.id).is_ok()
            && validate_product_name(&item.name).is_ok()
            && validate_price(item.price).is_ok()
    }

    /// Rows in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a row by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of distinct rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: increases quantity
    /// - If product not in cart: appends a new row
    /// - Invalid product or zero quantity: cart untouched, error returned
    pub fn add(&mut self, product: &Product, quantity: u32) -> CartResult<AddOutcome> {
        product.validate()?;
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            let merged = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow {
                    id: product.id.clone(),
                    max: u32::MAX,
                })?;
            item.quantity = merged;
            return Ok(AddOutcome::Merged { quantity: merged });
        }

        self.items.push(LineItem::from_product(product, quantity));
        Ok(AddOutcome::Appended { quantity })
    }

    /// Removes a row by product id. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos))
    }

    /// Sets the quantity of a row directly.
    ///
    /// ## Returns
    /// - `Ok(Some(change))` if the row exists
    /// - `Ok(None)` if the id is not in the cart
    /// - `Err(InvalidQuantity)` for 0; the row is left as it was
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> CartResult<Option<QuantityChange>> {
        validate_quantity(quantity).map_err(|reason| CartError::InvalidQuantity {
            id: id.to_string(),
            reason,
        })?;

        Ok(self.items.iter_mut().find(|i| i.id == id).map(|item| {
            let previous = std::mem::replace(&mut item.quantity, quantity);
            QuantityChange {
                previous,
                current: quantity,
            }
        }))
    }

    /// Adds one to a row's quantity.
    pub fn increment(&mut self, id: &str) -> CartResult<Option<QuantityChange>> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        let previous = item.quantity;
        item.quantity = previous
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityOverflow {
                id: id.to_string(),
                max: u32::MAX,
            })?;

        Ok(Some(QuantityChange {
            previous,
            current: item.quantity,
        }))
    }

    /// Takes one off a row's quantity, stopping at 1.
    ///
    /// Decrementing at 1 does not remove the row; the returned change is a
    /// no-op.
    pub fn decrement(&mut self, id: &str) -> Option<QuantityChange> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        let previous = item.quantity;

        if previous > 1 {
            item.quantity = previous - 1;
        }

        Some(QuantityChange {
            previous,
            current: item.quantity,
        })
    }

    /// Clears all items, returning how many rows were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }

    /// Σ price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// All derived values under a shipping policy.
    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        let subtotal = self.subtotal();
        let shipping = policy.shipping_for(subtotal);

        CartTotals {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: self.item_count(),
        }
    }

    /// Read-only snapshot for external consumers.
    pub fn snapshot(&self, policy: &ShippingPolicy) -> CartSnapshot {
        let totals = self.totals(policy);

        CartSnapshot {
            items: self.items.clone(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
            item_count: totals.item_count,
        }
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Tome {}", id), Money::new(price), format!("{}.jpg", id)).unwrap()
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p = product("x", 500);

        assert_eq!(cart.add(&p, 2).unwrap(), AddOutcome::Appended { quantity: 2 });
        assert_eq!(cart.add(&p, 3).unwrap(), AddOutcome::Merged { quantity: 5 });

        assert_eq!(cart.len(), 1); // Still one row
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_rejects_zero_quantity_without_mutation() {
        let mut cart = Cart::new();
        let err = cart.add(&product("x", 500), 0).unwrap_err();
        assert!(matches!(err, CartError::InvalidProduct(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_keeps_previous_quantity() {
        let mut cart = Cart::new();
        let p = product("x", 1);
        cart.add(&p, u32::MAX).unwrap();

        assert!(matches!(
            cart.add(&p, 1),
            Err(CartError::QuantityOverflow { .. })
        ));
        assert_eq!(cart.get("x").unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = Cart::new();
        for id in ["a", "b", "c"] {
            cart.add(&product(id, 100), 1).unwrap();
        }
        cart.add(&product("a", 100), 1).unwrap();
        cart.remove("b");

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("x", 500), 1).unwrap();
        let before = cart.clone();

        assert!(cart.remove("nope").is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut cart = Cart::new();
        cart.add(&product("x", 500), 2).unwrap();

        let change = cart.decrement("x").unwrap();
        assert_eq!(change, QuantityChange { previous: 2, current: 1 });

        let change = cart.decrement("x").unwrap();
        assert!(change.is_noop());
        assert_eq!(cart.get("x").unwrap().quantity, 1);
        assert!(cart.decrement("missing").is_none());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(&product("x", 500), 1).unwrap();

        let change = cart.set_quantity("x", 4).unwrap().unwrap();
        assert_eq!(change.current, 4);
        assert!(cart.set_quantity("missing", 4).unwrap().is_none());

        assert!(matches!(
            cart.set_quantity("x", 0),
            Err(CartError::InvalidQuantity { .. })
        ));
        assert_eq!(cart.get("x").unwrap().quantity, 4);
    }

    #[test]
    fn test_shipping_threshold_is_inclusive() {
        let policy = ShippingPolicy::default();
        let mut cart = Cart::new();

        cart.add(&product("x", 500), 1).unwrap();
        cart.add(&product("x", 500), 1).unwrap();
        let totals = cart.totals(&policy);
        assert_eq!(totals.subtotal, Money::new(1000));
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.total, Money::new(1000));
        assert!(totals.is_free_shipping());
    }

    #[test]
    fn test_flat_fee_below_threshold() {
        let mut cart = Cart::new();
        cart.add(&product("y", 100), 1).unwrap();

        let totals = cart.totals(&ShippingPolicy::default());
        assert_eq!(totals.subtotal, Money::new(100));
        assert_eq!(totals.shipping, Money::new(50));
        assert_eq!(totals.total, Money::new(150));
    }

    #[test]
    fn test_total_is_subtotal_plus_shipping() {
        let policy = ShippingPolicy::default();
        let mut cart = Cart::new();

        for (id, price, qty) in [("a", 0, 1), ("b", 333, 2), ("c", 999, 1), ("d", 1, 7)] {
            cart.add(&product(id, price), qty).unwrap();
            let t = cart.totals(&policy);
            assert_eq!(t.total, t.subtotal + t.shipping);
            assert_eq!(t.shipping.is_zero(), t.subtotal >= policy.free_threshold);
        }
    }

    #[test]
    fn test_from_items_repairs_stored_rows() {
        let row = |id: &str, quantity| LineItem {
            id: id.to_string(),
            name: id.to_string(),
            price: Money::new(10),
            image: String::new(),
            quantity,
        };

        let cart = Cart::from_items(vec![row("a", 1), row("b", 0), row("a", 2), row("c", 1)]);
        let rows: Vec<(&str, u32)> = cart
            .items()
            .iter()
            .map(|i| (i.id.as_str(), i.quantity))
            .collect();
        assert_eq!(rows, [("a", 3), ("c", 1)]);
    }

    #[test]
    fn test_from_items_drops_invalid_rows() {
        let row = |id: &str, name: &str, price| LineItem {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::new(price),
            image: String::new(),
            quantity: 1,
        };

        let cart = Cart::from_items(vec![
            row("a", "Akira", 300),
            row("b", "Bleach", -500),
            row("  ", "Blank", 100),
            row("c", "", 100),
            row("d", "Dorohedoro", 0),
        ]);

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(cart.subtotal(), Money::new(300));
    }

    #[test]
    fn test_empty_cart_snapshot_carries_flat_fee() {
        let snapshot = Cart::new().snapshot(&ShippingPolicy::default());
        assert_eq!(snapshot.subtotal, Money::zero());
        assert_eq!(snapshot.shipping, Money::new(50));
        assert_eq!(snapshot.total, Money::new(50));
        assert_eq!(snapshot.item_count, 0);
    }

    #[test]
    fn test_serde_round_trip_keeps_order() {
        let mut cart = Cart::new();
        cart.add(&product("b", 200), 2).unwrap();
        cart.add(&product("a", 100), 1).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with("[{\"id\":\"b\""));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_snapshot_field_names() {
        let mut cart = Cart::new();
        cart.add(&product("x", 500), 2).unwrap();

        let value = serde_json::to_value(cart.snapshot(&ShippingPolicy::default())).unwrap();
        assert_eq!(value["itemCount"], 2);
        assert_eq!(value["total"], 1000);
        assert_eq!(value["items"][0]["id"], "x");
    }
}
