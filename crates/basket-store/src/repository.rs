//! # Cart Repository
//!
//! Loads and saves the whole cart as one named record.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartEngine                                                            │
//! │       │  repo.save(&cart)          repo.load()                         │
//! │       ▼                                  ▲                              │
//! │  CartRepository                          │                              │
//! │  ├── encode: Vec<LineItem> → JSON        │ decode + Cart::from_items    │
//! │  └── key: "mangaCart"                    │                              │
//! │       │                                  │                              │
//! │       ▼                                  │                              │
//! │  Storage (memory / file)  ───────────────┘                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use basket_core::{Cart, LineItem};

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// Repository for the persisted cart record.
#[derive(Debug, Clone)]
pub struct CartRepository<S> {
    storage: S,
    key: String,
}

impl<S: Storage> CartRepository<S> {
    /// Creates a repository for the record named `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        CartRepository {
            storage,
            key: key.into(),
        }
    }

    /// Record name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives the store back, e.g. to hand it to the next engine.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Loads the stored cart.
    ///
    /// ## Behavior
    /// - No record, or a `null` record → empty cart
    /// - Valid record → same rows, same order
    /// - A row that does not decode (negative or fractional quantity,
    ///   missing field) → dropped and logged, the other rows are kept
    /// - Repeated ids, zero quantities, blank ids or names, negative
    ///   prices → repaired (see `Cart::from_items`)
    /// - Anything that is not an array → [`StoreError::Corrupt`]
    pub fn load(&self) -> StoreResult<Cart> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            debug!(key = %self.key, "No stored cart, starting empty");
            return Ok(Cart::new());
        };

        let values: Option<Vec<serde_json::Value>> =
            serde_json::from_str(&raw).map_err(StoreError::Corrupt)?;
        let values = values.unwrap_or_default();
        let stored_rows = values.len();

        let rows: Vec<LineItem> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(key = %self.key, index, error = %e, "Dropping unreadable cart row");
                    None
                }
            })
            .collect();

        let cart = Cart::from_items(rows);
        if cart.len() != stored_rows {
            warn!(
                key = %self.key,
                stored_rows,
                kept_rows = cart.len(),
                "Stored cart had invalid, duplicate or empty rows; repaired"
            );
        }

        debug!(key = %self.key, rows = cart.len(), "Cart restored");
        Ok(cart)
    }

    /// Writes the full cart, replacing the previous record.
    pub fn save(&mut self, cart: &Cart) -> StoreResult<()> {
        let json = serde_json::to_string(cart.items()).map_err(StoreError::Encode)?;
        self.storage.set_item(&self.key, &json)?;

        debug!(key = %self.key, rows = cart.len(), "Cart persisted");
        Ok(())
    }
}
