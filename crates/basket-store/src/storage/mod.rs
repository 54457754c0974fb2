//! # Storage Module
//!
//! Named-record stores the cart can be written to.
//!
//! ## Storage Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Named Record Store                                   │
//! │                                                                         │
//! │  get_item("mangaCart")       → Ok(Some(json)) | Ok(None) | Err(..)     │
//! │  set_item("mangaCart", json) → Ok(()) once the value is durable        │
//! │  remove_item("mangaCart")    → Ok(()) even if nothing was stored       │
//! │                                                                         │
//! │  Backends                                                               │
//! │  ├── MemoryStorage  shared in-process map, optional quota / disable    │
//! │  └── FileStorage    one <key>.json file per record, atomic replace     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only one logical writer exists, so last write wins.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StoreResult;

/// A key/value store of string records.
pub trait Storage {
    /// Reads a record. A missing record is `Ok(None)`, not an error.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a record, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes a record. Deleting a missing record succeeds.
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove_item(key)
    }
}
