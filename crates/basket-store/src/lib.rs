//! # basket-store: Persistence Layer for the Basket
//!
//! This crate keeps the cart alive across page loads. The stored form is a
//! single named record holding the JSON array of line items, the same shape
//! a browser's `localStorage` entry would have.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Data Flow                                 │
//! │                                                                         │
//! │  CartEngine mutation (add / remove / update / clear)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   basket-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────┐        ┌──────────────────────────────┐ │   │
//! │  │   │  CartRepository  │───────►│  Storage (trait)             │ │   │
//! │  │   │  load / save     │        │  ├── MemoryStorage           │ │   │
//! │  │   │  key "mangaCart" │        │  └── FileStorage (<key>.json)│ │   │
//! │  │   └──────────────────┘        └──────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [{"id":"x","name":"…","price":500,"image":"…","quantity":2}]          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The named-record store trait and its backends
//! - [`repository`] - Cart load/save on top of a store
//! - [`error`] - Persistence error types
//!
//! ## Usage
//!
//! ```rust
//! use basket_core::{Cart, Money, Product};
//! use basket_store::{CartRepository, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! let mut repo = CartRepository::new(storage.clone(), "mangaCart");
//!
//! let mut cart = Cart::new();
//! cart.add(&Product::new("x", "Berserk", Money::new(500), "b.jpg").unwrap(), 2).unwrap();
//! repo.save(&cart).unwrap();
//!
//! // A later page load sees the same record.
//! let reloaded = CartRepository::new(storage, "mangaCart").load().unwrap();
//! assert_eq!(reloaded, cart);
//! ```

pub mod error;
pub mod repository;
pub mod storage;

pub use error::{StoreError, StoreResult};
pub use repository::CartRepository;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Record name used when nothing else is configured.
pub const DEFAULT_STORAGE_KEY: &str = "mangaCart";
