//! # Basket Widget
//!
//! The storefront side of the basket: one [`CartEngine`] per page, driving
//! the cart panel, the header badge and the toasts.
//!
//! ## Module Organization
//! ```text
//! basket_widget/
//! ├── lib.rs          ◄─── You are here (tracing setup & mount)
//! ├── engine.rs       ◄─── CartEngine: mutations, persistence, dispatch
//! ├── events.rs       ◄─── UiEvent / RowAction / Key
//! ├── render.rs       ◄─── CartView, CartRenderer, HtmlRenderer
//! ├── notify.rs       ◄─── Toast queue and lifecycle
//! ├── panel.rs        ◄─── Open / closed panel state
//! ├── timer.rs        ◄─── Deferred callbacks, add-button feedback
//! ├── config.rs       ◄─── WidgetConfig (basket.toml + BASKET_* env)
//! └── error.rs        ◄─── WidgetError, shopper notices
//! ```
//!
//! ## Page Wiring
//! ```rust
//! use basket_core::ProductAttributes;
//! use basket_store::MemoryStorage;
//! use basket_widget::config::WidgetConfig;
//! use basket_widget::engine::{CartEngine, EventOutcome};
//! use basket_widget::events::UiEvent;
//! use basket_widget::render::HtmlRenderer;
//!
//! let config = WidgetConfig::default();
//! let html = HtmlRenderer::new(config.display.clone());
//! let mut engine = CartEngine::start(&config, MemoryStorage::new()).with_renderer(html.clone());
//!
//! let attrs = ProductAttributes::from_pairs([
//!     ("data-id", "x"),
//!     ("data-name", "Berserk Vol. 1"),
//!     ("data-price", "500"),
//!     ("data-image", "berserk.jpg"),
//! ]);
//! assert_eq!(engine.dispatch(UiEvent::add(attrs)), EventOutcome::CartChanged);
//!
//! let panel = html.latest();
//! assert_eq!(panel.total, "550 грн");
//! assert!(panel.panel_open);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod notify;
pub mod panel;
pub mod render;
pub mod timer;

use tracing::info;
use tracing_subscriber::EnvFilter;

use basket_store::FileStorage;

pub use config::WidgetConfig;
pub use engine::{CartEngine, CheckoutOutcome, EventOutcome};
pub use error::{Notice, WidgetError, WidgetResult};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=basket_widget=trace` - Show trace for the widget only
/// - Default: INFO, DEBUG for the basket crates
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,basket=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Creates the page's engine on top of the file store.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Determine Storage Directory ─────────────────────────────────────► │
/// │     • [storage] dir / BASKET_STORAGE_DIR, if set                        │
/// │     • Linux: ~/.local/share/widget                                      │
/// │     • macOS: ~/Library/Application Support/com.basket.widget            │
/// │                                                                         │
/// │  2. Restore Cart ────────────────────────────────────────────────────► │
/// │     • <dir>/<storage key>.json, repaired or discarded if malformed      │
/// │                                                                         │
/// │  3. Ready ───────────────────────────────────────────────────────────► │
/// │     • panel closed, renderers attached by the caller                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn mount(config: &WidgetConfig) -> WidgetResult<CartEngine<FileStorage>> {
    let dir = config.storage_dir().ok_or(WidgetError::NoDataDir)?;
    info!(?dir, key = %config.storage.key, "Cart storage directory determined");

    Ok(CartEngine::start(config, FileStorage::new(dir)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{Money, Product};

    #[test]
    fn test_mount_persists_across_engines() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WidgetConfig::default();
        config.storage.dir = Some(dir.path().to_path_buf());

        let mut engine = mount(&config).unwrap();
        let tome = Product::new("x", "Berserk", Money::new(500), "b.jpg").unwrap();
        engine.add_item(&tome, 2).unwrap();
        assert!(dir.path().join("mangaCart.json").exists());

        let reloaded = mount(&config).unwrap();
        assert_eq!(reloaded.cart_data(), engine.cart_data());
        assert_eq!(reloaded.total(), Money::new(1000));
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
