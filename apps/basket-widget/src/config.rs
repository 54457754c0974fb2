//! # Widget Configuration
//!
//! Settings the host page can tune without touching cart rules.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BASKET_STORAGE_KEY=mangaCart                                       │
//! │     BASKET_FREE_SHIPPING_THRESHOLD=1000                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/basket/basket.toml (Linux)                               │
//! │     ~/Library/Application Support/com.basket.widget/basket.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     key "mangaCart", free from 1000, flat fee 50, toasts 3 s           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # basket.toml
//! [storage]
//! key = "mangaCart"
//! dir = "/var/lib/shop/basket"   # optional, platform data dir otherwise
//!
//! [shipping]
//! free_threshold = 1000
//! flat_fee = 50
//!
//! [display]
//! currency_label = "грн"
//! free_shipping_label = "Free"
//! added_label = "✓ Added"
//!
//! [timing]
//! toast_display_ms = 3000
//! toast_animation_ms = 300
//! button_reset_ms = 2000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use basket_core::{Money, ShippingPolicy, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};
use basket_store::DEFAULT_STORAGE_KEY;

use crate::error::{WidgetError, WidgetResult};
use crate::notify::ToastTiming;

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart record lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Record name. Changing it orphans carts saved under the old name.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Directory for the file backend. `None` means the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            key: default_storage_key(),
            dir: None,
        }
    }
}

// =============================================================================
// Shipping Settings
// =============================================================================

/// Shipping rule inputs, in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingSettings {
    /// Subtotal at or above which shipping is free.
    #[serde(default = "default_free_threshold")]
    pub free_threshold: i64,

    /// Fee charged below the threshold.
    #[serde(default = "default_flat_fee")]
    pub flat_fee: i64,
}

fn default_free_threshold() -> i64 {
    FREE_SHIPPING_THRESHOLD.amount()
}

fn default_flat_fee() -> i64 {
    FLAT_SHIPPING_FEE.amount()
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            free_threshold: default_free_threshold(),
            flat_fee: default_flat_fee(),
        }
    }
}

impl ShippingSettings {
    /// Builds the policy the cart computes totals with.
    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(Money::new(self.free_threshold), Money::new(self.flat_fee))
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// Text used when amounts and labels are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Appended to every amount: `"1000 грн"`.
    #[serde(default = "default_currency_label")]
    pub currency_label: String,

    /// Shown in place of a zero shipping amount.
    #[serde(default = "default_free_shipping_label")]
    pub free_shipping_label: String,

    /// Add-button text while the "added" confirmation is showing.
    #[serde(default = "default_added_label")]
    pub added_label: String,
}

fn default_currency_label() -> String {
    "грн".to_string()
}

fn default_free_shipping_label() -> String {
    "Free".to_string()
}

fn default_added_label() -> String {
    "✓ Added".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_label: default_currency_label(),
            free_shipping_label: default_free_shipping_label(),
            added_label: default_added_label(),
        }
    }
}

impl DisplaySettings {
    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::Money;
    /// use basket_widget::config::DisplaySettings;
    ///
    /// let display = DisplaySettings::default();
    /// assert_eq!(display.format_money(Money::new(1500)), "1500 грн");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        if self.currency_label.is_empty() {
            amount.to_string()
        } else {
            format!("{} {}", amount, self.currency_label)
        }
    }

    /// Formats the shipping line: the free label when nothing is charged.
    pub fn format_shipping(&self, shipping: Money) -> String {
        if shipping.is_zero() {
            self.free_shipping_label.clone()
        } else {
            self.format_money(shipping)
        }
    }
}

// =============================================================================
// Timing Settings
// =============================================================================

/// Durations of the transient UI effects, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// How long a toast stays before it starts leaving.
    #[serde(default = "default_toast_display")]
    pub toast_display_ms: u64,

    /// Entry and exit animation length.
    #[serde(default = "default_toast_animation")]
    pub toast_animation_ms: u64,

    /// How long the add button shows the "added" label.
    #[serde(default = "default_button_reset")]
    pub button_reset_ms: u64,
}

fn default_toast_display() -> u64 {
    3000
}

fn default_toast_animation() -> u64 {
    300
}

fn default_button_reset() -> u64 {
    2000
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            toast_display_ms: default_toast_display(),
            toast_animation_ms: default_toast_animation(),
            button_reset_ms: default_button_reset(),
        }
    }
}

impl TimingSettings {
    /// Toast lifecycle durations.
    pub fn toast_timing(&self) -> ToastTiming {
        ToastTiming {
            display: Duration::from_millis(self.toast_display_ms),
            animation: Duration::from_millis(self.toast_animation_ms),
        }
    }

    /// Add-button label revert delay.
    pub fn button_reset(&self) -> Duration {
        Duration::from_millis(self.button_reset_ms)
    }
}

// =============================================================================
// Main Widget Configuration
// =============================================================================

/// Complete widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub shipping: ShippingSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub timing: TimingSettings,
}

impl WidgetConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (basket.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> WidgetResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading widget config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load widget config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> WidgetResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(WidgetError::InvalidConfig(
                "storage.key must not be empty".into(),
            ));
        }

        if self.shipping.free_threshold < 0 {
            return Err(WidgetError::InvalidConfig(format!(
                "shipping.free_threshold must not be negative, got {}",
                self.shipping.free_threshold
            )));
        }

        if self.shipping.flat_fee < 0 {
            return Err(WidgetError::InvalidConfig(format!(
                "shipping.flat_fee must not be negative, got {}",
                self.shipping.flat_fee
            )));
        }

        if self.timing.toast_display_ms == 0 {
            return Err(WidgetError::InvalidConfig(
                "timing.toast_display_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable lookup.
    ///
    /// Unparseable numbers are logged and ignored; `validate` runs after.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("BASKET_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage.key = key;
        }

        if let Some(dir) = lookup("BASKET_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(threshold) = lookup("BASKET_FREE_SHIPPING_THRESHOLD") {
            match threshold.trim().parse::<i64>() {
                Ok(value) => self.shipping.free_threshold = value,
                Err(_) => warn!(value = %threshold, "Ignoring non-numeric free shipping threshold"),
            }
        }

        if let Some(fee) = lookup("BASKET_FLAT_SHIPPING_FEE") {
            match fee.trim().parse::<i64>() {
                Ok(value) => self.shipping.flat_fee = value,
                Err(_) => warn!(value = %fee, "Ignoring non-numeric flat shipping fee"),
            }
        }

        if let Some(label) = lookup("BASKET_CURRENCY_LABEL") {
            self.display.currency_label = label;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "basket", "widget").map(|dirs| dirs.config_dir().join("basket.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Directory the file backend writes to: the configured one, or the
    /// platform data dir.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.basket.widget`
    /// - **Windows**: `%APPDATA%\basket\widget\data`
    /// - **Linux**: `~/.local/share/widget`
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(|| {
            ProjectDirs::from("com", "basket", "widget").map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    /// Shipping policy for totals.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.shipping.policy()
    }
}
