//! # UI Events
//!
//! Everything the page can ask of the cart, as one enum. The page forwards
//! events to [`crate::engine::CartEngine::dispatch`] instead of wiring a
//! handler per button.
//!
//! Row buttons are addressed by two attributes, so one listener on the
//! item list covers every row no matter how often it is re-rendered:
//!
//! ```text
//! <button data-action="increase" data-id="x">+</button>
//!             │                          │
//!             └─────► UiEvent::row("increase", "x")
//!                     = UiEvent::Row { action: Increase, id: "x" }
//! ```

use std::fmt;
use std::str::FromStr;

use basket_core::ProductAttributes;

use crate::timer::ButtonFeedback;

/// Action of a row button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Increase,
    Decrease,
    Remove,
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowAction::Increase => write!(f, "increase"),
            RowAction::Decrease => write!(f, "decrease"),
            RowAction::Remove => write!(f, "remove"),
        }
    }
}

/// Unknown `data-action` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown row action: '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for RowAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "increase" => Ok(RowAction::Increase),
            "decrease" => Ok(RowAction::Decrease),
            "remove" => Ok(RowAction::Remove),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A key press the cart cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Page interaction forwarded to the engine.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// "Add to cart" clicked. `button` gets the temporary "added" label.
    AddToCart {
        attributes: ProductAttributes,
        button: Option<ButtonFeedback>,
    },

    /// A row button clicked.
    Row { action: RowAction, id: String },

    /// Header cart icon.
    TogglePanel,

    /// Close button inside the panel.
    ClosePanel,

    /// Click on the dimmed page behind the panel.
    OverlayClick,

    /// "Continue shopping" link.
    ContinueShopping,

    KeyDown(Key),

    /// "Clear cart" after the page asked the shopper to confirm.
    ClearCart { confirmed: bool },

    Checkout,
}

impl UiEvent {
    /// Builds a row event from `data-action` / `data-id`.
    ///
    /// Returns `None` for clicks that did not land on a row button.
    ///
    /// ## Example
    /// ```rust
    /// use basket_widget::events::{RowAction, UiEvent};
    ///
    /// let event = UiEvent::row(Some("decrease"), Some("x")).unwrap();
    /// assert!(matches!(event, UiEvent::Row { action: RowAction::Decrease, .. }));
    /// assert!(UiEvent::row(Some("zoom"), Some("x")).is_none());
    /// assert!(UiEvent::row(Some("remove"), None).is_none());
    /// ```
    pub fn row(action: Option<&str>, id: Option<&str>) -> Option<Self> {
        let action = action?.parse().ok()?;
        let id = id.filter(|id| !id.is_empty())?;
        Some(UiEvent::Row {
            action,
            id: id.to_string(),
        })
    }

    /// "Add to cart" without button feedback.
    pub fn add(attributes: ProductAttributes) -> Self {
        UiEvent::AddToCart {
            attributes,
            button: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_action_parsing() {
        assert_eq!("increase".parse::<RowAction>().unwrap(), RowAction::Increase);
        assert_eq!("decrease".parse::<RowAction>().unwrap(), RowAction::Decrease);
        assert_eq!(" remove ".parse::<RowAction>().unwrap(), RowAction::Remove);
        assert_eq!(
            "zoom".parse::<RowAction>().unwrap_err().to_string(),
            "Unknown row action: 'zoom'"
        );
    }

    #[test]
    fn test_row_event_needs_an_id() {
        assert!(UiEvent::row(Some("increase"), Some("")).is_none());
        assert!(UiEvent::row(None, Some("x")).is_none());
        assert!(matches!(
            UiEvent::row(Some("remove"), Some("x")),
            Some(UiEvent::Row { action: RowAction::Remove, ref id }) if id == "x"
        ));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other("Enter".into()));
    }
}
