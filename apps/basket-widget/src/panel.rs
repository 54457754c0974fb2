//! # Cart Panel State
//!
//! ```text
//!            open (toggle, item added)
//!   ┌────────┐ ───────────────────────► ┌────────┐
//!   │ Closed │                          │  Open  │
//!   └────────┘ ◄─────────────────────── └────────┘
//!            close (close button, overlay, Escape,
//!                   continue shopping, checkout)
//! ```
//!
//! Opening an open panel or closing a closed one changes nothing. While the
//! panel is open the overlay shows and the page body does not scroll.

use std::fmt;

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// What asked the panel to move. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTrigger {
    Toggle,
    ItemAdded,
    CloseButton,
    Overlay,
    Escape,
    ContinueShopping,
    Checkout,
}

impl fmt::Display for PanelTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelTrigger::Toggle => "toggle",
            PanelTrigger::ItemAdded => "item_added",
            PanelTrigger::CloseButton => "close_button",
            PanelTrigger::Overlay => "overlay",
            PanelTrigger::Escape => "escape",
            PanelTrigger::ContinueShopping => "continue_shopping",
            PanelTrigger::Checkout => "checkout",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct Panel {
    state: PanelState,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Body scrolling is locked exactly while the panel is open.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// Opens the panel. Returns true if it was closed.
    pub fn open(&mut self, trigger: PanelTrigger) -> bool {
        self.transition(PanelState::Open, trigger)
    }

    /// Closes the panel. Returns true if it was open.
    pub fn close(&mut self, trigger: PanelTrigger) -> bool {
        self.transition(PanelState::Closed, trigger)
    }

    fn transition(&mut self, to: PanelState, trigger: PanelTrigger) -> bool {
        if self.state == to {
            return false;
        }
        debug!(from = ?self.state, to = ?to, %trigger, "Panel transition");
        self.state = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let panel = Panel::new();
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(!panel.scroll_locked());
    }

    #[test]
    fn test_self_transitions_are_noops() {
        let mut panel = Panel::new();
        assert!(!panel.close(PanelTrigger::Escape));

        assert!(panel.open(PanelTrigger::Toggle));
        assert!(!panel.open(PanelTrigger::ItemAdded));
        assert!(panel.scroll_locked());

        assert!(panel.close(PanelTrigger::Overlay));
        assert!(!panel.close(PanelTrigger::CloseButton));
        assert!(!panel.is_open());
    }
}
