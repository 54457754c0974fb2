//! # Notifications
//!
//! Transient toasts shown next to the cart.
//!
//! ## Toast Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   notify()                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │   Entering ──(animation, 300ms)──► Shown                                │
//! │      │                                                                  │
//! │      └──────────(display, 3s from notify)──► Leaving                    │
//! │                                                │                        │
//! │                                  (animation, 300ms)                     │
//! │                                                ▼                        │
//! │                                             removed                     │
//! │                                                                         │
//! │   The entry timer and the dismissal timer run independently.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timers are [`defer`] callbacks, so toasts leave on their own with or
//! without a tokio runtime on the calling thread. A toast dismissed early,
//! or a center that was dropped, simply makes the later callbacks find
//! nothing to do.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::Notice;
use crate::timer::defer;

/// Oldest toasts are dropped beyond this many.
pub const MAX_TOASTS: usize = 5;

/// Toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Animation phase of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    Entering,
    Shown,
    Leaving,
}

/// Toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ToastId(Uuid);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A toast on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub severity: Severity,
    pub message: String,
    pub phase: ToastPhase,
    pub created_at: DateTime<Utc>,
}

/// Toast durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    /// From creation until the exit animation starts.
    pub display: Duration,
    /// Length of the entry and of the exit animation.
    pub animation: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        ToastTiming {
            display: Duration::from_millis(3000),
            animation: Duration::from_millis(300),
        }
    }
}

type Shelf = Mutex<Vec<Toast>>;

/// Queue of visible toasts.
///
/// Clones share the queue, so the display surface can hold one while the
/// engine holds another.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    shelf: Arc<Shelf>,
    timing: ToastTiming,
}

impl NotificationCenter {
    pub fn new(timing: ToastTiming) -> Self {
        NotificationCenter {
            shelf: Arc::default(),
            timing,
        }
    }

    /// Shows a toast and schedules its lifecycle.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> ToastId {
        let toast = Toast {
            id: ToastId(Uuid::new_v4()),
            severity,
            message: message.into(),
            phase: ToastPhase::Entering,
            created_at: Utc::now(),
        };
        let id = toast.id;

        match severity {
            Severity::Error => error!(toast_id = %id, message = %toast.message, "Error notice"),
            _ => info!(toast_id = %id, %severity, message = %toast.message, "Notice"),
        }

        if let Ok(mut toasts) = self.shelf.lock() {
            toasts.push(toast);
            if toasts.len() > MAX_TOASTS {
                let overflow = toasts.len() - MAX_TOASTS;
                toasts.drain(..overflow);
            }
        }

        let animation = self.timing.animation;
        defer(animation, &self.shelf, move |shelf| {
            set_phase(&shelf, id, ToastPhase::Shown);
        });
        defer(self.timing.display, &self.shelf, move |shelf| {
            if set_phase(&shelf, id, ToastPhase::Leaving) {
                defer(animation, &shelf, move |shelf| {
                    remove(&shelf, id);
                });
            }
        });

        id
    }

    /// Shows a prepared notice.
    pub fn notice(&self, notice: &Notice) -> ToastId {
        self.notify(notice.severity, notice.message.clone())
    }

    /// Toasts on screen, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.shelf
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    /// Most recent toast.
    pub fn latest(&self) -> Option<Toast> {
        self.shelf
            .lock()
            .ok()
            .and_then(|toasts| toasts.last().cloned())
    }

    /// Removes a toast right away. Returns false if it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        remove(&self.shelf, id)
    }

    pub fn len(&self) -> usize {
        self.shelf.lock().map(|toasts| toasts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Moves a toast forward. Never moves it back (an entry timer that fires
/// late must not revive a leaving toast).
fn set_phase(shelf: &Shelf, id: ToastId, phase: ToastPhase) -> bool {
    let Ok(mut toasts) = shelf.lock() else {
        return false;
    };
    match toasts.iter_mut().find(|t| t.id == id) {
        Some(toast) => {
            if toast.phase != ToastPhase::Leaving {
                toast.phase = phase;
            }
            true
        }
        None => {
            debug!(toast_id = %id, ?phase, "Toast already gone");
            false
        }
    }
}

fn remove(shelf: &Shelf, id: ToastId) -> bool {
    let Ok(mut toasts) = shelf.lock() else {
        return false;
    };
    let before = toasts.len();
    toasts.retain(|t| t.id != id);
    toasts.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_of(center: &NotificationCenter, id: ToastId) -> Option<ToastPhase> {
        center
            .active()
            .into_iter()
            .find(|t| t.id == id)
            .map(|t| t.phase)
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_lifecycle() {
        let center = NotificationCenter::new(ToastTiming::default());
        let id = center.notify(Severity::Success, "Berserk added to cart!");
        assert_eq!(phase_of(&center, id), Some(ToastPhase::Entering));

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(phase_of(&center, id), Some(ToastPhase::Shown));

        tokio::time::sleep(Duration::from_millis(2700)).await; // t = 3001
        assert_eq!(phase_of(&center, id), Some(ToastPhase::Leaving));

        tokio::time::sleep(Duration::from_millis(300)).await; // t = 3301
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissed_toast_ignores_later_timers() {
        let center = NotificationCenter::new(ToastTiming::default());
        let first = center.notify(Severity::Info, "Cart cleared");
        let second = center.notify(Severity::Error, "Your cart is empty!");

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));

        tokio::time::sleep(Duration::from_millis(3301)).await;
        assert!(center.is_empty());
        assert_eq!(phase_of(&center, second), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_center_is_tolerated() {
        let center = NotificationCenter::new(ToastTiming::default());
        center.notify(Severity::Info, "Cart cleared");
        drop(center);

        tokio::time::sleep(Duration::from_secs(4)).await;
    }

    #[test]
    fn test_latest_is_newest_toast() {
        let center = NotificationCenter::default();
        center.notify(Severity::Info, "one");
        center.notice(&Notice::error("two"));

        let latest = center.latest().unwrap();
        assert_eq!(latest.severity, Severity::Error);
        assert_eq!(latest.message, "two");
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn test_toasts_dismiss_outside_a_runtime() {
        let center = NotificationCenter::new(ToastTiming {
            display: Duration::from_millis(20),
            animation: Duration::from_millis(5),
        });
        let id = center.notify(Severity::Success, "Berserk added to cart!");
        assert_eq!(phase_of(&center, id), Some(ToastPhase::Entering));

        std::thread::sleep(Duration::from_millis(200));
        assert!(center.is_empty());
    }

    #[test]
    fn test_queue_is_capped() {
        let center = NotificationCenter::default();
        for i in 0..(MAX_TOASTS + 2) {
            center.notify(Severity::Info, format!("toast {}", i));
        }

        let active = center.active();
        assert_eq!(active.len(), MAX_TOASTS);
        assert_eq!(active[0].message, "toast 2");
    }

    #[test]
    fn test_toast_serialization() {
        let center = NotificationCenter::default();
        center.notify(Severity::Success, "ok");
        let json = serde_json::to_value(center.latest().unwrap()).unwrap();
        assert_eq!(json["severity"], "success");
        assert_eq!(json["phase"], "entering");
        assert!(json.get("createdAt").is_some());
    }
}
