//! # Deferred Callbacks
//!
//! Fire-and-forget timers for short-lived UI effects.
//!
//! ```text
//! defer(300ms, &target, f)
//!      │
//!      ├── inside a tokio runtime?  → spawn there
//!      ├── otherwise                → spawn on the shared timer runtime
//!      │
//!      └── sleep(300ms) ── target still alive? ── yes → f(target)
//!                                            └── no  → debug log
//! ```
//!
//! Only a `Weak` reference is held while waiting, so a deferred callback
//! never keeps its target alive and never cancels.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, error};

/// Handle of the caller's runtime, or of a small process-wide one.
///
/// Pages that never start tokio still get their toasts dismissed and their
/// buttons reset. `None` only if the fallback runtime could not be built.
fn runtime_handle() -> Option<Handle> {
    if let Ok(handle) = Handle::try_current() {
        return Some(handle);
    }

    static TIMER_RT: OnceLock<Option<Runtime>> = OnceLock::new();
    let runtime = TIMER_RT.get_or_init(|| {
        Builder::new_multi_thread()
            .enable_time()
            .worker_threads(1)
            .thread_name("basket-timer")
            .build()
            .map_err(|e| error!(error = %e, "Failed to build timer runtime"))
            .ok()
    });

    runtime.as_ref().map(|rt| rt.handle().clone())
}

/// Runs `f` with `target` after `delay`, if the target still exists.
///
/// Returns `false` when nothing could be scheduled.
pub fn defer<T, F>(delay: Duration, target: &Arc<T>, f: F) -> bool
where
    T: Send + Sync + 'static,
    F: FnOnce(Arc<T>) + Send + 'static,
{
    let Some(handle) = runtime_handle() else {
        debug!(?delay, "No timer runtime; deferred callback skipped");
        return false;
    };

    let target = Arc::downgrade(target);
    handle.spawn(async move {
        tokio::time::sleep(delay).await;
        match target.upgrade() {
            Some(target) => f(target),
            None => debug!("Deferred callback target is gone"),
        }
    });

    true
}

// =============================================================================
// Add Button Feedback
// =============================================================================

#[derive(Debug)]
struct ButtonLabel {
    idle: String,
    current: String,
}

/// Label of an "add to cart" button.
///
/// After a successful add the label reads e.g. "✓ Added" and reverts on its
/// own. Clones share one label, so the page keeps a clone and the engine
/// gets another inside the event.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use basket_widget::timer::ButtonFeedback;
///
/// let button = ButtonFeedback::new("Add to cart");
/// button.confirm("✓ Added", Duration::from_millis(20));
/// assert_eq!(button.label(), "✓ Added");
///
/// std::thread::sleep(Duration::from_millis(200));
/// assert_eq!(button.label(), "Add to cart");
/// ```
#[derive(Debug, Clone)]
pub struct ButtonFeedback {
    label: Arc<Mutex<ButtonLabel>>,
}

impl ButtonFeedback {
    pub fn new(idle: impl Into<String>) -> Self {
        let idle = idle.into();
        ButtonFeedback {
            label: Arc::new(Mutex::new(ButtonLabel {
                current: idle.clone(),
                idle,
            })),
        }
    }

    /// Text currently on the button.
    pub fn label(&self) -> String {
        self.label
            .lock()
            .map(|label| label.current.clone())
            .unwrap_or_default()
    }

    /// True while the confirmation label is showing.
    pub fn is_confirming(&self) -> bool {
        self.label
            .lock()
            .map(|label| label.current != label.idle)
            .unwrap_or(false)
    }

    /// Shows `text`, then reverts to the idle label after `reset_after`.
    ///
    /// Reverting always restores the idle label, so overlapping clicks
    /// cannot leave the confirmation text stuck.
    pub fn confirm(&self, text: &str, reset_after: Duration) {
        if let Ok(mut label) = self.label.lock() {
            label.current = text.to_string();
        }

        defer(reset_after, &self.label, |label| {
            if let Ok(mut label) = label.lock() {
                label.current = label.idle.clone();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defer_runs_outside_a_runtime() {
        let target = Arc::new(AtomicUsize::new(0));
        assert!(defer(Duration::from_millis(10), &target, |t| {
            t.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(target.load(Ordering::SeqCst), 0);

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(target.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_button_label_reverts_outside_a_runtime() {
        let button = ButtonFeedback::new("Add to cart");
        button.confirm("✓ Added", Duration::from_millis(20));
        assert!(button.is_confirming());

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(button.label(), "Add to cart");
    }

    #[tokio::test(start_paused = true)]
    async fn test_defer_runs_after_delay() {
        let target = Arc::new(AtomicUsize::new(0));
        assert!(defer(Duration::from_millis(300), &target, |t| {
            t.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(target.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(target.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_defer_tolerates_dropped_target() {
        let target = Arc::new(AtomicUsize::new(0));
        let witness = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&witness);

        defer(Duration::from_millis(10), &target, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        drop(target);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(witness.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_button_label_reverts() {
        let button = ButtonFeedback::new("Add to cart");
        button.confirm("✓ Added", Duration::from_secs(2));
        assert_eq!(button.label(), "✓ Added");
        assert!(button.is_confirming());

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(button.label(), "Add to cart");
        assert!(!button.is_confirming());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_clicks_end_idle() {
        let button = ButtonFeedback::new("Add to cart");
        button.confirm("✓ Added", Duration::from_secs(2));

        tokio::time::sleep(Duration::from_secs(1)).await;
        button.confirm("✓ Added", Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(button.label(), "Add to cart");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(button.label(), "Add to cart");
    }
}
