//! # Cart Engine
//!
//! The one object the storefront page talks to. It owns the cart and keeps
//! the stored record, the rendered panel and the toasts in step with it.
//!
//! ## Mutation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Cart Mutation                                  │
//! │                                                                         │
//! │  1. Mutate ───── basket-core rules (merge, floor at 1, validation)     │
//! │        │         rejected? → error toast, nothing else happens         │
//! │        ▼                                                                │
//! │  2. Persist ──── whole cart written under the storage key              │
//! │        │         failed? → logged, toast once, in-memory cart wins     │
//! │        ▼                                                                │
//! │  3. Render ───── CartView to every attached renderer                   │
//! │        │         (quantity changes patch one row)                      │
//! │        ▼                                                                │
//! │  4. Notify ───── success / info toast                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  5. Panel ────── opens after an add, closes after checkout             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! One engine per page, created by [`crate::mount`] or
//! [`CartEngine::start`]. Mutations take `&mut self`, so a mutation always
//! finishes before the next one begins.

use tracing::{debug, error, info, warn};

use basket_core::{
    AddOutcome, Cart, CartError, CartResult, CartSnapshot, CartTotals, LineItem, Money,
    Product, ProductAttributes, ProductRequest, QuantityChange, ShippingPolicy,
};
use basket_store::{CartRepository, Storage};

use crate::config::{DisplaySettings, TimingSettings, WidgetConfig};
use crate::error::Notice;
use crate::events::{Key, RowAction, UiEvent};
use crate::notify::NotificationCenter;
use crate::panel::{Panel, PanelState, PanelTrigger};
use crate::render::{CartRenderer, CartView};
use crate::timer::ButtonFeedback;

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Go to the checkout page with this cart.
    Proceed(CartSnapshot),
    /// Nothing to check out; an error toast is showing.
    Refused,
}

/// What [`CartEngine::dispatch`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The cart changed.
    CartChanged,
    /// Only the panel moved.
    PanelChanged,
    /// Valid event, nothing to do (unknown id, decrement at 1, Escape while
    /// closed, unconfirmed clear).
    Ignored,
    /// The cart refused the request; an error toast is showing.
    Rejected,
    Checkout(CheckoutOutcome),
}

/// The storefront cart engine.
pub struct CartEngine<S: Storage> {
    cart: Cart,
    repo: CartRepository<S>,
    policy: ShippingPolicy,
    display: DisplaySettings,
    timing: TimingSettings,
    panel: Panel,
    notifications: NotificationCenter,
    renderers: Vec<Box<dyn CartRenderer>>,
    storage_degraded: bool,
}

impl<S: Storage> CartEngine<S> {
    /// Creates the engine and restores the stored cart.
    ///
    /// ## Restore Behavior
    /// - No record → empty cart
    /// - Record with repeated ids or zero quantities → repaired
    /// - Unreadable record → empty cart, error toast (the next save
    ///   overwrites it)
    /// - Store unavailable → empty cart, error toast, marked degraded
    pub fn start(config: &WidgetConfig, storage: S) -> Self {
        let repo = CartRepository::new(storage, config.storage.key.clone());
        let notifications = NotificationCenter::new(config.timing.toast_timing());

        let (cart, storage_degraded) = match repo.load() {
            Ok(cart) => (cart, false),
            Err(e) => {
                error!(key = %repo.key(), error = %e, "Failed to restore cart, starting empty");
                notifications.notice(&Notice::restore_failed(&e));
                (Cart::new(), !e.is_corrupt())
            }
        };

        info!(
            key = %repo.key(),
            rows = cart.len(),
            items = cart.item_count(),
            "Cart engine started"
        );

        CartEngine {
            cart,
            repo,
            policy: config.shipping_policy(),
            display: config.display.clone(),
            timing: config.timing.clone(),
            panel: Panel::new(),
            notifications,
            renderers: Vec::new(),
            storage_degraded,
        }
    }

    /// Attaches a renderer and draws the current state into it.
    pub fn attach_renderer(&mut self, mut renderer: Box<dyn CartRenderer>) {
        renderer.render(&self.view());
        renderer.render_panel(self.panel.state());
        self.renderers.push(renderer);
    }

    /// Builder form of [`CartEngine::attach_renderer`].
    pub fn with_renderer(mut self, renderer: impl CartRenderer + 'static) -> Self {
        self.attach_renderer(Box::new(renderer));
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` of a product, merging with an existing row.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> CartResult<AddOutcome> {
        let outcome = match self.cart.add(product, quantity) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.reject(e)),
        };

        info!(
            item_id = %product.id,
            added = quantity,
            quantity = outcome.quantity(),
            merged = matches!(outcome, AddOutcome::Merged { .. }),
            "Item added to cart"
        );

        self.persist();
        self.render_all();
        self.notifications
            .notice(&Notice::success(format!("{} added to cart!", product.name)));
        self.open_panel(PanelTrigger::ItemAdded);

        Ok(outcome)
    }

    /// Adds a product described by "add to cart" button attributes.
    ///
    /// Missing quantity means 1. Any invalid attribute rejects the whole
    /// item.
    pub fn add_from_attributes(&mut self, attributes: &ProductAttributes) -> CartResult<AddOutcome> {
        match ProductRequest::try_from(attributes) {
            Ok(request) => self.add_item(&request.product, request.quantity),
            Err(e) => Err(self.reject(e.into())),
        }
    }

    /// Removes a row. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str) -> Option<LineItem> {
        let Some(removed) = self.cart.remove(id) else {
            debug!(item_id = %id, "Remove ignored: not in cart");
            return None;
        };

        info!(item_id = %id, quantity = removed.quantity, "Item removed from cart");

        self.persist();
        self.render_all();
        self.notifications
            .notice(&Notice::info(format!("{} removed from cart", removed.name)));

        Some(removed)
    }

    /// Sets a row's quantity. Zero is rejected and the row is kept as it was.
    ///
    /// ## Returns
    /// - `Ok(Some(change))` when the row exists
    /// - `Ok(None)` for an unknown id
    pub fn update_quantity(
        &mut self,
        id: &str,
        quantity: u32,
    ) -> CartResult<Option<QuantityChange>> {
        match self.cart.set_quantity(id, quantity) {
            Ok(change) => Ok(self.after_quantity_change(id, change)),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Adds one to a row.
    pub fn increment(&mut self, id: &str) -> CartResult<Option<QuantityChange>> {
        match self.cart.increment(id) {
            Ok(change) => Ok(self.after_quantity_change(id, change)),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Takes one off a row. At quantity 1 nothing happens.
    pub fn decrement(&mut self, id: &str) -> Option<QuantityChange> {
        let change = self.cart.decrement(id);
        self.after_quantity_change(id, change)
    }

    /// Empties the cart. Returns how many rows were dropped.
    pub fn clear_cart(&mut self) -> usize {
        let dropped = self.cart.clear();
        info!(rows = dropped, "Cart cleared");

        self.persist();
        self.render_all();
        self.notifications.notice(&Notice::info("Cart cleared"));

        dropped
    }

    /// Checkout guard.
    ///
    /// An empty cart is refused with an error toast and the panel stays as
    /// it is. Otherwise a success toast shows, the panel closes and the
    /// caller gets the snapshot to hand to the checkout page.
    pub fn checkout(&mut self) -> CheckoutOutcome {
        if self.cart.is_empty() {
            let err = CartError::EmptyCartCheckout;
            warn!("Checkout refused: cart is empty");
            self.notifications.notice(&Notice::from(&err));
            return CheckoutOutcome::Refused;
        }

        let snapshot = self.cart_data();
        info!(
            rows = snapshot.items.len(),
            total = %snapshot.total,
            "Proceeding to checkout"
        );

        self.notifications
            .notice(&Notice::success("Proceeding to checkout..."));
        self.close_panel(PanelTrigger::Checkout);

        CheckoutOutcome::Proceed(snapshot)
    }

    // =========================================================================
    // Panel
    // =========================================================================

    /// Opens the panel. Returns false if it was already open.
    pub fn open_panel(&mut self, trigger: PanelTrigger) -> bool {
        let changed = self.panel.open(trigger);
        if changed {
            self.render_panel();
        }
        changed
    }

    /// Closes the panel. Returns false if it was already closed.
    pub fn close_panel(&mut self, trigger: PanelTrigger) -> bool {
        let changed = self.panel.close(trigger);
        if changed {
            self.render_panel();
        }
        changed
    }

    /// Escape closes an open panel; other keys are ignored.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        match key {
            Key::Escape if self.panel.is_open() => self.close_panel(PanelTrigger::Escape),
            _ => false,
        }
    }

    // =========================================================================
    // Event Dispatch
    // =========================================================================

    /// Single entry point for page events.
    pub fn dispatch(&mut self, event: UiEvent) -> EventOutcome {
        match event {
            UiEvent::AddToCart { attributes, button } => {
                match self.add_from_attributes(&attributes) {
                    Ok(_) => {
                        if let Some(button) = button {
                            self.confirm_button(&button);
                        }
                        EventOutcome::CartChanged
                    }
                    Err(_) => EventOutcome::Rejected,
                }
            }
            UiEvent::Row { action, id } => self.dispatch_row(action, &id),
            UiEvent::TogglePanel => panel_outcome(self.open_panel(PanelTrigger::Toggle)),
            UiEvent::ClosePanel => panel_outcome(self.close_panel(PanelTrigger::CloseButton)),
            UiEvent::OverlayClick => panel_outcome(self.close_panel(PanelTrigger::Overlay)),
            UiEvent::ContinueShopping => {
                panel_outcome(self.close_panel(PanelTrigger::ContinueShopping))
            }
            UiEvent::KeyDown(key) => panel_outcome(self.handle_key(&key)),
            UiEvent::ClearCart { confirmed: false } => {
                debug!("Clear cart not confirmed");
                EventOutcome::Ignored
            }
            UiEvent::ClearCart { confirmed: true } => {
                self.clear_cart();
                EventOutcome::CartChanged
            }
            UiEvent::Checkout => EventOutcome::Checkout(self.checkout()),
        }
    }

    fn dispatch_row(&mut self, action: RowAction, id: &str) -> EventOutcome {
        match action {
            RowAction::Increase => match self.increment(id) {
                Ok(change) => change_outcome(change),
                Err(_) => EventOutcome::Rejected,
            },
            RowAction::Decrease => change_outcome(self.decrement(id)),
            RowAction::Remove => match self.remove_item(id) {
                Some(_) => EventOutcome::CartChanged,
                None => EventOutcome::Ignored,
            },
        }
    }

    fn confirm_button(&self, button: &ButtonFeedback) {
        button.confirm(&self.display.added_label, self.timing.button_reset());
    }

    // =========================================================================
    // Readers
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Σ price × quantity.
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Shipping for the current subtotal.
    pub fn shipping(&self) -> Money {
        self.policy.shipping_for(self.cart.subtotal())
    }

    /// Subtotal plus shipping.
    pub fn total(&self) -> Money {
        self.totals().total
    }

    /// Σ quantity, what the header badge shows.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals(&self.policy)
    }

    /// Read-only copy of the cart for other page scripts.
    pub fn cart_data(&self) -> CartSnapshot {
        self.cart.snapshot(&self.policy)
    }

    pub fn view(&self) -> CartView {
        CartView::build(&self.cart, &self.policy, self.storage_degraded)
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel.is_open()
    }

    /// Body scroll is locked while the panel is open.
    pub fn scroll_locked(&self) -> bool {
        self.panel.scroll_locked()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// True while saves are failing.
    pub fn storage_degraded(&self) -> bool {
        self.storage_degraded
    }

    pub fn shipping_policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// Stops the engine and returns its store.
    pub fn into_storage(self) -> S {
        self.repo.into_storage()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Logs a refused request and shows its toast.
    fn reject(&self, err: CartError) -> CartError {
        warn!(error = %err, "Cart request rejected");
        self.notifications.notice(&Notice::from(&err));
        err
    }

    fn after_quantity_change(
        &mut self,
        id: &str,
        change: Option<QuantityChange>,
    ) -> Option<QuantityChange> {
        match change {
            None => debug!(item_id = %id, "Quantity change ignored: not in cart"),
            Some(change) if change.is_noop() => {
                debug!(item_id = %id, quantity = change.current, "Quantity unchanged")
            }
            Some(change) => {
                debug!(
                    item_id = %id,
                    from = change.previous,
                    to = change.current,
                    "Quantity changed"
                );
                self.persist();
                self.render_quantity(id);
            }
        }
        change
    }

    /// Writes the cart. Failures never undo the mutation.
    fn persist(&mut self) {
        match self.repo.save(&self.cart) {
            Ok(()) => {
                if self.storage_degraded {
                    info!(key = %self.repo.key(), "Cart storage recovered");
                    self.storage_degraded = false;
                }
            }
            Err(e) => {
                error!(
                    key = %self.repo.key(),
                    error = %e,
                    "Failed to persist cart; keeping in-memory state"
                );
                if !self.storage_degraded {
                    self.notifications.notice(&Notice::save_failed(&e));
                }
                self.storage_degraded = true;
            }
        }
    }

    fn render_all(&mut self) {
        let view = self.view();
        for renderer in &mut self.renderers {
            renderer.render(&view);
        }
    }

    fn render_quantity(&mut self, id: &str) {
        let view = self.view();
        match view.row(id) {
            Some(row) => {
                for renderer in &mut self.renderers {
                    renderer.render_quantity(row, &view);
                }
            }
            None => {
                for renderer in &mut self.renderers {
                    renderer.render(&view);
                }
            }
        }
    }

    fn render_panel(&mut self) {
        let state = self.panel.state();
        for renderer in &mut self.renderers {
            renderer.render_panel(state);
        }
    }
}

impl<S: Storage> std::fmt::Debug for CartEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("key", &self.repo.key())
            .field("rows", &self.cart.len())
            .field("panel", &self.panel.state())
            .field("renderers", &self.renderers.len())
            .field("storage_degraded", &self.storage_degraded)
            .finish()
    }
}

fn panel_outcome(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::PanelChanged
    } else {
        EventOutcome::Ignored
    }
}

fn change_outcome(change: Option<QuantityChange>) -> EventOutcome {
    match change {
        Some(change) if !change.is_noop() => EventOutcome::CartChanged,
        _ => EventOutcome::Ignored,
    }
}
