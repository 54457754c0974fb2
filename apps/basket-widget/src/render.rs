//! # Rendering
//!
//! The engine never touches markup itself. After each mutation it builds a
//! [`CartView`] and hands it to every attached [`CartRenderer`].
//!
//! ## Render Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartView                                                               │
//! │  ├── rows[]            one per line item, cart order                   │
//! │  │    └── id, name, image, unit price, quantity, line total            │
//! │  ├── totals            subtotal, shipping, total, item count           │
//! │  └── storage_degraded  saves are currently failing                     │
//! │                                                                         │
//! │  empty state visible  ⇔  rows is empty  ⇔  item list hidden            │
//! │  badge visible        ⇔  item count > 0                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantity changes go through [`CartRenderer::render_quantity`] so a
//! renderer can patch one row in place instead of rebuilding the list.

use std::sync::{Arc, Mutex};

use askama::Template;
use serde::Serialize;
use tracing::{error, warn};

use basket_core::{Cart, CartTotals, LineItem, Money, ShippingPolicy};

use crate::config::DisplaySettings;
use crate::panel::PanelState;

// =============================================================================
// View Model
// =============================================================================

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
    /// The decrease button does nothing at quantity 1.
    pub can_decrement: bool,
}

impl From<&LineItem> for RowView {
    fn from(item: &LineItem) -> Self {
        RowView {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            unit_price: item.price,
            quantity: item.quantity,
            line_total: item.line_total(),
            can_decrement: item.quantity > 1,
        }
    }
}

/// Everything a renderer needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub rows: Vec<RowView>,
    pub totals: CartTotals,
    pub storage_degraded: bool,
}

impl CartView {
    pub fn build(cart: &Cart, policy: &ShippingPolicy, storage_degraded: bool) -> Self {
        CartView {
            rows: cart.items().iter().map(RowView::from).collect(),
            totals: cart.totals(policy),
            storage_degraded,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// "Your cart is empty" block.
    pub fn empty_state_visible(&self) -> bool {
        self.is_empty()
    }

    /// Row list; never shown together with the empty state.
    pub fn item_list_visible(&self) -> bool {
        !self.is_empty()
    }

    pub fn badge_count(&self) -> u64 {
        self.totals.item_count
    }

    pub fn badge_visible(&self) -> bool {
        self.totals.item_count > 0
    }

    pub fn row(&self, id: &str) -> Option<&RowView> {
        self.rows.iter().find(|row| row.id == id)
    }
}

// =============================================================================
// Renderer Trait
// =============================================================================

/// Something that draws the cart.
pub trait CartRenderer {
    /// Redraws everything.
    fn render(&mut self, view: &CartView);

    /// Redraws after one row's quantity changed. Row order is unchanged.
    fn render_quantity(&mut self, _row: &RowView, view: &CartView) {
        self.render(view);
    }

    /// Panel opened or closed.
    fn render_panel(&mut self, _state: PanelState) {}
}

impl<R: CartRenderer + ?Sized> CartRenderer for Box<R> {
    fn render(&mut self, view: &CartView) {
        (**self).render(view)
    }

    fn render_quantity(&mut self, row: &RowView, view: &CartView) {
        (**self).render_quantity(row, view)
    }

    fn render_panel(&mut self, state: PanelState) {
        (**self).render_panel(state)
    }
}

// =============================================================================
// HTML Renderer
// =============================================================================

#[derive(Template)]
#[template(path = "cart_item.html")]
struct CartItemHtml<'a> {
    row: RowMarkup<'a>,
}

struct RowMarkup<'a> {
    id: &'a str,
    name: &'a str,
    image: &'a str,
    unit_price: String,
    quantity: u32,
    line_total: String,
    can_decrement: bool,
}

/// Markup of one row, addressed by its `data-id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: String,
    pub html: String,
}

/// The panel as the page shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPanel {
    pub rows: Vec<RenderedRow>,
    pub items_visible: bool,
    pub empty_state_visible: bool,
    pub subtotal: String,
    pub shipping: String,
    pub shipping_free: bool,
    pub total: String,
    pub badge: String,
    pub badge_visible: bool,
    pub panel_open: bool,
    pub storage_warning: bool,
}

impl RenderedPanel {
    /// Inner HTML of the item list container.
    pub fn items_html(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders the panel to HTML with askama (auto-escaped).
///
/// Clones share the output, so the page keeps a clone to read
/// [`HtmlRenderer::latest`] while the engine owns another.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    display: DisplaySettings,
    output: Arc<Mutex<RenderedPanel>>,
}

impl HtmlRenderer {
    pub fn new(display: DisplaySettings) -> Self {
        HtmlRenderer {
            display,
            output: Arc::default(),
        }
    }

    /// Last rendered panel.
    pub fn latest(&self) -> RenderedPanel {
        self.output
            .lock()
            .map(|panel| panel.clone())
            .unwrap_or_default()
    }

    fn render_row(&self, row: &RowView) -> Option<RenderedRow> {
        let template = CartItemHtml {
            row: RowMarkup {
                id: &row.id,
                name: &row.name,
                image: &row.image,
                unit_price: self.display.format_money(row.unit_price),
                quantity: row.quantity,
                line_total: self.display.format_money(row.line_total),
                can_decrement: row.can_decrement,
            },
        };

        match template.render() {
            Ok(html) => Some(RenderedRow {
                id: row.id.clone(),
                html,
            }),
            Err(e) => {
                error!(item_id = %row.id, error = %e, "Failed to render cart row");
                None
            }
        }
    }

    fn apply_summary(&self, panel: &mut RenderedPanel, view: &CartView) {
        panel.items_visible = view.item_list_visible();
        panel.empty_state_visible = view.empty_state_visible();
        panel.subtotal = self.display.format_money(view.totals.subtotal);
        panel.shipping = self.display.format_shipping(view.totals.shipping);
        panel.shipping_free = view.totals.is_free_shipping();
        panel.total = self.display.format_money(view.totals.total);
        panel.badge = view.badge_count().to_string();
        panel.badge_visible = view.badge_visible();
        panel.storage_warning = view.storage_degraded;
    }
}

impl CartRenderer for HtmlRenderer {
    fn render(&mut self, view: &CartView) {
        let rows = view
            .rows
            .iter()
            .filter_map(|row| self.render_row(row))
            .collect();

        if let Ok(mut panel) = self.output.lock() {
            panel.rows = rows;
            self.apply_summary(&mut panel, view);
        }
    }

    fn render_quantity(&mut self, row: &RowView, view: &CartView) {
        let Some(fresh) = self.render_row(row) else {
            return;
        };

        let Ok(mut panel) = self.output.lock() else {
            return;
        };
        match panel.rows.iter_mut().find(|r| r.id == row.id) {
            Some(existing) => *existing = fresh,
            None => {
                warn!(item_id = %row.id, "Row missing from rendered panel, appending");
                panel.rows.push(fresh);
            }
        }
        self.apply_summary(&mut panel, view);
    }

    fn render_panel(&mut self, state: PanelState) {
        if let Ok(mut panel) = self.output.lock() {
            panel.panel_open = state == PanelState::Open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::Product;

    fn cart_with(rows: &[(&str, &str, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, name, price, qty) in rows {
            let product =
                Product::new(*id, *name, Money::new(*price), format!("{}.jpg", id)).unwrap();
            cart.add(&product, *qty).unwrap();
        }
        cart
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::build(&Cart::new(), &ShippingPolicy::default(), false);
        assert!(view.empty_state_visible());
        assert!(!view.item_list_visible());
        assert!(!view.badge_visible());
        assert_eq!(view.badge_count(), 0);
    }

    #[test]
    fn test_rows_follow_cart_order() {
        let cart = cart_with(&[("b", "B", 10, 1), ("a", "A", 20, 3)]);
        let view = CartView::build(&cart, &ShippingPolicy::default(), false);

        let ids: Vec<_> = view.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(!view.rows[0].can_decrement);
        assert!(view.rows[1].can_decrement);
        assert_eq!(view.rows[1].line_total, Money::new(60));
        assert_eq!(view.badge_count(), 4);
        assert!(view.item_list_visible() && !view.empty_state_visible());
    }

    #[test]
    fn test_html_panel() {
        let cart = cart_with(&[("x", "Berserk", 500, 2)]);
        let view = CartView::build(&cart, &ShippingPolicy::default(), false);
        let mut renderer = HtmlRenderer::new(DisplaySettings::default());
        renderer.render(&view);

        let panel = renderer.latest();
        let html = panel.items_html();
        assert!(html.contains(r#"data-id="x""#));
        assert!(html.contains(r#"data-action="increase""#));
        assert!(html.contains("1000 грн"));
        assert_eq!(panel.total, "1000 грн");
        assert_eq!(panel.shipping, "Free");
        assert!(panel.shipping_free);
        assert_eq!(panel.badge, "2");
        assert!(panel.badge_visible);
        assert!(panel.items_visible && !panel.empty_state_visible);
    }

    #[test]
    fn test_html_escapes_product_text() {
        let cart = cart_with(&[("x", "<script>alert(1)</script>", 100, 1)]);
        let view = CartView::build(&cart, &ShippingPolicy::default(), false);
        let mut renderer = HtmlRenderer::new(DisplaySettings::default());
        renderer.render(&view);

        let html = renderer.latest().items_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_decrease_disabled_at_one() {
        let cart = cart_with(&[("x", "Berserk", 500, 1)]);
        let view = CartView::build(&cart, &ShippingPolicy::default(), false);
        let mut renderer = HtmlRenderer::new(DisplaySettings::default());
        renderer.render(&view);

        assert!(renderer.latest().items_html().contains("disabled"));
    }

    #[test]
    fn test_quantity_render_patches_one_row() {
        let mut cart = cart_with(&[("a", "A", 100, 1), ("b", "B", 100, 1)]);
        let policy = ShippingPolicy::default();
        let mut renderer = HtmlRenderer::new(DisplaySettings::default());
        renderer.render(&CartView::build(&cart, &policy, false));

        cart.increment("a").unwrap();
        let view = CartView::build(&cart, &policy, false);
        renderer.render_quantity(view.row("a").unwrap(), &view);

        let panel = renderer.latest();
        assert_eq!(panel.rows[0].id, "a");
        assert_eq!(panel.rows[1].id, "b");
        assert!(panel.rows[0].html.contains(r#"<span class="quantity">2</span>"#));
        assert_eq!(panel.subtotal, "300 грн");
        assert_eq!(panel.shipping, "50 грн");
        assert_eq!(panel.total, "350 грн");
    }

    #[test]
    fn test_panel_state_and_storage_warning() {
        let mut renderer = HtmlRenderer::new(DisplaySettings::default());
        renderer.render_panel(PanelState::Open);
        renderer.render(&CartView::build(&Cart::new(), &ShippingPolicy::default(), true));

        let panel = renderer.latest();
        assert!(panel.panel_open);
        assert!(panel.storage_warning);
        assert!(panel.empty_state_visible);
        assert!(!panel.badge_visible);
    }

    #[test]
    fn test_default_quantity_render_redraws_everything() {
        #[derive(Default)]
        struct FullOnly {
            item_counts: Vec<u64>,
        }

        impl CartRenderer for FullOnly {
            fn render(&mut self, view: &CartView) {
                self.item_counts.push(view.badge_count());
            }
        }

        let cart = cart_with(&[("a", "A", 100, 2)]);
        let view = CartView::build(&cart, &ShippingPolicy::default(), false);
        let mut renderer = FullOnly::default();

        renderer.render_panel(PanelState::Open);
        assert!(renderer.item_counts.is_empty());

        renderer.render_quantity(view.row("a").unwrap(), &view);
        assert_eq!(renderer.item_counts, [2]);
    }
}
