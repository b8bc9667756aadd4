// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed stack items.

use alloc::string::String;

use kurbo::Rect;
use scrollstack_core::resolve::ItemTransform;
use scrollstack_core::surface::{ItemSetup, Placement, VisualItem};
use web_sys::{CssStyleDeclaration, HtmlElement};

use crate::css::{filter_css, px, transform_css};

/// Inline style properties the engine may write.
const TOUCHED: [&str; 8] = [
    "position",
    "top",
    "z-index",
    "transform",
    "filter",
    "will-change",
    "transform-origin",
    "margin-bottom",
];

/// An `HtmlElement` driven as a [`VisualItem`].
///
/// The inline values of every property the engine may write are captured on
/// construction and put back by [`restore`](VisualItem::restore), so author
/// styles survive a mount/teardown cycle.
pub struct DomItem {
    element: HtmlElement,
    saved: [String; TOUCHED.len()],
}

impl core::fmt::Debug for DomItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomItem")
            .field("element", &"HtmlElement")
            .field("saved", &self.saved)
            .finish()
    }
}

impl DomItem {
    /// Wraps `element`, recording its current inline styles.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        let style = element.style();
        let saved = TOUCHED.map(|name| style.get_property_value(name).unwrap_or_default());
        Self { element, saved }
    }

    /// The wrapped element.
    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn style(&self) -> CssStyleDeclaration {
        self.element.style()
    }
}

/// Sets `name` to `value`, or removes it when `value` is empty.
fn set_or_remove(style: &CssStyleDeclaration, name: &str, value: &str) {
    if value.is_empty() {
        let _ = style.remove_property(name);
    } else {
        let _ = style.set_property(name, value);
    }
}

impl VisualItem for DomItem {
    fn bounding_box(&self) -> Rect {
        let r = self.element.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.x() + r.width(), r.y() + r.height())
    }

    fn set_transform(&mut self, transform: &ItemTransform) {
        let _ = self
            .style()
            .set_property("transform", &transform_css(transform));
    }

    fn set_filter(&mut self, blur: f64) {
        set_or_remove(&self.style(), "filter", &filter_css(blur));
    }

    fn set_placement(&mut self, placement: Placement) {
        let s = self.style();
        match placement {
            Placement::Natural => {
                let _ = s.set_property("position", "relative");
                let _ = s.set_property("top", "auto");
            }
            Placement::Sticky { top } => {
                let _ = s.set_property("position", "sticky");
                let _ = s.set_property("top", &px(top));
            }
        }
    }

    fn setup(&mut self, setup: ItemSetup) {
        let s = self.style();
        if setup.margin_bottom > 0.0 {
            let _ = s.set_property("margin-bottom", &px(setup.margin_bottom));
        }
        let _ = s.set_property("will-change", "transform");
        let _ = s.set_property("transform-origin", "top center");
        let _ = s.set_property("z-index", &alloc::format!("{}", setup.z_index));
    }

    fn neutralize(&mut self) {
        let s = self.style();
        let _ = s.set_property("position", "relative");
        let _ = s.set_property("top", "auto");
        let _ = s.remove_property("transform");
    }

    fn restore(&mut self) {
        let s = self.style();
        for (name, value) in TOUCHED.iter().zip(&self.saved) {
            set_or_remove(&s, name, value);
        }
    }
}
