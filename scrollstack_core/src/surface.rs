// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering-surface contract.
//!
//! The engine never touches a concrete UI toolkit. Every stacked item is a
//! [`VisualItem`] handle and the surrounding page is a [`LayoutHost`]. The DOM
//! backend implements both over `HtmlElement`s and the window; tests implement
//! them over plain structs.

use kurbo::Rect;

use crate::resolve::ItemTransform;

/// How an item participates in layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Natural document flow: no positioning override.
    Natural,
    /// Stuck to the viewport at `top` pixels by the surface itself.
    Sticky {
        /// Viewport offset at which the item sticks.
        top: f64,
    },
}

/// Presentation applied once at mount, before the first measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemSetup {
    /// Gap below the item, in pixels (zero for the last item).
    pub margin_bottom: f64,
    /// Stacking order.
    pub z_index: i32,
}

/// One card in the stack, as seen by the engine.
///
/// Implementations must treat the engine as the sole writer of the
/// transform, filter, and placement properties of the underlying element.
pub trait VisualItem {
    /// Returns the item's current bounding box in viewport coordinates.
    fn bounding_box(&self) -> Rect;

    /// Applies a resolved transform (translation, scale, rotation).
    fn set_transform(&mut self, transform: &ItemTransform);

    /// Applies a blur filter of `blur` pixels; zero clears the filter.
    fn set_filter(&mut self, blur: f64);

    /// Applies a placement mode.
    fn set_placement(&mut self, placement: Placement);

    /// Applies mount-time presentation (spacing and stacking order).
    fn setup(&mut self, setup: ItemSetup);

    /// Removes any transform and placement override so that
    /// [`bounding_box`](Self::bounding_box) reflects natural flow.
    fn neutralize(&mut self);

    /// Reverts every property the engine touched to its pre-mount value.
    ///
    /// Must be safe to call repeatedly and on items that were never measured.
    fn restore(&mut self);
}

/// The page surrounding the stack.
pub trait LayoutHost {
    /// Current viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Offset added to viewport-relative boxes to obtain document-relative
    /// positions (the document scroll position).
    fn scroll_anchor(&self) -> f64;

    /// Flushes pending style changes so the next geometry read is current.
    fn force_reflow(&self);

    /// Bounding box of the end-of-stack sentinel in viewport coordinates, if
    /// the sentinel exists.
    fn end_sentinel(&self) -> Option<Rect>;
}
