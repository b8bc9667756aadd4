// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout cache.
//!
//! [`StackLayout::measure`] reads the natural-flow position of every item and
//! derives the scroll thresholds the resolver works from. Measurement always
//! neutralizes existing overrides first, so a layout never depends on the
//! transforms that were computed from a previous layout.
//!
//! A layout is an immutable snapshot. Offsets from different layouts must not
//! be mixed; on resize the engine replaces the whole value.

use alloc::vec::Vec;

use crate::config::StackConfig;
use crate::surface::{LayoutHost, VisualItem};

/// Measured geometry for one stacked item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackItem {
    /// Position in the sequence.
    pub index: usize,
    /// Document-relative top with no transform or placement override.
    pub natural_top: f64,
    /// Viewport offset at which the item locks.
    pub sticky_target: f64,
    /// Scroll offset at which the item reaches its sticky target.
    pub trigger_start: f64,
    /// Scroll offset at which the item's scale transition completes.
    pub trigger_end: f64,
}

impl StackItem {
    /// Linear progress of `scroll_offset` through `[trigger_start,
    /// trigger_end]`, clamped to `[0, 1]`.
    ///
    /// A degenerate range (`trigger_end <= trigger_start`) counts as fully
    /// resolved.
    #[inline]
    #[must_use]
    pub fn progress(&self, scroll_offset: f64) -> f64 {
        let span = self.trigger_end - self.trigger_start;
        if span.is_nan() || span <= 0.0 {
            return 1.0;
        }
        ((scroll_offset - self.trigger_start) / span).clamp(0.0, 1.0)
    }

    /// Whether `scroll_offset` has reached this item's pin position.
    #[inline]
    #[must_use]
    pub fn is_reached(&self, scroll_offset: f64) -> bool {
        scroll_offset >= self.trigger_start
    }
}

/// One consistent measurement of the whole stack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackLayout {
    /// Items in sequence order.
    pub items: Vec<StackItem>,
    /// Viewport height the percentages were resolved against.
    pub viewport_height: f64,
    /// Scroll offset past which the stack stops pinning and travels with the
    /// page as one unit.
    pub pin_end: f64,
    /// Whether `pin_end` came from the end sentinel (as opposed to the
    /// fallback buffer).
    pub has_sentinel: bool,
}

impl StackLayout {
    /// Measures `items` against `host` and derives all thresholds.
    ///
    /// Every item is neutralized before any geometry is read, and a reflow is
    /// forced in between, so the result reflects natural flow. Overrides are
    /// left neutralized; the caller reapplies placement.
    pub fn measure<I, H>(items: &mut [I], host: &H, config: &StackConfig) -> Self
    where
        I: VisualItem,
        H: LayoutHost + ?Sized,
    {
        let viewport_height = finite_or_zero(host.viewport_height());
        if items.is_empty() {
            return Self {
                items: Vec::new(),
                viewport_height,
                pin_end: 0.0,
                has_sentinel: false,
            };
        }

        for item in items.iter_mut() {
            item.neutralize();
        }
        host.force_reflow();

        let anchor = finite_or_zero(host.scroll_anchor());
        let stack_px = finite_or_zero(config.stack_position.resolve(viewport_height));
        let scale_end_px = finite_or_zero(config.scale_end_position.resolve(viewport_height));
        let spacing = finite_or_zero(config.item_stack_distance);

        let measured: Vec<StackItem> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let natural_top = finite_or_zero(item.bounding_box().y0) + anchor;
                let sticky_target = stack_px + spacing * index as f64;
                StackItem {
                    index,
                    natural_top,
                    sticky_target,
                    trigger_start: natural_top - sticky_target,
                    trigger_end: natural_top - scale_end_px,
                }
            })
            .collect();

        let sentinel_top = host
            .end_sentinel()
            .map(|rect| rect.y0)
            .filter(|top| top.is_finite());
        let (pin_end, has_sentinel) = match sentinel_top {
            Some(top) => (top + anchor - viewport_height / 2.0, true),
            None => {
                let last = measured.last().map_or(0.0, |item| item.natural_top);
                (last + finite_or_zero(config.end_fallback_buffer), false)
            }
        };

        Self {
            items: measured,
            viewport_height,
            pin_end,
            has_sentinel,
        }
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the layout has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The last item, which decides stack completion.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&StackItem> {
        self.items.last()
    }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Length;
    use crate::resolve::ItemTransform;
    use crate::surface::{ItemSetup, Placement};
    use alloc::vec;
    use core::cell::Cell;
    use kurbo::Rect;

    /// An item that reports a displaced box while a translation is applied,
    /// and counts every write.
    #[derive(Debug, Default)]
    pub(crate) struct FakeItem {
        pub(crate) natural_top: f64,
        pub(crate) height: f64,
        pub(crate) translate_y: f64,
        pub(crate) placement: Option<Placement>,
        pub(crate) setup: Option<ItemSetup>,
        pub(crate) transform_writes: usize,
        pub(crate) filter_writes: usize,
        pub(crate) last_transform: Option<ItemTransform>,
        pub(crate) last_blur: f64,
        pub(crate) restored: usize,
    }

    impl FakeItem {
        pub(crate) fn at(natural_top: f64) -> Self {
            Self {
                natural_top,
                height: 400.0,
                ..Self::default()
            }
        }
    }

    impl VisualItem for FakeItem {
        fn bounding_box(&self) -> Rect {
            let top = self.natural_top + self.translate_y;
            Rect::new(0.0, top, 600.0, top + self.height)
        }

        fn set_transform(&mut self, transform: &ItemTransform) {
            self.translate_y = transform.translate_y;
            self.last_transform = Some(*transform);
            self.transform_writes += 1;
        }

        fn set_filter(&mut self, blur: f64) {
            self.last_blur = blur;
            self.filter_writes += 1;
        }

        fn set_placement(&mut self, placement: Placement) {
            self.placement = Some(placement);
        }

        fn setup(&mut self, setup: ItemSetup) {
            self.setup = Some(setup);
        }

        fn neutralize(&mut self) {
            self.translate_y = 0.0;
            self.placement = Some(Placement::Natural);
        }

        fn restore(&mut self) {
            self.translate_y = 0.0;
            self.placement = None;
            self.setup = None;
            self.last_transform = None;
            self.last_blur = 0.0;
            self.restored += 1;
        }
    }

    /// A page with a fixed viewport and a mutable scroll position.
    #[derive(Debug)]
    pub(crate) struct FakeHost {
        pub(crate) viewport_height: f64,
        pub(crate) scroll: Cell<f64>,
        pub(crate) sentinel_doc_top: Option<f64>,
        pub(crate) reflows: Cell<usize>,
    }

    impl FakeHost {
        pub(crate) fn new(viewport_height: f64) -> Self {
            Self {
                viewport_height,
                scroll: Cell::new(0.0),
                sentinel_doc_top: None,
                reflows: Cell::new(0),
            }
        }
    }

    impl LayoutHost for FakeHost {
        fn viewport_height(&self) -> f64 {
            self.viewport_height
        }

        fn scroll_anchor(&self) -> f64 {
            self.scroll.get()
        }

        fn force_reflow(&self) {
            self.reflows.set(self.reflows.get() + 1);
        }

        fn end_sentinel(&self) -> Option<Rect> {
            // Viewport-relative, like a real bounding box.
            self.sentinel_doc_top.map(|top| {
                let y = top - self.scroll.get();
                Rect::new(0.0, y, 600.0, y)
            })
        }
    }

    /// Items whose natural tops are `first`, `first + step`, ...
    pub(crate) fn items(n: usize, first: f64, step: f64) -> Vec<FakeItem> {
        (0..n)
            .map(|i| FakeItem::at(first + step * i as f64))
            .collect()
    }

    /// The reference configuration: 30px spacing, pin at 20%, scale end at
    /// 10%, base scale 0.85, scale step 0.03.
    pub(crate) fn reference_config() -> StackConfig {
        StackConfig {
            item_stack_distance: 30.0,
            stack_position: Length::parse("20%"),
            scale_end_position: Length::parse("10%"),
            base_scale: 0.85,
            item_scale: 0.03,
            ..StackConfig::new()
        }
    }

    #[test]
    fn thresholds_follow_configuration() {
        let mut cards = items(4, 1000.0, 500.0);
        let host = FakeHost::new(800.0);
        let layout = StackLayout::measure(&mut cards, &host, &reference_config());

        assert_eq!(layout.len(), 4);
        let first = layout.items[0];
        assert_eq!(first.natural_top, 1000.0);
        assert_eq!(first.sticky_target, 160.0);
        assert_eq!(first.trigger_start, 840.0);
        assert_eq!(first.trigger_end, 920.0);

        let third = layout.items[2];
        assert_eq!(third.natural_top, 2000.0);
        assert_eq!(third.sticky_target, 220.0);
        assert_eq!(third.trigger_start, 1780.0);
        assert_eq!(third.trigger_end, 1920.0);
        assert_eq!(host.reflows.get(), 1);
    }

    #[test]
    fn measurement_ignores_applied_transforms() {
        let mut cards = items(3, 500.0, 300.0);
        cards[1].translate_y = 250.0;
        let host = FakeHost::new(1000.0);
        host.scroll.set(120.0);
        let layout = StackLayout::measure(&mut cards, &host, &reference_config());
        // Box is viewport-relative; adding the anchor recovers the document top.
        assert_eq!(layout.items[1].natural_top, 800.0 + 120.0);
        assert_eq!(cards[1].translate_y, 0.0);
    }

    #[test]
    fn remeasure_is_idempotent() {
        let mut cards = items(5, 900.0, 450.0);
        let mut host = FakeHost::new(720.0);
        host.sentinel_doc_top = Some(3500.0);
        let config = reference_config();
        let a = StackLayout::measure(&mut cards, &host, &config);
        let b = StackLayout::measure(&mut cards, &host, &config);
        assert_eq!(a, b);
        for (x, y) in a.items.iter().zip(&b.items) {
            assert_eq!(x.trigger_start.to_bits(), y.trigger_start.to_bits());
            assert_eq!(x.trigger_end.to_bits(), y.trigger_end.to_bits());
        }
    }

    #[test]
    fn pin_end_from_sentinel() {
        let mut cards = items(2, 1000.0, 500.0);
        let mut host = FakeHost::new(800.0);
        host.sentinel_doc_top = Some(2400.0);
        host.scroll.set(300.0);
        let layout = StackLayout::measure(&mut cards, &host, &reference_config());
        assert!(layout.has_sentinel);
        assert_eq!(layout.pin_end, 2400.0 - 400.0);
    }

    #[test]
    fn pin_end_fallback_without_sentinel() {
        let mut cards = items(3, 1000.0, 500.0);
        let host = FakeHost::new(800.0);
        let mut config = reference_config();
        config.end_fallback_buffer = 250.0;
        let layout = StackLayout::measure(&mut cards, &host, &config);
        assert!(!layout.has_sentinel);
        assert_eq!(layout.pin_end, 2000.0 + 250.0);
        assert!(layout.pin_end > layout.last().map_or(0.0, |it| it.trigger_start));
    }

    #[test]
    fn empty_stack_measures_to_empty_layout() {
        let mut cards: Vec<FakeItem> = vec![];
        let host = FakeHost::new(800.0);
        let layout = StackLayout::measure(&mut cards, &host, &reference_config());
        assert!(layout.is_empty());
        assert_eq!(layout.pin_end, 0.0);
        assert_eq!(host.reflows.get(), 0);
    }

    #[test]
    fn degenerate_range_is_fully_resolved() {
        let item = StackItem {
            index: 0,
            natural_top: 100.0,
            sticky_target: 50.0,
            trigger_start: 50.0,
            trigger_end: 20.0,
        };
        assert_eq!(item.progress(-1.0e9), 1.0);
        assert_eq!(item.progress(50.0), 1.0);
    }

    #[test]
    fn progress_is_linear_and_clamped() {
        let item = StackItem {
            index: 0,
            natural_top: 1000.0,
            sticky_target: 160.0,
            trigger_start: 840.0,
            trigger_end: 920.0,
        };
        assert_eq!(item.progress(840.0), 0.0);
        assert_eq!(item.progress(880.0), 0.5);
        assert_eq!(item.progress(920.0), 1.0);
        assert_eq!(item.progress(-1.0e12), 0.0);
        assert_eq!(item.progress(1.0e12), 1.0);
        assert_eq!(item.progress(f64::INFINITY), 1.0);
    }
}
