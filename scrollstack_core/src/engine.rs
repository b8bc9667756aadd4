// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack engine.
//!
//! [`ScrollStack`] owns the items, the current [`StackLayout`], the last
//! written (quantized) transform per item, and the completion state. Hosts
//! drive it through four calls:
//!
//! ```rust,ignore
//! stack.mount();                 // spacing + stacking order
//! stack.remeasure(&host);        // on mount and after coalesced resizes
//! stack.update(sampler.sample().offset); // once per frame while scrolling
//! stack.teardown();              // idempotent; reverts every override
//! ```
//!
//! `remeasure` always finishes (and forgets every cached transform) before
//! the next `update` reads the layout, so an update never mixes offsets from
//! two measurements.

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::StackConfig;
use crate::dirty;
use crate::layout::StackLayout;
use crate::resolve::{ItemTransform, ResolvedItem, resolve_into, stack_reached};
use crate::strategy::PinningStrategy;
use crate::surface::{ItemSetup, LayoutHost, Placement, VisualItem};
use crate::trace::{CompletionEvent, MeasureEvent, ResolveEvent, TeardownEvent, Tracer};

/// Where the engine is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created; items untouched.
    Idle,
    /// Items set up; updates are applied.
    Mounted,
    /// Items restored; further calls are no-ops.
    TornDown,
}

/// Write counts from one [`ScrollStack::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Items whose transform was written.
    pub transform_writes: usize,
    /// Items whose filter was written.
    pub filter_writes: usize,
    /// Items left untouched.
    pub skipped: usize,
}

/// A pinned, scroll-driven stack of visual items.
pub struct ScrollStack<I> {
    config: StackConfig,
    strategy: Option<PinningStrategy>,
    items: Vec<I>,
    layout: Option<StackLayout>,
    generation: u64,
    last: Vec<Option<ItemTransform>>,
    dirty: DirtyTracker<u32>,
    resolved: Vec<ResolvedItem>,
    next: Vec<ItemTransform>,
    drained: Vec<u32>,
    touched: Vec<bool>,
    completed: bool,
    on_complete: Option<Box<dyn FnMut()>>,
    phase: Phase,
}

impl<I> core::fmt::Debug for ScrollStack<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollStack")
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .field("items_len", &self.items.len())
            .field("layout", &self.layout)
            .field("generation", &self.generation)
            .field("completed", &self.completed)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<I: VisualItem> ScrollStack<I> {
    /// Creates an engine over `items`.
    ///
    /// A `strategy` of `None` means the host cannot pin (see
    /// [`StrategyPolicy::select`](crate::strategy::StrategyPolicy::select)):
    /// items get their spacing and stay in natural flow.
    #[must_use]
    pub fn new(items: Vec<I>, config: StackConfig, strategy: Option<PinningStrategy>) -> Self {
        let n = items.len();
        let mut last = Vec::new();
        last.resize(n, None);
        Self {
            config,
            strategy,
            items,
            layout: None,
            generation: 0,
            last,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            resolved: Vec::with_capacity(n),
            next: Vec::with_capacity(n),
            drained: Vec::with_capacity(n),
            touched: Vec::with_capacity(n),
            completed: false,
            on_complete: None,
            phase: Phase::Idle,
        }
    }

    /// Sets the callback invoked each time the stack enters the completed
    /// state.
    pub fn set_on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Applies mount-time presentation to every item.
    ///
    /// No-op unless the engine is [`Phase::Idle`].
    pub fn mount(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        let n = self.items.len();
        for (i, item) in self.items.iter_mut().enumerate() {
            item.setup(ItemSetup {
                margin_bottom: if i + 1 < n {
                    self.config.item_distance
                } else {
                    0.0
                },
                z_index: self.config.base_z_index.saturating_add(z_offset(i)),
            });
        }
        self.phase = Phase::Mounted;
    }

    /// Replaces the layout with a fresh measurement.
    ///
    /// See [`remeasure_traced`](Self::remeasure_traced).
    pub fn remeasure<H: LayoutHost + ?Sized>(&mut self, host: &H) {
        self.remeasure_traced(host, &mut Tracer::none());
    }

    /// Replaces the layout with a fresh measurement, reapplies placement,
    /// and forgets every cached transform so the next update writes all
    /// items.
    ///
    /// No-op unless mounted with a pinning strategy.
    pub fn remeasure_traced<H: LayoutHost + ?Sized>(&mut self, host: &H, tracer: &mut Tracer<'_>) {
        let Some(strategy) = self.active_strategy() else {
            return;
        };

        let layout = StackLayout::measure(&mut self.items, host, &self.config);

        for (item, measured) in self.items.iter_mut().zip(&layout.items) {
            let placement = match strategy {
                PinningStrategy::NativeSticky => Placement::Sticky {
                    top: measured.sticky_target.round(),
                },
                PinningStrategy::Transform | PinningStrategy::SmoothScroll => Placement::Natural,
            };
            item.set_placement(placement);
        }

        self.last.clear();
        self.last.resize(self.items.len(), None);
        for i in 0..self.items.len() {
            self.dirty.mark(key(i), dirty::TRANSFORM);
            self.dirty.mark(key(i), dirty::FILTER);
        }

        if self.layout.is_some() {
            self.generation += 1;
        }
        tracer.measure(&MeasureEvent {
            generation: self.generation,
            items: layout.len(),
            viewport_height: layout.viewport_height,
            pin_end: layout.pin_end,
            has_sentinel: layout.has_sentinel,
        });
        self.layout = Some(layout);
    }

    /// Resolves and writes transforms for `scroll_offset`.
    ///
    /// See [`update_traced`](Self::update_traced).
    pub fn update(&mut self, scroll_offset: f64) -> UpdateStats {
        self.update_traced(scroll_offset, &mut Tracer::none())
    }

    /// Resolves every item at `scroll_offset`, writes only items whose
    /// quantized state changed, and fires the completion callback on the
    /// entering edge.
    ///
    /// Returns all-zero stats when nothing is measured or the engine is not
    /// mounted.
    pub fn update_traced(&mut self, scroll_offset: f64, tracer: &mut Tracer<'_>) -> UpdateStats {
        let Some(strategy) = self.active_strategy() else {
            return UpdateStats::default();
        };
        let Some(layout) = self.layout.as_ref() else {
            return UpdateStats::default();
        };

        resolve_into(
            layout,
            &self.config,
            strategy,
            scroll_offset,
            &mut self.resolved,
        );
        let reached = stack_reached(layout, strategy, scroll_offset);

        self.next.clear();
        for (i, resolved) in self.resolved.iter().enumerate() {
            let q = resolved.transform.quantized();
            match self.last.get(i).copied().flatten() {
                None => {
                    self.dirty.mark(key(i), dirty::TRANSFORM);
                    self.dirty.mark(key(i), dirty::FILTER);
                }
                Some(prev) => {
                    if q.geometry_differs(&prev) {
                        self.dirty.mark(key(i), dirty::TRANSFORM);
                    }
                    if q.filter_differs(&prev) {
                        self.dirty.mark(key(i), dirty::FILTER);
                    }
                }
            }
            self.next.push(q);
        }

        let n = self.items.len();
        self.touched.clear();
        self.touched.resize(n, false);

        self.drained.clear();
        self.drained.extend(
            self.dirty
                .drain(dirty::TRANSFORM)
                .affected()
                .deterministic()
                .run(),
        );
        let mut transform_writes = 0;
        for &idx in &self.drained {
            let i = idx as usize;
            if let (Some(item), Some(t)) = (self.items.get_mut(i), self.next.get(i)) {
                item.set_transform(t);
                self.touched[i] = true;
                transform_writes += 1;
            }
        }

        self.drained.clear();
        self.drained.extend(
            self.dirty
                .drain(dirty::FILTER)
                .affected()
                .deterministic()
                .run(),
        );
        let mut filter_writes = 0;
        for &idx in &self.drained {
            let i = idx as usize;
            if let (Some(item), Some(t)) = (self.items.get_mut(i), self.next.get(i)) {
                item.set_filter(t.blur);
                self.touched[i] = true;
                filter_writes += 1;
            }
        }

        for (slot, q) in self.last.iter_mut().zip(&self.next) {
            *slot = Some(*q);
        }

        let written = self.touched.iter().filter(|&&t| t).count();
        let stats = UpdateStats {
            transform_writes,
            filter_writes,
            skipped: n.saturating_sub(written),
        };
        tracer.resolve(&ResolveEvent {
            generation: self.generation,
            scroll_offset,
            transform_writes: stats.transform_writes,
            filter_writes: stats.filter_writes,
            skipped: stats.skipped,
        });

        if reached != self.completed {
            self.completed = reached;
            tracer.completion(&CompletionEvent {
                scroll_offset,
                completed: reached,
            });
            if reached && let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }

        stats
    }

    /// Reverts every item to its pre-mount state and drops all cached state.
    ///
    /// See [`teardown_traced`](Self::teardown_traced).
    pub fn teardown(&mut self) {
        self.teardown_traced(&mut Tracer::none());
    }

    /// Reverts every item to its pre-mount state and drops all cached state.
    ///
    /// Safe to call more than once and before any measurement; only the
    /// first call has an effect.
    pub fn teardown_traced(&mut self, tracer: &mut Tracer<'_>) {
        if self.phase == Phase::TornDown {
            return;
        }
        for item in &mut self.items {
            item.restore();
        }
        let _ = self.dirty.drain(dirty::TRANSFORM).deterministic().run().count();
        let _ = self.dirty.drain(dirty::FILTER).deterministic().run().count();
        for slot in &mut self.last {
            *slot = None;
        }
        let was_measured = self.layout.take().is_some();
        self.completed = false;
        self.phase = Phase::TornDown;
        tracer.teardown(&TeardownEvent {
            items: self.items.len(),
            was_measured,
        });
    }

    /// The strategy in effect while mounted, if any.
    fn active_strategy(&self) -> Option<PinningStrategy> {
        if self.phase == Phase::Mounted {
            self.strategy
        } else {
            None
        }
    }
}

impl<I> ScrollStack<I> {
    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The selected pinning strategy; `None` when pinning is unavailable.
    #[must_use]
    pub fn strategy(&self) -> Option<PinningStrategy> {
        self.strategy
    }

    /// The current layout, if measured.
    #[must_use]
    pub fn layout(&self) -> Option<&StackLayout> {
        self.layout.as_ref()
    }

    /// Number of measurements after the first.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The items, in sequence order.
    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// The most recent resolution, one entry per item.
    #[must_use]
    pub fn resolved(&self) -> &[ResolvedItem] {
        &self.resolved
    }

    /// Whether the last item is inside its pinned range.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consumes the engine and returns its items.
    ///
    /// Call [`teardown`](ScrollStack::teardown) first to revert them.
    #[must_use]
    pub fn into_items(self) -> Vec<I> {
        self.items
    }
}

#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "item counts are far below u32::MAX"
)]
fn key(i: usize) -> u32 {
    i as u32
}

#[inline]
fn z_offset(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScalePolicy;
    use crate::layout::tests::{FakeHost, FakeItem, items, reference_config};
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn mounted(strategy: PinningStrategy, n: usize) -> (ScrollStack<FakeItem>, FakeHost) {
        let mut host = FakeHost::new(800.0);
        host.sentinel_doc_top = Some(1000.0 + 500.0 * n as f64 + 400.0);
        let mut stack = ScrollStack::new(items(n, 1000.0, 500.0), reference_config(), Some(strategy));
        stack.mount();
        stack.remeasure(&host);
        (stack, host)
    }

    fn total_transform_writes(stack: &ScrollStack<FakeItem>) -> usize {
        stack.items().iter().map(|it| it.transform_writes).sum()
    }

    #[test]
    fn mount_applies_spacing_and_order() {
        let (stack, _) = mounted(PinningStrategy::NativeSticky, 3);
        let setups: Vec<_> = stack.items().iter().map(|it| it.setup).collect();
        assert_eq!(
            setups[0],
            Some(ItemSetup {
                margin_bottom: 100.0,
                z_index: 10
            })
        );
        assert_eq!(setups[1].map(|s| s.z_index), Some(11));
        assert_eq!(setups[2].map(|s| s.margin_bottom), Some(0.0));
    }

    #[test]
    fn native_sticky_places_items_at_rounded_targets() {
        let mut host = FakeHost::new(801.0);
        host.sentinel_doc_top = Some(3000.0);
        let mut stack = ScrollStack::new(
            items(2, 1000.0, 500.0),
            reference_config(),
            Some(PinningStrategy::NativeSticky),
        );
        stack.mount();
        stack.remeasure(&host);
        // 20% of 801 = 160.2
        assert_eq!(
            stack.items()[0].placement,
            Some(Placement::Sticky { top: 160.0 })
        );
        assert_eq!(
            stack.items()[1].placement,
            Some(Placement::Sticky { top: 190.0 })
        );

        let (transform, _) = mounted(PinningStrategy::Transform, 2);
        assert_eq!(transform.items()[0].placement, Some(Placement::Natural));
    }

    #[test]
    fn unchanged_quantized_state_is_not_rewritten() {
        let (mut stack, _) = mounted(PinningStrategy::Transform, 3);
        let first = stack.update(880.0);
        assert_eq!(first.transform_writes, 3, "fresh layout writes everything");
        let before = total_transform_writes(&stack);

        // 0.04px further: every component rounds to the same value.
        let second = stack.update(880.04);
        assert_eq!(second.transform_writes, 0);
        assert_eq!(second.filter_writes, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(total_transform_writes(&stack), before);

        // A visible change writes only the affected item.
        let third = stack.update(900.0);
        assert_eq!(third.transform_writes, 1);
        assert_eq!(stack.items()[0].transform_writes, 2);
        assert_eq!(stack.items()[1].transform_writes, 1);
    }

    #[test]
    fn filter_changes_are_written_separately() {
        let mut host = FakeHost::new(800.0);
        host.sentinel_doc_top = Some(4000.0);
        let config = StackConfig {
            blur_amount: 1.5,
            ..reference_config()
        };
        let mut stack = ScrollStack::new(
            items(3, 1000.0, 500.0),
            config,
            Some(PinningStrategy::NativeSticky),
        );
        stack.mount();
        stack.remeasure(&host);
        let _ = stack.update(0.0);
        let s = stack.update(1310.0);
        // Item 1 reached: only item 0 blurs, and no geometry changes.
        assert_eq!(s.filter_writes, 1);
        assert_eq!(s.transform_writes, 0);
        assert_eq!(stack.items()[0].last_blur, 1.5);
    }

    #[test]
    fn remeasure_after_resize_invalidates_cache() {
        let (mut stack, mut host) = mounted(PinningStrategy::Transform, 4);
        let _ = stack.update(880.0);
        let before = stack.layout().cloned().expect("measured");

        host.viewport_height = 1000.0;
        stack.remeasure(&host);
        let after = stack.layout().cloned().expect("measured");
        assert_eq!(stack.generation(), 1);

        // 20% → 200px, 10% → 100px against the new viewport.
        assert_eq!(before.items[0].trigger_start, 840.0);
        assert_eq!(after.items[0].trigger_start, 800.0);
        assert_eq!(after.items[0].trigger_end, 900.0);
        assert_eq!(after.items[2].trigger_start, 2000.0 - 260.0);

        // Same offset as before, but every item is written again.
        let s = stack.update(880.0);
        assert_eq!(s.transform_writes, 4);
        assert_eq!(s.filter_writes, 4);
    }

    #[test]
    fn content_growth_remeasure_defers_writes_to_next_update() {
        let (mut stack, mut host) = mounted(PinningStrategy::Transform, 3);
        let _ = stack.update(1000.0);
        let writes = total_transform_writes(&stack);

        // Card 0 grows by 200px and pushes everything below it down.
        for item in &mut stack.items[1..] {
            item.natural_top += 200.0;
        }
        host.sentinel_doc_top = host.sentinel_doc_top.map(|top| top + 200.0);
        stack.remeasure(&host);

        let layout = stack.layout().cloned().expect("measured");
        assert_eq!(layout.items[2].trigger_start, 1980.0);
        assert_eq!(layout.pin_end, 2700.0);
        assert_eq!(total_transform_writes(&stack), writes, "measuring writes nothing");

        let s = stack.update(1000.0);
        assert_eq!(s.transform_writes, 3);
        assert_eq!(s.skipped, 0);
        assert_eq!(stack.update(1000.0).transform_writes, 0);
    }

    #[test]
    fn measurement_is_not_affected_by_written_transforms() {
        let (mut stack, host) = mounted(PinningStrategy::Transform, 3);
        let _ = stack.update(2000.0);
        assert!(stack.items()[0].translate_y > 0.0);
        let before = stack.layout().cloned();
        stack.remeasure(&host);
        assert_eq!(stack.layout().cloned(), before);
    }

    #[test]
    fn completion_fires_once_per_entry() {
        let (mut stack, _) = mounted(PinningStrategy::Transform, 3);
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        stack.set_on_complete(move || seen.set(seen.get() + 1));

        let last_start = stack.layout().and_then(StackLayout::last).map(|it| it.trigger_start);
        let last_start = last_start.expect("three items");

        let _ = stack.update(last_start - 10.0);
        assert_eq!(count.get(), 0);
        for step in 0..20 {
            let _ = stack.update(last_start + f64::from(step) * 25.0);
        }
        assert_eq!(count.get(), 1, "not re-fired while completed");
        assert!(stack.is_completed());

        let _ = stack.update(last_start - 1.0);
        assert!(!stack.is_completed());
        let _ = stack.update(last_start + 5.0);
        let _ = stack.update(last_start + 50.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn completion_refires_after_stack_is_carried_away() {
        let (mut stack, _) = mounted(PinningStrategy::Transform, 3);
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        stack.set_on_complete(move || seen.set(seen.get() + 1));
        assert_eq!(stack.layout().map(|l| l.pin_end), Some(2500.0));

        let _ = stack.update(1770.0);
        assert_eq!(count.get(), 0);
        let _ = stack.update(1781.0);
        assert_eq!(count.get(), 1);

        // Past pin_end the whole stack scrolls away.
        let _ = stack.update(4500.0);
        assert!(!stack.is_completed());

        let _ = stack.update(2499.0);
        assert!(stack.is_completed());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn native_sticky_stays_complete_past_pin_end() {
        let (mut stack, _) = mounted(PinningStrategy::NativeSticky, 3);
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        stack.set_on_complete(move || seen.set(seen.get() + 1));

        let _ = stack.update(1781.0);
        let _ = stack.update(4500.0);
        let _ = stack.update(2499.0);
        assert!(stack.is_completed());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_is_idempotent_and_restores() {
        let (mut stack, _) = mounted(PinningStrategy::Transform, 2);
        let _ = stack.update(2000.0);
        stack.teardown();
        stack.teardown();
        assert_eq!(stack.phase(), Phase::TornDown);
        assert!(stack.layout().is_none());
        assert!(!stack.is_completed());
        for item in stack.items() {
            assert_eq!(item.restored, 1);
            assert_eq!(item.placement, None);
        }
        // Further updates are inert.
        assert_eq!(stack.update(100.0), UpdateStats::default());
    }

    #[test]
    fn teardown_before_measurement() {
        let mut stack = ScrollStack::new(
            items(2, 0.0, 100.0),
            reference_config(),
            Some(PinningStrategy::Transform),
        );
        stack.teardown();
        assert_eq!(stack.items()[0].restored, 1);
        stack.mount();
        assert_eq!(stack.phase(), Phase::TornDown, "cannot remount");
    }

    #[test]
    fn no_strategy_keeps_natural_flow() {
        let host = FakeHost::new(800.0);
        let mut stack = ScrollStack::new(items(3, 1000.0, 500.0), reference_config(), None);
        stack.mount();
        stack.remeasure(&host);
        assert!(stack.layout().is_none());
        assert_eq!(stack.update(2000.0), UpdateStats::default());
        assert!(stack.items().iter().all(|it| it.transform_writes == 0));
        assert!(stack.items()[0].setup.is_some(), "spacing still applied");
        assert_eq!(host.reflows.get(), 0);
    }

    #[test]
    fn empty_stack_never_completes() {
        let host = FakeHost::new(800.0);
        let mut stack: ScrollStack<FakeItem> =
            ScrollStack::new(Vec::new(), reference_config(), Some(PinningStrategy::Transform));
        stack.mount();
        stack.remeasure(&host);
        assert_eq!(stack.update(1.0e9), UpdateStats::default());
        assert!(!stack.is_completed());
    }

    #[test]
    fn per_index_policy_through_engine() {
        let mut host = FakeHost::new(800.0);
        host.sentinel_doc_top = Some(3500.0);
        let config = StackConfig {
            scale_policy: ScalePolicy::PerIndex,
            ..reference_config()
        };
        let mut stack = ScrollStack::new(
            items(4, 1000.0, 500.0),
            config,
            Some(PinningStrategy::NativeSticky),
        );
        stack.mount();
        stack.remeasure(&host);
        let _ = stack.update(920.0);
        assert_eq!(stack.resolved()[0].progress, 1.0);
        let written = stack.items()[0].last_transform.expect("written");
        assert_eq!(written.scale, 0.85);
        assert_eq!(written.translate_y, 0.0);
    }
}
