// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform resolution.
//!
//! [`resolve`] maps a [`StackLayout`] and a scroll offset to one
//! [`ResolvedItem`] per stacked item. It is a pure function; change detection
//! and writing happen in the [engine](crate::engine).
//!
//! Per item `i` of `n`:
//!
//! 1. `progress[i]`: position of the scroll offset in
//!    `[trigger_start, trigger_end]`, clamped to `[0, 1]`.
//! 2. Scale: see [`ScalePolicy`]. Always within `[min_scale, 1]`.
//! 3. Rotation: proportional to the same depth measure as the scale.
//! 4. Blur: `(top - i) * blur_amount` for every item below the topmost
//!    reached item `top`.
//! 5. Translation: `min(scroll, pin_end) - trigger_start`, floored at zero,
//!    for strategies that translate. Inside the pinned range this exactly
//!    cancels natural-flow drift; past `pin_end` it freezes, so the stack
//!    leaves the viewport as one unit.

use alloc::vec::Vec;

use kurbo::Affine;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::{ScalePolicy, StackConfig};
use crate::layout::StackLayout;
use crate::strategy::PinningStrategy;

/// The visual state written to one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemTransform {
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Blur radius in pixels.
    pub blur: f64,
}

impl ItemTransform {
    /// No translation, unit scale, no rotation, no blur.
    pub const IDENTITY: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        blur: 0.0,
    };

    /// Rounds every component to the precision at which a change is visible:
    /// 0.1px translation, 0.001 scale, 0.1° rotation, 0.1px blur.
    #[must_use]
    pub fn quantized(self) -> Self {
        Self {
            translate_y: round_to(self.translate_y, 10.0),
            scale: round_to(self.scale, 1000.0),
            rotation: round_to(self.rotation, 10.0),
            blur: round_to(self.blur, 10.0),
        }
    }

    /// Whether the geometric part (translation, scale, rotation) differs.
    #[inline]
    #[must_use]
    pub fn geometry_differs(&self, other: &Self) -> bool {
        self.translate_y != other.translate_y
            || self.scale != other.scale
            || self.rotation != other.rotation
    }

    /// Whether the filter part differs.
    #[inline]
    #[must_use]
    pub fn filter_differs(&self, other: &Self) -> bool {
        self.blur != other.blur
    }

    /// The geometric part as a 2-D affine map: translate, then scale, then
    /// rotate, all about the transform origin.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate((0.0, self.translate_y))
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation.to_radians())
    }
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The resolver's output for one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedItem {
    /// The item's own scale progress in `[0, 1]`.
    pub progress: f64,
    /// Unquantized transform.
    pub transform: ItemTransform,
}

/// Resolves every item of `layout` at `scroll_offset`.
#[must_use]
pub fn resolve(
    layout: &StackLayout,
    config: &StackConfig,
    strategy: PinningStrategy,
    scroll_offset: f64,
) -> Vec<ResolvedItem> {
    let mut out = Vec::with_capacity(layout.len());
    resolve_into(layout, config, strategy, scroll_offset, &mut out);
    out
}

/// Like [`resolve`], but reuses a caller-provided buffer.
pub fn resolve_into(
    layout: &StackLayout,
    config: &StackConfig,
    strategy: PinningStrategy,
    scroll_offset: f64,
    out: &mut Vec<ResolvedItem>,
) {
    out.clear();
    let n = layout.len();
    if n == 0 {
        return;
    }
    let scroll = if scroll_offset.is_nan() {
        0.0
    } else {
        scroll_offset
    };

    let min_scale = config.min_scale();
    let item_scale = finite_or(config.item_scale, 0.0);
    let rotation_amount = finite_or(config.rotation_amount, 0.0);
    let blur_amount = finite_or(config.blur_amount, 0.0).max(0.0);

    // Topmost item whose pin position has been reached.
    let top = layout
        .items
        .iter()
        .rposition(|item| item.is_reached(scroll))
        .unwrap_or(0);

    // Progress of all items after `i`, accumulated from the end.
    let mut later_progress = 0.0;
    out.resize(
        n,
        ResolvedItem {
            progress: 0.0,
            transform: ItemTransform::IDENTITY,
        },
    );

    for (i, item) in layout.items.iter().enumerate().rev() {
        let progress = item.progress(scroll);

        let (scale, rotation) = match config.scale_policy {
            ScalePolicy::Cascading => {
                let reduction = later_progress * item_scale;
                let depth = if item_scale != 0.0 {
                    reduction / item_scale
                } else {
                    reduction
                };
                (1.0 - reduction, depth * rotation_amount)
            }
            ScalePolicy::PerIndex => {
                let target = (config.base_scale + i as f64 * item_scale).min(1.0);
                (
                    1.0 - progress * (1.0 - target),
                    i as f64 * rotation_amount * progress,
                )
            }
        };
        let scale = if scale.is_finite() {
            scale.clamp(min_scale, 1.0)
        } else {
            min_scale
        };

        let blur = if i < top {
            (top - i) as f64 * blur_amount
        } else {
            0.0
        };

        let translate_y = if strategy.translates() {
            (scroll.min(layout.pin_end) - item.trigger_start).max(0.0)
        } else {
            0.0
        };

        out[i] = ResolvedItem {
            progress,
            transform: ItemTransform {
                translate_y,
                scale,
                rotation: finite_or(rotation, 0.0),
                blur,
            },
        };
        later_progress += progress;
    }
}

/// Whether the last item is inside its pinned range.
///
/// Translating strategies carry the stack away past `pin_end`, so for them
/// the range is `[trigger_start, pin_end]`. Under native stickiness the
/// range is open-ended.
#[must_use]
pub fn stack_reached(layout: &StackLayout, strategy: PinningStrategy, scroll_offset: f64) -> bool {
    let scroll = if scroll_offset.is_nan() {
        0.0
    } else {
        scroll_offset
    };
    layout.last().is_some_and(|last| {
        last.is_reached(scroll) && (!strategy.translates() || scroll <= layout.pin_end)
    })
}

#[inline]
fn round_to(v: f64, factor: f64) -> f64 {
    (v * factor).round() / factor
}

#[inline]
fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
