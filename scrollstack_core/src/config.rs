// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack configuration.
//!
//! [`StackConfig`] collects every tunable of the engine. All fields have
//! defaults; positions that depend on the viewport are expressed as a
//! [`Length`] and resolved against the viewport height at measurement time.

use crate::time::Duration;

/// Width at or below which a viewport counts as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// A vertical position that is either absolute or relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the viewport height (`20.0` means 20%).
    Percent(f64),
}

impl Length {
    /// Parses a CSS-like length such as `"20%"`, `"160px"`, or `"160"`.
    ///
    /// Only the leading numeric prefix is read. A `%` anywhere in the input
    /// selects [`Length::Percent`]. Input with no numeric prefix resolves to
    /// `Px(0.0)` rather than failing.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let value = parse_float_prefix(input).unwrap_or(0.0);
        if input.contains('%') {
            Self::Percent(value)
        } else {
            Self::Px(value)
        }
    }

    /// Resolves this length to pixels against `total` (the viewport height).
    #[inline]
    #[must_use]
    pub fn resolve(self, total: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => pct / 100.0 * total,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Reads the longest leading decimal number from `input`, skipping leading
/// whitespace. Returns `None` when no digits are present.
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if frac_end > frac_start || digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Exponent only counts if at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Which scroll container drives the stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The document's own scroll position.
    Window,
    /// A dedicated scrollable region wrapping the items.
    #[default]
    Local,
}

/// How depth scaling accumulates across the stack.
///
/// Both policies produce a "cards pile up" effect but differ visibly:
/// [`Cascading`](Self::Cascading) shrinks a card further with every card that
/// lands on top of it, [`PerIndex`](Self::PerIndex) shrinks every card toward
/// its own fixed target as it pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalePolicy {
    /// `scale = max(base_scale, 1 - Σ_{j>i} progress[j] * item_scale)`.
    #[default]
    Cascading,
    /// `scale = 1 - progress[i] * (1 - (base_scale + i * item_scale))`.
    PerIndex,
}

/// Whether the host considers the viewport mobile-sized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Viewport {
    /// Width at or below [`MOBILE_BREAKPOINT`].
    Mobile,
    /// Anything wider.
    Desktop,
}

impl Viewport {
    /// Classifies a viewport width.
    #[must_use]
    pub fn from_width(width: f64) -> Self {
        if width <= MOBILE_BREAKPOINT {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Configuration for a [`ScrollStack`](crate::engine::ScrollStack).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    /// Gap below every item except the last, in pixels.
    pub item_distance: f64,
    /// Per-item scale step.
    pub item_scale: f64,
    /// Spacing between successive sticky targets, in pixels.
    pub item_stack_distance: f64,
    /// Viewport offset at which the first item pins.
    pub stack_position: Length,
    /// Viewport offset at which an item's scale transition ends.
    pub scale_end_position: Length,
    /// Base scale, also the lower bound for any resolved scale.
    pub base_scale: f64,
    /// Rotation per item in degrees. Zero disables rotation.
    pub rotation_amount: f64,
    /// Blur per depth level in pixels. Zero disables blur.
    pub blur_amount: f64,
    /// Which scroll container drives the stack.
    pub scroll_target: ScrollTarget,
    /// How depth scaling accumulates.
    pub scale_policy: ScalePolicy,
    /// Quiet window for coalescing resize bursts into one re-measurement.
    pub resize_quiet: Duration,
    /// Added to the last item's natural top to form the pin end when the
    /// end-of-stack sentinel is absent.
    pub end_fallback_buffer: f64,
    /// Stacking order of item 0; item `i` gets `base_z_index + i`.
    pub base_z_index: i32,
}

impl StackConfig {
    /// The default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            item_distance: 100.0,
            item_scale: 0.03,
            item_stack_distance: 30.0,
            stack_position: Length::Percent(20.0),
            scale_end_position: Length::Percent(10.0),
            base_scale: 0.85,
            rotation_amount: 0.0,
            blur_amount: 0.0,
            scroll_target: ScrollTarget::Local,
            scale_policy: ScalePolicy::Cascading,
            resize_quiet: Duration::from_millis(100),
            end_fallback_buffer: 100.0,
            base_z_index: 10,
        }
    }

    /// Configuration for full-width service cards scrolled with the page.
    #[must_use]
    pub const fn service_cards(viewport: Viewport) -> Self {
        let mobile = matches!(viewport, Viewport::Mobile);
        Self {
            item_distance: if mobile { 120.0 } else { 80.0 },
            item_scale: 0.04,
            item_stack_distance: 32.0,
            stack_position: Length::Percent(if mobile { 10.0 } else { 15.0 }),
            scale_end_position: Length::Percent(if mobile { 3.0 } else { 8.0 }),
            base_scale: 0.88,
            blur_amount: 0.0,
            scroll_target: ScrollTarget::Window,
            ..Self::new()
        }
    }

    /// Lower bound for any resolved scale.
    #[inline]
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        if self.base_scale.is_finite() {
            self.base_scale.min(1.0)
        } else {
            1.0
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_percent_and_px() {
        assert_eq!(Length::parse("20%"), Length::Percent(20.0));
        assert_eq!(Length::parse("12.5 %"), Length::Percent(12.5));
        assert_eq!(Length::parse("160px"), Length::Px(160.0));
        assert_eq!(Length::parse(" 160"), Length::Px(160.0));
        assert_eq!(Length::parse("-4"), Length::Px(-4.0));
        assert_eq!(Length::parse(".5"), Length::Px(0.5));
        assert_eq!(Length::parse("1e2px"), Length::Px(100.0));
    }

    #[test]
    fn malformed_resolves_to_zero() {
        assert_eq!(Length::parse(""), Length::Px(0.0));
        assert_eq!(Length::parse("abc"), Length::Px(0.0));
        assert_eq!(Length::parse("."), Length::Px(0.0));
        assert_eq!(Length::parse("-"), Length::Px(0.0));
        assert_eq!(Length::parse("%"), Length::Percent(0.0));
        // A dangling exponent is not part of the number.
        assert_eq!(Length::parse("3e"), Length::Px(3.0));
    }

    #[test]
    fn resolve_against_viewport() {
        assert_eq!(Length::Percent(20.0).resolve(800.0), 160.0);
        assert_eq!(Length::Percent(10.0).resolve(800.0), 80.0);
        assert_eq!(Length::Px(42.0).resolve(800.0), 42.0);
    }

    #[test]
    fn service_presets_follow_breakpoint() {
        assert_eq!(Viewport::from_width(768.0), Viewport::Mobile);
        assert_eq!(Viewport::from_width(769.0), Viewport::Desktop);

        let mobile = StackConfig::service_cards(Viewport::Mobile);
        assert_eq!(mobile.item_distance, 120.0);
        assert_eq!(mobile.stack_position, Length::Percent(10.0));
        assert_eq!(mobile.scroll_target, ScrollTarget::Window);

        let desktop = StackConfig::service_cards(Viewport::Desktop);
        assert_eq!(desktop.scale_end_position, Length::Percent(8.0));
        assert_eq!(desktop.base_scale, 0.88);
        assert_eq!(desktop.item_stack_distance, 32.0);
    }

    #[test]
    fn min_scale_never_exceeds_one() {
        let mut config = StackConfig::new();
        assert_eq!(config.min_scale(), 0.85);
        config.base_scale = 1.4;
        assert_eq!(config.min_scale(), 1.0);
        config.base_scale = f64::NAN;
        assert_eq!(config.min_scale(), 1.0);
    }
}
