// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinning strategies and strategy selection.
//!
//! Three ways of keeping an item at its sticky target are supported:
//!
//! - [`PinningStrategy::NativeSticky`]: the surface pins the item itself
//!   (CSS `position: sticky`). The resolver never writes a translation, so
//!   pinning costs nothing per frame and cannot lag behind scrolling.
//! - [`PinningStrategy::Transform`]: the resolver computes an explicit
//!   translation from the native scroll offset every frame.
//! - [`PinningStrategy::SmoothScroll`]: like `Transform`, but sampled from a
//!   smooth-scroll driver so the stack follows the same easing as the page.
//!
//! Which one to use is decided once, up front, by a [`StrategyPolicy`]
//! evaluated against the host's [`Capabilities`].

/// How items are held at their sticky target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PinningStrategy {
    /// The surface's own sticky positioning pins the item.
    #[default]
    NativeSticky,
    /// Explicit per-frame translation from the native scroll offset.
    Transform,
    /// Explicit per-frame translation from a smooth-scroll driver's offset.
    SmoothScroll,
}

impl PinningStrategy {
    /// Whether the resolver must compute a translation for pinning.
    #[inline]
    #[must_use]
    pub const fn translates(self) -> bool {
        !matches!(self, Self::NativeSticky)
    }

    /// Whether a smooth-scroll driver's position is authoritative.
    #[inline]
    #[must_use]
    pub const fn uses_driver(self) -> bool {
        matches!(self, Self::SmoothScroll)
    }
}

/// What the host environment can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// The primary pointer is coarse (touch).
    pub coarse_pointer: bool,
    /// The surface supports native sticky positioning.
    pub sticky: bool,
    /// The host provides per-frame callbacks.
    pub animation_frames: bool,
}

impl Capabilities {
    /// A fully capable desktop host.
    pub const FULL: Self = Self {
        coarse_pointer: false,
        sticky: true,
        animation_frames: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::FULL
    }
}

/// Chooses a [`PinningStrategy`] for a deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyPolicy {
    /// Always the given strategy (subject to capability fallback).
    Fixed(PinningStrategy),
    /// Pick by input latency needs: `coarse` on touch devices, `fine`
    /// otherwise.
    ByPointer {
        /// Strategy for coarse (touch) pointers.
        coarse: PinningStrategy,
        /// Strategy for fine (mouse, trackpad) pointers.
        fine: PinningStrategy,
    },
}

impl StrategyPolicy {
    /// Touch input takes the lowest-latency path, wheel input follows the
    /// smooth-scroll driver.
    pub const LATENCY_AWARE: Self = Self::ByPointer {
        coarse: PinningStrategy::NativeSticky,
        fine: PinningStrategy::SmoothScroll,
    };

    /// Resolves the policy against `caps`.
    ///
    /// Returns `None` when the host cannot drive per-frame updates at all;
    /// the stack then stays in natural flow without pinning. A request for
    /// native sticky on a host without it falls back to
    /// [`PinningStrategy::Transform`].
    #[must_use]
    pub fn select(self, caps: Capabilities) -> Option<PinningStrategy> {
        if !caps.animation_frames {
            return None;
        }
        let wanted = match self {
            Self::Fixed(strategy) => strategy,
            Self::ByPointer { coarse, fine } => {
                if caps.coarse_pointer {
                    coarse
                } else {
                    fine
                }
            }
        };
        match wanted {
            PinningStrategy::NativeSticky if !caps.sticky => Some(PinningStrategy::Transform),
            other => Some(other),
        }
    }
}

impl Default for StrategyPolicy {
    fn default() -> Self {
        Self::Fixed(PinningStrategy::NativeSticky)
    }
}
