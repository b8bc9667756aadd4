// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The engine records which items need a style write with
//! [`understory_dirty`], one channel per independently written property
//! group. Keys are item indices. There are no dependency edges: an item's
//! transform never invalidates another item, so every channel is local-only.
//!
//! # Consumption
//!
//! [`ScrollStack::update`](crate::engine::ScrollStack::update) marks items
//! whose quantized state changed, then drains both channels and writes only
//! the drained items. A re-measurement marks every item on both channels, so
//! the first update after it always writes.

use understory_dirty::Channel;

/// Translation, scale, or rotation changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// Blur changed.
pub const FILTER: Channel = Channel::new(1);
