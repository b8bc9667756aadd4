// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven card stacking engine.
//!
//! `scrollstack_core` pins an ordered sequence of visual items to the viewport
//! while scaling, rotating, and blurring them as the user scrolls. It is
//! `no_std` compatible (with `alloc`) and knows nothing about any particular
//! rendering surface: items are reached only through the
//! [`VisualItem`](surface::VisualItem) trait, and page geometry only through
//! [`LayoutHost`](surface::LayoutHost).
//!
//! # Architecture
//!
//! ```text
//!   mount / resize (coalesced)
//!       │
//!       ▼
//!   StackLayout::measure() ──► StackLayout ─────────┐
//!                                                    ▼
//!   scroll event ──► FrameGate ──► ScrollSampler ──► resolve() ──► [ResolvedItem]
//!                                                                     │
//!                  ┌──────────────────────────────────────────────────┘
//!                  ▼
//!   change detection (dirty channels) ──► VisualItem::set_transform / set_filter
//! ```
//!
//! **[`layout`]**: The layout cache. Measures natural-flow positions with all
//! overrides neutralized and derives per-item trigger thresholds. Replaced
//! wholesale on every measurement.
//!
//! **[`sampler`]**: One authoritative scroll offset per frame, from a
//! smooth-scroll driver when one is active or the native scroll position
//! otherwise.
//!
//! **[`resolve`]**: Pure mapping from `(StackLayout, scroll offset)` to a
//! transform per item.
//!
//! **[`engine`]**: [`ScrollStack`](engine::ScrollStack) owns the layout, the
//! last written transforms, and the completion state, and ties the pieces
//! into mount / update / remeasure / teardown.
//!
//! **[`strategy`]**: Native-sticky, transform, and smooth-scroll pinning
//! behind one [`PinningStrategy`](strategy::PinningStrategy), selected by a
//! capability-driven policy.
//!
//! **[`coalesce`]**: Quiet-window trigger used to debounce resize handling.
//!
//! **[`dirty`]**: Change channels for transform and filter writes, tracked
//! with `understory_dirty`.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod coalesce;
pub mod config;
pub mod dirty;
pub mod engine;
pub mod layout;
pub mod resolve;
pub mod sampler;
pub mod strategy;
pub mod surface;
pub mod time;
pub mod trace;
