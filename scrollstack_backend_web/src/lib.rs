// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrollstack.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`mount`]: attaches a stack to the cards of a scroller element and
//!   returns a [`MountedStack`] that tears everything down on drop
//! - [`DomItem`]: `HtmlElement` as a [`VisualItem`](scrollstack_core::surface::VisualItem)
//! - [`DomHost`]: window and scroll container as a
//!   [`LayoutHost`](scrollstack_core::surface::LayoutHost)
//! - [`JsSmoothScroll`]: a JavaScript smooth-scroll driver
//! - [`FrameRequester`]: one-shot `requestAnimationFrame` scheduling
//! - [`TimeoutTrigger`]: `setTimeout` quiet-window coalescing
//! - [`capabilities`]: pointer, sticky, and animation-frame probing
//!
//! # Markup
//!
//! ```html
//! <div class="scroll-stack-scroller">
//!   <div class="scroll-stack-inner">
//!     <div class="scroll-stack-card">…</div>
//!     <div class="scroll-stack-card">…</div>
//!     <div class="scroll-stack-end"></div>
//!   </div>
//! </div>
//! ```

#![no_std]

extern crate alloc;

mod caps;
mod css;
mod driver;
mod frame;
mod host;
mod item;
mod mount;
mod timer;

pub use caps::capabilities;
pub use css::{filter_css, transform_css};
pub use driver::JsSmoothScroll;
pub use frame::FrameRequester;
pub use host::{DomHost, END_SENTINEL_SELECTOR, NativeScroll, ScrollContainer};
pub use item::DomItem;
pub use mount::{CARD_SELECTOR, MountOptions, MountedStack, choose_strategy, mount};
pub use timer::TimeoutTrigger;

use scrollstack_core::time::HostTime;
use wasm_bindgen::prelude::*;

// Direct global binding instead of `web_sys::Window::performance()`, which
// would need the Window and Performance objects on every call.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(performance_now())
}
