// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot `requestAnimationFrame` scheduling.
//!
//! [`FrameRequester`] runs its callback on the next animation frame after a
//! [`request`](FrameRequester::request). Any number of requests made before
//! that frame starts share the one callback, so a burst of scroll events
//! costs a single update.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scrollstack_core::coalesce::FrameGate;
use scrollstack_core::time::HostTime;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Coalesces frame requests into single `requestAnimationFrame` callbacks.
pub struct FrameRequester {
    inner: Rc<FrameInner>,
}

struct FrameInner {
    /// The JS closure registered with `requestAnimationFrame`.
    closure: RefCell<Option<RafClosure>>,

    /// The user callback, given the frame timestamp.
    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    gate: Cell<FrameGate>,

    /// The ID of the pending request, if any.
    raf_id: Cell<Option<i32>>,
}

impl FrameRequester {
    /// Creates a requester with nothing scheduled.
    pub fn new(callback: impl FnMut(HostTime) + 'static) -> Self {
        let inner = Rc::new(FrameInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            gate: Cell::new(FrameGate::new()),
            raf_id: Cell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut gate = inner.gate.get();
            gate.begin_frame();
            inner.gate.set(gate);
            inner.raf_id.set(None);
            inner.callback.borrow_mut()(HostTime::from_millis_f64(timestamp_ms));
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Schedules the callback for the next frame unless already scheduled.
    pub fn request(&self) {
        let mut gate = self.inner.gate.get();
        let schedule = gate.request();
        self.inner.gate.set(gate);
        if !schedule {
            return;
        }
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(Some(id));
        }
    }

    /// Cancels a pending frame, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.inner.raf_id.take() {
            cancel_animation_frame(id);
        }
        self.inner.gate.set(FrameGate::new());
    }

    /// Whether a frame is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.gate.get().is_pending()
    }
}

impl Drop for FrameRequester {
    fn drop(&mut self) {
        self.cancel();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameRequester {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRequester")
            .field("pending", &self.is_pending())
            .field("raf_id", &self.inner.raf_id.get())
            .finish_non_exhaustive()
    }
}
