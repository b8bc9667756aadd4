// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout`-backed quiet-window trigger.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scrollstack_core::coalesce::CoalescingTrigger;
use scrollstack_core::time::Duration;

use crate::now;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, millis: u32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

type TimeoutClosure = Closure<dyn FnMut()>;

/// Runs its callback once a burst of [`request`](Self::request) calls has
/// been quiet for the configured window.
pub struct TimeoutTrigger {
    inner: Rc<TimerInner>,
}

struct TimerInner {
    closure: RefCell<Option<TimeoutClosure>>,
    callback: RefCell<Box<dyn FnMut()>>,
    trigger: Cell<CoalescingTrigger>,
    timeout_id: Cell<Option<i32>>,
}

impl TimerInner {
    fn arm(&self, after: Duration) {
        if let Some(id) = self.timeout_id.take() {
            clear_timeout(id);
        }
        let millis = u32::try_from(after.as_millis_ceil()).unwrap_or(u32::MAX);
        if let Some(ref closure) = *self.closure.borrow() {
            let id = set_timeout(closure.as_ref().unchecked_ref(), millis);
            self.timeout_id.set(Some(id));
        }
    }
}

impl TimeoutTrigger {
    /// Creates an idle trigger with a `quiet` window.
    pub fn new(quiet: Duration, callback: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(TimerInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            trigger: Cell::new(CoalescingTrigger::new(quiet)),
            timeout_id: Cell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.timeout_id.set(None);
            let t = now();
            let mut trigger = inner.trigger.get();
            let due = trigger.fire_if_due(t);
            let remaining = trigger.remaining(t);
            inner.trigger.set(trigger);
            if due {
                inner.callback.borrow_mut()();
            } else if let Some(remaining) = remaining {
                // Timers can fire early; wait out the rest of the window.
                inner.arm(remaining);
            }
        }) as Box<dyn FnMut()>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Restarts the quiet window.
    pub fn request(&self) {
        let mut trigger = self.inner.trigger.get();
        let _ = trigger.request(now());
        self.inner.trigger.set(trigger);
        self.inner.arm(trigger.quiet());
    }

    /// Drops any pending firing.
    pub fn cancel(&self) {
        if let Some(id) = self.inner.timeout_id.take() {
            clear_timeout(id);
        }
        let mut trigger = self.inner.trigger.get();
        trigger.cancel();
        self.inner.trigger.set(trigger);
    }

    /// Whether a firing is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.trigger.get().is_pending()
    }
}

impl Drop for TimeoutTrigger {
    fn drop(&mut self) {
        self.cancel();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for TimeoutTrigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeoutTrigger")
            .field("trigger", &self.inner.trigger.get())
            .field("timeout_id", &self.inner.timeout_id.get())
            .finish_non_exhaustive()
    }
}
