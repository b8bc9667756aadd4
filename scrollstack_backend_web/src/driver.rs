// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth-scroll driver bridge.
//!
//! [`JsSmoothScroll`] adapts a JavaScript smooth-scroll instance exposing
//! `scroll` (eased position), `isStopped`, and `on`/`off` event
//! subscription, which is the shape of the common smooth-scroll libraries.

use js_sys::{Function, Reflect};
use scrollstack_core::sampler::SmoothScrollDriver;
use wasm_bindgen::{JsCast as _, JsValue};

/// A JavaScript smooth-scroll driver instance.
#[derive(Clone, Debug)]
pub struct JsSmoothScroll {
    instance: JsValue,
}

impl JsSmoothScroll {
    /// Wraps a driver instance.
    #[must_use]
    pub fn new(instance: JsValue) -> Self {
        Self { instance }
    }

    /// The wrapped instance.
    #[must_use]
    pub fn instance(&self) -> &JsValue {
        &self.instance
    }

    /// Calls `instance.on("scroll", callback)`.
    pub fn subscribe(&self, callback: &Function) -> Result<(), JsValue> {
        self.call("on", callback)
    }

    /// Calls `instance.off("scroll", callback)`.
    pub fn unsubscribe(&self, callback: &Function) -> Result<(), JsValue> {
        self.call("off", callback)
    }

    fn call(&self, method: &str, callback: &Function) -> Result<(), JsValue> {
        let f: Function = Reflect::get(&self.instance, &JsValue::from_str(method))?.dyn_into()?;
        f.call2(&self.instance, &JsValue::from_str("scroll"), callback)?;
        Ok(())
    }
}

impl SmoothScrollDriver for JsSmoothScroll {
    fn position(&self) -> f64 {
        Reflect::get(&self.instance, &JsValue::from_str("scroll"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }

    fn is_active(&self) -> bool {
        let stopped = Reflect::get(&self.instance, &JsValue::from_str("isStopped"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        !stopped
    }
}
