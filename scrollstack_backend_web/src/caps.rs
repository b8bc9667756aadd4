// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability probing.

use js_sys::Reflect;
use scrollstack_core::strategy::Capabilities;
use wasm_bindgen::prelude::*;
use web_sys::Window;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = CSS, js_name = "supports")]
    fn css_supports(property: &str, value: &str) -> Result<bool, JsValue>;
}

/// Probes what `window` can do.
///
/// Any probe that throws or is unavailable reports the capability as
/// missing, except the pointer query, which defaults to a fine pointer.
#[must_use]
pub fn capabilities(window: &Window) -> Capabilities {
    let coarse_pointer = window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|mql| mql.matches());
    let sticky = css_supports("position", "sticky").unwrap_or(false);
    let animation_frames =
        Reflect::has(window, &JsValue::from_str("requestAnimationFrame")).unwrap_or(false);
    Capabilities {
        coarse_pointer,
        sticky,
        animation_frames,
    }
}
