// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS value formatting.
//!
//! Kept free of DOM types so it can be tested natively.

use alloc::format;
use alloc::string::String;

use scrollstack_core::resolve::ItemTransform;

/// Formats the geometric part of `t` as a CSS `transform` value.
///
/// Produces `translate3d(0, Ypx, 0) scale(s) rotate(rdeg)`, omitting the
/// translation and rotation when they are zero. Scale is always present so
/// that every item has its own compositing transform.
#[must_use]
pub fn transform_css(t: &ItemTransform) -> String {
    let mut css = String::new();
    if t.translate_y != 0.0 {
        css.push_str(&format!("translate3d(0, {}px, 0) ", t.translate_y));
    }
    css.push_str(&format!("scale({})", t.scale));
    if t.rotation != 0.0 {
        css.push_str(&format!(" rotate({}deg)", t.rotation));
    }
    css
}

/// Formats a blur radius as a CSS `filter` value; empty when there is no
/// blur.
#[must_use]
pub fn filter_css(blur: f64) -> String {
    if blur > 0.0 {
        format!("blur({blur}px)")
    } else {
        String::new()
    }
}

/// Formats a pixel length.
#[must_use]
pub(crate) fn px(v: f64) -> String {
    format!("{v}px")
}
