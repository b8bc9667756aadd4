// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page geometry and native scroll position.

use kurbo::Rect;
use scrollstack_core::sampler::ScrollSource;
use scrollstack_core::surface::LayoutHost;
use web_sys::{Element, HtmlElement, Window};

/// Class of the element marking the end of the stack.
pub const END_SENTINEL_SELECTOR: &str = ".scroll-stack-end";

/// The element whose scroll position drives the stack.
#[derive(Clone, Debug)]
pub enum ScrollContainer {
    /// The document, scrolled by the window.
    Window(Window),
    /// A scrollable element wrapping the items.
    Element(HtmlElement),
}

impl ScrollContainer {
    /// Current scroll offset in pixels.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        match self {
            Self::Window(window) => window.scroll_y().unwrap_or(0.0),
            Self::Element(element) => f64::from(element.scroll_top()),
        }
    }
}

/// [`LayoutHost`] over the browser window and a scroll container.
///
/// Percentages resolve against `window.innerHeight` in both modes. For an
/// element container, document-relative positions are expressed in the
/// container's scroll space: a viewport-relative box plus
/// [`scroll_anchor`](LayoutHost::scroll_anchor) is the offset from the top
/// of the container's content.
#[derive(Clone, Debug)]
pub struct DomHost {
    window: Window,
    container: ScrollContainer,
    sentinel: Option<Element>,
}

impl DomHost {
    /// Creates a host, looking up the end sentinel below `root`.
    #[must_use]
    pub fn new(window: Window, container: ScrollContainer, root: &Element) -> Self {
        let sentinel = root
            .query_selector(END_SENTINEL_SELECTOR)
            .ok()
            .flatten();
        Self {
            window,
            container,
            sentinel,
        }
    }

    /// The scroll container.
    #[must_use]
    pub fn container(&self) -> &ScrollContainer {
        &self.container
    }
}

impl LayoutHost for DomHost {
    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_anchor(&self) -> f64 {
        match &self.container {
            ScrollContainer::Window(window) => window.scroll_y().unwrap_or(0.0),
            ScrollContainer::Element(element) => {
                f64::from(element.scroll_top()) - element.get_bounding_client_rect().y()
            }
        }
    }

    fn force_reflow(&self) {
        match &self.container {
            ScrollContainer::Window(window) => {
                if let Some(body) = window.document().and_then(|d| d.body()) {
                    let _ = body.offset_height();
                }
            }
            ScrollContainer::Element(element) => {
                let _ = element.offset_height();
            }
        }
    }

    fn end_sentinel(&self) -> Option<Rect> {
        self.sentinel.as_ref().map(|el| {
            let r = el.get_bounding_client_rect();
            Rect::new(r.x(), r.y(), r.x() + r.width(), r.y() + r.height())
        })
    }
}

/// The native scroll position of a [`ScrollContainer`].
#[derive(Clone, Debug)]
pub struct NativeScroll(pub ScrollContainer);

impl ScrollSource for NativeScroll {
    fn scroll_offset(&self) -> f64 {
        self.0.scroll_offset()
    }
}
