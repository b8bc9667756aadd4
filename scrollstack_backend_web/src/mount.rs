// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring a [`ScrollStack`] into a live page.
//!
//! [`mount`] finds the cards, picks a pinning strategy from the page's
//! capabilities, measures, and registers the scroll and resize listeners.
//! Scroll events are coalesced to one update per animation frame. Window
//! resizes and card size changes (seen through a `ResizeObserver`) are
//! coalesced to one re-measurement per quiet window, whose update runs in
//! the next animation frame. Dropping
//! the returned [`MountedStack`] (or calling
//! [`teardown`](MountedStack::teardown)) removes every listener and restores
//! every card.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, Element, EventTarget, HtmlElement, NodeList, ResizeObserver};

use scrollstack_core::config::{ScrollTarget, StackConfig};
use scrollstack_core::engine::ScrollStack;
use scrollstack_core::layout::StackLayout;
use scrollstack_core::sampler::ScrollSampler;
use scrollstack_core::strategy::{Capabilities, PinningStrategy, StrategyPolicy};
use scrollstack_core::trace::{TraceSink, Tracer};

use crate::caps::capabilities;
use crate::driver::JsSmoothScroll;
use crate::frame::FrameRequester;
use crate::host::{DomHost, NativeScroll, ScrollContainer};
use crate::item::DomItem;
use crate::timer::TimeoutTrigger;

/// Class of the elements stacked by [`mount`].
pub const CARD_SELECTOR: &str = ".scroll-stack-card";

/// Class of the wrapper whose size changes also trigger a re-measurement.
pub const INNER_SELECTOR: &str = ".scroll-stack-inner";

/// Everything [`mount`] needs besides the scroller element.
pub struct MountOptions {
    /// Engine configuration.
    pub config: StackConfig,
    /// How to choose a pinning strategy.
    pub policy: StrategyPolicy,
    /// A smooth-scroll driver instance to follow, if the page uses one.
    pub driver: Option<JsValue>,
    /// Invoked each time the last card enters its pinned range.
    ///
    /// Runs inside the frame update; it must not tear the stack down
    /// synchronously.
    pub on_complete: Option<Box<dyn FnMut()>>,
    /// Receives engine trace events (only with the core `trace` feature).
    pub trace: Option<Box<dyn TraceSink>>,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            config: StackConfig::new(),
            policy: StrategyPolicy::default(),
            driver: None,
            on_complete: None,
            trace: None,
        }
    }
}

impl core::fmt::Debug for MountOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MountOptions")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .field("driver", &self.driver.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

/// Resolves `policy` against `caps`, demoting smooth-scroll pinning to
/// transform pinning when there is no driver to follow.
#[must_use]
pub fn choose_strategy(
    policy: StrategyPolicy,
    caps: Capabilities,
    has_driver: bool,
) -> Option<PinningStrategy> {
    match policy.select(caps)? {
        PinningStrategy::SmoothScroll if !has_driver => Some(PinningStrategy::Transform),
        other => Some(other),
    }
}

struct State {
    stack: ScrollStack<DomItem>,
    host: DomHost,
    sampler: ScrollSampler<NativeScroll, JsSmoothScroll>,
    trace: Option<Box<dyn TraceSink>>,
}

fn tracer_for(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(&mut **sink),
        None => Tracer::none(),
    }
}

impl State {
    fn update(&mut self) {
        let offset = self.sampler.sample().offset;
        let mut tracer = tracer_for(&mut self.trace);
        let _ = self.stack.update_traced(offset, &mut tracer);
    }

    fn remeasure(&mut self) {
        let mut tracer = tracer_for(&mut self.trace);
        self.stack.remeasure_traced(&self.host, &mut tracer);
    }

    fn teardown(&mut self) {
        let mut tracer = tracer_for(&mut self.trace);
        self.stack.teardown_traced(&mut tracer);
    }
}

/// Runs `f` on the state if it is still alive and not already borrowed.
fn with_state(state: &Weak<RefCell<State>>, f: impl FnOnce(&mut State)) {
    if let Some(state) = state.upgrade()
        && let Ok(mut state) = state.try_borrow_mut()
    {
        f(&mut state);
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut()>,
}

/// A stack attached to the page.
pub struct MountedStack {
    state: Rc<RefCell<State>>,
    frames: Rc<FrameRequester>,
    resize: Rc<TimeoutTrigger>,
    listeners: Vec<Listener>,
    driver_subscription: Option<(JsSmoothScroll, Closure<dyn FnMut()>)>,
    content_observer: Option<(ResizeObserver, Closure<dyn FnMut()>)>,
    torn_down: bool,
}

impl core::fmt::Debug for MountedStack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MountedStack")
            .field("strategy", &self.strategy())
            .field("listeners", &self.listeners.len())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

/// Mounts a stack over the cards of `scroller`.
///
/// With [`ScrollTarget::Local`], cards are looked up inside `scroller` and
/// its own scroll position drives the stack. With [`ScrollTarget::Window`],
/// cards are looked up in the whole document and the window scroll drives
/// it. The end sentinel is always looked up inside `scroller`.
///
/// Fails only if the page has no window or document, or a listener cannot
/// be registered; on failure every change already made is reverted.
pub fn mount(scroller: &HtmlElement, options: MountOptions) -> Result<MountedStack, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let MountOptions {
        config,
        policy,
        driver,
        on_complete,
        trace,
    } = options;

    let (container, cards, scroll_target): (_, _, EventTarget) = match config.scroll_target {
        ScrollTarget::Window => (
            ScrollContainer::Window(window.clone()),
            document.query_selector_all(CARD_SELECTOR)?,
            window.clone().into(),
        ),
        ScrollTarget::Local => (
            ScrollContainer::Element(scroller.clone()),
            scroller.query_selector_all(CARD_SELECTOR)?,
            scroller.clone().into(),
        ),
    };

    let driver = driver.map(JsSmoothScroll::new);
    let strategy = choose_strategy(policy, capabilities(&window), driver.is_some());
    let follows_driver = strategy.is_some_and(PinningStrategy::uses_driver);
    let subscribed_driver = driver.clone().filter(|_| follows_driver);

    let host = DomHost::new(window.clone(), container.clone(), scroller);
    let sampler = ScrollSampler::new(
        NativeScroll(container),
        driver,
        strategy.unwrap_or_default(),
    );
    let mut stack = ScrollStack::new(collect_items(&cards), config, strategy);
    if let Some(callback) = on_complete {
        stack.set_on_complete(callback);
    }

    let state = Rc::new(RefCell::new(State {
        stack,
        host,
        sampler,
        trace,
    }));

    let frame_state = Rc::downgrade(&state);
    let frames = Rc::new(FrameRequester::new(move |_| {
        with_state(&frame_state, State::update);
    }));
    let resize_state = Rc::downgrade(&state);
    let resize_frames = Rc::clone(&frames);
    let resize = Rc::new(TimeoutTrigger::new(config.resize_quiet, move || {
        with_state(&resize_state, State::remeasure);
        resize_frames.request();
    }));

    let mut mounted = MountedStack {
        state,
        frames,
        resize,
        listeners: Vec::new(),
        driver_subscription: None,
        content_observer: None,
        torn_down: false,
    };

    {
        let mut s = mounted.state.borrow_mut();
        s.stack.mount();
        s.remeasure();
        s.update();
    }

    if strategy.is_none() {
        return Ok(mounted);
    }

    let frames = Rc::clone(&mounted.frames);
    mounted.listen(
        scroll_target,
        "scroll",
        Closure::wrap(Box::new(move || frames.request()) as Box<dyn FnMut()>),
        true,
    )?;

    let resize = Rc::clone(&mounted.resize);
    mounted.listen(
        window.into(),
        "resize",
        Closure::wrap(Box::new(move || resize.request()) as Box<dyn FnMut()>),
        false,
    )?;

    let resize = Rc::clone(&mounted.resize);
    let closure = Closure::wrap(Box::new(move || resize.request()) as Box<dyn FnMut()>);
    let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
    if let Some(inner) = scroller.query_selector(INNER_SELECTOR)? {
        observer.observe(&inner);
    }
    for card in (0..cards.length()).filter_map(|i| cards.get(i)) {
        if let Ok(card) = card.dyn_into::<Element>() {
            observer.observe(&card);
        }
    }
    mounted.content_observer = Some((observer, closure));

    if let Some(driver) = subscribed_driver {
        let frames = Rc::clone(&mounted.frames);
        let closure = Closure::wrap(Box::new(move || frames.request()) as Box<dyn FnMut()>);
        driver.subscribe(closure.as_ref().unchecked_ref())?;
        mounted.driver_subscription = Some((driver, closure));
    }

    Ok(mounted)
}

fn collect_items(cards: &NodeList) -> Vec<DomItem> {
    (0..cards.length())
        .filter_map(|i| cards.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(DomItem::new)
        .collect()
}

impl MountedStack {
    fn listen(
        &mut self,
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut()>,
        passive: bool,
    ) -> Result<(), JsValue> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        let callback: &Function = closure.as_ref().unchecked_ref();
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind, callback, &options,
        )?;
        self.listeners.push(Listener {
            target,
            kind,
            closure,
        });
        Ok(())
    }

    /// The pinning strategy in use; `None` when the page cannot pin.
    #[must_use]
    pub fn strategy(&self) -> Option<PinningStrategy> {
        self.state
            .try_borrow()
            .ok()
            .and_then(|s| s.stack.strategy())
    }

    /// Whether the last card is inside its pinned range.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|s| s.stack.is_completed())
    }

    /// A copy of the current layout, if measured.
    #[must_use]
    pub fn layout(&self) -> Option<StackLayout> {
        self.state
            .try_borrow()
            .ok()
            .and_then(|s| s.stack.layout().cloned())
    }

    /// Re-measures immediately, bypassing the resize window, and schedules
    /// the update for the next animation frame.
    ///
    /// Card size changes are picked up on their own; call this after moving
    /// the cards some other way.
    pub fn remeasure(&self) {
        self.resize.cancel();
        with_state(&Rc::downgrade(&self.state), State::remeasure);
        self.frames.request();
    }

    /// Removes every listener and restores every card.
    ///
    /// Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        if let Some((driver, closure)) = self.driver_subscription.take() {
            let _ = driver.unsubscribe(closure.as_ref().unchecked_ref());
        }
        if let Some((observer, _closure)) = self.content_observer.take() {
            observer.disconnect();
        }
        self.frames.cancel();
        self.resize.cancel();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.teardown();
        }
    }
}

impl Drop for MountedStack {
    fn drop(&mut self) {
        self.teardown();
    }
}
