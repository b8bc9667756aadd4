// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll sampling.
//!
//! A [`ScrollSampler`] yields the one scroll offset the resolver uses for a
//! frame. When a smooth-scroll driver is attached, active, and the pinning
//! strategy follows it, the driver's eased position wins so that the stack
//! moves on the same curve as the rest of the page. Otherwise the native
//! scroll position is used, which is also the lowest-latency path on touch
//! input.
//!
//! Sampling frequency is the caller's business: pair the sampler with a
//! [`FrameGate`](crate::coalesce::FrameGate) so a burst of scroll events
//! costs one sample.

use crate::strategy::PinningStrategy;

/// A native scroll position (the window or a scrollable region).
pub trait ScrollSource {
    /// Current scroll offset in pixels.
    fn scroll_offset(&self) -> f64;
}

/// An external component that intercepts scrolling and exposes an eased
/// position.
pub trait SmoothScrollDriver {
    /// The driver's current interpolated position in pixels.
    fn position(&self) -> f64;

    /// Whether the driver is currently controlling scrolling.
    fn is_active(&self) -> bool {
        true
    }
}

/// Placeholder driver type for samplers without a smooth-scroll driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDriver;

impl SmoothScrollDriver for NoDriver {
    fn position(&self) -> f64 {
        0.0
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Where a sample came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleSource {
    /// The native scroll position.
    Native,
    /// A smooth-scroll driver.
    Driver,
}

/// One scroll sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    /// Scroll offset in pixels (never NaN).
    pub offset: f64,
    /// Which source produced it.
    pub source: SampleSource,
}

/// Chooses between the native scroll position and a smooth-scroll driver.
#[derive(Debug)]
pub struct ScrollSampler<N, D = NoDriver> {
    native: N,
    driver: Option<D>,
    follow_driver: bool,
}

impl<N: ScrollSource> ScrollSampler<N, NoDriver> {
    /// Creates a sampler that reads only the native scroll position.
    #[must_use]
    pub fn native(native: N) -> Self {
        Self {
            native,
            driver: None,
            follow_driver: false,
        }
    }
}

impl<N: ScrollSource, D: SmoothScrollDriver> ScrollSampler<N, D> {
    /// Creates a sampler with an optional driver, following it only when
    /// `strategy` does.
    #[must_use]
    pub fn new(native: N, driver: Option<D>, strategy: PinningStrategy) -> Self {
        Self {
            native,
            driver,
            follow_driver: strategy.uses_driver(),
        }
    }

    /// Reads the authoritative scroll offset.
    #[must_use]
    pub fn sample(&self) -> ScrollSample {
        let from_driver = self
            .driver
            .as_ref()
            .filter(|driver| self.follow_driver && driver.is_active())
            .map(SmoothScrollDriver::position)
            .filter(|offset| !offset.is_nan());
        match from_driver {
            Some(offset) => ScrollSample {
                offset,
                source: SampleSource::Driver,
            },
            None => {
                let offset = self.native.scroll_offset();
                ScrollSample {
                    offset: if offset.is_nan() { 0.0 } else { offset },
                    source: SampleSource::Native,
                }
            }
        }
    }

    /// The native source.
    #[must_use]
    pub fn native_source(&self) -> &N {
        &self.native
    }

    /// The attached driver, if any.
    #[must_use]
    pub fn driver(&self) -> Option<&D> {
        self.driver.as_ref()
    }

    /// Detaches and returns the driver; later samples are native.
    pub fn take_driver(&mut self) -> Option<D> {
        self.driver.take()
    }
}
