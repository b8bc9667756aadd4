// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the stack lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [engine](crate::engine) calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a layout measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureEvent {
    /// Monotonic measurement counter (0 for the mount measurement).
    pub generation: u64,
    /// Number of measured items.
    pub items: usize,
    /// Viewport height used for percentage resolution.
    pub viewport_height: f64,
    /// Resulting pin end.
    pub pin_end: f64,
    /// Whether the end sentinel was found.
    pub has_sentinel: bool,
}

/// Emitted after each transform pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveEvent {
    /// Layout generation the pass resolved against.
    pub generation: u64,
    /// Scroll offset used.
    pub scroll_offset: f64,
    /// Items whose transform was written.
    pub transform_writes: usize,
    /// Items whose filter was written.
    pub filter_writes: usize,
    /// Items with no write at all.
    pub skipped: usize,
}

/// Emitted when the stack enters or leaves the completed state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionEvent {
    /// Scroll offset at the transition.
    pub scroll_offset: f64,
    /// `true` on entering the completed state, `false` on leaving it.
    pub completed: bool,
}

/// Emitted when the engine reverts its items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeardownEvent {
    /// Number of items restored.
    pub items: usize,
    /// Whether a layout had ever been measured.
    pub was_measured: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a layout measurement.
    fn on_measure(&mut self, e: &MeasureEvent) {
        _ = e;
    }

    /// Called after each transform pass.
    fn on_resolve(&mut self, e: &ResolveEvent) {
        _ = e;
    }

    /// Called on completion edges.
    fn on_completion(&mut self, e: &CompletionEvent) {
        _ = e;
    }

    /// Called when items are restored.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`MeasureEvent`].
    #[inline]
    pub fn measure(&mut self, e: &MeasureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_measure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResolveEvent`].
    #[inline]
    pub fn resolve(&mut self, e: &ResolveEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resolve(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompletionEvent`].
    #[inline]
    pub fn completion(&mut self, e: &CompletionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_completion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TeardownEvent`].
    #[inline]
    pub fn teardown(&mut self, e: &TeardownEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_teardown(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_measure(&MeasureEvent {
            generation: 0,
            items: 3,
            viewport_height: 800.0,
            pin_end: 2400.0,
            has_sentinel: true,
        });
        sink.on_teardown(&TeardownEvent {
            items: 3,
            was_measured: true,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.completion(&CompletionEvent {
            scroll_offset: 10.0,
            completed: true,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            offsets: Vec<f64>,
        }
        impl TraceSink for RecordingSink {
            fn on_resolve(&mut self, e: &ResolveEvent) {
                self.offsets.push(e.scroll_offset);
            }
        }

        let mut sink = RecordingSink {
            offsets: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.resolve(&ResolveEvent {
            generation: 1,
            scroll_offset: 320.0,
            transform_writes: 2,
            filter_writes: 0,
            skipped: 1,
        });
        drop(tracer);
        assert_eq!(sink.offsets, &[320.0]);
    }
}
