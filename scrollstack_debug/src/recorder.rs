// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes each event into a
//! `Vec<u8>` as a fixed-size little-endian record, prefixed with a tag and
//! the [`HostTime`] at which it was received. [`decode`] reads them back as
//! an iterator of [`Recorded`] events.

use std::time::Instant;

use scrollstack_core::time::HostTime;
use scrollstack_core::trace::{
    CompletionEvent, MeasureEvent, ResolveEvent, TeardownEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MEASURE: u8 = 1;
const TAG_RESOLVE: u8 = 2;
const TAG_COMPLETION: u8 = 3;
const TAG_TEARDOWN: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
pub struct RecorderSink {
    buf: Vec<u8>,
    clock: Box<dyn FnMut() -> HostTime>,
}

impl std::fmt::Debug for RecorderSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderSink")
            .field("bytes", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder stamping events with the time elapsed since
    /// its creation.
    #[must_use]
    pub fn new() -> Self {
        let origin = Instant::now();
        Self::with_clock(move || {
            let us = origin.elapsed().as_micros();
            HostTime(u64::try_from(us).unwrap_or(u64::MAX))
        })
    }

    /// Creates an empty recorder stamping events with `clock`.
    #[must_use]
    pub fn with_clock(clock: impl FnMut() -> HostTime + 'static) -> Self {
        Self {
            buf: Vec::new(),
            clock: Box::new(clock),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8) {
        let at = (self.clock)();
        self.write_u8(tag);
        self.write_u64(at.micros());
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: usize) {
        let v = u32::try_from(v).unwrap_or(u32::MAX);
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }
}

impl TraceSink for RecorderSink {
    fn on_measure(&mut self, e: &MeasureEvent) {
        self.begin(TAG_MEASURE);
        self.write_u64(e.generation);
        self.write_u32(e.items);
        self.write_f64(e.viewport_height);
        self.write_f64(e.pin_end);
        self.write_bool(e.has_sentinel);
    }

    fn on_resolve(&mut self, e: &ResolveEvent) {
        self.begin(TAG_RESOLVE);
        self.write_u64(e.generation);
        self.write_f64(e.scroll_offset);
        self.write_u32(e.transform_writes);
        self.write_u32(e.filter_writes);
        self.write_u32(e.skipped);
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        self.begin(TAG_COMPLETION);
        self.write_f64(e.scroll_offset);
        self.write_bool(e.completed);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.begin(TAG_TEARDOWN);
        self.write_u32(e.items);
        self.write_bool(e.was_measured);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`MeasureEvent`].
    Measure(MeasureEvent),
    /// A [`ResolveEvent`].
    Resolve(ResolveEvent),
    /// A [`CompletionEvent`].
    Completion(CompletionEvent),
    /// A [`TeardownEvent`].
    Teardown(TeardownEvent),
}

/// A decoded event and the time it was recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    /// When the recorder received the event.
    pub at: HostTime,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Recorded`] events.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<usize> {
        usize::try_from(u32::from_le_bytes(self.take()?)).ok()
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_le_bytes(self.take()?))
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn decode_measure(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Measure(MeasureEvent {
            generation: self.read_u64()?,
            items: self.read_u32()?,
            viewport_height: self.read_f64()?,
            pin_end: self.read_f64()?,
            has_sentinel: self.read_bool()?,
        }))
    }

    fn decode_resolve(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Resolve(ResolveEvent {
            generation: self.read_u64()?,
            scroll_offset: self.read_f64()?,
            transform_writes: self.read_u32()?,
            filter_writes: self.read_u32()?,
            skipped: self.read_u32()?,
        }))
    }

    fn decode_completion(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Completion(CompletionEvent {
            scroll_offset: self.read_f64()?,
            completed: self.read_bool()?,
        }))
    }

    fn decode_teardown(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Teardown(TeardownEvent {
            items: self.read_u32()?,
            was_measured: self.read_bool()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Recorded;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at = HostTime(self.read_u64()?);
        let event = match tag {
            TAG_MEASURE => self.decode_measure(),
            TAG_RESOLVE => self.decode_resolve(),
            TAG_COMPLETION => self.decode_completion(),
            TAG_TEARDOWN => self.decode_teardown(),
            _ => None, // unknown tag → stop iteration
        }?;
        Some(Recorded { at, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepping_clock() -> impl FnMut() -> HostTime {
        let mut t = 0_u64;
        move || {
            t += 1_000;
            HostTime(t)
        }
    }

    fn sample_measure() -> MeasureEvent {
        MeasureEvent {
            generation: 2,
            items: 5,
            viewport_height: 812.5,
            pin_end: 3100.0,
            has_sentinel: true,
        }
    }

    #[test]
    fn records_every_event_kind_in_order() {
        let mut rec = RecorderSink::with_clock(stepping_clock());
        rec.on_measure(&sample_measure());
        rec.on_resolve(&ResolveEvent {
            generation: 2,
            scroll_offset: 1234.5,
            transform_writes: 3,
            filter_writes: 1,
            skipped: 2,
        });
        rec.on_completion(&CompletionEvent {
            scroll_offset: 2900.0,
            completed: true,
        });
        rec.on_teardown(&TeardownEvent {
            items: 5,
            was_measured: true,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].at, HostTime(1_000));
        assert_eq!(events[3].at, HostTime(4_000));
        assert_eq!(events[0].event, RecordedEvent::Measure(sample_measure()));
        assert!(
            matches!(
                events[1].event,
                RecordedEvent::Resolve(ResolveEvent {
                    transform_writes: 3,
                    skipped: 2,
                    ..
                })
            ),
            "got: {:?}",
            events[1]
        );
        assert_eq!(
            events[2].event,
            RecordedEvent::Completion(CompletionEvent {
                scroll_offset: 2900.0,
                completed: true,
            })
        );
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::with_clock(stepping_clock());
        rec.on_measure(&sample_measure());
        rec.on_measure(&sample_measure());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let mut bytes = vec![0xEE];
        bytes.extend_from_slice(&0_u64.to_le_bytes());
        assert_eq!(decode(&bytes).count(), 0);
    }
}
