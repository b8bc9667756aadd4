// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Resolve events also feed two counter tracks (`scroll` and `writes`), so a
//! scroll session shows up as a curve next to the per-frame write volume.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        let ts = recorded.at.micros();
        match recorded.event {
            RecordedEvent::Measure(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Measure",
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "generation": e.generation,
                        "items": e.items,
                        "viewport_height": e.viewport_height,
                        "pin_end": e.pin_end,
                        "has_sentinel": e.has_sentinel,
                    }
                }));
            }
            RecordedEvent::Resolve(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Resolve",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "generation": e.generation,
                        "scroll_offset": e.scroll_offset,
                        "transform_writes": e.transform_writes,
                        "filter_writes": e.filter_writes,
                        "skipped": e.skipped,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "scroll",
                    "ts": ts,
                    "pid": 0,
                    "args": { "offset": e.scroll_offset }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "writes",
                    "ts": ts,
                    "pid": 0,
                    "args": {
                        "transform": e.transform_writes,
                        "filter": e.filter_writes,
                    }
                }));
            }
            RecordedEvent::Completion(e) => {
                let name = if e.completed {
                    "StackComplete"
                } else {
                    "StackIncomplete"
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Stack",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "scroll_offset": e.scroll_offset,
                    }
                }));
            }
            RecordedEvent::Teardown(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Teardown",
                    "cat": "Stack",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "items": e.items,
                        "was_measured": e.was_measured,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use scrollstack_core::time::HostTime;
    use scrollstack_core::trace::{CompletionEvent, ResolveEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::with_clock(|| HostTime(16_000));
        rec.on_resolve(&ResolveEvent {
            generation: 0,
            scroll_offset: 900.0,
            transform_writes: 2,
            filter_writes: 0,
            skipped: 1,
        });
        rec.on_completion(&CompletionEvent {
            scroll_offset: 1780.0,
            completed: true,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let arr = parsed.as_array().unwrap();

        // Resolve expands to an instant plus two counters.
        assert_eq!(arr.len(), 4);
        assert_eq!(arr[0]["name"], "Resolve");
        assert_eq!(arr[0]["ts"], 16_000);
        assert_eq!(arr[0]["args"]["transform_writes"], 2);
        assert_eq!(arr[1]["ph"], "C");
        assert_eq!(arr[1]["args"]["offset"], 900.0);
        assert_eq!(arr[3]["name"], "StackComplete");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(0));
    }
}
