// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scrollstack_core::trace::{
    CompletionEvent, MeasureEvent, ResolveEvent, TeardownEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Skip resolve events that wrote nothing.
    quiet_idle: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet_idle", &self.quiet_idle)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            quiet_idle: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet_idle: false,
        }
    }

    /// Omits resolve lines for frames in which nothing was written.
    #[must_use]
    pub fn quiet_idle(mut self, quiet: bool) -> Self {
        self.quiet_idle = quiet;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_measure(&mut self, e: &MeasureEvent) {
        let end = if e.has_sentinel { "sentinel" } else { "fallback" };
        let _ = writeln!(
            self.writer,
            "[measure] gen={} items={} vh={:.1} pin_end={:.1} ({end})",
            e.generation, e.items, e.viewport_height, e.pin_end,
        );
    }

    fn on_resolve(&mut self, e: &ResolveEvent) {
        if self.quiet_idle && e.transform_writes == 0 && e.filter_writes == 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[resolve] gen={} scroll={:.1} transforms={} filters={} skipped={}",
            e.generation, e.scroll_offset, e.transform_writes, e.filter_writes, e.skipped,
        );
    }

    fn on_completion(&mut self, e: &CompletionEvent) {
        let edge = if e.completed { "entered" } else { "left" };
        let _ = writeln!(
            self.writer,
            "[complete] {edge} at scroll={:.1}",
            e.scroll_offset,
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] items={} measured={}",
            e.items, e.was_measured,
        );
    }
}
