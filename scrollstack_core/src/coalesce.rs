// Copyright 2026 the Scrollstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing primitives.
//!
//! - [`CoalescingTrigger`]: quiet-window debounce: any number of requests
//!   inside the window produce one firing after the window elapses.
//! - [`FrameGate`]: at most one pending frame: scroll events that arrive
//!   before the next frame starts share a single sample.
//!
//! Both are plain state machines driven by the caller's clock, so backends
//! pair them with whatever timer or frame callback the platform offers.

use crate::time::{Duration, HostTime};

/// Fires once after a burst of requests has gone quiet for `quiet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoalescingTrigger {
    quiet: Duration,
    deadline: Option<HostTime>,
}

impl CoalescingTrigger {
    /// Creates an idle trigger with the given quiet window.
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// The quiet window.
    #[must_use]
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records a request at `now`, pushing the deadline out to `now + quiet`.
    ///
    /// Returns the new deadline so the caller can (re)arm its timer.
    pub fn request(&mut self, now: HostTime) -> HostTime {
        let deadline = now.saturating_add(self.quiet);
        self.deadline = Some(deadline);
        deadline
    }

    /// The pending deadline, if a request is outstanding.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.deadline
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when `now` has reached the deadline,
    /// clearing the pending request.
    pub fn fire_if_due(&mut self, now: HostTime) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, or `None` when idle.
    #[must_use]
    pub fn remaining(&self, now: HostTime) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Drops any outstanding request.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Coalesces many frame requests into one pending frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Creates a gate with no pending frame.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Marks a frame as wanted.
    ///
    /// Returns `true` if the caller must schedule a frame callback, `false`
    /// if one is already pending.
    pub fn request(&mut self) -> bool {
        !core::mem::replace(&mut self.pending, true)
    }

    /// Clears the pending flag at the start of the frame callback.
    pub fn begin_frame(&mut self) {
        self.pending = false;
    }

    /// Whether a frame is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_fires_once_after_quiet_window() {
        let mut t = CoalescingTrigger::new(Duration::from_millis(100));
        t.request(HostTime(0));
        t.request(HostTime(30_000));
        t.request(HostTime(60_000));
        assert_eq!(t.deadline(), Some(HostTime(160_000)));

        assert!(!t.fire_if_due(HostTime(100_000)), "window restarted");
        assert_eq!(t.remaining(HostTime(100_000)), Some(Duration(60_000)));
        assert!(t.fire_if_due(HostTime(160_000)));
        assert!(!t.fire_if_due(HostTime(500_000)), "fires only once");
        assert!(!t.is_pending());
    }

    #[test]
    fn cancel_discards_request() {
        let mut t = CoalescingTrigger::new(Duration::from_millis(100));
        t.request(HostTime(0));
        t.cancel();
        assert!(!t.fire_if_due(HostTime(1_000_000)));
        assert_eq!(t.remaining(HostTime(0)), None);
    }

    #[test]
    fn frame_gate_coalesces_until_frame_starts() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.is_pending());
        gate.begin_frame();
        assert!(gate.request(), "next frame can be scheduled");
    }
}
