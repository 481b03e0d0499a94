// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::block_ack::Tid,
    log::debug,
    std::time::Duration,
    wlan_common::timer::{EventId, Timer},
};

/// Event scheduled when buffered frames of `tid` have waited too long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderTimeout {
    pub tid: Tid,
}

/// The single timer shared by all reorder windows, and the count of frames they hold.
///
/// At most one timeout is scheduled at a time and it names the TID it will flush.
pub struct TimeoutMonitor {
    timer: Timer<ReorderTimeout>,
    timeout: Duration,
    packets_stored: usize,
    armed: Option<(EventId, Tid)>,
}

impl TimeoutMonitor {
    pub fn new(timer: Timer<ReorderTimeout>, timeout: Duration) -> Self {
        Self { timer, timeout, packets_stored: 0, armed: None }
    }

    pub fn packets_stored(&self) -> usize {
        self.packets_stored
    }

    pub fn armed_for(&self) -> Option<Tid> {
        self.armed.map(|(_, tid)| tid)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Accounts for a window whose buffered frame count went from `before` to `after`.
    pub fn track(&mut self, before: usize, after: usize) {
        self.packets_stored = self.packets_stored + after - before;
    }

    /// Schedules a timeout for `tid` unless one is already scheduled.
    pub fn arm(&mut self, tid: Tid) {
        if self.armed.is_some() {
            return;
        }
        let event_id = self.timer.schedule_after(self.timeout, ReorderTimeout { tid });
        debug!("reorder timeout {:?} armed for TID {}", event_id, tid);
        self.armed = Some((event_id, tid));
    }

    /// Reschedules the timeout for `tid`, which made progress.
    pub fn restart(&mut self, tid: Tid) {
        self.cancel();
        self.arm(tid);
    }

    pub fn cancel(&mut self) {
        if let Some((event_id, tid)) = self.armed.take() {
            debug!("reorder timeout {:?} for TID {} cancelled", event_id, tid);
            self.timer.cancel_event(event_id);
        }
    }

    /// Resolves a fired timeout. Returns None for events which were cancelled or already handled.
    pub fn on_fired(&mut self, event_id: EventId) -> Option<Tid> {
        let ReorderTimeout { tid } = self.timer.triggered(&event_id)?;
        if self.armed.map(|(armed_id, _)| armed_id) == Some(event_id) {
            self.armed = None;
        }
        debug!("reorder timeout {:?} fired for TID {}", event_id, tid);
        Some(tid)
    }
}
