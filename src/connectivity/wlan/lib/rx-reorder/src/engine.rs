// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        block_ack::{negotiate_window_size, BlockAckEvent, BlockAckSession, Tid},
        config::ReorderConfig,
        dispatch::{dispatch, FrameSink},
        error::Error,
        frame::{DeliveryStatus, FrameTag, RxFrame},
        timeout::{ReorderTimeout, TimeoutMonitor},
        window::{Placement, ReorderWindow, Released},
    },
    log::{debug, info, trace, warn},
    wlan_common::{
        mac,
        sequence::SequenceNumber,
        timer::{EventId, Timer},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReorderCounters {
    /// Frames handed to the sink with success status.
    pub delivered: u64,
    /// Frames handed to the sink with failure status.
    pub failed: u64,
    /// Data frames delivered as received because their TID has no open session.
    pub passed_through: u64,
    /// Data frames which had to wait in a reorder window.
    pub buffered: u64,
    /// Buffered frames released because a timeout gave up on their predecessors.
    pub released_by_timeout: u64,
    /// BlockAck frames applied to a session and handed back with failure status.
    pub block_ack_consumed: u64,
    /// Sequence numbers given up on when a window moved past them.
    pub lost: u64,
}

/// Reorders the data frames of open BlockAck sessions before handing them to a `FrameSink`.
///
/// The engine keeps one session per TID and one timeout shared by all of them. All entry points
/// run to completion and may call into the sink several times before returning.
pub struct ReorderEngine<S: FrameSink> {
    max_window_size: u16,
    sessions: [BlockAckSession; Tid::COUNT],
    timeout: TimeoutMonitor,
    sink: S,
    counters: ReorderCounters,
}

impl<S: FrameSink> ReorderEngine<S> {
    pub fn new(config: ReorderConfig, sink: S, timer: Timer<ReorderTimeout>) -> Self {
        Self {
            max_window_size: config.max_window_size(),
            sessions: Default::default(),
            timeout: TimeoutMonitor::new(timer, config.timeout()),
            sink,
            counters: ReorderCounters::default(),
        }
    }

    /// Replaces the sink frames are delivered to. Returns the previous one.
    pub fn register_sink(&mut self, sink: S) -> S {
        std::mem::replace(&mut self.sink, sink)
    }

    /// Entry point for every received frame.
    pub fn receive_packet(&mut self, frame: RxFrame) {
        match frame.tag() {
            FrameTag::QosData | FrameTag::Amsdu => self.receive_data_frame(frame),
            FrameTag::BaEvent => self.receive_block_ack_frame(frame),
            FrameTag::Other => {
                let status = frame.rx_status();
                self.deliver(frame, status);
            }
        }
    }

    /// Closes the session of `tid`, delivering all frames it holds. Does nothing if no session is
    /// open.
    pub fn close_ba_session(&mut self, tid: Tid) {
        match self.flush_session(tid) {
            Some(flushed) => {
                info!("BlockAck session closed for TID {}: {} frames flushed", tid, flushed);
                self.refresh_timeout(tid, true);
            }
            None => trace!("no BlockAck session to close for TID {}", tid),
        }
    }

    /// Handles the expiry of a timeout scheduled through the engine's timer.
    pub fn handle_timeout(&mut self, event_id: EventId) {
        let tid = match self.timeout.on_fired(event_id) {
            Some(tid) => tid,
            None => {
                debug!("ignoring stale reorder timeout {:?}", event_id);
                return;
            }
        };
        let mut released = Released::new();
        if let Some(window) = self.sessions[tid.index()].window_mut() {
            let before = window.buffered();
            let lost = window.release_stale(&mut released);
            self.timeout.track(before, window.buffered());
            debug!(
                "TID {}: timeout gave up on {} frames, window moved to {}",
                tid,
                lost,
                window.expected_sn()
            );
            self.counters.lost += u64::from(lost);
            self.counters.released_by_timeout += released.len() as u64;
        }
        self.deliver_all(released);
        self.arm_timeout_after(tid);
    }

    pub fn is_ba_established(&self, tid: Tid) -> bool {
        self.sessions[tid.index()].is_open()
    }

    pub fn expected_sn(&self, tid: Tid) -> Option<SequenceNumber> {
        self.sessions[tid.index()].window().map(ReorderWindow::expected_sn)
    }

    pub fn window_size(&self, tid: Tid) -> Option<u16> {
        self.sessions[tid.index()].window().map(ReorderWindow::size)
    }

    /// Number of frames buffered for `tid`.
    pub fn buffered(&self, tid: Tid) -> usize {
        self.sessions[tid.index()].window().map_or(0, ReorderWindow::buffered)
    }

    /// Number of frames buffered across all TIDs.
    pub fn packets_stored(&self) -> usize {
        self.timeout.packets_stored()
    }

    /// TID the pending timeout will flush, if any.
    pub fn timeout_target(&self) -> Option<Tid> {
        self.timeout.armed_for()
    }

    pub fn counters(&self) -> ReorderCounters {
        self.counters
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn receive_data_frame(&mut self, frame: RxFrame) {
        let header = mac::DataFrame::parse(frame.bytes()).map(|data_frame| {
            (data_frame.qos_ctrl().map(|qos_ctrl| qos_ctrl.tid()), data_frame.hdr.seq_ctrl())
        });
        match header {
            Some((Some(tid), seq_ctrl)) => match Tid::new(tid) {
                Ok(tid) if self.is_ba_established(tid) => {
                    self.reorder(tid, seq_ctrl.seq_num(), frame)
                }
                _ => self.pass_through(frame),
            },
            Some((None, _)) => self.pass_through(frame),
            None => {
                warn!("rejecting malformed data frame of {} bytes", frame.bytes().len());
                self.deliver(frame, DeliveryStatus::Failed);
            }
        }
    }

    fn pass_through(&mut self, frame: RxFrame) {
        self.counters.passed_through += 1;
        let status = frame.rx_status();
        self.deliver(frame, status);
    }

    fn reorder(&mut self, tid: Tid, sn: SequenceNumber, frame: RxFrame) {
        let mut released = Released::new();
        let status = frame.rx_status();
        let placement = match self.sessions[tid.index()].window_mut() {
            Some(window) => {
                let before = window.buffered();
                let placement = window.insert(sn, frame, status, &mut released);
                self.timeout.track(before, window.buffered());
                placement
            }
            None => {
                self.pass_through(frame);
                return;
            }
        };
        trace!("TID {} SN {}: {:?}", tid, sn, placement);
        match placement {
            Placement::Buffered => self.counters.buffered += 1,
            Placement::Duplicate => warn!("TID {}: duplicate SN {} in reorder window", tid, sn),
            Placement::Jumped { lost } => {
                debug!("TID {}: SN {} beyond window, {} frames lost", tid, sn, lost);
                self.counters.lost += u64::from(lost);
            }
            Placement::InOrder | Placement::Stale => (),
        }
        self.deliver_all(released);
        match placement {
            Placement::InOrder | Placement::Jumped { .. } => self.refresh_timeout(tid, true),
            Placement::Buffered => self.refresh_timeout(tid, false),
            Placement::Stale | Placement::Duplicate => (),
        }
    }

    /// BlockAck frames carry no data for the upper layer. Each one is handed back with failure
    /// status once it was applied, or rejected.
    fn receive_block_ack_frame(&mut self, frame: RxFrame) {
        match BlockAckEvent::parse(frame.bytes()).and_then(|event| self.on_block_ack_event(event)) {
            Ok(()) => {
                trace!("consumed BlockAck frame");
                self.counters.block_ack_consumed += 1;
                dispatch(&mut self.sink, frame, DeliveryStatus::Failed);
            }
            Err(e) => {
                warn!("rejecting BlockAck frame: {}", e);
                self.deliver(frame, DeliveryStatus::Failed);
            }
        }
    }

    fn on_block_ack_event(&mut self, event: BlockAckEvent) -> Result<(), Error> {
        match event {
            BlockAckEvent::AddbaRequest { tid, buffer_size, starting_sn } => {
                let tid = Tid::new(tid)?;
                let window_size = negotiate_window_size(buffer_size, self.max_window_size);
                let window_size = self.sessions[tid.index()].open(tid, window_size, starting_sn)?;
                info!(
                    "BlockAck session opened for TID {}: window size {}, starting SN {}",
                    tid, window_size, starting_sn
                );
                Ok(())
            }
            BlockAckEvent::Delba { tid, initiator, reason_code } => {
                let tid = Tid::new(tid)?;
                debug!(
                    "DELBA for TID {} (initiator: {}, reason: {})",
                    tid, initiator, reason_code.0
                );
                self.close_ba_session(tid);
                Ok(())
            }
            BlockAckEvent::BlockAckReq { tid, starting_sn } => {
                self.on_block_ack_req(Tid::new(tid)?, starting_sn)
            }
        }
    }

    /// See IEEE Std 802.11-2016, 10.24.7.7.
    fn on_block_ack_req(&mut self, tid: Tid, starting_sn: SequenceNumber) -> Result<(), Error> {
        let window = self.sessions[tid.index()].window_mut().ok_or(Error::SessionNotOpen(tid))?;
        let mut released = Released::new();
        let before = window.buffered();
        let lost = match window.advance_to(starting_sn, &mut released) {
            Some(lost) => lost,
            None => {
                trace!("TID {}: ignoring BlockAckReq for SN {}", tid, starting_sn);
                return Ok(());
            }
        };
        self.timeout.track(before, window.buffered());
        debug!("TID {}: BlockAckReq moved window to {}, {} frames lost", tid, starting_sn, lost);
        self.counters.lost += u64::from(lost);
        self.deliver_all(released);
        self.refresh_timeout(tid, true);
        Ok(())
    }

    /// Closes the session of `tid` and delivers its frames. Returns the number of frames
    /// delivered, or None if the session was not open.
    fn flush_session(&mut self, tid: Tid) -> Option<usize> {
        let before = self.buffered(tid);
        let mut released = Released::new();
        if !self.sessions[tid.index()].close(&mut released) {
            return None;
        }
        self.timeout.track(before, 0);
        let flushed = released.len();
        self.deliver_all(released);
        Some(flushed)
    }

    /// Keeps the shared timeout consistent with the frames buffered for `tid`, whose window just
    /// changed. `progressed` is set if the window moved.
    fn refresh_timeout(&mut self, tid: Tid, progressed: bool) {
        let has_frames = self.buffered(tid) > 0;
        match self.timeout.armed_for() {
            Some(armed) if armed == tid => {
                if !has_frames {
                    self.timeout.cancel();
                    self.arm_timeout_after(tid);
                } else if progressed {
                    self.timeout.restart(tid);
                }
            }
            Some(_) => (),
            None => {
                if has_frames {
                    self.timeout.arm(tid);
                }
            }
        }
    }

    /// Arms the timeout for the first TID after `tid` holding frames, `tid` itself coming last.
    fn arm_timeout_after(&mut self, tid: Tid) {
        if self.timeout.packets_stored() == 0 {
            return;
        }
        let mut candidate = tid.next();
        for _ in 0..Tid::COUNT {
            if self.buffered(candidate) > 0 {
                self.timeout.arm(candidate);
                return;
            }
            candidate = candidate.next();
        }
    }

    fn deliver_all(&mut self, released: Released) {
        for (frame, status) in released {
            self.deliver(frame, status);
        }
    }

    fn deliver(&mut self, frame: RxFrame, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Ok => self.counters.delivered += 1,
            DeliveryStatus::Failed => self.counters.failed += 1,
        }
        dispatch(&mut self.sink, frame, status);
    }

    /// Panics if a window is inconsistent, or the timeout does not match the buffered frames.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut stored = 0;
        for session in &self.sessions {
            if let Some(window) = session.window() {
                window.assert_invariants();
                stored += window.buffered();
            }
        }
        assert_eq!(self.packets_stored(), stored);
        assert_eq!(self.timeout.is_armed(), stored > 0);
        if let Some(tid) = self.timeout.armed_for() {
            assert!(self.buffered(tid) > 0, "timeout armed for empty TID {}", tid);
        }
    }
}

impl<S: FrameSink> Drop for ReorderEngine<S> {
    fn drop(&mut self) {
        self.timeout.cancel();
        for tid in Tid::all() {
            if let Some(flushed) = self.flush_session(tid) {
                debug!("TID {}: {} frames flushed on shutdown", tid, flushed);
            }
        }
    }
}
