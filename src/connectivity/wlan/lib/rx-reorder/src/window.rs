// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Per-TID reorder window of a BlockAck recipient. See IEEE Std 802.11-2016, 10.24.7.

use {
    crate::frame::{DeliveryStatus, RxFrame},
    wlan_common::sequence::{self, SequenceNumber},
};

pub const REORDER_SLOTS: usize = 8;
pub const MAX_WINDOW_SIZE: u16 = REORDER_SLOTS as u16;

#[derive(Debug)]
pub struct BufferedFrame {
    pub sn: SequenceNumber,
    pub frame: RxFrame,
    pub status: DeliveryStatus,
}

/// Frames leaving the window, in the order they must be dispatched.
pub type Released = Vec<(RxFrame, DeliveryStatus)>;

/// Where an incoming frame ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The frame was the expected one. It and any contiguous buffered frames were released.
    InOrder,
    /// The frame is behind the window and was released untouched.
    Stale,
    /// The frame is within the window and now waits for its predecessors.
    Buffered,
    /// A frame with the same sequence number is already buffered. The new one was released as
    /// failed.
    Duplicate,
    /// The frame is beyond the window, which moved forward to end at it. `lost` sequence
    /// numbers were given up on.
    Jumped { lost: u16 },
}

/// The reorder buffer of an open BlockAck session.
///
/// Slot `start` holds `expected_sn`, slot `(start + k) % 8` holds `expected_sn + k` for
/// `k < size`. Slot `start` is always empty between calls: a frame arriving for it is released
/// at once.
#[derive(Debug)]
pub struct ReorderWindow {
    slots: [Option<BufferedFrame>; REORDER_SLOTS],
    start: usize,
    size: u16,
    expected_sn: SequenceNumber,
    buffered: usize,
}

impl ReorderWindow {
    pub fn new(size: u16, starting_sn: SequenceNumber) -> Self {
        Self {
            slots: Default::default(),
            start: 0,
            size: size.clamp(1, MAX_WINDOW_SIZE),
            expected_sn: starting_sn & sequence::SEQ_MASK,
            buffered: 0,
        }
    }

    pub fn expected_sn(&self) -> SequenceNumber {
        self.expected_sn
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Number of frames currently held.
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    fn last_sn(&self) -> SequenceNumber {
        sequence::add(self.expected_sn, self.size - 1)
    }

    /// Slot holding `sn`. Only meaningful for `sn` inside the window.
    fn slot_index(&self, sn: SequenceNumber) -> usize {
        let offset = sequence::distance(self.expected_sn, sn) as usize;
        (self.start + offset) % REORDER_SLOTS
    }

    /// Places a received frame. Released frames are appended to `released`.
    pub fn insert(
        &mut self,
        sn: SequenceNumber,
        frame: RxFrame,
        status: DeliveryStatus,
        released: &mut Released,
    ) -> Placement {
        let sn = sn & sequence::SEQ_MASK;
        if sn == self.expected_sn {
            released.push((frame, status));
            self.advance();
            self.release_in_order(released);
            Placement::InOrder
        } else if !sequence::is_greater(sn, self.expected_sn) {
            released.push((frame, status));
            Placement::Stale
        } else if !sequence::is_greater(sn, self.last_sn()) {
            self.store(sn, frame, status, released)
        } else {
            let new_expected_sn = sequence::sub(sn, self.size - 1);
            let lost = self.move_to(new_expected_sn, released);
            if sn == self.expected_sn {
                released.push((frame, status));
                self.advance();
                self.release_in_order(released);
            } else {
                // Cannot collide: the window moved past every buffered frame below `sn`.
                self.store(sn, frame, status, released);
            }
            Placement::Jumped { lost }
        }
    }

    /// Moves the window start to `ssn` if it lies ahead. Frames passed over are released, the
    /// remaining gaps are given up on. Returns the number of sequence numbers given up on, or
    /// None if `ssn` is not ahead of the window.
    pub fn advance_to(&mut self, ssn: SequenceNumber, released: &mut Released) -> Option<u16> {
        let ssn = ssn & sequence::SEQ_MASK;
        if !sequence::is_greater(ssn, self.expected_sn) {
            return None;
        }
        Some(self.move_to(ssn, released))
    }

    /// Gives up on the missing frames at the head of the window and releases the buffered frames
    /// that follow them. Returns the number of sequence numbers given up on.
    pub fn release_stale(&mut self, released: &mut Released) -> u16 {
        let mut lost = 0;
        if self.buffered == 0 {
            return lost;
        }
        while self.slots[self.start].is_none() && lost < self.size {
            lost += 1;
            self.advance();
        }
        self.release_in_order(released);
        lost
    }

    /// Releases every buffered frame in window order, leaving the window empty.
    pub fn flush(&mut self, released: &mut Released) {
        for offset in 0..REORDER_SLOTS {
            let index = (self.start + offset) % REORDER_SLOTS;
            if let Some(buffered) = self.take(index) {
                released.push((buffered.frame, buffered.status));
            }
        }
    }

    fn store(
        &mut self,
        sn: SequenceNumber,
        frame: RxFrame,
        status: DeliveryStatus,
        released: &mut Released,
    ) -> Placement {
        let index = self.slot_index(sn);
        let slot = &mut self.slots[index];
        if slot.is_some() {
            released.push((frame, DeliveryStatus::Failed));
            return Placement::Duplicate;
        }
        *slot = Some(BufferedFrame { sn, frame, status });
        self.buffered += 1;
        Placement::Buffered
    }

    /// Advances one slot at a time towards `target`, releasing buffered frames on the way. Stops
    /// after a full window and jumps the rest. Returns how many sequence numbers were skipped
    /// without a frame.
    fn move_to(&mut self, target: SequenceNumber, released: &mut Released) -> u16 {
        let mut lost = 0;
        let steps = sequence::distance(self.expected_sn, target).min(self.size);
        for _ in 0..steps {
            match self.take(self.start) {
                Some(buffered) => released.push((buffered.frame, buffered.status)),
                None => lost += 1,
            }
            self.advance();
        }
        if self.expected_sn != target {
            // Every slot was visited, so the window is empty and can be placed anywhere.
            lost += sequence::distance(self.expected_sn, target);
            self.expected_sn = target;
        }
        self.release_in_order(released);
        lost
    }

    fn release_in_order(&mut self, released: &mut Released) {
        while let Some(buffered) = self.take(self.start) {
            released.push((buffered.frame, buffered.status));
            self.advance();
        }
    }

    fn take(&mut self, index: usize) -> Option<BufferedFrame> {
        let buffered = self.slots[index].take()?;
        self.buffered -= 1;
        Some(buffered)
    }

    fn advance(&mut self) {
        self.start = (self.start + 1) % REORDER_SLOTS;
        self.expected_sn = sequence::next(self.expected_sn);
    }

    /// Panics if a buffered frame sits outside its slot, or the head slot is occupied.
    #[cfg(test)]
    pub fn assert_invariants(&self) {
        assert!(self.slots[self.start].is_none(), "head slot occupied: {:?}", self);
        let mut count = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(buffered) = slot {
                count += 1;
                let offset = (index + REORDER_SLOTS - self.start) % REORDER_SLOTS;
                assert!(offset < self.size as usize, "frame outside window: {:?}", self);
                assert_eq!(
                    buffered.sn,
                    sequence::add(self.expected_sn, offset as u16),
                    "frame in wrong slot: {:?}",
                    self
                );
            }
        }
        assert_eq!(count, self.buffered);
    }
}
