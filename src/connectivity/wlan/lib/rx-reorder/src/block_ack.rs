// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! BlockAck recipient state.
//!
//! This module parses the BlockAck frames a recipient reacts to (ADDBA request, DELBA and
//! BlockAckReq) and tracks whether a session is open for each TID. An open session owns the
//! reorder window of its TID.
//!
//! See IEEE Std 802.11-2016, 10.24.

use {
    crate::{
        error::Error,
        window::{ReorderWindow, Released, MAX_WINDOW_SIZE},
    },
    std::fmt,
    wlan_common::{
        buffer_reader::BufferReader,
        error::FrameParseError,
        frame_len,
        little_endian::LittleEndianU16,
        mac,
        sequence::SequenceNumber,
    },
    zerocopy::ByteSlice,
};

pub const ADDBA_REQ_FRAME_LEN: usize = frame_len!(mac::MgmtHdr, mac::ActionHdr, mac::AddbaReqHdr);
pub const DELBA_FRAME_LEN: usize = frame_len!(mac::MgmtHdr, mac::ActionHdr, mac::DelbaHdr);
pub const BLOCK_ACK_REQ_FRAME_LEN: usize = frame_len!(mac::CtrlHdr, mac::BlockAckReqHdr);

const HT_CONTROL_LEN: usize = 4;

/// Traffic identifier of a BlockAck session.
///
/// TIDs 0 through 7 identify traffic categories, the only ones this recipient keeps reorder state
/// for. See IEEE Std 802.11-2016, 9.2.4.5.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(u8);

impl Tid {
    pub const COUNT: usize = 8;

    pub fn new(raw: u16) -> Result<Self, Error> {
        if (raw as usize) < Self::COUNT {
            Ok(Tid(raw as u8))
        } else {
            Err(Error::InvalidTid(raw))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Tid> {
        (0..Self::COUNT as u8).map(Tid)
    }

    /// The TID following this one, wrapping from 7 to 0.
    pub fn next(self) -> Tid {
        Tid((self.0 + 1) % Self::COUNT as u8)
    }
}

impl TryFrom<u16> for Tid {
    type Error = Error;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Tid::new(raw)
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A BlockAck frame forwarded to the recipient, reduced to the fields it acts on.
///
/// TIDs are kept raw here. They are validated when the event is applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAckEvent {
    /// IEEE Std 802.11-2016, 9.6.5.2
    AddbaRequest { tid: u16, buffer_size: u16, starting_sn: SequenceNumber },
    /// IEEE Std 802.11-2016, 9.6.5.4
    Delba { tid: u16, initiator: bool, reason_code: mac::ReasonCode },
    /// IEEE Std 802.11-2016, 9.3.1.8
    BlockAckReq { tid: u16, starting_sn: SequenceNumber },
}

impl BlockAckEvent {
    /// Parses a complete management or control frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is truncated, is not a BlockAck frame, or is a BlockAck frame
    /// a recipient does not handle.
    pub fn parse<B: ByteSlice>(bytes: B) -> Result<Self, Error> {
        let mut reader = BufferReader::new(bytes);
        let fc = mac::FrameControl::from(
            reader
                .peek_value::<LittleEndianU16>()
                .ok_or_else(|| FrameParseError::new("frame too short for frame control"))?
                .to_native(),
        );
        match (fc.frame_type(), fc.frame_subtype()) {
            (mac::FRAME_TYPE_MGMT, mac::MGMT_SUBTYPE_ACTION) => {
                reader
                    .read::<mac::MgmtHdr>()
                    .ok_or_else(|| FrameParseError::new("error reading management header"))?;
                if fc.htc_order() {
                    reader
                        .read_bytes(HT_CONTROL_LEN)
                        .ok_or_else(|| FrameParseError::new("error reading HT control"))?;
                }
                read_block_ack_action(reader)
            }
            (mac::FRAME_TYPE_CTRL, mac::CTRL_SUBTYPE_BLOCK_ACK_REQ) => {
                reader
                    .read::<mac::CtrlHdr>()
                    .ok_or_else(|| FrameParseError::new("error reading control header"))?;
                read_block_ack_req(reader)
            }
            (frame_type, subtype) => Err(Error::UnexpectedFrame { frame_type, subtype }),
        }
    }
}

/// Reads a BlockAck action from a management frame body, starting at the category byte.
fn read_block_ack_action<B: ByteSlice>(
    mut reader: BufferReader<B>,
) -> Result<BlockAckEvent, Error> {
    let category = reader
        .read::<mac::ActionHdr>()
        .ok_or_else(|| FrameParseError::new("error reading action header"))?
        .action;
    let action = reader
        .peek_value::<mac::BlockAckAction>()
        .ok_or_else(|| FrameParseError::new("error reading BlockAck action"))?;
    if category != mac::ActionCategory::BLOCK_ACK {
        return Err(Error::UnsupportedAction { category: category.0, action: action.0 });
    }
    match action {
        mac::BlockAckAction::ADDBA_REQUEST => {
            let hdr = reader
                .read::<mac::AddbaReqHdr>()
                .ok_or_else(|| FrameParseError::new("error reading ADDBA request header"))?;
            let parameters = hdr.parameters();
            Ok(BlockAckEvent::AddbaRequest {
                tid: parameters.tid(),
                buffer_size: parameters.buffer_size(),
                starting_sn: hdr.starting_sequence_control().starting_sequence_number(),
            })
        }
        mac::BlockAckAction::DELBA => {
            let hdr = reader
                .read::<mac::DelbaHdr>()
                .ok_or_else(|| FrameParseError::new("error reading DELBA header"))?;
            let parameters = hdr.parameters();
            Ok(BlockAckEvent::Delba {
                tid: parameters.tid(),
                initiator: parameters.initiator(),
                reason_code: hdr.reason_code(),
            })
        }
        // An ADDBA response is only meaningful to an originator.
        _ => Err(Error::UnsupportedAction { category: category.0, action: action.0 }),
    }
}

/// Reads the fields of a BlockAckReq following its control header.
fn read_block_ack_req<B: ByteSlice>(mut reader: BufferReader<B>) -> Result<BlockAckEvent, Error> {
    let hdr = reader
        .read::<mac::BlockAckReqHdr>()
        .ok_or_else(|| FrameParseError::new("error reading BlockAckReq"))?;
    let bar_control = hdr.bar_control();
    if bar_control.multi_tid() || bar_control.gcr() {
        return Err(FrameParseError::new("only Basic and Compressed BlockAckReq are supported")
            .into());
    }
    Ok(BlockAckEvent::BlockAckReq {
        tid: bar_control.tid_info(),
        starting_sn: hdr.starting_sequence_control().starting_sequence_number(),
    })
}

/// Window size a recipient uses for an ADDBA request announcing `buffer_size`.
///
/// A buffer size of zero leaves the choice to the recipient. See IEEE Std 802.11-2016, 9.4.1.14.
pub fn negotiate_window_size(buffer_size: u16, max_window_size: u16) -> u16 {
    let max_window_size = max_window_size.clamp(1, MAX_WINDOW_SIZE);
    match buffer_size {
        0 => max_window_size,
        n => n.min(max_window_size),
    }
}

/// BlockAck session of a single TID, seen from the recipient.
#[derive(Debug)]
pub enum BlockAckSession {
    Closed,
    Open(ReorderWindow),
}

impl Default for BlockAckSession {
    fn default() -> Self {
        BlockAckSession::Closed
    }
}

impl BlockAckSession {
    pub fn is_open(&self) -> bool {
        matches!(self, BlockAckSession::Open(_))
    }

    pub fn window(&self) -> Option<&ReorderWindow> {
        match self {
            BlockAckSession::Open(window) => Some(window),
            BlockAckSession::Closed => None,
        }
    }

    pub fn window_mut(&mut self) -> Option<&mut ReorderWindow> {
        match self {
            BlockAckSession::Open(window) => Some(window),
            BlockAckSession::Closed => None,
        }
    }

    /// Opens the session with an empty window starting at `starting_sn`. Returns the window size.
    ///
    /// See IEEE Std 802.11-2016, 10.24.2.
    pub fn open(
        &mut self,
        tid: Tid,
        window_size: u16,
        starting_sn: SequenceNumber,
    ) -> Result<u16, Error> {
        match self {
            BlockAckSession::Open(_) => Err(Error::SessionAlreadyOpen(tid)),
            BlockAckSession::Closed => {
                let window = ReorderWindow::new(window_size, starting_sn);
                let size = window.size();
                *self = BlockAckSession::Open(window);
                Ok(size)
            }
        }
    }

    /// Closes the session, releasing its buffered frames in window order. Returns false if the
    /// session was already closed.
    ///
    /// See IEEE Std 802.11-2016, 10.24.5.
    pub fn close(&mut self, released: &mut Released) -> bool {
        match std::mem::take(self) {
            BlockAckSession::Open(mut window) => {
                window.flush(released);
                true
            }
            BlockAckSession::Closed => false,
        }
    }
}
