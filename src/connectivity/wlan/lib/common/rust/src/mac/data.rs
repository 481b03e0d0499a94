// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        buffer_reader::BufferReader,
        little_endian::LittleEndianU16,
        mac::{FrameControl, MacAddr, QosControl, SequenceControl, BITMASK_QOS, FRAME_TYPE_DATA},
    },
    zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned},
};

pub type Addr4 = MacAddr;

// IEEE Std 802.11-2016, 9.3.2.1
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct DataHdr {
    pub frame_ctrl: LittleEndianU16,
    pub duration: LittleEndianU16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    pub seq_ctrl: LittleEndianU16,
}

impl DataHdr {
    pub fn frame_ctrl(&self) -> FrameControl {
        FrameControl::from(self.frame_ctrl.to_native())
    }

    pub fn duration(&self) -> u16 {
        self.duration.to_native()
    }

    pub fn seq_ctrl(&self) -> SequenceControl {
        SequenceControl::from(self.seq_ctrl.to_native())
    }
}

pub struct DataFrame<B> {
    // Data Header: fixed fields
    pub hdr: LayoutVerified<B, DataHdr>,
    // Data Header: optional fields
    pub addr4: Option<LayoutVerified<B, Addr4>>,
    pub qos_ctrl: Option<LayoutVerified<B, LittleEndianU16>>,
    // Body
    pub body: B,
}

impl<B: ByteSlice> DataFrame<B> {
    /// Returns None if `bytes` is not a data frame or is too short for the header fields its
    /// frame control announces.
    pub fn parse(bytes: B) -> Option<Self> {
        let mut reader = BufferReader::new(bytes);
        let fc = FrameControl::from(reader.peek_value::<LittleEndianU16>()?.to_native());
        if fc.frame_type() != FRAME_TYPE_DATA {
            return None;
        }
        let hdr = reader.read()?;
        let addr4 = if fc.to_ds() && fc.from_ds() { Some(reader.read()?) } else { None };
        let qos_ctrl =
            if fc.frame_subtype() & BITMASK_QOS != 0 { Some(reader.read()?) } else { None };
        // HT Control is not needed here and is left at the front of the body.
        let body = reader.into_remaining()?;
        Some(Self { hdr, addr4, qos_ctrl, body })
    }

    pub fn qos_ctrl(&self) -> Option<QosControl> {
        self.qos_ctrl.as_ref().map(|qos_ctrl| QosControl::from(qos_ctrl.to_native()))
    }
}
