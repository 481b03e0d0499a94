// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        little_endian::LittleEndianU16,
        mac::{BlockAckStartingSequenceControl, FrameControl, MacAddr},
    },
    bitfield::bitfield,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

// IEEE Std 802.11-2016, 9.3.1
// The following fields are always present for every control frame.
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct CtrlHdr {
    pub frame_ctrl: LittleEndianU16,
    pub duration_or_id: LittleEndianU16,
    pub ra: MacAddr,
}

impl CtrlHdr {
    pub fn frame_ctrl(&self) -> FrameControl {
        FrameControl::from(self.frame_ctrl.to_native())
    }
}

bitfield! {
    /// IEEE Std 802.11-2016, 9.3.1.8.2
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockAckReqControl(u16);
    impl Debug;
    bool;
    pub ack_policy, set_ack_policy: 0;
    pub multi_tid, set_multi_tid: 1;
    pub compressed_bitmap, set_compressed_bitmap: 2;
    pub gcr, set_gcr: 3;
    pub u16, tid_info, set_tid_info: 15, 12;
}
impl_raw_bits!(BlockAckReqControl, u16);

// IEEE Std 802.11-2016, 9.3.1.8.1
// Fields of a Basic or Compressed BlockAckReq following the CtrlHdr.
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct BlockAckReqHdr {
    pub ta: MacAddr,
    pub bar_control: LittleEndianU16,
    pub starting_sequence_control: LittleEndianU16,
}

impl BlockAckReqHdr {
    pub fn bar_control(&self) -> BlockAckReqControl {
        BlockAckReqControl::from(self.bar_control.to_native())
    }

    pub fn starting_sequence_control(&self) -> BlockAckStartingSequenceControl {
        BlockAckStartingSequenceControl::from(self.starting_sequence_control.to_native())
    }
}
