// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        little_endian::LittleEndianU16,
        mac::{BlockAckStartingSequenceControl, FrameControl, MacAddr, ReasonCode, SequenceControl},
    },
    bitfield::bitfield,
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

// IEEE Std 802.11-2016, 9.3.3.2
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct MgmtHdr {
    pub frame_ctrl: LittleEndianU16,
    pub duration: LittleEndianU16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    pub seq_ctrl: LittleEndianU16,
}

impl MgmtHdr {
    pub fn frame_ctrl(&self) -> FrameControl {
        FrameControl::from(self.frame_ctrl.to_native())
    }

    pub fn seq_ctrl(&self) -> SequenceControl {
        SequenceControl::from(self.seq_ctrl.to_native())
    }
}

// IEEE Std 802.11-2016, 9.4.1.11, Table 9-47
#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
pub struct ActionCategory(pub u8);

impl ActionCategory {
    pub const SPECTRUM_MGMT: Self = Self(0);
    pub const QOS: Self = Self(1);
    pub const BLOCK_ACK: Self = Self(3);
    pub const PUBLIC: Self = Self(4);
    pub const HT: Self = Self(7);
    pub const VENDOR_SPECIFIC: Self = Self(127);
}

// IEEE Std 802.11-2016, 9.3.3.14
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct ActionHdr {
    pub action: ActionCategory,
}

// IEEE Std 802.11-2016, 9.6.5.1, Table 9-345
#[repr(C)]
#[derive(AsBytes, FromBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
pub struct BlockAckAction(pub u8);

impl BlockAckAction {
    pub const ADDBA_REQUEST: Self = Self(0);
    pub const ADDBA_RESPONSE: Self = Self(1);
    pub const DELBA: Self = Self(2);
}

// IEEE Std 802.11-2016, 9.4.1.14
pub type BlockAckPolicy = u16;
pub const BLOCK_ACK_POLICY_DELAYED: BlockAckPolicy = 0;
pub const BLOCK_ACK_POLICY_IMMEDIATE: BlockAckPolicy = 1;

bitfield! {
    /// IEEE Std 802.11-2016, 9.4.1.14
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockAckParameters(u16);
    impl Debug;
    bool;
    pub amsdu, set_amsdu: 0;
    pub u16, policy, set_policy: 1, 1;
    pub u16, tid, set_tid: 5, 2;
    pub u16, buffer_size, set_buffer_size: 15, 6;
}
impl_raw_bits!(BlockAckParameters, u16);

bitfield! {
    /// IEEE Std 802.11-2016, 9.4.1.16
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct DelbaParameters(u16);
    impl Debug;
    bool;
    pub initiator, set_initiator: 11;
    pub u16, tid, set_tid: 15, 12;
}
impl_raw_bits!(DelbaParameters, u16);

// IEEE Std 802.11-2016, 9.6.5.2 - ADDBA stands for Add BlockAck.
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct AddbaReqHdr {
    pub action: BlockAckAction,
    pub dialog_token: u8,
    pub parameters: LittleEndianU16,
    pub timeout: LittleEndianU16,
    pub starting_sequence_control: LittleEndianU16,
    // Optional GCR Group Address, Multi-band, TCLAS and ADDBA Extension elements follow.
}

impl AddbaReqHdr {
    pub fn parameters(&self) -> BlockAckParameters {
        BlockAckParameters::from(self.parameters.to_native())
    }

    pub fn timeout(&self) -> u16 {
        self.timeout.to_native()
    }

    pub fn starting_sequence_control(&self) -> BlockAckStartingSequenceControl {
        BlockAckStartingSequenceControl::from(self.starting_sequence_control.to_native())
    }
}

// IEEE Std 802.11-2016, 9.6.5.4 - DELBA stands for Delete BlockAck.
#[derive(FromBytes, AsBytes, Unaligned, PartialEq, Eq, Clone, Copy, Debug)]
#[repr(C, packed)]
pub struct DelbaHdr {
    pub action: BlockAckAction,
    pub parameters: LittleEndianU16,
    pub reason_code: LittleEndianU16,
    // Optional GCR Group Address, Multi-band and TCLAS elements follow.
}

impl DelbaHdr {
    pub fn parameters(&self) -> DelbaParameters {
        DelbaParameters::from(self.parameters.to_native())
    }

    pub fn reason_code(&self) -> ReasonCode {
        ReasonCode(self.reason_code.to_native())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::buffer_reader::BufferReader};

    #[test]
    fn addba_req_hdr() {
        #[rustfmt::skip]
        let body = [
            0x00, // action: ADDBA request
            1, // dialog_token
            0x0f, 0x01, // parameters: amsdu, immediate, tid 3, buffer_size 4
            0, 0, // timeout
            0xa0, 0, // starting_sequence_control: ssn 10
        ];
        let mut reader = BufferReader::new(&body[..]);
        let hdr = reader.read::<AddbaReqHdr>().expect("failed to read ADDBA request");
        assert_eq!(hdr.action, BlockAckAction::ADDBA_REQUEST);
        assert_eq!(hdr.dialog_token, 1);
        let params = hdr.parameters();
        assert!(params.amsdu());
        assert_eq!(params.policy(), BLOCK_ACK_POLICY_IMMEDIATE);
        assert_eq!(params.tid(), 3);
        assert_eq!(params.buffer_size(), 4);
        assert_eq!(hdr.timeout(), 0);
        assert_eq!(hdr.starting_sequence_control().starting_sequence_number(), 10);
        assert_eq!(reader.bytes_remaining(), 0);
    }

    #[test]
    fn delba_hdr() {
        #[rustfmt::skip]
        let body = [
            0x02, // action: DELBA
            0x00, 0x38, // parameters: initiator, tid 3
            37, 0, // reason_code: END_TS_BA_DLS
        ];
        let mut reader = BufferReader::new(&body[..]);
        let hdr = reader.read::<DelbaHdr>().expect("failed to read DELBA");
        assert_eq!(hdr.action, BlockAckAction::DELBA);
        assert!(hdr.parameters().initiator());
        assert_eq!(hdr.parameters().tid(), 3);
        assert_eq!(hdr.reason_code(), ReasonCode::END_TS_BA_DLS);
    }
}
