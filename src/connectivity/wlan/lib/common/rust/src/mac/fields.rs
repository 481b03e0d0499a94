// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bitfield::bitfield;

bitfield! {
    /// IEEE Std 802.11-2016, 9.2.4.1.1
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameControl(u16);
    impl Debug;
    bool;
    pub u16, protocol_version, set_protocol_version: 1, 0;
    pub u16, frame_type, set_frame_type: 3, 2;
    pub u16, frame_subtype, set_frame_subtype: 7, 4;
    pub to_ds, set_to_ds: 8;
    pub from_ds, set_from_ds: 9;
    pub more_fragments, set_more_fragments: 10;
    pub retry, set_retry: 11;
    pub power_mgmt, set_power_mgmt: 12;
    pub more_data, set_more_data: 13;
    pub protected, set_protected: 14;
    pub htc_order, set_htc_order: 15;
}
impl_raw_bits!(FrameControl, u16);

bitfield! {
    /// IEEE Std 802.11-2016, 9.2.4.4
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct SequenceControl(u16);
    impl Debug;
    pub u16, frag_num, set_frag_num: 3, 0;
    pub u16, seq_num, set_seq_num: 15, 4;
}
impl_raw_bits!(SequenceControl, u16);

bitfield! {
    /// IEEE Std 802.11-2016, 9.2.4.5.1, Table 9-6
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct QosControl(u16);
    impl Debug;
    bool;
    pub u16, tid, set_tid: 3, 0;
    pub eosp, set_eosp: 4;
    pub u16, ack_policy, set_ack_policy: 6, 5;
    pub amsdu_present, set_amsdu_present: 7;
    pub u16, high_byte, set_high_byte: 15, 8;
}
impl_raw_bits!(QosControl, u16);

bitfield! {
    /// IEEE Std 802.11-2016, 9.6.5.2, Figure 9-782
    /// Carried by ADDBA requests and BlockAckReq frames alike.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockAckStartingSequenceControl(u16);
    impl Debug;
    pub u16, fragment_number, set_fragment_number: 3, 0;
    pub u16, starting_sequence_number, set_starting_sequence_number: 15, 4;
}
impl_raw_bits!(BlockAckStartingSequenceControl, u16);
