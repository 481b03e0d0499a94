// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{
        dispatch::FrameSink,
        frame::{FrameTag, RxDescriptor, RxFrame, RX_STATUS_OK},
    },
    byteorder::{ByteOrder, LittleEndian, NativeEndian},
    std::{cell::RefCell, rc::Rc},
};

/// Records delivered frames. Clones share the record.
#[derive(Clone, Default)]
pub struct FakeSink {
    delivered: Rc<RefCell<Vec<RxFrame>>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<RxFrame> {
        self.delivered.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.delivered.borrow().len()
    }

    /// Takes the delivered frames, returning the sequence numbers of the data frames among them
    /// and whether they succeeded. BlockAck frames are skipped.
    pub fn take_sns(&self) -> Vec<(u16, bool)> {
        self.take()
            .iter()
            .filter(|frame| frame.tag() != FrameTag::BaEvent)
            .map(|frame| (delivered_sn(frame), frame.descriptor.code() == RX_STATUS_OK))
            .collect()
    }

    /// Takes the delivered frames, returning the sequence numbers of the successful ones.
    pub fn take_ok_sns(&self) -> Vec<u16> {
        self.take_sns().into_iter().filter(|(_, ok)| *ok).map(|(sn, _)| sn).collect()
    }
}

impl FrameSink for FakeSink {
    fn deliver_frame(&mut self, frame: RxFrame) {
        self.delivered.borrow_mut().push(frame);
    }
}

const SEQ_CTRL_OFFSET: usize = 22;

/// Sequence number of a data frame which has not been through the dispatcher.
pub fn wire_sn(frame: &RxFrame) -> u16 {
    LittleEndian::read_u16(&frame.bytes()[SEQ_CTRL_OFFSET..]) >> 4
}

/// Sequence number of a dispatched data frame. Only successful frames are in host byte order.
pub fn delivered_sn(frame: &RxFrame) -> u16 {
    let seq_ctrl = &frame.bytes()[SEQ_CTRL_OFFSET..];
    if frame.descriptor.code() == RX_STATUS_OK {
        NativeEndian::read_u16(seq_ctrl) >> 4
    } else {
        LittleEndian::read_u16(seq_ctrl) >> 4
    }
}

#[rustfmt::skip]
pub fn qos_data_frame(tid: u16, sn: u16) -> RxFrame {
    let mut bytes = vec![
        // Frame control: QoS data, from DS
        0x88, 0x02,
        // Duration
        0x2c, 0x00,
        // Addr1
        1, 1, 1, 1, 1, 1,
        // Addr2
        2, 2, 2, 2, 2, 2,
        // Addr3
        3, 3, 3, 3, 3, 3,
        // Sequence control
        0, 0,
        // QoS control
        0, 0,
        // Body
        0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x08, 0x00,
    ];
    LittleEndian::write_u16(&mut bytes[SEQ_CTRL_OFFSET..SEQ_CTRL_OFFSET + 2], sn << 4);
    bytes[24] = (tid & 0x0f) as u8;
    RxFrame::new(FrameTag::QosData, RxDescriptor::default(), bytes)
}

/// A management frame header for an action frame, 24 bytes.
#[rustfmt::skip]
fn action_frame_hdr() -> Vec<u8> {
    vec![
        // Frame control: action
        0xd0, 0x00,
        // Duration
        0x00, 0x00,
        // Addr1
        1, 1, 1, 1, 1, 1,
        // Addr2
        2, 2, 2, 2, 2, 2,
        // Addr3
        2, 2, 2, 2, 2, 2,
        // Sequence control
        0x10, 0x00,
    ]
}

pub fn addba_frame(tid: u16, buffer_size: u16, starting_sn: u16) -> RxFrame {
    let mut bytes = action_frame_hdr();
    bytes.extend_from_slice(&[
        0x03, // category: BlockAck
        0x00, // action: ADDBA request
        1, // dialog token
        0, 0, // parameters
        0, 0, // timeout
        0, 0, // starting sequence control
    ]);
    // amsdu, immediate policy
    let parameters = 0x0003 | (tid & 0x0f) << 2 | (buffer_size & 0x03ff) << 6;
    LittleEndian::write_u16(&mut bytes[27..29], parameters);
    LittleEndian::write_u16(&mut bytes[31..33], starting_sn << 4);
    RxFrame::new(FrameTag::BaEvent, RxDescriptor::default(), bytes)
}

pub fn delba_frame(tid: u16, initiator: bool) -> RxFrame {
    let mut bytes = action_frame_hdr();
    bytes.extend_from_slice(&[
        0x03, // category: BlockAck
        0x02, // action: DELBA
        0, 0, // parameters
        37, 0, // reason code: END_TS_BA_DLS
    ]);
    let parameters = (initiator as u16) << 11 | (tid & 0x0f) << 12;
    LittleEndian::write_u16(&mut bytes[26..28], parameters);
    RxFrame::new(FrameTag::BaEvent, RxDescriptor::default(), bytes)
}

#[rustfmt::skip]
pub fn bar_frame(tid: u16, starting_sn: u16) -> RxFrame {
    let mut bytes = vec![
        // Frame control: BlockAckReq
        0x84, 0x00,
        // Duration
        0x10, 0x00,
        // RA
        1, 1, 1, 1, 1, 1,
        // TA
        2, 2, 2, 2, 2, 2,
        // BAR control
        0, 0,
        // Starting sequence control
        0, 0,
    ];
    // compressed bitmap
    LittleEndian::write_u16(&mut bytes[16..18], 0x0004 | (tid & 0x0f) << 12);
    LittleEndian::write_u16(&mut bytes[18..20], starting_sn << 4);
    RxFrame::new(FrameTag::BaEvent, RxDescriptor::default(), bytes)
}
