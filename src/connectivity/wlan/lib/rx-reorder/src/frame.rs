// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use bitfield::bitfield;

/// Status code of a frame received without error.
pub const RX_STATUS_OK: u8 = 0;
/// Status code of a frame the reorder engine refused or could not place.
pub const RX_STATUS_REORDER_FAILURE: u8 = 0xE;

/// Classification assigned by the receive path before a frame reaches the reorder engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameTag {
    /// QoS data frame carrying a single MSDU.
    QosData,
    /// QoS data frame carrying an A-MSDU.
    Amsdu,
    /// BlockAck management or control frame forwarded by the firmware: ADDBA, DELBA or BAR.
    BaEvent,
    Other,
}

bitfield! {
    /// Status word of a receive descriptor. Everything outside `code` belongs to the radio.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxDescriptor(u32);
    impl Debug;
    bool;
    pub u8, code, set_code: 3, 0;
    pub crc_error, set_crc_error: 4;
    pub decrypt_error, set_decrypt_error: 5;
    pub ampdu, set_ampdu: 6;
    pub u8, rssi, set_rssi: 15, 8;
}

impl RxDescriptor {
    pub fn from_raw(raw: u32) -> Self {
        RxDescriptor(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A received frame: descriptor followed by the 802.11 MAC header and body.
///
/// Frames are move-only. The engine hands every frame it accepts to its `FrameSink` exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct RxFrame {
    tag: FrameTag,
    pub descriptor: RxDescriptor,
    bytes: Vec<u8>,
}

impl RxFrame {
    pub fn new(tag: FrameTag, descriptor: RxDescriptor, bytes: Vec<u8>) -> Self {
        Self { tag, descriptor, bytes }
    }

    pub fn tag(&self) -> FrameTag {
        self.tag
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..]
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Status the radio reported for this frame. A frame with an error code or a CRC or
    /// decryption error is failed from the start.
    pub fn rx_status(&self) -> DeliveryStatus {
        let descriptor = &self.descriptor;
        if descriptor.code() != RX_STATUS_OK || descriptor.crc_error() || descriptor.decrypt_error()
        {
            DeliveryStatus::Failed
        } else {
            DeliveryStatus::Ok
        }
    }
}

/// How a frame leaves the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    Ok,
    Failed,
}
