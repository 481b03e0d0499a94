// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::frame::{DeliveryStatus, RxFrame, RX_STATUS_REORDER_FAILURE},
    log::trace,
    wlan_common::{
        little_endian::{to_host_order_in_place, LittleEndianU16},
        mac::{self, CtrlHdr, DataHdr, FrameControl},
    },
    zerocopy::LayoutVerified,
};

/// Upper layer receiving the frames released by a `ReorderEngine`.
///
/// The sink takes ownership of every frame. It is called from within the engine's entry points
/// and cannot call back into the engine.
pub trait FrameSink {
    fn deliver_frame(&mut self, frame: RxFrame);
}

impl<F: FnMut(RxFrame)> FrameSink for F {
    fn deliver_frame(&mut self, frame: RxFrame) {
        self(frame)
    }
}

/// Hands `frame` to `sink`, marking it according to `status`.
///
/// Successfully delivered frames have their header converted to host byte order. Failed frames
/// keep their wire bytes and carry `RX_STATUS_REORDER_FAILURE` in their descriptor.
pub fn dispatch<S: FrameSink + ?Sized>(sink: &mut S, mut frame: RxFrame, status: DeliveryStatus) {
    match status {
        DeliveryStatus::Ok => {
            if !header_to_host_order(frame.bytes_mut()) {
                trace!("frame too short for header conversion: {} bytes", frame.bytes().len());
            }
        }
        DeliveryStatus::Failed => frame.descriptor.set_code(RX_STATUS_REORDER_FAILURE),
    }
    sink.deliver_frame(frame);
}

/// Rewrites frame control, duration and, for frames that carry one, sequence control in host
/// byte order. Returns false and leaves `bytes` untouched if the header is truncated.
fn header_to_host_order(bytes: &mut [u8]) -> bool {
    let frame_ctrl = match LayoutVerified::<_, LittleEndianU16>::new_unaligned_from_prefix(&*bytes)
    {
        Some((fc, _)) => FrameControl::from(fc.to_native()),
        None => return false,
    };
    match frame_ctrl.frame_type() {
        // Control frames have no sequence control field.
        mac::FRAME_TYPE_CTRL => {
            match LayoutVerified::<_, CtrlHdr>::new_unaligned_from_prefix(bytes) {
                Some((mut hdr, _)) => {
                    to_host_order_in_place(&mut hdr.frame_ctrl.0);
                    to_host_order_in_place(&mut hdr.duration_or_id.0);
                    true
                }
                None => false,
            }
        }
        // Management and data headers share this layout.
        _ => match LayoutVerified::<_, DataHdr>::new_unaligned_from_prefix(bytes) {
            Some((mut hdr, _)) => {
                to_host_order_in_place(&mut hdr.frame_ctrl.0);
                to_host_order_in_place(&mut hdr.duration.0);
                to_host_order_in_place(&mut hdr.seq_ctrl.0);
                true
            }
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            frame::{FrameTag, RxDescriptor, RX_STATUS_OK},
            test_utils::{bar_frame, qos_data_frame, FakeSink},
        },
        byteorder::{ByteOrder, LittleEndian, NativeEndian},
    };

    #[test]
    fn ok_converts_data_header_to_host_order() {
        let mut sink = FakeSink::new();
        let frame = qos_data_frame(2, 1234);
        let original = frame.bytes().to_vec();
        dispatch(&mut sink, frame, DeliveryStatus::Ok);

        let delivered = sink.take();
        assert_eq!(delivered.len(), 1);
        let bytes = delivered[0].bytes();
        for offset in [0, 2, 22] {
            let wire = LittleEndian::read_u16(&original[offset..offset + 2]);
            assert_eq!(NativeEndian::read_u16(&bytes[offset..offset + 2]), wire);
        }
        // Addresses, QoS control and body are not converted.
        assert_eq!(bytes[4..22], original[4..22]);
        assert_eq!(bytes[24..], original[24..]);
        assert_eq!(delivered[0].descriptor.code(), RX_STATUS_OK);
    }

    #[test]
    fn ok_converts_control_header_without_sequence_control() {
        let mut sink = FakeSink::new();
        let frame = bar_frame(0, 100);
        let original = frame.bytes().to_vec();
        dispatch(&mut sink, frame, DeliveryStatus::Ok);

        let delivered = sink.take();
        let bytes = delivered[0].bytes();
        assert_eq!(
            NativeEndian::read_u16(&bytes[2..4]),
            LittleEndian::read_u16(&original[2..4])
        );
        assert_eq!(bytes[4..], original[4..]);
    }

    #[test]
    fn ok_forwards_truncated_frame_unchanged() {
        let mut sink = FakeSink::new();
        let frame = RxFrame::new(FrameTag::Other, RxDescriptor::default(), vec![0x88, 0x02, 0x2c]);
        dispatch(&mut sink, frame, DeliveryStatus::Ok);
        assert_eq!(sink.take()[0].bytes(), &[0x88, 0x02, 0x2c][..]);
    }

    #[test]
    fn failed_sets_status_code_only() {
        let mut sink = FakeSink::new();
        let mut frame = qos_data_frame(2, 7);
        frame.descriptor.set_ampdu(true);
        frame.descriptor.set_rssi(0xb0);
        let original = frame.bytes().to_vec();
        dispatch(&mut sink, frame, DeliveryStatus::Failed);

        let delivered = sink.take();
        assert_eq!(delivered.len(), 1);
        let descriptor = delivered[0].descriptor;
        assert_eq!(descriptor.code(), RX_STATUS_REORDER_FAILURE);
        assert!(descriptor.ampdu());
        assert_eq!(descriptor.rssi(), 0xb0);
        assert_eq!(delivered[0].bytes(), &original[..]);
    }

    #[test]
    fn closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_frame: RxFrame| count += 1;
            dispatch(&mut sink, qos_data_frame(0, 1), DeliveryStatus::Ok);
            dispatch(&mut sink, qos_data_frame(0, 2), DeliveryStatus::Failed);
        }
        assert_eq!(count, 2);
    }
}
