// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    byteorder::{ByteOrder, LittleEndian, NativeEndian},
    zerocopy::{AsBytes, FromBytes, Unaligned},
};

/// A 16-bit field stored in little-endian byte order, as 802.11 header fields are on the air.
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct LittleEndianU16(pub [u8; 2]);

impl LittleEndianU16 {
    pub fn from_native(native: u16) -> Self {
        let mut buf = [0, 0];
        LittleEndian::write_u16(&mut buf, native);
        LittleEndianU16(buf)
    }

    pub fn to_native(&self) -> u16 {
        LittleEndian::read_u16(&self.0)
    }

    pub fn set_from_native(&mut self, value: u16) {
        LittleEndian::write_u16(&mut self.0, value);
    }
}

/// Rewrites a little-endian 16-bit field in place so that it holds the same value in host
/// byte order. A no-op on little-endian hosts.
pub fn to_host_order_in_place(field: &mut [u8; 2]) {
    let value = LittleEndian::read_u16(&field[..]);
    NativeEndian::write_u16(&mut field[..], value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_round_trip() {
        let mut field = LittleEndianU16::from_native(0x1234);
        assert_eq!(field.0, [0x34, 0x12]);
        assert_eq!(field.to_native(), 0x1234);
        field.set_from_native(0xabcd);
        assert_eq!(field.0, [0xcd, 0xab]);
    }

    #[test]
    fn host_order_conversion() {
        let mut field = [0x34, 0x12];
        to_host_order_in_place(&mut field);
        assert_eq!(NativeEndian::read_u16(&field[..]), 0x1234);
    }
}
