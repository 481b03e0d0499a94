// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

#[macro_export]
macro_rules! frame_len {
    () => { 0 };
    ($only:ty) => { std::mem::size_of::<$only>() };
    ($first:ty, $($tail:ty),*) => {
        std::mem::size_of::<$first>() + $crate::frame_len!($($tail),*)
    };
}

// Bitfield structs keep their storage private; these give callers a way in and out.
macro_rules! impl_raw_bits {
    ($name:ident, $raw:ty) => {
        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                $name(raw)
            }
        }

        impl $name {
            pub fn raw(&self) -> $raw {
                self.0
            }
        }
    };
}

mod ctrl;
mod data;
mod fields;
mod mgmt;

pub use {ctrl::*, data::*, fields::*, mgmt::*};

pub type MacAddr = [u8; 6];

// IEEE Std 802.11-2016, 9.2.4.1.3
// Frame types:
pub const FRAME_TYPE_MGMT: u16 = 0;
pub const FRAME_TYPE_CTRL: u16 = 1;
pub const FRAME_TYPE_DATA: u16 = 2;
// Management subtypes:
pub const MGMT_SUBTYPE_ACTION: u16 = 0x0D;
// Control subtypes:
pub const CTRL_SUBTYPE_BLOCK_ACK_REQ: u16 = 0x08;
// Data subtypes:
pub const DATA_SUBTYPE_QOS_DATA: u16 = 0x08;

// IEEE Std 802.11-2016, 9.2.4.1.3, Table 9-1
pub const BITMASK_QOS: u16 = 1 << 3;
