// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct ReasonCode(pub u16);

/// IEEE Std 802.11-2016, 9.4.1.7
/// Only the codes a BlockAck agreement can be torn down with are listed.
impl ReasonCode {
    // 0 Reserved
    pub const UNSPECIFIED_REASON: Self = Self(1);
    pub const UNSPECIFIED_QOS_REASON: Self = Self(32);
    pub const NOT_ENOUGH_BANDWIDTH: Self = Self(33);
    pub const MISSING_ACKS: Self = Self(34);
    pub const EXCEEDED_TXOP: Self = Self(35);
    pub const STA_LEAVING: Self = Self(36);
    pub const END_TS_BA_DLS: Self = Self(37);
    pub const UNKNOWN_TS_BA: Self = Self(38);
    pub const TIMEOUT: Self = Self(39);
}
