// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {crate::block_ack::Tid, thiserror::Error, wlan_common::error::FrameParseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ParsingFrame(#[from] FrameParseError),
    #[error("TID {0} cannot carry a BlockAck session")]
    InvalidTid(u16),
    #[error("unexpected frame: type {frame_type}, subtype {subtype}")]
    UnexpectedFrame { frame_type: u16, subtype: u16 },
    #[error("unsupported action: category {category}, action {action}")]
    UnsupportedAction { category: u8, action: u8 },
    #[error("BlockAck session for TID {0} is already open")]
    SessionAlreadyOpen(Tid),
    #[error("no BlockAck session open for TID {0}")]
    SessionNotOpen(Tid),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let tid = Tid::new(3).expect("TID 3 is valid");
        assert_eq!(format!("{}", Error::InvalidTid(9)), "TID 9 cannot carry a BlockAck session");
        assert_eq!(
            format!("{}", Error::SessionAlreadyOpen(tid)),
            "BlockAck session for TID 3 is already open"
        );
        assert_eq!(
            format!("{}", Error::UnsupportedAction { category: 3, action: 1 }),
            "unsupported action: category 3, action 1"
        );
        assert_eq!(
            format!("{}", Error::from(FrameParseError::new("too short"))),
            "Error parsing frame: too short"
        );
    }
}
