// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Receive-side reordering for 802.11 BlockAck sessions.
//!
//! Frames of a TID with an open BlockAck session can arrive out of order. `ReorderEngine` holds
//! them in a small per-TID window until their predecessors arrive, a BlockAckReq moves the window,
//! or a shared timeout gives up on the missing frames. Everything else passes straight through.
//! Every frame handed to the engine reaches its `FrameSink` exactly once. BlockAck frames carry
//! no data and are handed back with failure status once they were applied.

pub mod block_ack;
pub mod config;
pub mod dispatch;
mod engine;
pub mod error;
pub mod frame;
pub mod timeout;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use {
    block_ack::Tid,
    config::ReorderConfig,
    dispatch::FrameSink,
    engine::{ReorderCounters, ReorderEngine},
    error::Error,
    frame::{DeliveryStatus, FrameTag, RxDescriptor, RxFrame},
    timeout::ReorderTimeout,
};
