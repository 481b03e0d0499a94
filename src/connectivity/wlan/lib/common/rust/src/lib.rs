// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Crate wlan-common hosts common libraries
//! to be used for WLAN SME, MLME, and binaries written in Rust.

pub mod buffer_reader;
pub mod error;
pub mod little_endian;
pub mod mac;
pub mod sequence;
pub mod timer;
