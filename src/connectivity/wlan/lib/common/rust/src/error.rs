// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Error parsing frame: {0}")]
pub struct FrameParseError(pub String);

impl FrameParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        FrameParseError(msg.into())
    }
}

pub type FrameParseResult<T> = Result<T, FrameParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let e = FrameParseError::new("frame too short");
        assert_eq!(format!("{}", e), "Error parsing frame: frame too short");
    }
}
