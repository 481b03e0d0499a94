// Copyright 2020 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{error::Error, window::MAX_WINDOW_SIZE},
    serde::Deserialize,
    std::time::Duration,
};

pub const DEFAULT_REORDER_TIMEOUT_MS: u64 = 50;

/// Tunables of a `ReorderEngine`. Missing fields take their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReorderConfig {
    /// How long buffered frames may wait for a missing predecessor before they are released.
    pub timeout_ms: u64,
    /// Upper bound on the negotiated window size. Values outside 1..=8 are clamped.
    pub max_window_size: u16,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self { timeout_ms: DEFAULT_REORDER_TIMEOUT_MS, max_window_size: MAX_WINDOW_SIZE }
    }
}

impl ReorderConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_window_size(&self) -> u16 {
        self.max_window_size.clamp(1, MAX_WINDOW_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, test_case::test_case};

    #[test]
    fn defaults() {
        let config = ReorderConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(50));
        assert_eq!(config.max_window_size(), 8);
    }

    #[test]
    fn from_json_partial() {
        let config = ReorderConfig::from_json(r#"{ "timeout_ms": 20 }"#).expect("valid config");
        assert_eq!(config, ReorderConfig { timeout_ms: 20, max_window_size: 8 });
        let config = ReorderConfig::from_json("{}").expect("valid config");
        assert_eq!(config, ReorderConfig::default());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert_matches!(ReorderConfig::from_json("{ timeout_ms: }"), Err(Error::Config(_)));
        assert_matches!(
            ReorderConfig::from_json(r#"{ "timeout": 20 }"#),
            Err(Error::Config(_))
        );
        assert_matches!(
            ReorderConfig::from_json(r#"{ "timeout_ms": -1 }"#),
            Err(Error::Config(_))
        );
    }

    #[test_case(0 => 1; "zero")]
    #[test_case(4 => 4; "in range")]
    #[test_case(64 => 8; "too large")]
    fn clamped_window_size(max_window_size: u16) -> u16 {
        ReorderConfig { max_window_size, ..Default::default() }.max_window_size()
    }
}
