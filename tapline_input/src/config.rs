// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture thresholds, fixed for the lifetime of an input session.

/// Double-click thresholds.
///
/// A press continues the current click sequence only if it uses the same
/// button, arrives no later than `double_click_time` after the previous
/// press, and lands no farther than `double_click_distance` from it. Both
/// comparisons are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Maximum time between consecutive presses, in milliseconds.
    pub double_click_time: u64,
    /// Maximum Euclidean distance between consecutive presses, in logical pixels.
    pub double_click_distance: f64,
}

impl GestureConfig {
    /// 500 ms, matching common desktop defaults.
    pub const DEFAULT_DOUBLE_CLICK_TIME: u64 = 500;
    /// 4 logical pixels.
    pub const DEFAULT_DOUBLE_CLICK_DISTANCE: f64 = 4.0;

    /// Create a configuration with explicit thresholds.
    pub fn new(double_click_time: u64, double_click_distance: f64) -> Self {
        Self {
            double_click_time,
            double_click_distance,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_DOUBLE_CLICK_TIME,
            Self::DEFAULT_DOUBLE_CLICK_DISTANCE,
        )
    }
}
