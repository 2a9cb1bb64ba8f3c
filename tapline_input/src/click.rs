// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click counting.
//!
//! A [`ClickHistory`] remembers the most recent press of a device. The next
//! press either continues the sequence (count + 1) or starts a new one
//! (count 1):
//!
//! ```
//! use kurbo::Point;
//! use tapline_input::click::ClickHistory;
//! use tapline_input::config::GestureConfig;
//! use tapline_router::event::PointerButton;
//!
//! let config = GestureConfig::new(500, 4.0);
//! let first = ClickHistory::next(None, PointerButton::Primary, Point::new(10.0, 10.0), 1000, &config);
//! assert_eq!(first.count, 1);
//!
//! // Close in space and time: double click.
//! let second = ClickHistory::next(Some(&first), PointerButton::Primary, Point::new(11.0, 10.0), 1200, &config);
//! assert_eq!(second.count, 2);
//!
//! // Too late: a fresh sequence.
//! let third = ClickHistory::next(Some(&second), PointerButton::Primary, Point::new(11.0, 10.0), 1701, &config);
//! assert_eq!(third.count, 1);
//! ```

use kurbo::Point;
use tapline_router::event::PointerButton;

use crate::config::GestureConfig;

/// The most recent qualifying press of a device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickHistory {
    /// Button of that press.
    pub button: PointerButton,
    /// Where it happened.
    pub position: Point,
    /// When it happened, in milliseconds.
    pub timestamp: u64,
    /// 1-based count of consecutive qualifying presses, including this one.
    pub count: u32,
}

impl ClickHistory {
    /// Whether a press with these parameters continues this sequence.
    ///
    /// Timestamps that go backwards never continue a sequence.
    pub fn continues(
        &self,
        button: PointerButton,
        position: Point,
        timestamp: u64,
        config: &GestureConfig,
    ) -> bool {
        self.button == button
            && timestamp >= self.timestamp
            && timestamp - self.timestamp <= config.double_click_time
            && self.position.distance(position) <= config.double_click_distance
    }

    /// History after a press, given the history before it.
    ///
    /// The count is not capped; a third close press yields 3, and so on.
    pub fn next(
        previous: Option<&Self>,
        button: PointerButton,
        position: Point,
        timestamp: u64,
        config: &GestureConfig,
    ) -> Self {
        let count = match previous {
            Some(h) if h.continues(button, position, timestamp, config) => h.count.saturating_add(1),
            _ => 1,
        };
        Self {
            button,
            position,
            timestamp,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONFIG: GestureConfig = GestureConfig {
        double_click_time: 500,
        double_click_distance: 4.0,
    };

    fn press(prev: Option<&ClickHistory>, button: PointerButton, x: f64, t: u64) -> ClickHistory {
        ClickHistory::next(prev, button, Point::new(x, 0.0), t, &CONFIG)
    }

    #[test]
    fn escalates_without_cap() {
        let mut h = press(None, PointerButton::Primary, 0.0, 0);
        for expected in 2..=5 {
            h = press(Some(&h), PointerButton::Primary, 0.0, h.timestamp + 100);
            assert_eq!(h.count, expected);
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let h = press(None, PointerButton::Primary, 0.0, 1000);
        assert_eq!(press(Some(&h), PointerButton::Primary, 4.0, 1500).count, 2);
        assert_eq!(press(Some(&h), PointerButton::Primary, 4.01, 1500).count, 1);
        assert_eq!(press(Some(&h), PointerButton::Primary, 0.0, 1501).count, 1);
    }

    #[test]
    fn button_change_resets() {
        let h = press(None, PointerButton::Primary, 0.0, 0);
        let h = press(Some(&h), PointerButton::Secondary, 0.0, 10);
        assert_eq!(h.count, 1);
        assert_eq!(h.button, PointerButton::Secondary);
        assert_eq!(press(Some(&h), PointerButton::Secondary, 0.0, 20).count, 2);
    }

    #[test]
    fn clock_going_backwards_resets() {
        let h = press(None, PointerButton::Primary, 0.0, 1000);
        assert_eq!(press(Some(&h), PointerButton::Primary, 0.0, 999).count, 1);
    }

    fn any_button() -> impl Strategy<Value = PointerButton> {
        prop_oneof![
            Just(PointerButton::Primary),
            Just(PointerButton::Secondary),
            Just(PointerButton::Middle),
            Just(PointerButton::X1),
            Just(PointerButton::X2),
        ]
    }

    proptest! {
        #[test]
        fn outside_either_threshold_resets_to_one(
            button in any_button(),
            prior in 1_u32..10,
            dt in 0_u64..2000,
            dx in 0.0_f64..20.0,
        ) {
            let h = ClickHistory { button, position: Point::ZERO, timestamp: 10_000, count: prior };
            let next = ClickHistory::next(Some(&h), button, Point::new(dx, 0.0), 10_000 + dt, &CONFIG);
            if dt > CONFIG.double_click_time || dx > CONFIG.double_click_distance {
                prop_assert_eq!(next.count, 1);
            } else {
                prop_assert_eq!(next.count, prior + 1);
            }
        }
    }
}
