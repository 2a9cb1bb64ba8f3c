// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap gesture recognition.
//!
//! Each `(device, button)` pair is a two-state machine: idle, or waiting for
//! the release of a press. Click-count escalation lives in the per-device
//! [`ClickHistory`], not in extra states.
//!
//! ## Rules
//!
//! On press:
//! 1. The click count comes from [`ClickHistory::next`]. A press on a
//!    different target than the previous press starts a new sequence.
//! 2. The press is remembered until its release.
//! 3. A primary-button press with count ≥ 2 yields [`EventKind::DoubleTapped`]
//!    right away, aimed at the press target.
//!
//! On release of a remembered press:
//! - Only if the release resolved to the press target.
//! - Primary button, count 1 → [`EventKind::Tapped`].
//! - Primary button, count ≥ 2 → nothing more (the double tap already fired).
//! - Secondary button → [`EventKind::RightTapped`].
//! - Any other button → nothing.
//!
//! A release with no remembered press yields nothing.
//!
//! ```
//! # use core::num::NonZeroU64;
//! # use kurbo::Point;
//! use tapline_input::config::GestureConfig;
//! use tapline_input::gesture::GestureRecognizer;
//! use tapline_router::event::PointerButton;
//! use tapline_router::types::EventKind;
//!
//! let mouse = NonZeroU64::new(1).unwrap();
//! let mut recognizer: GestureRecognizer<u32> = GestureRecognizer::new(GestureConfig::default());
//!
//! let press = recognizer.on_press(mouse, PointerButton::Primary, 7, Point::ZERO, 0);
//! assert_eq!(press.click_count, 1);
//! assert!(press.gesture.is_none());
//! let tap = recognizer.on_release(mouse, PointerButton::Primary, Some(&7)).unwrap();
//! assert_eq!(tap.kind, EventKind::Tapped);
//!
//! let press = recognizer.on_press(mouse, PointerButton::Primary, 7, Point::ZERO, 100);
//! assert_eq!(press.click_count, 2);
//! assert_eq!(press.gesture.unwrap().kind, EventKind::DoubleTapped);
//! assert!(recognizer.on_release(mouse, PointerButton::Primary, Some(&7)).is_none());
//! ```

use alloc::collections::BTreeMap;
use core::fmt::Debug;
use kurbo::Point;
use tapline_router::event::{PointerButton, PointerId};
use tapline_router::types::EventKind;

use crate::click::ClickHistory;
use crate::config::GestureConfig;

/// A press waiting for its release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingPress<K> {
    /// Node the press was routed to.
    pub target: K,
    /// Click count assigned to the press.
    pub click_count: u32,
}

/// A synthesized gesture to dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gesture<K> {
    /// `Tapped`, `DoubleTapped` or `RightTapped`.
    pub kind: EventKind,
    /// Node to dispatch at (always the press target).
    pub target: K,
    /// Click count of the press that produced it.
    pub click_count: u32,
}

/// Result of [`GestureRecognizer::on_press`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PressOutcome<K> {
    /// Click count for the `Pressed` event.
    pub click_count: u32,
    /// Gesture to dispatch right after `Pressed`, if any.
    pub gesture: Option<Gesture<K>>,
}

/// Most recent press of a device and where it was routed.
#[derive(Clone, Debug)]
struct LastPress<K> {
    click: ClickHistory,
    target: K,
}

/// Tap, double-tap and right-tap recognizer for all devices of one session.
#[derive(Clone, Debug)]
pub struct GestureRecognizer<K> {
    config: GestureConfig,
    history: BTreeMap<PointerId, LastPress<K>>,
    pending: BTreeMap<(PointerId, PointerButton), PendingPress<K>>,
}

impl<K: Clone + PartialEq + Debug> GestureRecognizer<K> {
    /// Create a recognizer with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            history: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Record a press routed to `target`.
    pub fn on_press(
        &mut self,
        device: PointerId,
        button: PointerButton,
        target: K,
        position: Point,
        timestamp: u64,
    ) -> PressOutcome<K> {
        let previous = self
            .history
            .get(&device)
            .filter(|last| last.target == target)
            .map(|last| &last.click);
        let click = ClickHistory::next(previous, button, position, timestamp, &self.config);
        self.history.insert(
            device,
            LastPress {
                click,
                target: target.clone(),
            },
        );
        let click_count = click.count;

        let gesture = (button == PointerButton::Primary && click_count >= 2).then(|| Gesture {
            kind: EventKind::DoubleTapped,
            target: target.clone(),
            click_count,
        });
        self.pending.insert(
            (device, button),
            PendingPress {
                target,
                click_count,
            },
        );
        PressOutcome {
            click_count,
            gesture,
        }
    }

    /// Record a release that resolved to `target` (or to nothing).
    ///
    /// Returns the gesture to dispatch after `Released`, if any.
    pub fn on_release(
        &mut self,
        device: PointerId,
        button: PointerButton,
        target: Option<&K>,
    ) -> Option<Gesture<K>> {
        let Some(press) = self.pending.remove(&(device, button)) else {
            tracing::debug!(?device, ?button, "release without tracked press");
            return None;
        };
        if target != Some(&press.target) {
            tracing::debug!(
                ?device,
                ?button,
                pressed = ?press.target,
                released = ?target,
                "release on a different target"
            );
            return None;
        }
        let kind = match button {
            PointerButton::Primary if press.click_count == 1 => EventKind::Tapped,
            PointerButton::Secondary => EventKind::RightTapped,
            _ => return None,
        };
        Some(Gesture {
            kind,
            target: press.target,
            click_count: press.click_count,
        })
    }

    /// The press currently waiting for release on `(device, button)`.
    pub fn pending(&self, device: PointerId, button: PointerButton) -> Option<&PendingPress<K>> {
        self.pending.get(&(device, button))
    }

    /// Last press history of a device.
    pub fn history(&self, device: PointerId) -> Option<&ClickHistory> {
        self.history.get(&device).map(|last| &last.click)
    }

    /// Drop every pending press of `device`, for example after focus was
    /// taken away. Click history is kept.
    pub fn cancel(&mut self, device: PointerId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(d, _), _| *d != device);
        before - self.pending.len()
    }

    /// Forget all pending presses and click history.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroU64;

    fn mouse() -> PointerId {
        NonZeroU64::new(1).unwrap()
    }

    fn recognizer() -> GestureRecognizer<u32> {
        GestureRecognizer::new(GestureConfig::new(500, 4.0))
    }

    #[test]
    fn primary_click_taps() {
        let mut r = recognizer();
        let p = r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, 0);
        assert_eq!(p, PressOutcome { click_count: 1, gesture: None });
        assert_eq!(r.pending(mouse(), PointerButton::Primary).unwrap().target, 1);
        let g = r.on_release(mouse(), PointerButton::Primary, Some(&1));
        assert_eq!(
            g,
            Some(Gesture {
                kind: EventKind::Tapped,
                target: 1,
                click_count: 1
            })
        );
        assert!(r.pending(mouse(), PointerButton::Primary).is_none());
    }

    #[test]
    fn triple_click_keeps_double_tapping() {
        let mut r = recognizer();
        for (i, t) in [0_u64, 100, 200].into_iter().enumerate() {
            let p = r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, t);
            assert_eq!(p.click_count as usize, i + 1);
            assert_eq!(p.gesture.is_some(), i >= 1);
            let g = r.on_release(mouse(), PointerButton::Primary, Some(&1));
            assert_eq!(g.is_some(), i == 0);
        }
    }

    #[test]
    fn secondary_right_taps_and_never_double_taps() {
        let mut r = recognizer();
        for t in [0_u64, 100] {
            let p = r.on_press(mouse(), PointerButton::Secondary, 1, Point::ZERO, t);
            assert!(p.gesture.is_none());
            let g = r.on_release(mouse(), PointerButton::Secondary, Some(&1)).unwrap();
            assert_eq!(g.kind, EventKind::RightTapped);
        }
    }

    #[test]
    fn middle_and_extra_buttons_produce_nothing() {
        let mut r = recognizer();
        for button in [PointerButton::Middle, PointerButton::X1, PointerButton::X2] {
            for t in [0_u64, 100, 200] {
                let p = r.on_press(mouse(), button, 1, Point::ZERO, t);
                assert!(p.gesture.is_none());
                assert!(r.on_release(mouse(), button, Some(&1)).is_none());
            }
        }
    }

    #[test]
    fn unmatched_or_retargeted_release_is_ignored() {
        let mut r = recognizer();
        assert!(r.on_release(mouse(), PointerButton::Primary, Some(&1)).is_none());

        r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, 0);
        assert!(r.on_release(mouse(), PointerButton::Secondary, Some(&1)).is_none());
        assert!(r.on_release(mouse(), PointerButton::Primary, Some(&2)).is_none());
        // The mismatched release consumed the press.
        assert!(r.on_release(mouse(), PointerButton::Primary, Some(&1)).is_none());

        r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, 1000);
        assert!(r.on_release(mouse(), PointerButton::Primary, None).is_none());
    }

    #[test]
    fn press_on_another_target_restarts_sequence() {
        let mut r = recognizer();
        r.on_press(mouse(), PointerButton::Primary, 1, Point::new(9.0, 5.0), 0);
        assert!(r.on_release(mouse(), PointerButton::Primary, Some(&1)).is_some());

        let p = r.on_press(mouse(), PointerButton::Primary, 2, Point::new(11.0, 5.0), 100);
        assert_eq!(p, PressOutcome { click_count: 1, gesture: None });
        let g = r.on_release(mouse(), PointerButton::Primary, Some(&2)).unwrap();
        assert_eq!(g.kind, EventKind::Tapped);
        assert_eq!(g.target, 2);

        let p = r.on_press(mouse(), PointerButton::Primary, 2, Point::new(11.0, 5.0), 200);
        assert_eq!(p.click_count, 2);
        assert_eq!(p.gesture.unwrap().target, 2);
    }

    #[test]
    fn devices_are_independent() {
        let mut r = recognizer();
        let pen = NonZeroU64::new(2).unwrap();
        r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, 0);
        r.on_release(mouse(), PointerButton::Primary, Some(&1));
        let p = r.on_press(pen, PointerButton::Primary, 1, Point::ZERO, 50);
        assert_eq!(p.click_count, 1);
        assert_eq!(r.history(mouse()).unwrap().count, 1);
    }

    #[test]
    fn cancel_and_reset() {
        let mut r = recognizer();
        r.on_press(mouse(), PointerButton::Primary, 1, Point::ZERO, 0);
        r.on_press(mouse(), PointerButton::Secondary, 1, Point::ZERO, 10);
        assert_eq!(r.cancel(mouse()), 2);
        assert!(r.on_release(mouse(), PointerButton::Primary, Some(&1)).is_none());
        assert!(r.history(mouse()).is_some());

        r.reset();
        assert!(r.history(mouse()).is_none());
        let p = r.on_press(mouse(), PointerButton::Secondary, 1, Point::ZERO, 20);
        assert_eq!(p.click_count, 1);
    }
}
