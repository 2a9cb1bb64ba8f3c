// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw pointer signals and per-device state.
//!
//! One [`PointerDeviceState`] exists per logical device. It is created the
//! first time the device reports anything and lives as long as the tracker.

use alloc::collections::BTreeMap;
use kurbo::Point;
use tapline_router::event::{Modifiers, PointerButton, PointerButtons, PointerId};

/// Kind of raw pointer signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawPointerKind {
    /// A button went down.
    Down(PointerButton),
    /// A button went up.
    Up(PointerButton),
    /// The pointer moved.
    Move,
}

/// A raw pointer signal as delivered by the platform, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPointerEvent {
    /// Logical device that produced the signal.
    pub device: PointerId,
    /// What happened.
    pub kind: RawPointerKind,
    /// Position in root coordinates.
    pub position: Point,
    /// Keyboard modifiers held at the time.
    pub modifiers: Modifiers,
    /// Milliseconds on the caller's clock.
    pub timestamp: u64,
}

impl RawPointerEvent {
    /// A button press.
    pub fn down(device: PointerId, button: PointerButton, position: Point, timestamp: u64) -> Self {
        Self::new(device, RawPointerKind::Down(button), position, timestamp)
    }

    /// A button release.
    pub fn up(device: PointerId, button: PointerButton, position: Point, timestamp: u64) -> Self {
        Self::new(device, RawPointerKind::Up(button), position, timestamp)
    }

    /// A move.
    pub fn moved(device: PointerId, position: Point, timestamp: u64) -> Self {
        Self::new(device, RawPointerKind::Move, position, timestamp)
    }

    fn new(device: PointerId, kind: RawPointerKind, position: Point, timestamp: u64) -> Self {
        Self {
            device,
            kind,
            position,
            modifiers: Modifiers::empty(),
            timestamp,
        }
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Current state of one logical pointer device.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerDeviceState<K> {
    /// Buttons currently held.
    pub pressed: PointerButtons,
    /// Last known position.
    pub position: Point,
    /// Modifiers reported with the last signal.
    pub modifiers: Modifiers,
    /// Node that receives this device's signals regardless of hit testing.
    pub captured: Option<K>,
}

impl<K> Default for PointerDeviceState<K> {
    fn default() -> Self {
        Self {
            pressed: PointerButtons::empty(),
            position: Point::ZERO,
            modifiers: Modifiers::empty(),
            captured: None,
        }
    }
}

/// Tracks [`PointerDeviceState`] per device.
#[derive(Clone, Debug)]
pub struct PointerTracker<K> {
    devices: BTreeMap<PointerId, PointerDeviceState<K>>,
}

impl<K> Default for PointerTracker<K> {
    fn default() -> Self {
        Self {
            devices: BTreeMap::new(),
        }
    }
}

impl<K> PointerTracker<K> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw signal and return the updated device state.
    ///
    /// - `Down` adds the button to the pressed set.
    /// - `Up` removes it.
    /// - Every signal records position and modifiers.
    pub fn on_raw(&mut self, raw: &RawPointerEvent) -> &mut PointerDeviceState<K> {
        let state = self.devices.entry(raw.device).or_default();
        state.position = raw.position;
        state.modifiers = raw.modifiers;
        match raw.kind {
            RawPointerKind::Down(button) => state.pressed.insert(button.flag()),
            RawPointerKind::Up(button) => state.pressed.remove(button.flag()),
            RawPointerKind::Move => {}
        }
        state
    }

    /// State of a device, if it has reported anything yet.
    pub fn device(&self, device: PointerId) -> Option<&PointerDeviceState<K>> {
        self.devices.get(&device)
    }

    /// Mutable state of a device, creating it on first use.
    pub fn device_mut(&mut self, device: PointerId) -> &mut PointerDeviceState<K> {
        self.devices.entry(device).or_default()
    }

    /// Iterate over all known devices.
    pub fn devices(&self) -> impl Iterator<Item = (PointerId, &PointerDeviceState<K>)> {
        self.devices.iter().map(|(id, s)| (*id, s))
    }

    /// Forget pressed buttons and capture on every device, keeping positions.
    pub fn release_all(&mut self) {
        for state in self.devices.values_mut() {
            state.pressed = PointerButtons::empty();
            state.captured = None;
        }
    }
}
