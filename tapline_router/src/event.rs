// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routed event payloads and pointer primitives.

use core::num::NonZeroU64;
use kurbo::Point;

use crate::types::{EventKind, Phase, RoutedEventDescriptor};

/// Logical pointer device identifier.
pub type PointerId = NonZeroU64;

/// The device id used when a platform reports a single mouse.
pub const PRIMARY_POINTER: PointerId = NonZeroU64::MIN;

/// Pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerButton {
    /// Usually the left mouse button.
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Wheel button.
    Middle,
    /// First extra button ("back").
    X1,
    /// Second extra button ("forward").
    X2,
}

impl PointerButton {
    /// The single-bit set for this button.
    pub fn flag(self) -> PointerButtons {
        match self {
            Self::Primary => PointerButtons::PRIMARY,
            Self::Secondary => PointerButtons::SECONDARY,
            Self::Middle => PointerButtons::MIDDLE,
            Self::X1 => PointerButtons::X1,
            Self::X2 => PointerButtons::X2,
        }
    }
}

bitflags::bitflags! {
    /// Set of currently pressed pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// [`PointerButton::Primary`]
        const PRIMARY   = 0b0000_0001;
        /// [`PointerButton::Secondary`]
        const SECONDARY = 0b0000_0010;
        /// [`PointerButton::Middle`]
        const MIDDLE    = 0b0000_0100;
        /// [`PointerButton::X1`]
        const X1        = 0b0000_1000;
        /// [`PointerButton::X2`]
        const X2        = 0b0001_0000;
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers active when a pointer signal was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT   = 0b0000_0001;
        /// Control key.
        const CONTROL = 0b0000_0010;
        /// Alt / Option key.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows key.
        const META    = 0b0000_1000;
    }
}

/// A single dispatch occurrence.
///
/// Created per dispatch and discarded once propagation completes. The
/// `handled` flag is monotonic: [`RoutedEvent::mark_handled`] sets it and
/// nothing clears it.
#[derive(Clone, Debug)]
pub struct RoutedEvent<K> {
    kind: EventKind,
    source: K,
    current: K,
    phase: Phase,
    /// Device that produced the underlying signal.
    pub device: PointerId,
    /// Button of the underlying press/release.
    pub button: PointerButton,
    /// Pointer position in root coordinates.
    pub position: Point,
    /// Keyboard modifiers at the time of the signal.
    pub modifiers: Modifiers,
    /// 1-based click count for `Pressed` and tap gestures; 0 where not meaningful.
    pub click_count: u32,
    /// Signal timestamp in milliseconds.
    pub timestamp: u64,
    handled: bool,
}

impl<K: Copy> RoutedEvent<K> {
    /// Create an unhandled event aimed at `source`.
    pub fn new(
        kind: EventKind,
        source: K,
        device: PointerId,
        button: PointerButton,
        position: Point,
    ) -> Self {
        Self {
            kind,
            source,
            current: source,
            phase: Phase::Tunnel,
            device,
            button,
            position,
            modifiers: Modifiers::empty(),
            click_count: 0,
            timestamp: 0,
            handled: false,
        }
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the click count.
    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Descriptor of the event kind.
    pub fn descriptor(&self) -> &'static RoutedEventDescriptor {
        self.kind.descriptor()
    }

    /// The node the event was originally aimed at.
    pub fn source(&self) -> K {
        self.source
    }

    /// The node whose handlers are currently running.
    pub fn current(&self) -> K {
        self.current
    }

    /// The phase currently being dispatched.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether any handler has claimed the event.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Claim the event. Later handlers registered without
    /// `handled_events_too` are skipped; traversal itself continues.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// Copy of this event re-aimed as a different kind, with a fresh
    /// `handled` flag. Used to synthesize gestures from pointer events.
    pub fn derive(&self, kind: EventKind, source: K) -> Self {
        Self {
            kind,
            source,
            current: source,
            phase: Phase::Tunnel,
            handled: false,
            ..self.clone()
        }
    }

    pub(crate) fn enter(&mut self, node: K, phase: Phase) {
        self.current = node;
        self.phase = phase;
    }
}
