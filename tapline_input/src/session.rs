// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input session: raw pointer signals in, routed events out.
//!
//! One [`InputSession`] belongs to one top-level root (a window). It owns the
//! handler registry (through its [`Router`]), the per-device
//! [`PointerTracker`] and the [`GestureRecognizer`], so all click state is
//! scoped to the session and dies with it.
//!
//! ## Pipeline
//!
//! For every [`RawPointerEvent`], in arrival order:
//!
//! 1. Resolve the target: the device's captured node if it is still live,
//!    otherwise the hit-test result under the session root.
//! 2. Update the device state.
//! 3. `Down`: assign a click count, capture the device to the target, dispatch
//!    `Pressed`, then `DoubleTapped` when the press completes a double click.
//! 4. `Up`: release capture once no button is held, dispatch `Released`,
//!    then `Tapped` or `RightTapped` if the press/release pair qualifies.
//! 5. `Move`: state update only.
//!
//! After a `Down` or `Up`, registrations on nodes that are no longer live
//! (removed by a handler or by the application) are dropped.
//!
//! Gestures are dispatched as fresh events, so a handler that marked
//! `Pressed` or `Released` handled does not suppress them.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use tapline_router::error::{DispatchError, HandlerError};
use tapline_router::event::{PointerButton, PointerId, RoutedEvent};
use tapline_router::registry::HandlerId;
use tapline_router::router::Router;
use tapline_router::types::{EventKind, ParentLookup, Phase};

use crate::config::GestureConfig;
use crate::gesture::GestureRecognizer;
use crate::hit::HitTest;
use crate::pointer::{PointerTracker, RawPointerEvent, RawPointerKind};

/// Input state and handler registry for one top-level root.
pub struct InputSession<K, T> {
    root: K,
    router: Router<K, T>,
    tracker: PointerTracker<K>,
    recognizer: GestureRecognizer<K>,
}

impl<K: Debug, T> Debug for InputSession<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InputSession")
            .field("root", &self.root)
            .field("router", &self.router)
            .field("tracker", &self.tracker)
            .field("recognizer", &self.recognizer)
            .finish()
    }
}

impl<K, T> InputSession<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: ParentLookup<K> + HitTest<K>,
{
    /// Create a session for `root` with fixed thresholds.
    pub fn new(root: K, config: GestureConfig) -> Self {
        Self {
            root,
            router: Router::new(),
            tracker: PointerTracker::new(),
            recognizer: GestureRecognizer::new(config),
        }
    }

    /// The root this session hit-tests under.
    pub fn root(&self) -> K {
        self.root
    }

    /// Thresholds in use.
    pub fn config(&self) -> &GestureConfig {
        self.recognizer.config()
    }

    /// The router and its registry.
    pub fn router(&self) -> &Router<K, T> {
        &self.router
    }

    /// Mutable router, for direct dispatches or registry maintenance.
    pub fn router_mut(&mut self) -> &mut Router<K, T> {
        &mut self.router
    }

    /// Per-device pointer state.
    pub fn tracker(&self) -> &PointerTracker<K> {
        &self.tracker
    }

    /// Click and gesture state.
    pub fn recognizer(&self) -> &GestureRecognizer<K> {
        &self.recognizer
    }

    /// Subscribe `callback` to `kind` on `node`.
    pub fn add_handler<F>(
        &mut self,
        node: K,
        kind: EventKind,
        phase: Phase,
        handled_events_too: bool,
        callback: F,
    ) -> HandlerId
    where
        F: FnMut(&mut T, &mut RoutedEvent<K>) -> Result<(), HandlerError> + 'static,
    {
        self.router
            .add_handler(node, kind, phase, handled_events_too, callback)
    }

    /// Unsubscribe a handler.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.router.remove_handler(id)
    }

    /// Route every signal of `device` to `target` (or stop doing so with `None`).
    ///
    /// Capture, explicit or implicit, ends when the device's last button is released.
    pub fn capture(&mut self, device: PointerId, target: Option<K>) {
        self.tracker.device_mut(device).captured = target;
    }

    /// Node currently capturing `device`.
    pub fn captured(&self, device: PointerId) -> Option<K> {
        self.tracker.device(device).and_then(|d| d.captured)
    }

    /// Forget held buttons, capture, pending presses and click history,
    /// for example when the window loses focus.
    pub fn reset(&mut self) {
        self.tracker.release_all();
        self.recognizer.reset();
    }

    /// Drop registrations on nodes that are no longer live in `tree`.
    ///
    /// [`InputSession::handle_raw`] does this after every press and release;
    /// call it directly after removing nodes outside of dispatch.
    pub fn prune(&mut self, tree: &T) -> usize {
        self.router.prune(tree)
    }

    /// Node that a raw signal would be routed to.
    pub fn resolve_target(&self, tree: &T, raw: &RawPointerEvent) -> Option<K> {
        self.captured(raw.device)
            .filter(|c| tree.is_live(c))
            .or_else(|| tree.resolve_target(&self.root, raw.position))
    }

    /// Process one raw signal and return the node it resolved to.
    ///
    /// All dispatches caused by the signal run to completion; handler faults
    /// from any of them are reported together afterwards.
    pub fn handle_raw(
        &mut self,
        tree: &mut T,
        raw: &RawPointerEvent,
    ) -> Result<Option<K>, DispatchError<K>> {
        let target = self.resolve_target(tree, raw);
        let mut faults = Vec::new();

        match raw.kind {
            RawPointerKind::Move => {
                self.tracker.on_raw(raw);
            }
            RawPointerKind::Down(button) => {
                let state = self.tracker.on_raw(raw);
                let Some(target) = target else {
                    tracing::debug!(device = ?raw.device, ?button, "press over empty space");
                    return Ok(None);
                };
                if !state.captured.is_some_and(|c| tree.is_live(&c)) {
                    state.captured = Some(target);
                }

                let press = self.recognizer.on_press(
                    raw.device,
                    button,
                    target,
                    raw.position,
                    raw.timestamp,
                );
                let mut pressed = pointer_event(EventKind::Pressed, target, button, raw)
                    .with_click_count(press.click_count);
                self.router
                    .dispatch_with_sink(tree, &mut pressed, &mut faults);

                if let Some(gesture) = press.gesture {
                    let mut ev = pressed.derive(gesture.kind, gesture.target);
                    self.router.dispatch_with_sink(tree, &mut ev, &mut faults);
                }
                self.router.prune(tree);
            }
            RawPointerKind::Up(button) => {
                let state = self.tracker.on_raw(raw);
                if state.pressed.is_empty() {
                    state.captured = None;
                }

                let click_count = self
                    .recognizer
                    .pending(raw.device, button)
                    .map_or(0, |p| p.click_count);
                if let Some(target) = target {
                    let mut released = pointer_event(EventKind::Released, target, button, raw)
                        .with_click_count(click_count);
                    self.router
                        .dispatch_with_sink(tree, &mut released, &mut faults);
                }

                if let Some(gesture) = self
                    .recognizer
                    .on_release(raw.device, button, target.as_ref())
                {
                    let mut ev = pointer_event(gesture.kind, gesture.target, button, raw)
                        .with_click_count(gesture.click_count);
                    self.router.dispatch_with_sink(tree, &mut ev, &mut faults);
                }
                self.router.prune(tree);
            }
        }

        DispatchError::check(faults).map(|()| target)
    }
}

fn pointer_event<K: Copy>(
    kind: EventKind,
    target: K,
    button: PointerButton,
    raw: &RawPointerEvent,
) -> RoutedEvent<K> {
    RoutedEvent::new(kind, target, raw.device, button, raw.position)
        .with_modifiers(raw.modifiers)
        .with_timestamp(raw.timestamp)
}
