// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry keyed by `(node, event kind, phase)`.
//!
//! Callbacks registered for the same key fire in registration order. Each
//! registration carries its own `handled_events_too` flag; the router skips a
//! registration without it once the event has been marked handled.

use alloc::boxed::Box;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::HandlerError;
use crate::event::RoutedEvent;
use crate::types::{EventKind, Phase};

/// Opaque handle to a registration, used for removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Boxed handler callback.
///
/// Handlers receive the tree mutably so they may restructure it while an
/// event is in flight; the router revalidates the route as it goes.
pub type HandlerFn<K, T> = Box<dyn FnMut(&mut T, &mut RoutedEvent<K>) -> Result<(), HandlerError>>;

pub(crate) struct Registration<K, T> {
    pub(crate) id: HandlerId,
    pub(crate) handled_events_too: bool,
    pub(crate) callback: HandlerFn<K, T>,
}

type Slot<K, T> = SmallVec<[Registration<K, T>; 2]>;

/// Ordered handler lists per `(node, kind, phase)`.
pub struct HandlerRegistry<K, T> {
    slots: HashMap<(K, EventKind, Phase), Slot<K, T>>,
    owners: HashMap<HandlerId, (K, EventKind, Phase)>,
    next_id: u64,
}

impl<K: Debug, T> Debug for HandlerRegistry<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.slots.len())
            .field("handlers", &self.owners.len())
            .finish_non_exhaustive()
    }
}

impl<K, T> Default for HandlerRegistry<K, T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            owners: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<K: Copy + Eq + Hash, T> HandlerRegistry<K, T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `node` for `kind` in `phase`.
    ///
    /// With `handled_events_too`, the callback also runs for events that an
    /// earlier handler already marked handled.
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
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        let key = (node, kind, phase);
        self.slots.entry(key).or_default().push(Registration {
            id,
            handled_events_too,
            callback: Box::new(callback),
        });
        self.owners.insert(id, key);
        id
    }

    /// Register a bubble-phase handler that is skipped once the event is handled.
    pub fn add_bubble_handler<F>(&mut self, node: K, kind: EventKind, callback: F) -> HandlerId
    where
        F: FnMut(&mut T, &mut RoutedEvent<K>) -> Result<(), HandlerError> + 'static,
    {
        self.add_handler(node, kind, Phase::Bubble, false, callback)
    }

    /// Remove one registration. Returns `false` if it was already gone.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let Some(key) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.retain(|r| r.id != id);
            if slot.is_empty() {
                self.slots.remove(&key);
            }
        }
        true
    }

    /// Drop every registration on `node`, for example when the node is destroyed.
    ///
    /// Returns the number of registrations removed.
    pub fn remove_node(&mut self, node: K) -> usize {
        self.retain_nodes(|n| *n != node)
    }

    /// Keep only registrations whose node satisfies `keep`.
    ///
    /// Returns the number of registrations removed.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(&K) -> bool) -> usize {
        let before = self.owners.len();
        self.slots.retain(|key, _| keep(&key.0));
        let slots = &self.slots;
        self.owners.retain(|_, key| slots.contains_key(&*key));
        before - self.owners.len()
    }

    /// Number of registrations for a key.
    pub fn handler_count(&self, node: K, kind: EventKind, phase: Phase) -> usize {
        self.slots.get(&(node, kind, phase)).map_or(0, |s| s.len())
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub(crate) fn slot_mut(
        &mut self,
        node: K,
        kind: EventKind,
        phase: Phase,
    ) -> Option<&mut [Registration<K, T>]> {
        self.slots
            .get_mut(&(node, kind, phase))
            .map(|s| s.as_mut_slice())
    }
}
