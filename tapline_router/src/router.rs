// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Builds the root → target chain through [`ParentLookup`] and walks it twice:
//! a tunnel pass from the root down to the target, then a bubble pass from
//! the target back up to the root. The target itself is part of both passes.
//!
//! ## Handled events
//!
//! Marking an event handled never stops traversal. Every registration on the
//! chain is visited; one registered without `handled_events_too` is skipped
//! if the event is already handled when its turn comes.
//!
//! ## Tree mutation during dispatch
//!
//! Handlers receive the tree mutably. The chain is built once, then each
//! entry is revalidated right before it is visited:
//!
//! - Tunnel: an entry is visited only while it is live and still a child of
//!   the previous entry; at the first broken link the tunnel pass ends.
//! - Bubble: the ascent stops at a stale entry, and after visiting an entry
//!   whose parent no longer matches the chain.
//!
//! A target that is detached but live therefore still sees its own bubble
//! handlers, and nothing above the detachment point does.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::error::{DispatchError, HandlerFault};
use crate::event::RoutedEvent;
use crate::registry::{HandlerId, HandlerRegistry};
use crate::types::{EventKind, ParentLookup, Phase};

/// Default bound on route length.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Root → target chain for one dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route<K> {
    chain: SmallVec<[K; 16]>,
}

impl<K: Copy> Route<K> {
    /// Nodes from root to target, inclusive.
    pub fn nodes(&self) -> &[K] {
        &self.chain
    }

    /// The target (last entry), if the route is not empty.
    pub fn target(&self) -> Option<K> {
        self.chain.last().copied()
    }

    /// True when the target was stale and nothing will be visited.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Tunnel order: root → target.
    pub fn tunnel(&self) -> impl Iterator<Item = K> + '_ {
        self.chain.iter().copied()
    }

    /// Bubble order: target → root.
    pub fn bubble(&self) -> impl Iterator<Item = K> + '_ {
        self.chain.iter().rev().copied()
    }
}

/// Routed event dispatcher and owner of the handler registry.
///
/// ## Usage
///
/// - Register handlers with [`Router::add_handler`] (or go through
///   [`Router::registry_mut`] for the full registry API).
/// - Call [`Router::dispatch`] with a live tree and a [`RoutedEvent`] whose
///   source is the target node.
///
/// ```
/// use kurbo::Point;
/// use tapline_router::event::{PointerButton, RoutedEvent, PRIMARY_POINTER};
/// use tapline_router::router::Router;
/// use tapline_router::types::{EventKind, ParentLookup, Phase};
///
/// // 2 is a child of 1.
/// struct Parents;
/// impl ParentLookup<u32> for Parents {
///     fn parent_of(&self, node: &u32) -> Option<u32> {
///         (*node == 2).then_some(1)
///     }
/// }
///
/// let mut router: Router<u32, Parents> = Router::new();
/// router.add_handler(1, EventKind::Pressed, Phase::Tunnel, false, |_, ev| {
///     ev.mark_handled();
///     Ok(())
/// });
/// router.add_handler(2, EventKind::Pressed, Phase::Bubble, true, |_, ev| {
///     assert!(ev.is_handled());
///     Ok(())
/// });
///
/// let mut ev = RoutedEvent::new(
///     EventKind::Pressed, 2, PRIMARY_POINTER, PointerButton::Primary, Point::ZERO,
/// );
/// router.dispatch(&mut Parents, &mut ev).unwrap();
/// assert!(ev.is_handled());
/// ```
pub struct Router<K, T> {
    registry: HandlerRegistry<K, T>,
    max_depth: usize,
}

impl<K: Debug, T> Debug for Router<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<K: Copy + Eq + Hash, T> Default for Router<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, T> Router<K, T> {
    /// Create a router with an empty registry.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a router that truncates routes longer than `max_depth` nodes
    /// (keeping the entries nearest the target).
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Shared access to the registry.
    pub fn registry(&self) -> &HandlerRegistry<K, T> {
        &self.registry
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<K, T> {
        &mut self.registry
    }

    /// Register a handler. See [`HandlerRegistry::add_handler`].
    pub fn add_handler<F>(
        &mut self,
        node: K,
        kind: EventKind,
        phase: Phase,
        handled_events_too: bool,
        callback: F,
    ) -> HandlerId
    where
        F: FnMut(&mut T, &mut RoutedEvent<K>) -> Result<(), crate::error::HandlerError> + 'static,
    {
        self.registry
            .add_handler(node, kind, phase, handled_events_too, callback)
    }

    /// Remove a handler. See [`HandlerRegistry::remove_handler`].
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.registry.remove_handler(id)
    }
}

impl<K, T> Router<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: ParentLookup<K>,
{
    /// Build the root → target chain for `target`.
    ///
    /// A stale target yields an empty route. A live target without a parent
    /// yields a route of length one.
    pub fn route(&self, tree: &T, target: K) -> Route<K> {
        let mut chain: SmallVec<[K; 16]> = SmallVec::new();
        if !tree.is_live(&target) {
            return Route { chain };
        }
        let mut cur = target;
        loop {
            chain.push(cur);
            let Some(parent) = tree.parent_of(&cur) else {
                break;
            };
            if chain.len() >= self.max_depth {
                tracing::warn!(
                    target_node = ?target,
                    max_depth = self.max_depth,
                    "route truncated"
                );
                break;
            }
            cur = parent;
        }
        chain.reverse();
        Route { chain }
    }

    /// Drop every registration whose node is no longer live in `tree`.
    ///
    /// Returns the number of registrations removed.
    pub fn prune(&mut self, tree: &T) -> usize {
        let removed = self.registry.retain_nodes(|node| tree.is_live(node));
        if removed > 0 {
            tracing::debug!(removed, "pruned handlers of destroyed nodes");
        }
        removed
    }

    /// Dispatch `event` to its source: tunnel pass, then bubble pass.
    ///
    /// Handler errors do not interrupt propagation; they are collected and
    /// returned together once both passes finished.
    pub fn dispatch(
        &mut self,
        tree: &mut T,
        event: &mut RoutedEvent<K>,
    ) -> Result<(), DispatchError<K>> {
        let mut faults = Vec::new();
        self.dispatch_with_sink(tree, event, &mut faults);
        DispatchError::check(faults)
    }

    /// Same as [`Router::dispatch`], but appends faults to `faults` so that a
    /// caller can report several dispatches as one.
    pub fn dispatch_with_sink(
        &mut self,
        tree: &mut T,
        event: &mut RoutedEvent<K>,
        faults: &mut Vec<HandlerFault<K>>,
    ) {
        let route = self.route(tree, event.source());
        let chain = route.nodes();
        if chain.is_empty() {
            tracing::debug!(
                target_node = ?event.source(),
                event = event.descriptor().name,
                "dispatch to stale target ignored"
            );
            return;
        }

        for (i, &node) in chain.iter().enumerate() {
            let linked = tree.is_live(&node)
                && (i == 0 || tree.parent_of(&node) == Some(chain[i - 1]));
            if !linked {
                tracing::debug!(?node, "tunnel pass ended at detached node");
                break;
            }
            self.visit(tree, node, Phase::Tunnel, event, faults);
        }

        for i in (0..chain.len()).rev() {
            let node = chain[i];
            if !tree.is_live(&node) {
                tracing::debug!(?node, "bubble pass ended at stale node");
                break;
            }
            self.visit(tree, node, Phase::Bubble, event, faults);
            if i > 0 && tree.parent_of(&node) != Some(chain[i - 1]) {
                tracing::debug!(?node, "bubble pass ended at detached node");
                break;
            }
        }
    }

    fn visit(
        &mut self,
        tree: &mut T,
        node: K,
        phase: Phase,
        event: &mut RoutedEvent<K>,
        faults: &mut Vec<HandlerFault<K>>,
    ) {
        let kind = event.kind();
        let Some(registrations) = self.registry.slot_mut(node, kind, phase) else {
            return;
        };
        event.enter(node, phase);
        for reg in registrations.iter_mut() {
            if event.is_handled() && !reg.handled_events_too {
                tracing::trace!(?node, ?phase, handler = ?reg.id, "skipped: already handled");
                continue;
            }
            tracing::trace!(
                ?node,
                ?phase,
                handler = ?reg.id,
                event = event.descriptor().name,
                "invoke"
            );
            if let Err(error) = (reg.callback)(tree, event) {
                tracing::warn!(?node, ?phase, handler = ?reg.id, %error, "handler failed");
                faults.push(HandlerFault {
                    node,
                    kind,
                    phase,
                    handler: reg.id,
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PRIMARY_POINTER, PointerButton};
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use core::cell::RefCell;
    use hashbrown::HashMap;
    use kurbo::Point;

    /// Minimal parent table; removing a node drops its entry and marks it dead.
    #[derive(Default)]
    struct Parents {
        parent: HashMap<u32, u32>,
        dead: Vec<u32>,
    }

    impl Parents {
        fn chain(links: &[(u32, u32)]) -> Self {
            Self {
                parent: links.iter().copied().collect(),
                dead: Vec::new(),
            }
        }
    }

    impl ParentLookup<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            self.parent.get(node).copied()
        }
        fn is_live(&self, node: &u32) -> bool {
            !self.dead.contains(node)
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn ev(kind: EventKind, target: u32) -> RoutedEvent<u32> {
        RoutedEvent::new(kind, target, PRIMARY_POINTER, PointerButton::Primary, Point::ZERO)
    }

    fn record(
        router: &mut Router<u32, Parents>,
        log: &Log,
        node: u32,
        phase: Phase,
        handled_events_too: bool,
        mark: bool,
    ) -> HandlerId {
        let log = log.clone();
        router.add_handler(node, EventKind::Pressed, phase, handled_events_too, move |_, e| {
            let p = match e.phase() {
                Phase::Tunnel => "t",
                Phase::Bubble => "b",
            };
            log.borrow_mut().push(alloc::format!("{p}{}", e.current()));
            if mark {
                e.mark_handled();
            }
            Ok(())
        })
    }

    #[test]
    fn route_reconstructs_root_to_target() {
        let tree = Parents::chain(&[(3, 2), (2, 1)]);
        let router: Router<u32, Parents> = Router::new();
        let route = router.route(&tree, 3);
        assert_eq!(route.nodes(), &[1, 2, 3]);
        assert_eq!(route.target(), Some(3));
        assert_eq!(route.bubble().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn stale_target_yields_empty_route_and_noop_dispatch() {
        let mut tree = Parents::chain(&[(2, 1)]);
        tree.dead.push(2);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        record(&mut router, &log, 1, Phase::Bubble, true, false);
        assert!(router.route(&tree, 2).is_empty());
        router.dispatch(&mut tree, &mut ev(EventKind::Pressed, 2)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn tunnel_then_bubble_order() {
        let mut tree = Parents::chain(&[(3, 2), (2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        for n in [1, 2, 3] {
            record(&mut router, &log, n, Phase::Bubble, false, false);
            record(&mut router, &log, n, Phase::Tunnel, false, false);
        }
        router.dispatch(&mut tree, &mut ev(EventKind::Pressed, 3)).unwrap();
        assert_eq!(*log.borrow(), ["t1", "t2", "t3", "b3", "b2", "b1"]);
    }

    #[test]
    fn handled_skips_only_handlers_without_opt_in() {
        let mut tree = Parents::chain(&[(2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        record(&mut router, &log, 1, Phase::Tunnel, false, true);
        record(&mut router, &log, 2, Phase::Tunnel, false, false);
        record(&mut router, &log, 2, Phase::Bubble, true, false);
        record(&mut router, &log, 1, Phase::Bubble, false, false);
        record(&mut router, &log, 1, Phase::Bubble, true, false);

        let mut e = ev(EventKind::Pressed, 2);
        router.dispatch(&mut tree, &mut e).unwrap();
        assert!(e.is_handled());
        assert_eq!(*log.borrow(), ["t1", "b2", "b1"]);
    }

    #[test]
    fn same_node_handlers_fire_in_registration_order() {
        let mut tree = Parents::default();
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            router.add_handler(1, EventKind::Tapped, Phase::Bubble, false, move |_, _| {
                log.borrow_mut().push(tag.to_string());
                Ok(())
            });
        }
        router.dispatch(&mut tree, &mut ev(EventKind::Tapped, 1)).unwrap();
        assert_eq!(*log.borrow(), ["first", "second", "third"]);
    }

    #[test]
    fn dispatch_without_handlers_is_a_safe_noop() {
        let mut tree = Parents::chain(&[(3, 2), (2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let mut e = ev(EventKind::RightTapped, 3);
        router.dispatch(&mut tree, &mut e).unwrap();
        assert!(!e.is_handled());
    }

    #[test]
    fn faulting_handler_is_reported_after_full_propagation() {
        let mut tree = Parents::chain(&[(2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        let bad = router.add_handler(2, EventKind::Pressed, Phase::Tunnel, false, |_, _| {
            Err("boom".into())
        });
        record(&mut router, &log, 2, Phase::Tunnel, false, false);
        record(&mut router, &log, 1, Phase::Bubble, false, false);

        let err = router
            .dispatch(&mut tree, &mut ev(EventKind::Pressed, 2))
            .unwrap_err();
        assert_eq!(*log.borrow(), ["t2", "b1"]);
        assert_eq!(err.faults().len(), 1);
        let fault = &err.faults()[0];
        assert_eq!(fault.handler, bad);
        assert_eq!(fault.node, 2);
        assert_eq!(fault.phase, Phase::Tunnel);
        assert_eq!(fault.error.to_string(), "boom");
        assert_eq!(err.to_string(), "1 handler(s) failed during dispatch");
    }

    #[test]
    fn detaching_target_in_tunnel_stops_bubble_at_target() {
        let mut tree = Parents::chain(&[(3, 2), (2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        router.add_handler(2, EventKind::Pressed, Phase::Tunnel, false, |t: &mut Parents, _| {
            t.parent.remove(&3);
            Ok(())
        });
        for n in [1, 2, 3] {
            record(&mut router, &log, n, Phase::Tunnel, false, false);
            record(&mut router, &log, n, Phase::Bubble, false, false);
        }
        router.dispatch(&mut tree, &mut ev(EventKind::Pressed, 3)).unwrap();
        assert_eq!(*log.borrow(), ["t1", "t2", "b3"]);
    }

    #[test]
    fn removing_target_in_tunnel_skips_bubble() {
        let mut tree = Parents::chain(&[(2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        router.add_handler(1, EventKind::Pressed, Phase::Tunnel, false, |t: &mut Parents, _| {
            t.parent.remove(&2);
            t.dead.push(2);
            Ok(())
        });
        record(&mut router, &log, 2, Phase::Tunnel, false, false);
        record(&mut router, &log, 2, Phase::Bubble, false, false);
        record(&mut router, &log, 1, Phase::Bubble, false, false);
        router.dispatch(&mut tree, &mut ev(EventKind::Pressed, 2)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn max_depth_keeps_entries_nearest_target() {
        let tree = Parents::chain(&[(4, 3), (3, 2), (2, 1)]);
        let router: Router<u32, Parents> = Router::with_max_depth(2);
        assert_eq!(router.route(&tree, 4).nodes(), &[3, 4]);
    }

    #[test]
    fn chain_exactly_max_depth_long_is_complete() {
        let tree = Parents::chain(&[(3, 2), (2, 1)]);
        let router: Router<u32, Parents> = Router::with_max_depth(3);
        let route = router.route(&tree, 3);
        assert_eq!(route.nodes(), &[1, 2, 3]);
        assert_eq!(tree.parent_of(&route.nodes()[0]), None);
    }

    #[test]
    fn prune_drops_handlers_of_dead_nodes() {
        let mut tree = Parents::chain(&[(3, 2), (2, 1)]);
        let mut router: Router<u32, Parents> = Router::new();
        let log = Log::default();
        for n in [1, 2, 3] {
            record(&mut router, &log, n, Phase::Bubble, false, false);
        }
        assert_eq!(router.prune(&tree), 0);
        tree.dead.extend([2, 3]);
        assert_eq!(router.prune(&tree), 2);
        assert_eq!(router.registry().len(), 1);
        assert_eq!(router.registry().handler_count(1, EventKind::Pressed, Phase::Bubble), 1);
    }
}
