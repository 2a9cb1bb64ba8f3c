// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core routing types: phases, event kinds, descriptors, and the tree seam.

/// Propagation phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Root → target, before the bubble phase.
    Tunnel,
    /// Target → root.
    Bubble,
}

/// How an event kind travels through the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutingStrategy {
    /// A full tunnel pass followed by a full bubble pass over the same chain.
    TunnelBubble,
}

/// The fixed set of routed event kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// A pointer button went down over the target.
    Pressed,
    /// A pointer button went up over (or while captured by) the target.
    Released,
    /// Primary-button tap synthesized from a press/release pair.
    Tapped,
    /// Primary-button double tap synthesized from the second press of a sequence.
    DoubleTapped,
    /// Secondary-button tap synthesized from a press/release pair.
    RightTapped,
}

/// Immutable, process-wide description of an event kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedEventDescriptor {
    /// The kind this descriptor belongs to.
    pub kind: EventKind,
    /// Stable human-readable name, used in logs.
    pub name: &'static str,
    /// Propagation strategy.
    pub strategy: RoutingStrategy,
}

static PRESSED: RoutedEventDescriptor = RoutedEventDescriptor {
    kind: EventKind::Pressed,
    name: "PointerPressed",
    strategy: RoutingStrategy::TunnelBubble,
};
static RELEASED: RoutedEventDescriptor = RoutedEventDescriptor {
    kind: EventKind::Released,
    name: "PointerReleased",
    strategy: RoutingStrategy::TunnelBubble,
};
static TAPPED: RoutedEventDescriptor = RoutedEventDescriptor {
    kind: EventKind::Tapped,
    name: "Tapped",
    strategy: RoutingStrategy::TunnelBubble,
};
static DOUBLE_TAPPED: RoutedEventDescriptor = RoutedEventDescriptor {
    kind: EventKind::DoubleTapped,
    name: "DoubleTapped",
    strategy: RoutingStrategy::TunnelBubble,
};
static RIGHT_TAPPED: RoutedEventDescriptor = RoutedEventDescriptor {
    kind: EventKind::RightTapped,
    name: "RightTapped",
    strategy: RoutingStrategy::TunnelBubble,
};

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Pressed,
        Self::Released,
        Self::Tapped,
        Self::DoubleTapped,
        Self::RightTapped,
    ];

    /// The descriptor for this kind.
    pub fn descriptor(self) -> &'static RoutedEventDescriptor {
        match self {
            Self::Pressed => &PRESSED,
            Self::Released => &RELEASED,
            Self::Tapped => &TAPPED,
            Self::DoubleTapped => &DOUBLE_TAPPED,
            Self::RightTapped => &RIGHT_TAPPED,
        }
    }

    /// True for kinds synthesized by gesture recognition rather than raw input.
    pub fn is_gesture(self) -> bool {
        matches!(self, Self::Tapped | Self::DoubleTapped | Self::RightTapped)
    }
}

/// Tree access needed to build and revalidate a route.
///
/// Implementations must describe an acyclic parent relation. The router
/// additionally bounds chain length (see [`Router::with_max_depth`]).
///
/// [`Router::with_max_depth`]: crate::router::Router::with_max_depth
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` for roots and stale nodes.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Whether `node` still exists. Defaults to `true` for trees whose
    /// handles cannot go stale.
    fn is_live(&self, node: &K) -> bool {
        let _ = node;
        true
    }
}
