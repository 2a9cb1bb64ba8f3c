// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the visual tree: node identifiers, flags, and node data.

use kurbo::Rect;

/// Identifier for a node in the tree (generational).
///
/// A `NodeId` stays valid until its node is removed. After that the slot may
/// be reused, but with a bumped generation, so an old handle is detectably
/// stale rather than silently aliasing a new node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in hit testing when the filter asks for it).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Per-node data supplied by the caller.
///
/// Bounds come from layout and are expressed in root (window) coordinates;
/// the tree never measures or arranges anything itself.
#[derive(Clone, Debug)]
pub struct VisualNode {
    /// Bounds in root coordinates.
    pub bounds: Rect,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl VisualNode {
    /// A visible, pickable node with the given bounds.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }
}

impl Default for VisualNode {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            flags: NodeFlags::default(),
        }
    }
}
