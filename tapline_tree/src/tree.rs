// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::types::{NodeFlags, NodeId, VisualNode};

/// Visual node tree.
///
/// Each node has at most one parent and an ordered list of children. The tree
/// owns every node; parent links are plain [`NodeId`]s and never keep a node
/// alive. A tree may hold several roots (for example one per window), and a
/// node detached with [`Tree::detach`] becomes a root of its own until it is
/// reparented.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use tapline_tree::{QueryFilter, Tree, VisualNode};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, VisualNode::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
/// let child = tree.insert(Some(root), VisualNode::with_bounds(Rect::new(10.0, 10.0, 50.0, 50.0)));
///
/// let hit = tree.hit_test_point(root, Point::new(20.0, 20.0), QueryFilter::new().pickable()).unwrap();
/// assert_eq!(hit.node, child);
/// assert_eq!(hit.path, vec![root, child]);
/// ```
#[derive(Default)]
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required node flags. Only nodes containing all these flags will be included.
    pub required_flags: NodeFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: NodeFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all nodes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only visible nodes. Invisible nodes hide their whole subtree.
    pub fn visible(mut self) -> Self {
        self.required_flags |= NodeFlags::VISIBLE;
        self
    }

    /// Filter to only pickable nodes.
    pub fn pickable(mut self) -> Self {
        self.required_flags |= NodeFlags::PICKABLE;
        self
    }

    /// Check if a node's flags satisfy this filter.
    pub fn matches(&self, node_flags: NodeFlags) -> bool {
        node_flags.contains(self.required_flags)
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: VisualNode,
}

impl Node {
    fn new(generation: u32, data: VisualNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` is ignored and the node becomes a root.
    pub fn insert(&mut self, parent: Option<NodeId>, data: VisualNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree. Every removed id becomes stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` (with its subtree) under `new_parent`, or make it a root if `None`.
    ///
    /// Returns `false` and leaves the tree untouched if `id` is stale, if
    /// `new_parent` is stale, or if `new_parent` lies inside the subtree of
    /// `id` (which would create a cycle).
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Unlink `id` from its parent. The node stays live as a root of its own subtree.
    pub fn detach(&mut self, id: NodeId) -> bool {
        self.reparent(id, None)
    }

    /// Replace the bounds of a node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.bounds = bounds;
        }
    }

    /// Replace the flags of a node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.flags = flags;
        }
    }

    /// Hit test a point under `root` and return the deepest matching node
    /// together with its path from `root`.
    ///
    /// - Children are tested before their parent, and later siblings before
    ///   earlier ones, so the node drawn on top wins.
    /// - A child may be hit even if it overflows its parent's bounds.
    /// - If the filter requires [`NodeFlags::VISIBLE`], an invisible node hides
    ///   its whole subtree.
    ///
    /// Returns `None` for a stale `root` or when nothing matches.
    pub fn hit_test_point(&self, root: NodeId, point: Point, filter: QueryFilter) -> Option<Hit> {
        if !self.is_alive(root) {
            return None;
        }
        let mut path = Vec::new();
        if self.hit_subtree(root, point, filter, &mut path) {
            let node = *path.last()?;
            Some(Hit { node, path })
        } else {
            None
        }
    }

    fn hit_subtree(
        &self,
        id: NodeId,
        point: Point,
        filter: QueryFilter,
        path: &mut Vec<NodeId>,
    ) -> bool {
        let node = self.node(id);
        if filter.required_flags.contains(NodeFlags::VISIBLE)
            && !node.data.flags.contains(NodeFlags::VISIBLE)
        {
            return false;
        }
        path.push(id);
        for &child in node.children.iter().rev() {
            if self.hit_subtree(child, point, filter, path) {
                return true;
            }
        }
        if filter.matches(node.data.flags) && node.data.bounds.contains(point) {
            return true;
        }
        path.pop();
        false
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Get the children of a node in order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |node| &node.children)
    }

    /// Walk parent links up to the root of the subtree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            cur = p;
        }
        Some(cur)
    }

    /// Returns the bounds of a node if the identifier is live.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|node| node.data.bounds)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|node| node.data.flags)
    }

    // --- internals ---

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    fn node(&self, id: NodeId) -> &Node {
        match self.nodes[id.idx()].as_ref() {
            Some(n) => n,
            None => unreachable!("callers check liveness before touching a slot"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes[id.idx()].as_mut() {
            Some(n) => n,
            None => unreachable!("callers check liveness before touching a slot"),
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn rect_node(x0: f64, y0: f64, x1: f64, y1: f64) -> VisualNode {
        VisualNode::with_bounds(Rect::new(x0, y0, x1, y1))
    }

    #[test]
    fn insert_and_hit_test() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(Some(root), rect_node(10.0, 10.0, 60.0, 60.0));
        let b = tree.insert(Some(a), rect_node(20.0, 20.0, 40.0, 40.0));

        let filter = QueryFilter::new().visible().pickable();
        let hit = tree.hit_test_point(root, Point::new(25.0, 25.0), filter).unwrap();
        assert_eq!(hit.node, b);
        assert_eq!(hit.path, vec![root, a, b]);

        let hit = tree.hit_test_point(root, Point::new(50.0, 50.0), filter).unwrap();
        assert_eq!(hit.node, a);

        let hit = tree.hit_test_point(root, Point::new(150.0, 150.0), filter).unwrap();
        assert_eq!(hit.node, root);
        assert_eq!(hit.path, vec![root]);

        assert!(tree.hit_test_point(root, Point::new(500.0, 0.0), filter).is_none());
    }

    #[test]
    fn later_sibling_wins_on_overlap() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let _under = tree.insert(Some(root), rect_node(0.0, 0.0, 50.0, 50.0));
        let over = tree.insert(Some(root), rect_node(0.0, 0.0, 50.0, 50.0));
        let hit = tree
            .hit_test_point(root, Point::new(10.0, 10.0), QueryFilter::new())
            .unwrap();
        assert_eq!(hit.node, over);
    }

    #[test]
    fn child_overflowing_parent_is_still_hit() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let panel = tree.insert(Some(root), rect_node(0.0, 0.0, 10.0, 10.0));
        let popup = tree.insert(Some(panel), rect_node(50.0, 50.0, 80.0, 80.0));
        let hit = tree
            .hit_test_point(root, Point::new(60.0, 60.0), QueryFilter::new())
            .unwrap();
        assert_eq!(hit.node, popup);
        assert_eq!(hit.path, vec![root, panel, popup]);
    }

    #[test]
    fn invisible_node_hides_subtree_and_unpickable_is_skipped() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let hidden = tree.insert(Some(root), rect_node(0.0, 0.0, 50.0, 50.0));
        let _inner = tree.insert(Some(hidden), rect_node(0.0, 0.0, 20.0, 20.0));
        tree.set_flags(hidden, NodeFlags::PICKABLE);

        let filter = QueryFilter::new().visible().pickable();
        let hit = tree.hit_test_point(root, Point::new(10.0, 10.0), filter).unwrap();
        assert_eq!(hit.node, root);

        tree.set_flags(hidden, NodeFlags::VISIBLE);
        let hit = tree.hit_test_point(root, Point::new(30.0, 30.0), filter).unwrap();
        assert_eq!(hit.node, root, "unpickable node is not a hit target");
    }

    #[test]
    fn remove_makes_subtree_stale_and_reuses_slot() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), rect_node(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(Some(a), rect_node(0.0, 0.0, 5.0, 5.0));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(b));
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.parent_of(b), None);

        let c = tree.insert(Some(root), rect_node(0.0, 0.0, 10.0, 10.0));
        assert!(tree.is_alive(c));
        assert!(!tree.is_alive(a), "old handle must stay stale after slot reuse");
        assert_ne!(a, c);
    }

    #[test]
    fn detach_keeps_node_alive_as_root() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), rect_node(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(Some(a), rect_node(0.0, 0.0, 5.0, 5.0));

        assert!(tree.detach(a));
        assert!(tree.is_alive(a));
        assert_eq!(tree.parent_of(a), None);
        assert_eq!(tree.root_of(b), Some(a));
        assert!(tree.children_of(root).is_empty());
    }

    #[test]
    fn reparent_refuses_cycles_and_keeps_child_order() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        let a = tree.insert(Some(root), rect_node(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(Some(a), rect_node(0.0, 0.0, 5.0, 5.0));
        let c = tree.insert(Some(root), rect_node(0.0, 0.0, 5.0, 5.0));

        assert!(!tree.reparent(a, Some(b)));
        assert!(!tree.reparent(a, Some(a)));
        assert_eq!(tree.parent_of(a), Some(root));

        assert!(tree.reparent(b, Some(root)));
        assert_eq!(tree.children_of(root), &[a, c, b]);
        assert_eq!(tree.root_of(b), Some(root));
    }

    #[test]
    fn stale_ids_are_inert() {
        let mut tree = Tree::new();
        let root = tree.insert(None, rect_node(0.0, 0.0, 100.0, 100.0));
        tree.remove(root);
        assert!(tree.hit_test_point(root, Point::new(1.0, 1.0), QueryFilter::new()).is_none());
        assert_eq!(tree.bounds(root), None);
        assert_eq!(tree.flags(root), None);
        assert_eq!(tree.root_of(root), None);
        assert!(!tree.reparent(root, None));
        tree.set_bounds(root, Rect::ZERO);
    }
}
