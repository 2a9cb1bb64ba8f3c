// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ParentLookup`] for [`tapline_tree::Tree`].
//!
//! Liveness follows the tree's generational ids, so a handler that removes
//! a node mid-dispatch makes it (and its subtree) drop out of the remaining
//! traversal.

use tapline_tree::{NodeId, Tree};

use crate::types::ParentLookup;

impl ParentLookup<NodeId> for Tree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Tree::parent_of(self, *node)
    }

    fn is_live(&self, node: &NodeId) -> bool {
        self.is_alive(*node)
    }
}
