// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`HitTest`] for [`tapline_tree::Tree`].

use kurbo::Point;
use tapline_tree::{NodeId, QueryFilter, Tree};

use crate::hit::HitTest;

impl HitTest<NodeId> for Tree {
    /// Topmost visible, pickable node under `point`.
    fn resolve_target(&self, root: &NodeId, point: Point) -> Option<NodeId> {
        let filter = QueryFilter::new().visible().pickable();
        self.hit_test_point(*root, point, filter).map(|hit| hit.node)
    }
}
