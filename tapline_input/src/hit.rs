// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing seam.

use kurbo::Point;

/// Resolves the node under a point.
///
/// Implementations return the deepest eligible node under `root` whose bounds
/// contain `point`, or `None`. Geometry, clipping and picking rules are up to
/// the implementation.
pub trait HitTest<K> {
    /// Node under `point` within the subtree of `root`.
    fn resolve_target(&self, root: &K, point: Point) -> Option<K>;
}
