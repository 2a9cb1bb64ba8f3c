// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapline Tree: a generational visual node tree with point hit testing.
//!
//! This is the smallest tree that the Tapline router and input session need:
//!
//! - Each node has zero or one parent and an ordered list of children.
//! - Parent links are plain [`NodeId`]s, so a child never keeps its parent alive.
//! - [`NodeId`] is generational; once a node is removed its handle is stale
//!   forever, even if the slot is reused.
//! - [`Tree::hit_test_point`] returns the deepest node under a point, with the
//!   root→node path.
//!
//! ## Not a layout engine
//!
//! Bounds are supplied by the caller in root coordinates. This crate does not
//! measure, arrange, transform or clip anything.
//!
//! ## API overview
//!
//! - [`Tree::insert`] / [`Tree::remove`] / [`Tree::reparent`] / [`Tree::detach`]
//! - [`Tree::is_alive`], [`Tree::parent_of`], [`Tree::children_of`], [`Tree::root_of`]
//! - [`Tree::bounds`] / [`Tree::set_bounds`], [`Tree::flags`] / [`Tree::set_flags`]
//! - [`Tree::hit_test_point`] with a [`QueryFilter`]
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Hit, QueryFilter, Tree};
pub use types::{NodeFlags, NodeId, VisualNode};
