// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Tapline crates.
//!
//! ## Available Adapters
//!
//! - [`tree`] (`tree_adapter` feature, on by default): [`HitTest`](crate::hit::HitTest)
//!   for `tapline_tree::Tree`, so a tree can drive an
//!   [`InputSession`](crate::session::InputSession) directly.

#[cfg(feature = "tree_adapter")]
pub mod tree;
