// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Tapline crates.
//!
//! Each adapter is gated behind a feature flag so the router itself only
//! depends on the [`ParentLookup`](crate::types::ParentLookup) seam.
//!
//! ## Available Adapters
//!
//! - [`tree`] (`tree_adapter` feature): [`ParentLookup`](crate::types::ParentLookup)
//!   for [`tapline_tree::Tree`].

#[cfg(feature = "tree_adapter")]
pub mod tree;
