// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapline Router: deterministic, `no_std` routed events for UI trees.
//!
//! ## Overview
//!
//! Given a target node and a [`RoutedEvent`](crate::event::RoutedEvent), the
//! [`Router`](crate::router::Router) builds the root → target chain and runs
//! two passes over it:
//!
//! 1. Tunnel: root → target, invoking [`Phase::Tunnel`](crate::types::Phase::Tunnel) handlers.
//! 2. Bubble: target → root, invoking [`Phase::Bubble`](crate::types::Phase::Bubble) handlers.
//!
//! Handlers on one node and phase run in registration order.
//!
//! ## Handled
//!
//! Any handler may call [`RoutedEvent::mark_handled`](crate::event::RoutedEvent::mark_handled).
//! The flag never resets during a dispatch. Once set, handlers registered
//! without `handled_events_too` are skipped, but traversal is never cut short,
//! so opted-in handlers further along the chain still run.
//!
//! ## Inputs
//!
//! The router does not own the tree. It reads parents and liveness through
//! [`ParentLookup`](crate::types::ParentLookup), and hands the tree to every
//! handler mutably so handlers may restructure it. See the
//! [`router`] module docs for how the route is revalidated while that happens.
//!
//! ## Faults
//!
//! A handler returning `Err` is skipped over, not fatal: the remaining
//! handlers and phases still run and all faults come back together in one
//! [`DispatchError`](crate::error::DispatchError).
//!
//! ## Adapters
//!
//! The [`adapters`] module provides integration with other Tapline crates:
//!
//! - **Tree Adapter** (`tree_adapter` feature, on by default): implements
//!   [`ParentLookup`](crate::types::ParentLookup) for `tapline_tree::Tree`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod error;
pub mod event;
pub mod registry;
pub mod router;
pub mod types;
