// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapline Input: pointer devices, click counting and tap gestures.
//!
//! ## Overview
//!
//! An [`InputSession`](crate::session::InputSession) turns raw pointer
//! signals into routed events for one top-level root:
//!
//! - [`pointer`]: per-device pressed buttons, position, modifiers and capture.
//! - [`click`]: click counts from time and distance thresholds.
//! - [`gesture`]: `Tapped`, `DoubleTapped` and `RightTapped` recognition.
//! - [`session`]: target resolution, then dispatch through
//!   [`tapline_router::router::Router`].
//!
//! Thresholds live in [`GestureConfig`](crate::config::GestureConfig) and are
//! fixed for the life of the session. Time is whatever millisecond clock the
//! caller stamps raw signals with; the crate never reads a clock itself.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use tapline_input::config::GestureConfig;
//! use tapline_input::pointer::RawPointerEvent;
//! use tapline_input::session::InputSession;
//! use tapline_router::event::{PRIMARY_POINTER, PointerButton};
//! use tapline_router::types::{EventKind, Phase};
//! use tapline_tree::{Tree, VisualNode};
//!
//! let mut tree = Tree::new();
//! let window = tree.insert(None, VisualNode::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! let button = tree.insert(Some(window), VisualNode::with_bounds(Rect::new(10.0, 10.0, 50.0, 30.0)));
//!
//! let mut session = InputSession::new(window, GestureConfig::default());
//! let taps = Rc::new(RefCell::new(0));
//! let t = taps.clone();
//! session.add_handler(button, EventKind::Tapped, Phase::Bubble, false, move |_, _| {
//!     *t.borrow_mut() += 1;
//!     Ok(())
//! });
//!
//! let at = Point::new(20.0, 20.0);
//! session.handle_raw(&mut tree, &RawPointerEvent::down(PRIMARY_POINTER, PointerButton::Primary, at, 0)).unwrap();
//! session.handle_raw(&mut tree, &RawPointerEvent::up(PRIMARY_POINTER, PointerButton::Primary, at, 80)).unwrap();
//! assert_eq!(*taps.borrow(), 1);
//! ```
//!
//! ## Adapters
//!
//! With the `tree_adapter` feature (on by default) `tapline_tree::Tree`
//! implements [`HitTest`](crate::hit::HitTest), and through `tapline_router`
//! also `ParentLookup`, so it can back a session directly.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod adapters;
pub mod click;
pub mod config;
pub mod gesture;
pub mod hit;
pub mod pointer;
pub mod session;
