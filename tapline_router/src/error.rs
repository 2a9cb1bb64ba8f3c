// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler faults and dispatch errors.
//!
//! A failing handler never interrupts propagation. The router records a
//! [`HandlerFault`], keeps visiting the remaining handlers and phases, and
//! reports every fault in one [`DispatchError`] after the dispatch finished.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::registry::HandlerId;
use crate::types::{EventKind, Phase};

/// Error type returned by handler callbacks.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// One handler callback that returned an error.
#[derive(Debug, thiserror::Error)]
#[error("handler {handler:?} on {node:?} failed during {kind:?} ({phase:?}): {error}")]
pub struct HandlerFault<K: Debug> {
    /// Node the handler was registered on.
    pub node: K,
    /// Event kind being dispatched.
    pub kind: EventKind,
    /// Phase in which the handler ran.
    pub phase: Phase,
    /// Registration that failed.
    pub handler: HandlerId,
    /// What the handler reported.
    #[source]
    pub error: HandlerError,
}

/// Faults collected over a complete dispatch.
#[derive(Debug, thiserror::Error)]
#[error("{} handler(s) failed during dispatch", .faults.len())]
pub struct DispatchError<K: Debug> {
    faults: Vec<HandlerFault<K>>,
}

impl<K: Debug> DispatchError<K> {
    /// Wrap collected faults; returns `Ok(())` when there are none.
    pub fn check(faults: Vec<HandlerFault<K>>) -> Result<(), Self> {
        if faults.is_empty() {
            Ok(())
        } else {
            Err(Self { faults })
        }
    }

    /// The faults, in the order the failing handlers ran.
    pub fn faults(&self) -> &[HandlerFault<K>] {
        &self.faults
    }

    /// Take ownership of the faults.
    pub fn into_faults(self) -> Vec<HandlerFault<K>> {
        self.faults
    }
}
