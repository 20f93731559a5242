// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable scratch buffers for sort and evaluate calls.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::id::GateId;

/// One level of the explicit depth-first traversal.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Frame {
    pub(crate) gate: GateId,
    /// Index of the next input slot of `gate` to resolve.
    pub(crate) next: usize,
}

/// Reusable scratch storage for [`Network`](crate::Network) sorts and evaluations.
///
/// This is useful when evaluating the same network many times (for example
/// once per input vector) to avoid allocating the traversal stack and the
/// order buffer on every call.
///
/// The scratch buffers retain capacity across calls. Callers should reuse a
/// single scratch instance per network / update pass.
///
/// # See Also
///
/// - [`Network::evaluate_with_scratch`](crate::Network::evaluate_with_scratch):
///   Scratch-powered evaluation.
/// - [`Network::topological_order_with_scratch`](crate::Network::topological_order_with_scratch):
///   Scratch-powered sort.
#[derive(Debug, Default)]
pub struct EvalScratch {
    pub(crate) frames: Vec<Frame>,
    /// Every gate whose visit state was changed during the current call.
    pub(crate) touched: Vec<GateId>,
    /// Finish order of the traversal; producers precede consumers.
    pub(crate) order: Vec<GateId>,
    /// Duplicate detection for the requested gates.
    pub(crate) requested: HashSet<GateId>,
}

impl EvalScratch {
    /// Creates an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            touched: Vec::new(),
            order: Vec::new(),
            requested: HashSet::new(),
        }
    }

    /// Creates an empty scratch buffer with pre-allocated capacity.
    ///
    /// `capacity` is a best-effort hint for the number of gates a single call
    /// will visit.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            touched: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            requested: HashSet::with_capacity(capacity),
        }
    }

    /// Returns the order computed by the most recent successful call.
    ///
    /// The contents are unspecified after a failed call.
    #[must_use]
    pub fn order(&self) -> &[GateId] {
        &self.order
    }

    pub(crate) fn reset(&mut self) {
        self.frames.clear();
        self.touched.clear();
        self.order.clear();
        self.requested.clear();
    }
}
