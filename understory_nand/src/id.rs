// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational gate handles.

use core::fmt;

/// Identifier for a gate in a [`Network`](crate::Network).
///
/// This is a small, copyable handle that stays stable while the gate lives but
/// becomes invalid once the gate is destroyed.
/// It consists of an arena slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `GateId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `GateId`.
///
/// ### Liveness
///
/// Use [`Network::contains`](crate::Network::contains) to check whether a `GateId` still refers
/// to a live gate. Every operation taking a `GateId` performs the same check and reports
/// [`InvalidArgument::StaleGate`](crate::InvalidArgument::StaleGate) for stale handles.
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - A slot whose generation reaches `u32::MAX` is retired instead of reused,
///   so a stale handle never matches a later gate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub(crate) u32, pub(crate) u32);

impl GateId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the arena slot index of this handle.
    ///
    /// Slot indices are reused after a gate is destroyed; pair with
    /// [`generation`](Self::generation) for a unique identity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the generation of this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GateId({}v{})", self.0, self.1)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate {}v{}", self.0, self.1)
    }
}
