// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gate entity stored in the network arena.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::id::GateId;
use crate::signal::Signal;

/// What is currently connected to one input slot of a gate.
///
/// This is the read-only view returned by
/// [`Network::input_at`](crate::Network::input_at).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input<'s> {
    /// Nothing is connected.
    Empty,
    /// An external signal source is connected.
    Signal(Signal<'s>),
    /// The output of another gate is connected.
    Gate(GateId),
}

/// One entry of a gate's fan-out list: `consumer` reads this gate's output on `slot`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dependent {
    /// The gate consuming the output.
    pub consumer: GateId,
    /// The input slot of `consumer` that is fed.
    pub slot: usize,
}

/// Storage form of an input slot.
///
/// For `Gate`, `back` is the position of the matching [`Dependent`] inside the
/// producer's fan-out list, so that `producer.dependents[back]` is
/// `(this gate, this slot)`.
#[derive(Copy, Clone, Debug)]
pub(crate) enum InputSlot<'s> {
    Empty,
    Signal(Signal<'s>),
    Gate { producer: GateId, back: usize },
}

impl<'s> InputSlot<'s> {
    pub(crate) fn view(self) -> Input<'s> {
        match self {
            Self::Empty => Input::Empty,
            Self::Signal(signal) => Input::Signal(signal),
            Self::Gate { producer, .. } => Input::Gate(producer),
        }
    }
}

/// Per-call traversal mark used by the topological sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum VisitState {
    #[default]
    Unvisited,
    InProgress,
    Done,
}

/// Most gates have two inputs; keep those inline.
pub(crate) type Slots<'s> = SmallVec<[InputSlot<'s>; 2]>;

#[derive(Debug)]
pub(crate) struct Gate<'s> {
    /// Fixed-length input slots; the length is the arity.
    pub(crate) inputs: Slots<'s>,
    /// Fan-out list. Order is not meaningful.
    pub(crate) dependents: Vec<Dependent>,
    pub(crate) visit: VisitState,
    /// Valid after an evaluation that included this gate.
    pub(crate) signal: bool,
    /// Valid after an evaluation that included this gate.
    pub(crate) critical_path: usize,
}

impl<'s> Gate<'s> {
    pub(crate) fn new(inputs: Slots<'s>) -> Self {
        Self {
            inputs,
            dependents: Vec::new(),
            visit: VisitState::Unvisited,
            signal: false,
            critical_path: 0,
        }
    }

    #[inline]
    pub(crate) fn arity(&self) -> usize {
        self.inputs.len()
    }
}
