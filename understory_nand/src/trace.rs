// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability helpers for evaluation.
//!
//! An evaluation only reports each requested gate's signal and the overall
//! critical path length. For many embedders, it is useful to answer questions
//! like: "Which chain of gates is the critical path?".
//!
//! This module provides a minimal, additive hook,
//! [`Network::evaluate_with_trace`](crate::Network::evaluate_with_trace),
//! plus a small recorder, [`CriticalPathRecorder`], which stores **one**
//! critical input per evaluated gate, so that one longest chain can be
//! reconstructed for any of them.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::id::GateId;

/// The input that determined a gate's critical path length.
///
/// When several inputs tie, the lowest slot wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CriticalInput {
    /// The gate has no inputs.
    None,
    /// A signal source on `slot`; the chain starts at this gate.
    Signal {
        /// The slot reading the signal.
        slot: usize,
    },
    /// The output of `producer`, read on `slot`.
    Gate {
        /// The slot reading the producer.
        slot: usize,
        /// The producer on the critical path.
        producer: GateId,
    },
}

/// A callback sink for evaluation tracing.
///
/// See [`Network::evaluate_with_trace`](crate::Network::evaluate_with_trace).
/// `()` implements this trait and records nothing.
pub trait EvalTrace {
    /// Called once per evaluation with the full order, producers first.
    fn order(&mut self, order: &[GateId]);

    /// Called after `gate` has been evaluated.
    fn evaluated(&mut self, gate: GateId, signal: bool, critical_path: usize, cause: CriticalInput);
}

impl EvalTrace for () {
    fn order(&mut self, _order: &[GateId]) {}

    fn evaluated(
        &mut self,
        _gate: GateId,
        _signal: bool,
        _critical_path: usize,
        _cause: CriticalInput,
    ) {
    }
}

/// Records the critical input of every evaluated gate.
///
/// Records accumulate across evaluations; a later evaluation of the same gate
/// overwrites its record. Call [`clear`](Self::clear) after editing the
/// network if stale explanations are a concern.
#[derive(Debug, Default, Clone)]
pub struct CriticalPathRecorder {
    causes: HashMap<GateId, (usize, CriticalInput)>,
}

impl CriticalPathRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            causes: HashMap::new(),
        }
    }

    /// Clears all records.
    pub fn clear(&mut self) {
        self.causes.clear();
    }

    /// Returns the recorded critical input of `gate`, if it was evaluated.
    #[must_use]
    pub fn cause(&self, gate: GateId) -> Option<CriticalInput> {
        self.causes.get(&gate).map(|&(_, cause)| cause)
    }

    /// Returns the recorded critical path length of `gate`, if it was evaluated.
    #[must_use]
    pub fn critical_path(&self, gate: GateId) -> Option<usize> {
        self.causes.get(&gate).map(|&(len, _)| len)
    }

    /// Returns one longest chain of gates ending at `gate`.
    ///
    /// The returned vector is ordered from the gate nearest the signal
    /// sources to `gate` (inclusive), and its length equals the recorded
    /// critical path length. Gates without inputs have length `0` and are
    /// never part of a chain, so explaining one yields an empty vector.
    /// Returns `None` if any gate on the chain was not recorded.
    ///
    /// # Example
    ///
    /// ```
    /// use core::cell::Cell;
    /// use understory_nand::{CriticalPathRecorder, EvalScratch, Network};
    ///
    /// let s = Cell::new(true);
    /// let mut net = Network::new();
    /// let a = net.create(1).unwrap();
    /// let b = net.create(2).unwrap();
    /// net.connect_signal(&s, a, 0).unwrap();
    /// net.connect_signal(&s, b, 0).unwrap();
    /// net.connect_gate(a, b, 1).unwrap();
    ///
    /// let mut rec = CriticalPathRecorder::new();
    /// net.evaluate_with_trace(&[b], &mut EvalScratch::new(), &mut rec)
    ///     .unwrap();
    /// assert_eq!(rec.explain(b).unwrap(), vec![a, b]);
    /// ```
    #[must_use]
    pub fn explain(&self, gate: GateId) -> Option<Vec<GateId>> {
        let mut out = Vec::new();
        let mut seen: HashSet<GateId> = HashSet::new();

        let mut current = gate;
        loop {
            let (len, cause) = *self.causes.get(&current)?;
            if len == 0 {
                break;
            }
            if !seen.insert(current) {
                return None;
            }
            out.push(current);

            match cause {
                CriticalInput::None | CriticalInput::Signal { .. } => break,
                CriticalInput::Gate { producer, .. } => current = producer,
            }
        }

        out.reverse();
        Some(out)
    }
}

impl EvalTrace for CriticalPathRecorder {
    fn order(&mut self, order: &[GateId]) {
        self.causes.reserve(order.len());
    }

    fn evaluated(&mut self, gate: GateId, _signal: bool, critical_path: usize, cause: CriticalInput) {
        self.causes.insert(gate, (critical_path, cause));
    }
}
