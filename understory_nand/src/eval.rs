// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signal and critical path evaluation over a topological order.

use alloc::vec::Vec;

use crate::error::{Error, InvalidArgument};
use crate::gate::InputSlot;
use crate::id::GateId;
use crate::network::Network;
use crate::scratch::EvalScratch;
use crate::trace::{CriticalInput, EvalTrace};

/// Result of [`Network::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    signals: Vec<bool>,
    critical_path: usize,
}

impl Evaluation {
    /// Output signals, in the order the gates were requested.
    #[must_use]
    pub fn signals(&self) -> &[bool] {
        &self.signals
    }

    /// Output signal of the `index`-th requested gate.
    #[must_use]
    pub fn signal(&self, index: usize) -> Option<bool> {
        self.signals.get(index).copied()
    }

    /// The longest critical path length among the requested gates.
    #[must_use]
    pub fn critical_path(&self) -> usize {
        self.critical_path
    }

    /// Consumes the evaluation, returning the output signals.
    #[must_use]
    pub fn into_signals(self) -> Vec<bool> {
        self.signals
    }
}

impl Network<'_> {
    /// Evaluates the requested gates.
    ///
    /// Every gate the request transitively depends on is evaluated too. A
    /// gate outputs the NAND of its inputs; its critical path length is the
    /// number of gates on the longest chain from a signal source to it, so a
    /// gate fed only by signals has length `1` and a gate without inputs has
    /// length `0`.
    ///
    /// Nothing is cached: every call recomputes from the current signal values.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `gates` is empty, names a stale gate,
    ///   or names a gate twice.
    /// - [`Error::UnresolvedInput`] if a required gate has an empty slot.
    /// - [`Error::CycleDetected`] if a required gate depends on itself.
    /// - [`Error::AllocationFailure`] if traversal or result storage cannot grow.
    ///
    /// # Example
    ///
    /// ```
    /// use core::cell::Cell;
    /// use understory_nand::Network;
    ///
    /// let a = Cell::new(true);
    /// let b = Cell::new(false);
    ///
    /// let mut net = Network::new();
    /// let g = net.create(2).unwrap();
    /// net.connect_signal(&a, g, 0).unwrap();
    /// net.connect_signal(&b, g, 1).unwrap();
    ///
    /// assert_eq!(net.evaluate(&[g]).unwrap().signals(), &[true]);
    ///
    /// b.set(true);
    /// assert_eq!(net.evaluate(&[g]).unwrap().signals(), &[false]);
    /// ```
    pub fn evaluate(&mut self, gates: &[GateId]) -> Result<Evaluation, Error> {
        let mut scratch = EvalScratch::new();
        self.evaluate_with_scratch(gates, &mut scratch)
    }

    /// Like [`evaluate`](Self::evaluate), reusing `scratch`.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub fn evaluate_with_scratch(
        &mut self,
        gates: &[GateId],
        scratch: &mut EvalScratch,
    ) -> Result<Evaluation, Error> {
        self.evaluate_with_trace(gates, scratch, &mut ())
    }

    /// Like [`evaluate_with_scratch`](Self::evaluate_with_scratch), reporting
    /// the order and every evaluated gate to `trace`.
    ///
    /// `trace` is only called once the order is known, so a failing call
    /// reports nothing.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub fn evaluate_with_trace<T>(
        &mut self,
        gates: &[GateId],
        scratch: &mut EvalScratch,
        trace: &mut T,
    ) -> Result<Evaluation, Error>
    where
        T: EvalTrace + ?Sized,
    {
        self.sort(gates, scratch)?;
        let mut signals = Vec::new();
        signals
            .try_reserve_exact(gates.len())
            .map_err(|_| Error::AllocationFailure)?;

        trace.order(&scratch.order);
        self.evaluate_sorted(&scratch.order, trace);

        signals.extend(gates.iter().map(|&g| self.live(g).signal));
        Ok(Evaluation {
            signals,
            critical_path: self.longest_path(gates),
        })
    }

    /// Evaluates the requested gates, writing their signals into `out`.
    ///
    /// `out[i]` receives the signal of `gates[i]`. Returns the longest
    /// critical path length among the requested gates. This does not allocate
    /// once `scratch` has grown to fit the network.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate), plus
    /// [`InvalidArgument::OutputLengthMismatch`] if `out` and `gates` differ in
    /// length. `out` is left untouched on error.
    pub fn evaluate_into(
        &mut self,
        gates: &[GateId],
        out: &mut [bool],
        scratch: &mut EvalScratch,
    ) -> Result<usize, Error> {
        if out.len() != gates.len() {
            return Err(InvalidArgument::OutputLengthMismatch {
                expected: gates.len(),
                actual: out.len(),
            }
            .into());
        }
        self.sort(gates, scratch)?;
        self.evaluate_sorted(&scratch.order, &mut ());

        for (slot, &gate) in out.iter_mut().zip(gates) {
            *slot = self.live(gate).signal;
        }
        Ok(self.longest_path(gates))
    }

    /// Evaluates gates in `order`, which must list producers before consumers.
    fn evaluate_sorted<T>(&mut self, order: &[GateId], trace: &mut T)
    where
        T: EvalTrace + ?Sized,
    {
        for &id in order {
            let (signal, critical_path, cause) = self.resolve(id);
            let gate = self.live_mut(id);
            gate.signal = signal;
            gate.critical_path = critical_path;
            trace.evaluated(id, signal, critical_path, cause);
        }
    }

    /// Computes the NAND and critical path of `id` from already evaluated inputs.
    fn resolve(&self, id: GateId) -> (bool, usize, CriticalInput) {
        let mut all = true;
        let mut critical_path = 0;
        let mut cause = CriticalInput::None;

        for (slot, input) in self.live(id).inputs.iter().enumerate() {
            let (value, through, via) = match *input {
                InputSlot::Signal(signal) => (signal.get(), 1, CriticalInput::Signal { slot }),
                InputSlot::Gate { producer, .. } => {
                    let p = self.live(producer);
                    (
                        p.signal,
                        p.critical_path + 1,
                        CriticalInput::Gate { slot, producer },
                    )
                }
                InputSlot::Empty => {
                    debug_assert!(false, "sorted gates have no empty slots");
                    continue;
                }
            };
            all &= value;
            if through > critical_path {
                critical_path = through;
                cause = via;
            }
        }

        (!all, critical_path, cause)
    }

    fn longest_path(&self, gates: &[GateId]) -> usize {
        gates
            .iter()
            .map(|&g| self.live(g).critical_path)
            .max()
            .unwrap_or(0)
    }
}
