// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gate arena and connection management.

use alloc::vec::Vec;
use core::cell::Cell;
use core::mem;

use crate::error::{Error, InvalidArgument};
use crate::gate::{Dependent, Gate, Input, InputSlot, Slots};
use crate::id::GateId;
use crate::signal::Signal;

#[derive(Debug)]
struct Entry<'s> {
    generation: u32,
    gate: Option<Gate<'s>>,
}

/// A mutable network of NAND gates.
///
/// Gates live in an arena and are addressed by generational [`GateId`]s. Each
/// gate has a fixed number of input slots; each slot is empty, reads a
/// caller-owned [`Signal`], or reads the output of another gate. Edges are
/// stored on both ends: a consumer slot records its producer, and the producer
/// records the `(consumer, slot)` pair in its fan-out list. Removing an edge
/// is O(1) regardless of fan-out.
///
/// The network borrows signal sources for `'s`; change their values with
/// [`Cell::set`] and call [`evaluate`](Self::evaluate) again to observe the
/// new outputs.
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use understory_nand::{Input, Network};
///
/// let a = Cell::new(true);
/// let b = Cell::new(true);
///
/// let mut net = Network::new();
/// let g = net.create(2).unwrap();
/// let inv = net.create(1).unwrap();
///
/// net.connect_signal(&a, g, 0).unwrap();
/// net.connect_signal(&b, g, 1).unwrap();
/// net.connect_gate(g, inv, 0).unwrap();
///
/// assert_eq!(net.input_at(inv, 0).unwrap(), Input::Gate(g));
/// assert_eq!(net.fan_out(g).unwrap(), 1);
///
/// let eval = net.evaluate(&[g, inv]).unwrap();
/// assert_eq!(eval.signals(), &[false, true]);
/// assert_eq!(eval.critical_path(), 2);
/// ```
///
/// # See Also
///
/// - [`EvalScratch`](crate::EvalScratch): Reusable buffers for repeated evaluation.
/// - [`EvalTrace`](crate::EvalTrace): Observe each evaluated gate.
#[derive(Debug, Default)]
pub struct Network<'s> {
    entries: Vec<Entry<'s>>,
    /// Freed arena slots available for reuse.
    free: Vec<u32>,
    len: usize,
}

impl<'s> Network<'s> {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty network with room for `gates` gates.
    #[must_use]
    pub fn with_capacity(gates: usize) -> Self {
        Self {
            entries: Vec::with_capacity(gates),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live gates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the network has no live gates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live gate.
    #[must_use]
    pub fn contains(&self, id: GateId) -> bool {
        self.gate(id).is_some()
    }

    /// Returns the arity of a live gate.
    #[must_use]
    pub fn arity(&self, id: GateId) -> Option<usize> {
        self.gate(id).map(Gate::arity)
    }

    /// Returns an iterator over all live gates, in arena order.
    pub fn gates(&self) -> impl Iterator<Item = GateId> + '_ {
        self.entries
            .iter()
            .zip(0_u32..)
            .filter_map(|(entry, idx)| {
                entry
                    .gate
                    .as_ref()
                    .map(|_| GateId::new(idx, entry.generation))
            })
    }

    /// Creates a gate with `arity` input slots, all empty.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailure`] if storage for the gate cannot be
    /// reserved. The network is unchanged in that case.
    pub fn create(&mut self, arity: usize) -> Result<GateId, Error> {
        let mut inputs = Slots::new();
        inputs
            .try_reserve_exact(arity)
            .map_err(|_| Error::AllocationFailure)?;
        inputs.resize(arity, InputSlot::Empty);
        let gate = Gate::new(inputs);

        let id = if let Some(idx) = self.free.pop() {
            let entry = &mut self.entries[idx as usize];
            entry.generation += 1;
            entry.gate = Some(gate);
            GateId::new(idx, entry.generation)
        } else {
            let idx = u32::try_from(self.entries.len()).map_err(|_| Error::AllocationFailure)?;
            self.entries
                .try_reserve(1)
                .map_err(|_| Error::AllocationFailure)?;
            self.entries.push(Entry {
                generation: 1,
                gate: Some(gate),
            });
            GateId::new(idx, 1)
        };
        self.len += 1;
        Ok(id)
    }

    /// Destroys a gate, detaching it from every producer and consumer first.
    ///
    /// Consumer slots that were fed by this gate become [`Input::Empty`].
    ///
    /// Returns `false` (and does nothing) if `id` is not a live gate.
    pub fn destroy(&mut self, id: GateId) -> bool {
        let Some(arity) = self.arity(id) else {
            return false;
        };

        for slot in 0..arity {
            self.sever(id, slot);
        }
        while let Some(&last) = self.live(id).dependents.last() {
            self.sever(last.consumer, last.slot);
        }

        let entry = &mut self.entries[id.idx()];
        entry.gate = None;
        // A slot whose generation is exhausted, or that cannot be queued for
        // reuse, is retired.
        if entry.generation < u32::MAX && self.free.try_reserve(1).is_ok() {
            self.free.push(id.0);
        }
        self.len -= 1;
        true
    }

    /// Connects the output of `producer` to input `slot` of `consumer`.
    ///
    /// Whatever was previously connected to that slot is disconnected first.
    /// Connecting the producer that is already on the slot does nothing, so
    /// the producer's fan-out does not grow.
    ///
    /// A gate may feed its own input; evaluating it then reports
    /// [`Error::CycleDetected`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either handle is stale or `slot` is not
    ///   below the arity of `consumer`.
    /// - [`Error::AllocationFailure`] if the fan-out list cannot grow.
    ///
    /// The network is unchanged on error.
    pub fn connect_gate(
        &mut self,
        producer: GateId,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), Error> {
        self.check_live(producer)?;
        let current = self.slot(consumer, slot)?;
        if let InputSlot::Gate { producer: p, .. } = current
            && p == producer
        {
            return Ok(());
        }

        self.live_mut(producer)
            .dependents
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailure)?;

        // The old producer differs from `producer`, so this cannot disturb
        // the fan-out list we are about to append to.
        self.sever(consumer, slot);

        let dependents = &mut self.live_mut(producer).dependents;
        let back = dependents.len();
        dependents.push(Dependent { consumer, slot });
        self.live_mut(consumer).inputs[slot] = InputSlot::Gate { producer, back };
        Ok(())
    }

    /// Connects a caller-owned signal source to input `slot` of `consumer`.
    ///
    /// Whatever was previously connected to that slot is disconnected first.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `consumer` is stale or `slot` is not
    /// below its arity. The network is unchanged on error.
    pub fn connect_signal(
        &mut self,
        signal: &'s Cell<bool>,
        consumer: GateId,
        slot: usize,
    ) -> Result<(), Error> {
        self.slot(consumer, slot)?;
        self.sever(consumer, slot);
        self.live_mut(consumer).inputs[slot] = InputSlot::Signal(Signal::new(signal));
        Ok(())
    }

    /// Disconnects input `slot` of `consumer`, leaving it [`Input::Empty`].
    ///
    /// Disconnecting an empty slot does nothing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `consumer` is stale or `slot` is not
    /// below its arity.
    pub fn disconnect(&mut self, consumer: GateId, slot: usize) -> Result<(), Error> {
        self.slot(consumer, slot)?;
        self.sever(consumer, slot);
        Ok(())
    }

    /// Returns what is connected to input `slot` of `gate`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `gate` is stale or `slot` is not below
    /// its arity.
    pub fn input_at(&self, gate: GateId, slot: usize) -> Result<Input<'s>, Error> {
        self.slot(gate, slot).map(InputSlot::view)
    }

    /// Returns the number of input slots, across all consumers, fed by `gate`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `gate` is stale.
    pub fn fan_out(&self, gate: GateId) -> Result<usize, Error> {
        Ok(self.check_live(gate)?.dependents.len())
    }

    /// Returns the consumer recorded at position `index` of the fan-out list of `gate`.
    ///
    /// The order of the fan-out list is unspecified and changes as edges are
    /// removed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `gate` is stale or `index` is not below
    /// its fan-out.
    pub fn dependent_at(&self, gate: GateId, index: usize) -> Result<GateId, Error> {
        let dependents = &self.check_live(gate)?.dependents;
        dependents
            .get(index)
            .map(|d| d.consumer)
            .ok_or(Error::InvalidArgument(InvalidArgument::DependentOutOfRange {
                gate,
                index,
                fan_out: dependents.len(),
            }))
    }

    /// Returns the whole fan-out list of `gate`.
    ///
    /// A consumer appears once per slot it reads this gate on.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `gate` is stale.
    pub fn dependents(&self, gate: GateId) -> Result<&[Dependent], Error> {
        Ok(&self.check_live(gate)?.dependents)
    }

    pub(crate) fn gate(&self, id: GateId) -> Option<&Gate<'s>> {
        self.entries
            .get(id.idx())
            .filter(|entry| entry.generation == id.1)
            .and_then(|entry| entry.gate.as_ref())
    }

    fn gate_mut(&mut self, id: GateId) -> Option<&mut Gate<'s>> {
        self.entries
            .get_mut(id.idx())
            .filter(|entry| entry.generation == id.1)
            .and_then(|entry| entry.gate.as_mut())
    }

    /// Looks up a gate that is known to be live.
    ///
    /// Used for handles read out of the graph itself, which never outlive
    /// their gates because destruction severs every edge first.
    pub(crate) fn live(&self, id: GateId) -> &Gate<'s> {
        self.gate(id).expect("edges only reference live gates")
    }

    pub(crate) fn live_mut(&mut self, id: GateId) -> &mut Gate<'s> {
        self.gate_mut(id).expect("edges only reference live gates")
    }

    pub(crate) fn check_live(&self, id: GateId) -> Result<&Gate<'s>, Error> {
        self.gate(id)
            .ok_or(Error::InvalidArgument(InvalidArgument::StaleGate(id)))
    }

    fn slot(&self, gate: GateId, slot: usize) -> Result<InputSlot<'s>, Error> {
        let g = self.check_live(gate)?;
        g.inputs.get(slot).copied().ok_or(Error::InvalidArgument(
            InvalidArgument::SlotOutOfRange {
                gate,
                slot,
                arity: g.arity(),
            },
        ))
    }

    /// Clears input `slot` of `consumer`, removing the mirrored fan-out entry.
    ///
    /// The fan-out entry is swap-removed; the entry moved into its place gets
    /// its consumer's back index rewritten.
    fn sever(&mut self, consumer: GateId, slot: usize) {
        let old = mem::replace(&mut self.live_mut(consumer).inputs[slot], InputSlot::Empty);
        let InputSlot::Gate { producer, back } = old else {
            return;
        };

        let dependents = &mut self.live_mut(producer).dependents;
        debug_assert_eq!(
            dependents[back],
            Dependent { consumer, slot },
            "fan-out entry mirrors the slot"
        );
        dependents.swap_remove(back);
        let Some(&moved) = dependents.get(back) else {
            return;
        };

        match &mut self.live_mut(moved.consumer).inputs[moved.slot] {
            InputSlot::Gate { back: b, .. } => *b = back,
            other => debug_assert!(false, "fan-out entry points at {other:?}"),
        }
    }
}
