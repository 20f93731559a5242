// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topological ordering of the gates a request depends on.
//!
//! The traversal is an iterative depth-first search over input slots with an
//! explicit frame stack, so arbitrarily deep networks never recurse. Each gate
//! carries a three-state mark ([`VisitState`]); a producer found
//! `InProgress` closes a cycle. Gates are appended to the order when their
//! last input resolves, which is already "producers before consumers".

use alloc::vec::Vec;

use crate::error::{Error, InvalidArgument};
use crate::gate::{InputSlot, VisitState};
use crate::id::GateId;
use crate::network::Network;
use crate::scratch::{EvalScratch, Frame};

fn reserve<T>(vec: &mut Vec<T>) -> Result<(), Error> {
    vec.try_reserve(1).map_err(|_| Error::AllocationFailure)
}

impl Network<'_> {
    /// Returns the requested gates and everything they depend on, producers first.
    ///
    /// `order[i]` never depends on `order[j]` for `j > i`. Every requested
    /// gate appears exactly once.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `roots` is empty, names a stale gate, or
    ///   names a gate twice.
    /// - [`Error::UnresolvedInput`] if a required gate has an empty slot.
    /// - [`Error::CycleDetected`] if a required gate depends on itself.
    /// - [`Error::AllocationFailure`] if traversal storage cannot grow.
    ///
    /// # Example
    ///
    /// ```
    /// use core::cell::Cell;
    /// use understory_nand::Network;
    ///
    /// let s = Cell::new(true);
    /// let mut net = Network::new();
    /// let a = net.create(1).unwrap();
    /// let b = net.create(1).unwrap();
    /// net.connect_signal(&s, a, 0).unwrap();
    /// net.connect_gate(a, b, 0).unwrap();
    ///
    /// assert_eq!(net.topological_order(&[b]).unwrap(), vec![a, b]);
    /// ```
    pub fn topological_order(&mut self, roots: &[GateId]) -> Result<Vec<GateId>, Error> {
        let mut scratch = EvalScratch::new();
        self.topological_order_with_scratch(roots, &mut scratch)?;
        Ok(scratch.order)
    }

    /// Like [`topological_order`](Self::topological_order), reusing `scratch`.
    ///
    /// On success the order is available from [`EvalScratch::order`] and is
    /// also returned as a slice.
    ///
    /// # Errors
    ///
    /// Same as [`topological_order`](Self::topological_order).
    pub fn topological_order_with_scratch<'a>(
        &mut self,
        roots: &[GateId],
        scratch: &'a mut EvalScratch,
    ) -> Result<&'a [GateId], Error> {
        self.sort(roots, scratch)?;
        Ok(&scratch.order)
    }

    /// Validates `roots` and fills `scratch.order`.
    ///
    /// Visit marks are restored to `Unvisited` whether or not the sort succeeds.
    pub(crate) fn sort(&mut self, roots: &[GateId], scratch: &mut EvalScratch) -> Result<(), Error> {
        scratch.reset();
        self.check_request(roots, scratch)?;

        let result = roots
            .iter()
            .try_for_each(|&root| self.visit_from(root, scratch));

        for &id in &scratch.touched {
            self.live_mut(id).visit = VisitState::Unvisited;
        }
        scratch.touched.clear();
        scratch.frames.clear();
        result
    }

    fn check_request(&self, roots: &[GateId], scratch: &mut EvalScratch) -> Result<(), Error> {
        if roots.is_empty() {
            return Err(InvalidArgument::EmptyRequest.into());
        }
        scratch
            .requested
            .try_reserve(roots.len())
            .map_err(|_| Error::AllocationFailure)?;
        for &root in roots {
            self.check_live(root)?;
            if !scratch.requested.insert(root) {
                return Err(InvalidArgument::DuplicateGate(root).into());
            }
        }
        Ok(())
    }

    /// Marks `id` as in progress and pushes a frame for it.
    ///
    /// Both buffers are reserved before the mark is set, so a gate is never
    /// marked without being recorded for cleanup.
    fn enter(&mut self, id: GateId, scratch: &mut EvalScratch) -> Result<(), Error> {
        reserve(&mut scratch.touched)?;
        reserve(&mut scratch.frames)?;
        self.live_mut(id).visit = VisitState::InProgress;
        scratch.touched.push(id);
        scratch.frames.push(Frame { gate: id, next: 0 });
        Ok(())
    }

    fn visit_from(&mut self, root: GateId, scratch: &mut EvalScratch) -> Result<(), Error> {
        if self.live(root).visit == VisitState::Done {
            return Ok(());
        }
        self.enter(root, scratch)?;

        while let Some(&Frame { gate: id, next }) = scratch.frames.last() {
            let gate = self.live(id);
            let Some(&input) = gate.inputs.get(next) else {
                // Every input is resolved.
                reserve(&mut scratch.order)?;
                scratch.frames.pop();
                self.live_mut(id).visit = VisitState::Done;
                scratch.order.push(id);
                continue;
            };

            let advance = match input {
                InputSlot::Empty => {
                    return Err(Error::UnresolvedInput { gate: id, slot: next });
                }
                InputSlot::Signal(_) => true,
                InputSlot::Gate { producer, .. } => {
                    let state = self.live(producer).visit;
                    match state {
                        VisitState::Done => true,
                        VisitState::InProgress => {
                            return Err(Error::CycleDetected { gate: producer });
                        }
                        VisitState::Unvisited => {
                            // Revisit this slot once the producer is done.
                            self.enter(producer, scratch)?;
                            false
                        }
                    }
                }
            };
            if advance && let Some(frame) = scratch.frames.last_mut() {
                frame.next += 1;
            }
        }
        Ok(())
    }
}
