// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory NAND: mutable NAND gate networks with on-demand evaluation.
//!
//! This crate models a boolean circuit built only from NAND gates and
//! caller-owned signal sources, wired into an arbitrary directed graph. The
//! graph can be edited at any point, and any subset of gates can be evaluated
//! on demand, yielding each gate's output and the length of the longest
//! dependency chain (the critical path) feeding it.
//!
//! - **Network** ([`Network`]): an arena of gates addressed by generational
//!   [`GateId`]s. Edges are recorded on both ends, so disconnecting is O(1)
//!   regardless of fan-out, and destroying a gate leaves its consumers with
//!   empty slots instead of dangling references.
//! - **Signals** ([`Signal`]): borrowed [`Cell<bool>`](core::cell::Cell)s.
//!   Flip them with `Cell::set` between evaluations.
//! - **Topological order** ([`Network::topological_order`]): iterative
//!   depth-first search with an explicit frame stack; deep networks never
//!   recurse. Cycles and disconnected inputs are reported as errors.
//! - **Evaluation** ([`Network::evaluate`], [`Evaluation`]): one linear pass
//!   over the order computing NAND outputs and critical path lengths.
//! - **Scratch buffers** ([`EvalScratch`]): reusable traversal state for
//!   repeated evaluation without per-call allocation.
//! - **Tracing** ([`EvalTrace`], [`CriticalPathRecorder`]): observe evaluated
//!   gates and explain which chain is critical.
//!
//! ## Quick Start
//!
//! ```rust
//! use core::cell::Cell;
//! use understory_nand::Network;
//!
//! let a = Cell::new(true);
//! let b = Cell::new(true);
//!
//! let mut net = Network::new();
//! let g1 = net.create(2).unwrap();
//! let g2 = net.create(2).unwrap();
//!
//! // g1 = !(a & b), g2 = !(g1 & g1)
//! net.connect_signal(&a, g1, 0).unwrap();
//! net.connect_signal(&b, g1, 1).unwrap();
//! net.connect_gate(g1, g2, 0).unwrap();
//! net.connect_gate(g1, g2, 1).unwrap();
//!
//! let eval = net.evaluate(&[g1, g2]).unwrap();
//! assert_eq!(eval.signals(), &[false, true]);
//! assert_eq!(eval.critical_path(), 2);
//!
//! // Destroying g1 leaves both slots of g2 empty.
//! net.destroy(g1);
//! assert!(net.evaluate(&[g2]).is_err());
//! ```
//!
//! ## Errors
//!
//! Every fallible operation returns [`Error`]. Its [`kind`](Error::kind) is
//! one of:
//!
//! - `InvalidArgument`: stale handle, slot or index out of range, or an empty
//!   or duplicated evaluation request.
//! - `CycleDetected`: a requested gate transitively depends on itself.
//! - `UnresolvedInput`: a requested gate transitively depends on an empty slot.
//! - `AllocationFailure`: storage could not be reserved.
//!
//! Failing edits have no effect. Failing sorts and evaluations leave no
//! trace on the network; the next call starts from a clean state.
//!
//! ## Concurrency
//!
//! All operations are synchronous and run to completion. A [`Network`] is
//! neither `Send` nor `Sync` because it reads through shared
//! [`Cell`](core::cell::Cell)s; it lives on the thread that owns its signals.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod error;
mod eval;
mod gate;
mod id;
mod network;
mod scratch;
mod signal;
mod sort;
pub mod trace;

pub use error::{Error, ErrorKind, InvalidArgument};
pub use eval::Evaluation;
pub use gate::{Dependent, Input};
pub use id::GateId;
pub use network::Network;
pub use scratch::EvalScratch;
pub use signal::Signal;
pub use trace::{CriticalInput, CriticalPathRecorder, EvalTrace};
