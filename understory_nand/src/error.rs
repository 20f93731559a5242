// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for network edits and evaluation.

use core::fmt;

use crate::id::GateId;

/// Errors reported by [`Network`](crate::Network) operations.
///
/// Every error is terminal for the call that raised it. A failing call leaves
/// the connections of the network unchanged, and sort/evaluate calls restore
/// all per-gate scratch state before returning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The call was malformed (stale handle, index out of range, bad request).
    InvalidArgument(InvalidArgument),
    /// A requested gate transitively depends on itself.
    CycleDetected {
        /// The gate that was reached again while its own inputs were still being resolved.
        gate: GateId,
    },
    /// A requested gate transitively depends on a disconnected input.
    UnresolvedInput {
        /// The gate owning the empty slot.
        gate: GateId,
        /// The empty slot.
        slot: usize,
    },
    /// Storage for the operation could not be reserved.
    AllocationFailure,
}

/// Detail for [`Error::InvalidArgument`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The handle does not refer to a live gate.
    StaleGate(GateId),
    /// The slot index is not below the gate's arity.
    SlotOutOfRange {
        /// The gate being addressed.
        gate: GateId,
        /// The requested slot.
        slot: usize,
        /// The gate's arity.
        arity: usize,
    },
    /// The dependent index is not below the gate's fan-out.
    DependentOutOfRange {
        /// The gate being addressed.
        gate: GateId,
        /// The requested dependent index.
        index: usize,
        /// The gate's fan-out.
        fan_out: usize,
    },
    /// An evaluation or sort request named no gates.
    EmptyRequest,
    /// An evaluation or sort request named the same gate twice.
    DuplicateGate(GateId),
    /// The output buffer length differs from the number of requested gates.
    OutputLengthMismatch {
        /// Number of requested gates.
        expected: usize,
        /// Length of the provided buffer.
        actual: usize,
    },
}

/// Fieldless classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
    /// See [`Error::CycleDetected`].
    CycleDetected,
    /// See [`Error::UnresolvedInput`].
    UnresolvedInput,
    /// See [`Error::AllocationFailure`].
    AllocationFailure,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
            Self::UnresolvedInput { .. } => ErrorKind::UnresolvedInput,
            Self::AllocationFailure => ErrorKind::AllocationFailure,
        }
    }
}

impl From<InvalidArgument> for Error {
    fn from(value: InvalidArgument) -> Self {
        Self::InvalidArgument(value)
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleGate(gate) => write!(f, "{gate} is not a live gate"),
            Self::SlotOutOfRange { gate, slot, arity } => {
                write!(f, "slot {slot} is out of range for {gate} with arity {arity}")
            }
            Self::DependentOutOfRange {
                gate,
                index,
                fan_out,
            } => write!(
                f,
                "dependent {index} is out of range for {gate} with fan-out {fan_out}"
            ),
            Self::EmptyRequest => f.write_str("no gates were requested"),
            Self::DuplicateGate(gate) => write!(f, "{gate} was requested more than once"),
            Self::OutputLengthMismatch { expected, actual } => write!(
                f,
                "output buffer has length {actual} but {expected} gates were requested"
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(detail) => write!(f, "invalid argument: {detail}"),
            Self::CycleDetected { gate } => {
                write!(f, "{gate} depends on its own output")
            }
            Self::UnresolvedInput { gate, slot } => {
                write!(f, "slot {slot} of {gate} is not connected")
            }
            Self::AllocationFailure => f.write_str("allocation failure"),
        }
    }
}

impl core::error::Error for InvalidArgument {}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidArgument(detail) => Some(detail),
            _ => None,
        }
    }
}
