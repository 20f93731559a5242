// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed external signal sources.

use core::cell::Cell;
use core::fmt;
use core::ptr;

/// A boolean signal source owned by the caller.
///
/// A `Signal` borrows a [`Cell<bool>`] for the lifetime of the network it is
/// connected into. The network only reads it during evaluation, so the owner
/// can flip the value with [`Cell::set`] between evaluations.
///
/// Two signals compare equal when they borrow the same cell, regardless of the
/// value the cell currently holds.
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use understory_nand::Signal;
///
/// let a = Cell::new(true);
/// let b = Cell::new(true);
///
/// assert_eq!(Signal::new(&a), Signal::new(&a));
/// assert_ne!(Signal::new(&a), Signal::new(&b));
///
/// a.set(false);
/// assert!(!Signal::new(&a).get());
/// ```
#[derive(Copy, Clone)]
pub struct Signal<'s>(&'s Cell<bool>);

impl<'s> Signal<'s> {
    /// Wraps a caller-owned cell.
    #[must_use]
    pub const fn new(cell: &'s Cell<bool>) -> Self {
        Self(cell)
    }

    /// Reads the current value of the source.
    #[inline]
    #[must_use]
    pub fn get(self) -> bool {
        self.0.get()
    }

    /// Returns the borrowed cell.
    #[must_use]
    pub const fn cell(self) -> &'s Cell<bool> {
        self.0
    }
}

impl<'s> From<&'s Cell<bool>> for Signal<'s> {
    fn from(cell: &'s Cell<bool>) -> Self {
        Self::new(cell)
    }
}

impl PartialEq for Signal<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl Eq for Signal<'_> {}

impl fmt::Debug for Signal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal({:p} = {})", self.0, self.0.get())
    }
}
