// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Pending register writebacks

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::types::reg::{COUNT, Register};

/// Per-register FIFO of pending writebacks
///
/// Each entry records a write to a register which has been issued but not yet
/// retired, e.g. the issue cycle of a load. Entries are retired in the order
/// they were pushed for any given register.
#[derive(Clone, Debug)]
pub struct Queue<R: Register, T> {
    pending: [VecDeque<T>; COUNT],
    phantom: PhantomData<R>,
}

impl<R: Register, T> Default for Queue<R, T> {
    fn default() -> Self {
        Self {
            pending: core::array::from_fn(|_| VecDeque::new()),
            phantom: PhantomData,
        }
    }
}

impl<R: Register, T> Queue<R, T> {
    /// Record a new write in flight for the given register
    pub fn push(&mut self, reg: R, entry: T) {
        self.pending[reg.index()].push_back(entry);
    }

    /// Retire the oldest write in flight for the given register
    ///
    /// Returns `None` if no write is in flight.
    pub fn pop(&mut self, reg: R) -> Option<T> {
        self.pending[reg.index()].pop_front()
    }

    /// Retrieve the number of writes in flight for the given register
    pub fn len(&self, reg: R) -> usize {
        self.pending[reg.index()].len()
    }

    /// Check whether no write is in flight for any register
    pub fn is_empty(&self) -> bool {
        self.pending.iter().all(VecDeque::is_empty)
    }

    /// Iterate over all registers with writes in flight and their counts
    pub fn in_flight(&self) -> impl Iterator<Item = (R, usize)> + '_ {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_empty())
            .map(|(i, q)| (R::from_index(i), q.len()))
    }
}
