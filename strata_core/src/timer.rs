// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline queue with cancellation tokens.
//!
//! [`TimerQueue`] stands in for `setTimeout`/`clearTimeout` without binding
//! to any runtime. Scheduling returns a [`TimerToken`]; the owner polls
//! [`pop_due`](TimerQueue::pop_due) with the current [`HostTime`] and handles
//! each expired payload. Timers sharing a deadline fire in scheduling order.

use alloc::collections::BTreeMap;

use crate::time::HostTime;

/// Cancellation handle for a scheduled timer.
///
/// Tokens are never reused within one queue, so cancelling a token whose
/// timer already fired is a harmless no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

/// A queue of payloads keyed by deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(HostTime, u64), T>,
    deadlines: BTreeMap<u64, HostTime>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to fire at `at`.
    pub fn schedule(&mut self, at: HostTime, payload: T) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((at, seq), payload);
        self.deadlines.insert(seq, at);
        TimerToken(seq)
    }

    /// Cancels a pending timer, returning whether it was still armed.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.deadlines.remove(&token.0) {
            Some(at) => self.entries.remove(&(at, token.0)).is_some(),
            None => false,
        }
    }

    /// Returns whether `token` refers to a timer that has not fired or been
    /// cancelled.
    #[must_use]
    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.deadlines.contains_key(&token.0)
    }

    /// Removes and returns the earliest timer whose deadline is at or before
    /// `now`.
    pub fn pop_due(&mut self, now: HostTime) -> Option<(TimerToken, T)> {
        let (&(at, seq), _) = self.entries.first_key_value()?;
        if at > now {
            return None;
        }
        let payload = self.entries.remove(&(at, seq))?;
        self.deadlines.remove(&seq);
        Some((TimerToken(seq), payload))
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.entries.first_key_value().map(|(&(at, _), _)| at)
    }

    /// Returns the number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no timers are armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
