// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a shared
//! byte buffer as little-endian records. The coordinator owns its sink, so
//! keep a clone of the recorder to read the buffer back. [`decode`] turns the
//! bytes into an iterator of [`RecordedEvent`].
//!
//! Handle ids are recorded as their slot index and generation.

use std::cell::RefCell;
use std::rc::Rc;

use strata_core::time::HostTime;
use strata_core::trace::{
    LoadSettleEvent, LoadStartEvent, RangeEvent, ReconcileEvent, ReorderEvent, SearchEvent,
    StallEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LOAD_START: u8 = 1;
const TAG_LOAD_SETTLE: u8 = 2;
const TAG_STALL: u8 = 3;
const TAG_RECONCILE: u8 = 4;
const TAG_RANGE: u8 = 5;
const TAG_REORDER: u8 = 6;
const TAG_SEARCH: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
///
/// Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.buf.borrow_mut().clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&self, v: u8) {
        self.buf.borrow_mut().push(v);
    }

    fn write_u32(&self, v: u32) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&self, v: u64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&self, v: i64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }

    fn write_str(&self, s: &str) {
        let bytes = s.as_bytes();
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        self.write_u32(len);
        self.buf
            .borrow_mut()
            .extend_from_slice(&bytes[..len as usize]);
    }
}

impl TraceSink for RecorderSink {
    fn on_load_start(&mut self, e: &LoadStartEvent<'_>) {
        self.write_u8(TAG_LOAD_START);
        self.write_u64(e.at.millis());
        self.write_u32(e.handle.index());
        self.write_u32(e.handle.generation());
        self.write_str(e.name);
        self.write_u32(e.pending);
    }

    fn on_load_settle(&mut self, e: &LoadSettleEvent<'_>) {
        self.write_u8(TAG_LOAD_SETTLE);
        self.write_u64(e.at.millis());
        self.write_str(e.name);
        self.write_u32(e.pending);
        self.write_u8(u8::from(e.failed));
    }

    fn on_stall(&mut self, e: &StallEvent<'_>) {
        self.write_u8(TAG_STALL);
        self.write_u64(e.at.millis());
        self.write_str(e.name);
        self.write_u32(e.pending);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.write_u8(TAG_RECONCILE);
        self.write_count(e.newly_errored);
        self.write_count(e.known);
    }

    fn on_range(&mut self, e: &RangeEvent) {
        self.write_u8(TAG_RANGE);
        self.write_i64(e.rounded_zoom);
        self.write_count(e.out_of_range);
        self.write_count(e.crossed);
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        self.write_u8(TAG_REORDER);
        self.write_count(e.count);
    }

    fn on_search(&mut self, e: &SearchEvent<'_>) {
        self.write_u8(TAG_SEARCH);
        self.write_str(e.query);
        self.write_count(e.revealed);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`LoadStartEvent`].
    LoadStart {
        /// Host time.
        at: HostTime,
        /// Handle slot index.
        handle_index: u32,
        /// Handle generation.
        handle_generation: u32,
        /// Display name.
        name: String,
        /// Pending count after the increment.
        pending: u32,
    },
    /// A [`LoadSettleEvent`].
    LoadSettle {
        /// Host time.
        at: HostTime,
        /// Display name.
        name: String,
        /// Pending count after the decrement.
        pending: u32,
        /// Whether the load failed.
        failed: bool,
    },
    /// A [`StallEvent`].
    Stall {
        /// Host time.
        at: HostTime,
        /// Display name.
        name: String,
        /// Loads still pending.
        pending: u32,
    },
    /// A [`ReconcileEvent`].
    Reconcile {
        /// Newly alerted handles.
        newly_errored: u64,
        /// Known-error set size.
        known: u64,
    },
    /// A [`RangeEvent`].
    Range {
        /// Rounded zoom.
        rounded_zoom: i64,
        /// Out-of-range handles.
        out_of_range: u64,
        /// Handles that crossed out of range.
        crossed: u64,
    },
    /// A [`ReorderEvent`].
    Reorder {
        /// Reindexed handles.
        count: u64,
    },
    /// A [`SearchEvent`].
    Search {
        /// The raw query.
        query: String,
        /// Revealed layer items.
        revealed: u64,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_i64(&mut self) -> Option<i64> {
        Some(i64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_str(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn decode_load_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LoadStart {
            at: HostTime(self.read_u64()?),
            handle_index: self.read_u32()?,
            handle_generation: self.read_u32()?,
            name: self.read_str()?,
            pending: self.read_u32()?,
        })
    }

    fn decode_load_settle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LoadSettle {
            at: HostTime(self.read_u64()?),
            name: self.read_str()?,
            pending: self.read_u32()?,
            failed: self.read_u8()? != 0,
        })
    }

    fn decode_stall(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Stall {
            at: HostTime(self.read_u64()?),
            name: self.read_str()?,
            pending: self.read_u32()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LOAD_START => self.decode_load_start(),
            TAG_LOAD_SETTLE => self.decode_load_settle(),
            TAG_STALL => self.decode_stall(),
            TAG_RECONCILE => Some(RecordedEvent::Reconcile {
                newly_errored: self.read_u64()?,
                known: self.read_u64()?,
            }),
            TAG_RANGE => Some(RecordedEvent::Range {
                rounded_zoom: self.read_i64()?,
                out_of_range: self.read_u64()?,
                crossed: self.read_u64()?,
            }),
            TAG_REORDER => Some(RecordedEvent::Reorder {
                count: self.read_u64()?,
            }),
            TAG_SEARCH => Some(RecordedEvent::Search {
                query: self.read_str()?,
                revealed: self.read_u64()?,
            }),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
