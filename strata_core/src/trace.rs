// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the control-state coordinator.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! coordinator calls at each decision point. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed [`TraceSink`]. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing and installed sinks
//! are dropped. When **on**, each method performs a single `Option` branch
//! before dispatching.

use alloc::boxed::Box;

use crate::handle::HandleId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a load starts for a tracked family.
#[derive(Clone, Copy, Debug)]
pub struct LoadStartEvent<'a> {
    /// Host time of the event.
    pub at: HostTime,
    /// Handle that issued the request.
    pub handle: HandleId,
    /// Display name the counter is keyed by.
    pub name: &'a str,
    /// Pending count after the increment.
    pub pending: u32,
}

/// Emitted when a settle delay elapses and the counter is decremented.
#[derive(Clone, Copy, Debug)]
pub struct LoadSettleEvent<'a> {
    /// Host time of the event.
    pub at: HostTime,
    /// Display name.
    pub name: &'a str,
    /// Pending count after the decrement.
    pub pending: u32,
    /// Whether the settled load failed.
    pub failed: bool,
}

/// Emitted when a stall timer fires while loads are still pending.
#[derive(Clone, Copy, Debug)]
pub struct StallEvent<'a> {
    /// Host time of the event.
    pub at: HostTime,
    /// Display name.
    pub name: &'a str,
    /// Loads still pending.
    pub pending: u32,
}

/// Emitted after each error reconciliation pass.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileEvent {
    /// Visible errored handles seen for the first time.
    pub newly_errored: usize,
    /// Size of the known-error set after the pass.
    pub known: usize,
}

/// Emitted after each zoom-range evaluation.
#[derive(Clone, Copy, Debug)]
pub struct RangeEvent {
    /// Ceiling of the view zoom.
    pub rounded_zoom: i64,
    /// Handles out of range at this zoom.
    pub out_of_range: usize,
    /// Visible handles that just crossed out of range.
    pub crossed: usize,
}

/// Emitted after a user reorder of the active stack.
#[derive(Clone, Copy, Debug)]
pub struct ReorderEvent {
    /// Number of reindexed handles.
    pub count: usize,
}

/// Emitted after a search query is applied.
#[derive(Clone, Copy, Debug)]
pub struct SearchEvent<'a> {
    /// The raw query.
    pub query: &'a str,
    /// Layer items left visible; 0 when nothing is filtered.
    pub revealed: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the coordinator.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a tracked load starts.
    fn on_load_start(&mut self, e: &LoadStartEvent<'_>) {
        _ = e;
    }

    /// Called when a load settles.
    fn on_load_settle(&mut self, e: &LoadSettleEvent<'_>) {
        _ = e;
    }

    /// Called when a stall timer fires.
    fn on_stall(&mut self, e: &StallEvent<'_>) {
        _ = e;
    }

    /// Called after an error reconciliation pass.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called after a zoom-range evaluation.
    fn on_range(&mut self, e: &RangeEvent) {
        _ = e;
    }

    /// Called after a stack reorder.
    fn on_reorder(&mut self, e: &ReorderEvent) {
        _ = e;
    }

    /// Called after a search is applied.
    fn on_search(&mut self, e: &SearchEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional owned [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    };
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Emits a [`LoadStartEvent`].
    #[inline]
    pub fn load_start(&mut self, e: &LoadStartEvent<'_>) {
        dispatch!(self, on_load_start, e);
    }

    /// Emits a [`LoadSettleEvent`].
    #[inline]
    pub fn load_settle(&mut self, e: &LoadSettleEvent<'_>) {
        dispatch!(self, on_load_settle, e);
    }

    /// Emits a [`StallEvent`].
    #[inline]
    pub fn stall(&mut self, e: &StallEvent<'_>) {
        dispatch!(self, on_stall, e);
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        dispatch!(self, on_reconcile, e);
    }

    /// Emits a [`RangeEvent`].
    #[inline]
    pub fn range(&mut self, e: &RangeEvent) {
        dispatch!(self, on_range, e);
    }

    /// Emits a [`ReorderEvent`].
    #[inline]
    pub fn reorder(&mut self, e: &ReorderEvent) {
        dispatch!(self, on_reorder, e);
    }

    /// Emits a [`SearchEvent`].
    #[inline]
    pub fn search(&mut self, e: &SearchEvent<'_>) {
        dispatch!(self, on_search, e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
