// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    LoadSettleEvent, LoadStartEvent, RangeEvent, ReconcileEvent, ReorderEvent, SearchEvent,
    StallEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_load_start(&mut self, e: &LoadStartEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[load] t={}ms {:?} handle={}v{} pending={}",
            e.at.millis(),
            e.name,
            e.handle.index(),
            e.handle.generation(),
            e.pending,
        );
    }

    fn on_load_settle(&mut self, e: &LoadSettleEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[settle] t={}ms {:?} pending={}{}",
            e.at.millis(),
            e.name,
            e.pending,
            if e.failed { " FAILED" } else { "" },
        );
    }

    fn on_stall(&mut self, e: &StallEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[stall] t={}ms {:?} pending={}",
            e.at.millis(),
            e.name,
            e.pending,
        );
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        let _ = writeln!(
            self.writer,
            "[errors] new={} known={}",
            e.newly_errored, e.known,
        );
    }

    fn on_range(&mut self, e: &RangeEvent) {
        let _ = writeln!(
            self.writer,
            "[range] zoom={} out_of_range={} crossed={}",
            e.rounded_zoom, e.out_of_range, e.crossed,
        );
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        let _ = writeln!(self.writer, "[reorder] count={}", e.count);
    }

    fn on_search(&mut self, e: &SearchEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[search] {:?} revealed={}",
            e.query, e.revealed,
        );
    }
}
