// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event-log exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes a JSON array with one object per event.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
///
/// Every object carries an `"event"` name; timed events also carry `"t_ms"`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(to_value).collect();
    serde_json::to_writer(&mut *writer, &events).map_err(io::Error::from)?;
    writer.flush()
}

fn to_value(recorded: RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::LoadStart {
            at,
            handle_index,
            handle_generation,
            name,
            pending,
        } => json!({
            "event": "LoadStart",
            "t_ms": at.millis(),
            "handle": [handle_index, handle_generation],
            "name": name,
            "pending": pending,
        }),
        RecordedEvent::LoadSettle {
            at,
            name,
            pending,
            failed,
        } => json!({
            "event": "LoadSettle",
            "t_ms": at.millis(),
            "name": name,
            "pending": pending,
            "failed": failed,
        }),
        RecordedEvent::Stall { at, name, pending } => json!({
            "event": "Stall",
            "t_ms": at.millis(),
            "name": name,
            "pending": pending,
        }),
        RecordedEvent::Reconcile {
            newly_errored,
            known,
        } => json!({
            "event": "Reconcile",
            "newly_errored": newly_errored,
            "known": known,
        }),
        RecordedEvent::Range {
            rounded_zoom,
            out_of_range,
            crossed,
        } => json!({
            "event": "Range",
            "rounded_zoom": rounded_zoom,
            "out_of_range": out_of_range,
            "crossed": crossed,
        }),
        RecordedEvent::Reorder { count } => json!({
            "event": "Reorder",
            "count": count,
        }),
        RecordedEvent::Search { query, revealed } => json!({
            "event": "Search",
            "query": query,
            "revealed": revealed,
        }),
    }
}
