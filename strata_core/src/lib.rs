// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer catalog and control-state coordination for web map layer panels.
//!
//! `strata_core` keeps a hierarchical catalog of map layers synchronized
//! with the live state of a map-rendering engine. It is `no_std` compatible
//! (with `alloc`) and sans-IO: the host feeds engine events and the current
//! time in, and reads render trees, change sets and signals out.
//!
//! # Architecture
//!
//! ```text
//!   Render engine callbacks ──► EngineEvent ──┐
//!   User input (search, sort, sliders, …) ────┤
//!   Host clock ──► advance(now) ──────────────┤
//!                                             ▼
//!                               ControlStateCoordinator
//!                                             │
//!            ┌────────────────┬───────────────┼──────────────────┐
//!            ▼                ▼               ▼                  ▼
//!      render_list()    active_stack()   evaluate()        drain_outbound()
//!            │                              │                    │
//!      ListTree::diff()            ViewChanges ──► Presenter    Signal
//! ```
//!
//! **[`catalog`]**: Category forest and layer configuration built from a
//! JSON snapshot, with sort modes.
//!
//! **[`search`]**: Fuzzy index over category and layer names and the
//! visibility/expansion rules for results.
//!
//! **[`list`]**: Pure layer-list rendering and incremental diffing.
//!
//! **[`handle`]**: Struct-of-arrays mirror of the engine's layer handles
//! with generational ids and dirty channels ([`dirty`]).
//!
//! **[`badge`]**: Spinner, error and out-of-range badges with change
//! tracking.
//!
//! **[`load`]**: Per-name load counters, settle and stall timers, and
//! deduplicated failure alerts.
//!
//! **[`range`]**: Zoom-range validation and crossing detection.
//!
//! **[`stack`]**: The active layer stack and user reordering.
//!
//! **[`style`]**: Two-step named-style discovery and selection.
//!
//! **[`slider`]**: Opacity and saturation controls.
//!
//! **[`coordinator`]**: [`ControlStateCoordinator`](coordinator::ControlStateCoordinator),
//! the single owner of all of the above.
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) trait that
//! platform backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod badge;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod dirty;
pub mod error;
pub mod event;
pub mod handle;
pub mod list;
pub mod load;
pub mod range;
pub mod search;
pub mod signal;
pub mod slider;
pub mod stack;
pub mod style;
pub mod time;
pub mod timer;
pub mod trace;
