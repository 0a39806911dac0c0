// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load lifecycle tracking: spinners, error badges, stall warnings and
//! deduplicated failure alerts.
//!
//! Loads are counted per *display name*, not per handle: one visual layer
//! issues many tile requests that share a single spinner. Two layers with the
//! same name therefore share one counter.
//!
//! ```text
//!  load start ──► pending += 1 ──► spinner on, stale error cleared,
//!                                  stall timer (re)armed
//!  load end   ──► settle timer ──► pending -= 1 ──► at 0: stall timer
//!  load error ──► settle timer ──┘                  cancelled, entry dropped,
//!                                                   spinners cleared
//!                                  (error) ──► error badge, reconcile if idle
//!  stall fire ──► one warning, timer disarmed, count kept
//! ```
//!
//! Feature sources load atomically and only report errors; those set the
//! error badge directly without touching the counters.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::badge::BadgeBoard;
use crate::config::ControlConfig;
use crate::handle::{HandleId, HandleStore, LoadFamily};
use crate::signal::{Notice, NoticeKind, Signal};
use crate::time::{Duration, HostTime};
use crate::timer::{TimerQueue, TimerToken};
use crate::trace::{LoadSettleEvent, LoadStartEvent, ReconcileEvent, StallEvent, Tracer};

/// Payload of a load-tracking timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadTimer {
    /// Fires when loads for `name` have been pending for the stall timeout.
    Stall {
        /// Display name.
        name: String,
    },
    /// Fires after the settle delay that follows a load end or error.
    Settle {
        /// Display name.
        name: String,
        /// Handle that reported the completion.
        handle: HandleId,
        /// Whether the load failed.
        failed: bool,
    },
}

/// Counter entry for one display name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Loads started and not yet settled.
    pub pending: u32,
    /// Armed stall timer, if any.
    pub stall: Option<TimerToken>,
}

/// Everything a tracker operation may touch besides the tracker itself.
pub(crate) struct LoadContext<'a> {
    pub(crate) now: HostTime,
    pub(crate) store: &'a HandleStore,
    pub(crate) badges: &'a mut BadgeBoard,
    pub(crate) timers: &'a mut TimerQueue<LoadTimer>,
    pub(crate) outbound: &'a mut Vec<Signal>,
    pub(crate) tracer: &'a mut Tracer,
}

/// Per-name load counters plus the known-error set.
#[derive(Clone, Debug)]
pub struct LoadTracker {
    entries: BTreeMap<String, LoadState>,
    known_errors: BTreeSet<HandleId>,
    stall_timeout: Duration,
    settle_delay: Duration,
}

impl LoadTracker {
    /// Creates an idle tracker with the timeouts from `config`.
    #[must_use]
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            known_errors: BTreeSet::new(),
            stall_timeout: config.stall_timeout,
            settle_delay: config.settle_delay,
        }
    }

    /// Returns the counter entry for a display name.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<LoadState> {
        self.entries.get(name).copied()
    }

    /// Returns the pending count for a display name (0 when untracked).
    #[must_use]
    pub fn pending(&self, name: &str) -> u32 {
        self.entries.get(name).map_or(0, |s| s.pending)
    }

    /// Returns whether no load is pending under any name.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.values().all(|s| s.pending == 0)
    }

    /// Returns whether a handle's error has already been alerted.
    #[must_use]
    pub fn is_known_error(&self, id: HandleId) -> bool {
        self.known_errors.contains(&id)
    }

    /// Drops the error memory of a handle so a later failure re-alerts.
    pub fn forget_error(&mut self, id: HandleId) {
        self.known_errors.remove(&id);
    }

    /// Drops all bookkeeping for a removed handle.
    ///
    /// The counter entry is released only when no other live handle shares
    /// the name.
    pub(crate) fn forget_handle(
        &mut self,
        id: HandleId,
        name: &str,
        store: &HandleStore,
        timers: &mut TimerQueue<LoadTimer>,
    ) {
        self.known_errors.remove(&id);
        if store.with_name(name).any(|other| other != id) {
            return;
        }
        if let Some(state) = self.entries.remove(name) {
            if let Some(token) = state.stall {
                timers.cancel(token);
            }
            log::debug!("released load counter for removed layer {name:?}");
        }
    }

    pub(crate) fn start(&mut self, cx: &mut LoadContext<'_>, id: HandleId) {
        let store = cx.store;
        if !store.source(id).kind.family().shows_spinner() {
            return;
        }
        let name = store.name(id);
        let state = self.entries.entry(String::from(name)).or_default();
        state.pending += 1;

        if !cx.badges.has_spinner(id) {
            cx.badges.set_spinner(id, true);
            if cx.badges.set_error(id, false) {
                log::debug!("cleared stale error badge of {name:?}");
            }
            self.known_errors.remove(&id);
        }

        if let Some(token) = state.stall.take() {
            cx.timers.cancel(token);
        }
        state.stall = Some(cx.timers.schedule(
            cx.now.saturating_add(self.stall_timeout),
            LoadTimer::Stall {
                name: String::from(name),
            },
        ));

        cx.tracer.load_start(&LoadStartEvent {
            at: cx.now,
            handle: id,
            name,
            pending: state.pending,
        });
    }

    pub(crate) fn end(&mut self, cx: &mut LoadContext<'_>, id: HandleId) {
        if cx.store.source(id).kind.family() == LoadFamily::Feature {
            return;
        }
        self.schedule_settle(cx, id, false);
    }

    pub(crate) fn error(&mut self, cx: &mut LoadContext<'_>, id: HandleId) {
        if cx.store.source(id).kind.family() == LoadFamily::Feature {
            cx.badges.set_error(id, true);
            if self.is_idle() {
                self.reconcile(cx);
            }
            return;
        }
        self.schedule_settle(cx, id, true);
    }

    fn schedule_settle(&self, cx: &mut LoadContext<'_>, id: HandleId, failed: bool) {
        cx.timers.schedule(
            cx.now.saturating_add(self.settle_delay),
            LoadTimer::Settle {
                name: String::from(cx.store.name(id)),
                handle: id,
                failed,
            },
        );
    }

    /// Handles an expired timer.
    pub(crate) fn fire(&mut self, cx: &mut LoadContext<'_>, token: TimerToken, timer: LoadTimer) {
        match timer {
            LoadTimer::Stall { name } => self.stall(cx, token, &name),
            LoadTimer::Settle {
                name,
                handle,
                failed,
            } => self.settle(cx, &name, handle, failed),
        }
    }

    fn stall(&mut self, cx: &mut LoadContext<'_>, token: TimerToken, name: &str) {
        let Some(state) = self.entries.get_mut(name) else {
            return;
        };
        if state.stall != Some(token) || state.pending == 0 {
            return;
        }
        state.stall = None;
        log::warn!("{name:?} still has {} pending loads", state.pending);
        cx.tracer.stall(&StallEvent {
            at: cx.now,
            name,
            pending: state.pending,
        });
        cx.outbound.push(Signal::Notice(Notice {
            kind: NoticeKind::Warning,
            message: format!("Layer \"{name}\" is taking a long time to load"),
            handles: cx.store.with_name(name).collect(),
        }));
    }

    fn settle(&mut self, cx: &mut LoadContext<'_>, name: &str, id: HandleId, failed: bool) {
        let pending = match self.entries.get_mut(name) {
            Some(state) => {
                state.pending = state.pending.saturating_sub(1);
                state.pending
            }
            None => 0,
        };
        if pending == 0 {
            if let Some(state) = self.entries.remove(name)
                && let Some(token) = state.stall
            {
                cx.timers.cancel(token);
            }
            for other in cx.store.with_name(name) {
                cx.badges.set_spinner(other, false);
            }
        }
        cx.tracer.load_settle(&LoadSettleEvent {
            at: cx.now,
            name,
            pending,
            failed,
        });

        if failed && cx.store.is_alive(id) {
            cx.badges.set_error(id, true);
            if self.is_idle() {
                self.reconcile(cx);
            }
        }
    }

    /// Alerts visible errored handles that have not been alerted yet and
    /// forgets handles whose badge went away.
    pub(crate) fn reconcile(&mut self, cx: &mut LoadContext<'_>) {
        let fresh: Vec<HandleId> = cx
            .badges
            .errored()
            .filter(|&id| {
                cx.store.is_alive(id) && cx.store.visible(id) && !self.known_errors.contains(&id)
            })
            .collect();

        self.known_errors
            .retain(|&id| cx.store.is_alive(id) && cx.badges.has_error(id));
        self.known_errors.extend(fresh.iter().copied());

        cx.tracer.reconcile(&ReconcileEvent {
            newly_errored: fresh.len(),
            known: self.known_errors.len(),
        });

        let message = match fresh.as_slice() {
            [] => return,
            [one] => format!("Layer \"{}\" failed to load", cx.store.name(*one)),
            _ => String::from("Several layers failed to load"),
        };
        log::warn!("{message}");
        cx.outbound.push(Signal::Notice(Notice {
            kind: NoticeKind::Alert,
            message,
            handles: fresh,
        }));
    }
}
