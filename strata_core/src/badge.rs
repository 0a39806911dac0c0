// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-handle status badges shown next to list items.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;
use crate::handle::HandleId;

/// Zoom-range status of a handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RangeStatus {
    /// Renders at the current zoom.
    #[default]
    InRange,
    /// Rounded zoom is above the layer's maximum.
    Overzoomed,
    /// Rounded zoom tripped the minimum-zoom comparison.
    Underzoomed,
}

impl RangeStatus {
    /// Returns whether the out-of-range badge is shown.
    #[must_use]
    pub const fn is_out_of_range(self) -> bool {
        !matches!(self, Self::InRange)
    }

    /// Tooltip telling the user which way to zoom.
    #[must_use]
    pub const fn tooltip(self) -> Option<&'static str> {
        match self {
            Self::InRange => None,
            Self::Overzoomed => Some("Zoom out to see this layer"),
            Self::Underzoomed => Some("Zoom in to see this layer"),
        }
    }
}

/// Badge state of one handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Badges {
    /// A load is pending for the handle's display name.
    pub spinner: bool,
    /// The last load failed and no load has started since.
    pub error: bool,
    /// Zoom-range status.
    pub range: RangeStatus,
}

/// Slots whose badges changed since the previous
/// [`BadgeBoard::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BadgeChanges {
    /// Raw slot indices of changed handles.
    pub changed: Vec<u32>,
}

/// Badge state for every handle, with change tracking.
#[derive(Debug)]
pub struct BadgeBoard {
    badges: BTreeMap<HandleId, Badges>,
    dirty: DirtyTracker<u32>,
}

impl Default for BadgeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            badges: BTreeMap::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// Returns the badges of a handle (all clear when never set).
    #[must_use]
    pub fn get(&self, id: HandleId) -> Badges {
        self.badges.get(&id).copied().unwrap_or_default()
    }

    /// Returns whether the handle shows a spinner.
    #[must_use]
    pub fn has_spinner(&self, id: HandleId) -> bool {
        self.get(id).spinner
    }

    /// Returns whether the handle shows an error badge.
    #[must_use]
    pub fn has_error(&self, id: HandleId) -> bool {
        self.get(id).error
    }

    /// Shows or hides the spinner. Returns whether anything changed.
    pub fn set_spinner(&mut self, id: HandleId, on: bool) -> bool {
        self.update(id, |b| b.spinner = on)
    }

    /// Shows or hides the error badge. Returns whether anything changed.
    pub fn set_error(&mut self, id: HandleId, on: bool) -> bool {
        self.update(id, |b| b.error = on)
    }

    /// Sets the zoom-range status. Returns whether anything changed.
    pub fn set_range(&mut self, id: HandleId, status: RangeStatus) -> bool {
        self.update(id, |b| b.range = status)
    }

    /// Drops all badge state of a removed handle.
    pub fn forget(&mut self, id: HandleId) {
        if self.badges.remove(&id).is_some() {
            self.dirty.mark(id.index(), dirty::BADGE);
        }
    }

    /// Handles currently showing an error badge, in id order.
    pub fn errored(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.badges
            .iter()
            .filter(|(_, b)| b.error)
            .map(|(id, _)| *id)
    }

    /// Drains badge changes.
    pub fn evaluate(&mut self) -> BadgeChanges {
        BadgeChanges {
            changed: self
                .dirty
                .drain(dirty::BADGE)
                .deterministic()
                .run()
                .collect(),
        }
    }

    fn update(&mut self, id: HandleId, f: impl FnOnce(&mut Badges)) -> bool {
        let entry = self.badges.entry(id).or_default();
        let before = *entry;
        f(entry);
        let changed = *entry != before;
        if *entry == Badges::default() {
            self.badges.remove(&id);
        }
        if changed {
            self.dirty.mark(id.index(), dirty::BADGE);
        }
        changed
    }
}
