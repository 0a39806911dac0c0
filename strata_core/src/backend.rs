// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Strata splits platform-specific work into *backend* crates. Each backend
//! provides:
//!
//! - **Time**: a `now() -> HostTime` free function reading the platform's
//!   monotonic clock, passed into every coordinator call.
//!
//! - **Event wiring**: translating the render engine's callbacks into
//!   [`EngineEvent`](crate::event::EngineEvent)s. Setup differs per engine,
//!   so it is not abstracted by a trait.
//!
//! - **Presenter**: implements [`Presenter`] to mirror drained changes onto
//!   native widgets (list item badges, engine layer properties).
//!
//! # Crate boundaries
//!
//! `strata_core` owns the data model, policies and this contract module.
//! Backend crates depend on `strata_core` and provide platform glue.
//! Application code depends on both and wires them together.

use crate::badge::{BadgeBoard, BadgeChanges};
use crate::handle::{HandleChanges, HandleStore};

/// Everything that changed since the previous
/// [`evaluate`](crate::coordinator::ControlStateCoordinator::evaluate).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewChanges {
    /// Handle property and lifecycle changes.
    pub handles: HandleChanges,
    /// Badge changes.
    pub badges: BadgeChanges,
    /// The layer list must be re-rendered (and diffed).
    pub list_dirty: bool,
}

impl ViewChanges {
    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty() && self.badges.changed.is_empty() && !self.list_dirty
    }
}

/// Applies drained [`ViewChanges`] to a platform-native presentation.
///
/// # Event loop pseudocode
///
/// ```rust,ignore
/// fn on_engine_event(event: EngineEvent) {
///     coordinator.handle_event(now(), event);
///     coordinator.advance(now());
///
///     let changes = coordinator.evaluate();
///     presenter.apply(coordinator.store(), coordinator.badges(), &changes);
///     if changes.list_dirty {
///         let tree = coordinator.render_list();
///         apply_patches(previous.diff(&tree));
///         previous = tree;
///     }
///     for signal in coordinator.drain_outbound() {
///         route(signal);
///     }
/// }
/// ```
pub trait Presenter {
    /// Applies `changes`, reading current values from `store` and `badges`
    /// as needed.
    fn apply(&mut self, store: &HandleStore, badges: &BadgeBoard, changes: &ViewChanges);
}
