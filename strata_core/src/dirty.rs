// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Handle mirrors and badges use [`understory_dirty`] to record which slots
//! changed since the last [`evaluate`](crate::coordinator::ControlStateCoordinator::evaluate).
//! All channels are local-only: there are no dependency edges between
//! handles, so marking one slot never marks another.
//!
//! Presenters never query dirty state directly; the drained slots surface as
//! [`HandleChanges`](crate::handle::HandleChanges) and
//! [`BadgeChanges`](crate::badge::BadgeChanges).

use understory_dirty::Channel;

/// Visibility flag changed.
pub const VISIBILITY: Channel = Channel::new(0);

/// Opacity changed.
pub const OPACITY: Channel = Channel::new(1);

/// Saturation changed.
pub const SATURATION: Channel = Channel::new(2);

/// Stacking index changed.
pub const STACKING: Channel = Channel::new(3);

/// Source style parameter changed.
pub const STYLE: Channel = Channel::new(4);

/// Handle created or destroyed.
pub const TOPOLOGY: Channel = Channel::new(5);

/// Spinner, error or out-of-range badge changed.
pub const BADGE: Channel = Channel::new(6);
