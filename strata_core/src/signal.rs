// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outbound signals for external collaborators.
//!
//! The coordinator never calls out. Everything other subsystems must learn
//! about is queued as a [`Signal`] and handed over by
//! [`drain_outbound`](crate::coordinator::ControlStateCoordinator::drain_outbound).

use alloc::string::String;
use alloc::vec::Vec;

use crate::handle::HandleId;

/// Why shareable (permalink) state must be re-encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    /// The active stack was reordered.
    Reorder,
    /// A named style was applied.
    Style,
    /// An opacity or saturation slider moved.
    Slider,
}

/// Severity and presentation of a user notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Load failure alert (deduplicated per layer).
    Alert,
    /// Stalled load warning.
    Warning,
    /// Informational toast (zoom-range transitions).
    Toast,
}

/// A non-blocking message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// How to present the notice.
    pub kind: NoticeKind,
    /// User-facing text.
    pub message: String,
    /// Handles the notice is about.
    pub handles: Vec<HandleId>,
}

/// A message to an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Shareable state changed and must be re-encoded.
    StateChanged(ChangeReason),
    /// A handle's style changed; the styling panel should refresh.
    StyleUpdated(HandleId),
    /// Show a notice.
    Notice(Notice),
}

impl Signal {
    /// Returns the notice carried by this signal, if any.
    #[must_use]
    pub fn as_notice(&self) -> Option<&Notice> {
        match self {
            Self::Notice(n) => Some(n),
            _ => None,
        }
    }
}
