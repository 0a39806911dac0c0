// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inbound render-engine events.

use crate::handle::{HandleId, HandleSpec};

/// A notification from the render engine.
///
/// Backends translate engine callbacks into these and feed them to
/// [`handle_event`](crate::coordinator::ControlStateCoordinator::handle_event).
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// A layer was added to the map.
    LayerAdded(HandleSpec),
    /// A layer was removed from the map.
    LayerRemoved(HandleId),
    /// A layer's visibility changed.
    VisibilityChanged(HandleId, bool),
    /// The view settled after a pan or zoom.
    ViewMoveEnd {
        /// Continuous zoom level.
        zoom: f64,
    },
    /// The engine finished rendering a frame.
    RenderComplete,
    /// A tile, image or feature load started.
    LoadStart(HandleId),
    /// A load finished successfully.
    LoadEnd(HandleId),
    /// A load failed.
    LoadError(HandleId),
}
