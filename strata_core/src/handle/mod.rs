// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed mirror of the render engine's layer handles.
//!
//! The render engine owns the real layer objects. The coordinator keeps one
//! [`HandleStore`] slot per engine handle with:
//!
//! - An identity ([`HandleId`]), a generational index that goes stale once
//!   the engine removes the layer.
//! - Typed attributes ([`HandleAttrs`]: `layerId`, `name`, `groupType`) plus
//!   an open-ended tag side-table for anything the host wants to carry.
//! - Live properties: visibility, opacity, saturation, stacking index and the
//!   source's style parameter.
//!
//! Setters mark a dirty channel (see [`dirty`](crate::dirty)).
//! [`HandleStore::evaluate`] drains them into [`HandleChanges`], which the
//! host's [`Presenter`](crate::backend::Presenter) mirrors back onto the
//! engine.

mod id;
mod source;
mod store;

pub use id::HandleId;
pub use source::{
    GroupType, HandleAttrs, LAYERS_PARAM, LoadFamily, STYLES_PARAM, SourceInfo, SourceKind,
    ZoomBounds,
};
pub use store::{DEFAULT_SATURATION, HandleChanges, HandleSpec, HandleStore};
