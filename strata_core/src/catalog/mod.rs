// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer catalog: the category/layer hierarchy built from configuration.
//!
//! The hosting shell supplies one flat [`CatalogSnapshot`] per session.
//! [`Catalog::build`] turns it into a forest:
//!
//! - Root categories have no parent. Parent links are plain ids and never
//!   own their target; cycles are rejected with
//!   [`CatalogError::ParentCycle`].
//! - A category is kept only if it carries a non-null layer list. A dropped
//!   category takes its whole subtree with it.
//! - Layer references are kept in configuration order and sorted on read by
//!   their per-category position.
//!
//! After building, the only mutable state is each category's `open` flag.

mod error;
mod id;
mod snapshot;
mod sort;
mod tree;

pub use error::CatalogError;
pub use id::{CategoryId, LayerId};
pub use snapshot::{CatalogSnapshot, CategoryLayer, CategorySpec, LayerConfig};
pub use sort::SortMode;
pub use tree::{Catalog, Category};
