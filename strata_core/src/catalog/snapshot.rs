// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire shape of the configuration snapshot supplied by the hosting shell.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use super::id::{CategoryId, LayerId};

/// Flat configuration: categories with parent links, and layers.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// All categories, in any order.
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    /// All layers, in any order.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

/// One category as configured.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpec {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Explicit position for the default sort mode.
    #[serde(default)]
    pub order: i32,
    /// Initial expand state.
    #[serde(default)]
    pub open: bool,
    /// Parent category, `None` for roots.
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Layer references. A `null` list means the category is not rendered.
    #[serde(default)]
    pub layers: Option<Vec<CategoryLayer>>,
}

/// A layer placed in a category at a sort position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLayer {
    /// Referenced layer.
    pub layer: LayerId,
    /// Position within this category.
    #[serde(default)]
    pub position: i32,
}

/// Per-layer configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// Layer id (the `layerId` attribute on render handles).
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Whether attribute filters may be applied.
    #[serde(default)]
    pub filterable: bool,
    /// Whether the default filter may be edited by the user.
    #[serde(default)]
    pub default_filter_editable: bool,
    /// Whether metadata requests (style discovery) go through the proxy.
    #[serde(default)]
    pub proxy_meta_requests: bool,
    /// Minimum zoom bound.
    #[serde(default)]
    pub min_zoom: Option<f64>,
    /// Maximum zoom bound.
    #[serde(default)]
    pub max_zoom: Option<f64>,
    /// Whether the user may remove the layer from the map.
    #[serde(default)]
    pub removable: bool,
}
