// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source descriptions and typed handle attributes.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::catalog::LayerId;

/// Source parameter naming the service-side layer.
pub const LAYERS_PARAM: &str = "LAYERS";

/// Source parameter selecting a named rendering style.
pub const STYLES_PARAM: &str = "STYLES";

/// What kind of source backs a render handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// XYZ or similar pre-rendered tiles.
    Tile,
    /// Vector features.
    Feature,
    /// A single static image.
    Image,
    /// WMS rendered as tiles.
    WmsTile,
    /// WMS rendered as one image per view.
    WmsImage,
}

/// Load-lifecycle grouping of [`SourceKind`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadFamily {
    /// Many tile requests per view; spinner and errors.
    Tile,
    /// Vector loads are effectively atomic; errors only.
    Feature,
    /// One image request per view; spinner and errors.
    Image,
}

impl SourceKind {
    /// Returns the load family this kind reports through.
    #[must_use]
    pub const fn family(self) -> LoadFamily {
        match self {
            Self::Tile | Self::WmsTile => LoadFamily::Tile,
            Self::Feature => LoadFamily::Feature,
            Self::Image | Self::WmsImage => LoadFamily::Image,
        }
    }

    /// Returns whether the source accepts a named style parameter.
    #[must_use]
    pub const fn is_styleable(self) -> bool {
        matches!(self, Self::WmsTile | Self::WmsImage)
    }
}

impl LoadFamily {
    /// Returns whether loads in this family show a spinner.
    #[must_use]
    pub const fn shows_spinner(self) -> bool {
        !matches!(self, Self::Feature)
    }
}

/// The source object behind a render handle.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    /// Source kind discriminant.
    pub kind: SourceKind,
    /// Service URL, possibly carrying a query string.
    pub url: Option<String>,
    /// Request parameters (e.g. `LAYERS`, `STYLES`).
    pub params: BTreeMap<String, String>,
}

impl SourceInfo {
    /// Creates a source with no URL and no parameters.
    #[must_use]
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            url: None,
            params: BTreeMap::new(),
        }
    }

    /// Returns this source with the given service URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns this source with a parameter set.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the current named style, `None` when unset or empty.
    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.params
            .get(STYLES_PARAM)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Role of a handle on the map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupType {
    /// Background map; controlled by the basemap sliders and never part of
    /// the active stack.
    Basemap,
    /// Regular catalog layer.
    Overlay,
    /// Any other host-defined group.
    Other(String),
}

/// Typed attribute bag of a render handle.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleAttrs {
    /// Catalog layer this handle renders.
    pub layer_id: LayerId,
    /// Display name; load tracking groups by this.
    pub name: String,
    /// Role on the map.
    pub group_type: GroupType,
}

/// Zoom bounds of a handle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomBounds {
    /// Minimum zoom bound.
    pub min: Option<f64>,
    /// Maximum zoom bound.
    pub max: Option<f64>,
}
