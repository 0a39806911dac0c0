// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named-style switching for WMS-backed layers.
//!
//! The flow is split around the network fetch so the core never performs
//! I/O:
//!
//! 1. [`StyleSwitcher::open`] validates the handle, puts the modal into
//!    [`StyleModal::Loading`] and returns a [`StyleRequest`] for the host.
//! 2. The host fetches the capabilities document, extracts the style names
//!    and hands the outcome to [`StyleSwitcher::resolve`].
//! 3. [`StyleSwitcher::select`] writes the chosen style into the source's
//!    `STYLES` parameter and closes the modal.
//!
//! Fetch failures stay inside the modal as [`StyleModal::Failed`].

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::handle::{HandleId, HandleStore, LAYERS_PARAM};

/// Characters left unescaped in a URL component (as `encodeURIComponent`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Label of the synthetic entry that clears the style parameter.
pub const DEFAULT_STYLE_LABEL: &str = "Default";

/// Errors raised by the style flow.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The handle's source does not accept a named style.
    #[error("{0:?} is not backed by a styleable source")]
    NotStyleable(HandleId),
    /// The handle's source has no service URL.
    #[error("{0:?} has no service URL")]
    MissingUrl(HandleId),
    /// The operation needs an open modal.
    #[error("the style modal is not open")]
    NotOpen,
    /// The operation needs a resolved list of choices.
    #[error("the style modal has no choices to select from")]
    NoChoices,
    /// The selected index is out of range.
    #[error("no style choice at index {0}")]
    NoSuchChoice(usize),
    /// The handle was removed while the modal was open.
    #[error("{0:?} was removed while its style modal was open")]
    Removed(HandleId),
}

/// What the host must fetch to list the available styles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRequest {
    /// Handle the modal was opened for.
    pub handle: HandleId,
    /// Service endpoint (the source URL without its query string).
    pub service_url: String,
    /// Service-side layer name (the `LAYERS` parameter).
    pub layer_name: Option<String>,
    /// Capabilities URL to fetch, proxied when the layer requires it.
    pub url: String,
}

/// One entry of the style list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleChoice {
    /// Display label.
    pub label: String,
    /// Value written to `STYLES`; `None` clears it.
    pub value: Option<String>,
    /// Matches the source's current style.
    pub active: bool,
}

/// Body of the style modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleModal {
    /// Waiting for the capabilities fetch.
    Loading,
    /// The fetch failed.
    Failed {
        /// User-facing warning.
        message: String,
        /// Raw error detail.
        detail: String,
    },
    /// Zero or one style available; nothing to choose from.
    Unavailable {
        /// User-facing information.
        message: String,
    },
    /// Selectable styles, synthetic default first.
    Choices(Vec<StyleChoice>),
}

/// State of the style modal.
#[derive(Clone, Debug, Default)]
pub struct StyleSwitcher {
    open: Option<(HandleId, StyleModal)>,
    proxy_url: Option<String>,
}

impl StyleSwitcher {
    /// Creates a closed switcher that routes proxied metadata requests
    /// through `proxy_url`.
    #[must_use]
    pub fn new(proxy_url: Option<String>) -> Self {
        Self {
            open: None,
            proxy_url,
        }
    }

    /// Returns the handle and body of the open modal.
    #[must_use]
    pub fn modal(&self) -> Option<(HandleId, &StyleModal)> {
        self.open.as_ref().map(|(id, m)| (*id, m))
    }

    /// Opens the modal for `id` and describes the fetch to perform.
    pub fn open(
        &mut self,
        store: &HandleStore,
        catalog: &Catalog,
        id: HandleId,
    ) -> Result<StyleRequest, StyleError> {
        let source = store.source(id);
        if !source.kind.is_styleable() {
            return Err(StyleError::NotStyleable(id));
        }
        let url = source.url.as_deref().ok_or(StyleError::MissingUrl(id))?;
        let service_url = url.split('?').next().unwrap_or(url);
        let capabilities =
            format!("{service_url}?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetCapabilities");

        let layer = store.attrs(id).layer_id;
        let proxied = catalog
            .layer(layer)
            .is_some_and(|cfg| cfg.proxy_meta_requests);
        let url = match (&self.proxy_url, proxied) {
            (Some(prefix), true) => {
                format!("{prefix}{}", utf8_percent_encode(&capabilities, COMPONENT))
            }
            (None, true) => {
                log::debug!("layer {layer:?} wants a metadata proxy but none is configured");
                capabilities
            }
            _ => capabilities,
        };

        self.open = Some((id, StyleModal::Loading));
        Ok(StyleRequest {
            handle: id,
            service_url: service_url.to_string(),
            layer_name: source.params.get(LAYERS_PARAM).cloned(),
            url,
        })
    }

    /// Completes the fetch with the discovered style names or an error
    /// message.
    pub fn resolve(
        &mut self,
        store: &HandleStore,
        fetched: Result<Vec<String>, String>,
    ) -> Result<&StyleModal, StyleError> {
        let id = match &self.open {
            Some((id, _)) => *id,
            None => return Err(StyleError::NotOpen),
        };
        if !store.is_alive(id) {
            self.open = None;
            return Err(StyleError::Removed(id));
        }

        let modal = match fetched {
            Err(detail) => {
                log::debug!("style discovery for {id:?} failed: {detail}");
                StyleModal::Failed {
                    message: String::from("Could not retrieve the styles for this layer"),
                    detail,
                }
            }
            Ok(styles) if styles.len() <= 1 => StyleModal::Unavailable {
                message: String::from("This layer has no alternative styles"),
            },
            Ok(styles) => {
                let current = store.source(id).style();
                let mut choices = Vec::with_capacity(styles.len() + 1);
                choices.push(StyleChoice {
                    label: String::from(DEFAULT_STYLE_LABEL),
                    value: None,
                    active: current.is_none(),
                });
                choices.extend(styles.into_iter().map(|s| StyleChoice {
                    active: current == Some(s.as_str()),
                    label: s.clone(),
                    value: Some(s),
                }));
                StyleModal::Choices(choices)
            }
        };
        let (_, modal) = self.open.insert((id, modal));
        Ok(modal)
    }

    /// Applies the choice at `index` and closes the modal.
    ///
    /// Returns the restyled handle.
    pub fn select(
        &mut self,
        store: &mut HandleStore,
        index: usize,
    ) -> Result<HandleId, StyleError> {
        let Some((id, modal)) = &self.open else {
            return Err(StyleError::NotOpen);
        };
        let id = *id;
        if !store.is_alive(id) {
            self.open = None;
            return Err(StyleError::Removed(id));
        }
        let StyleModal::Choices(choices) = modal else {
            return Err(StyleError::NoChoices);
        };
        let choice = choices.get(index).ok_or(StyleError::NoSuchChoice(index))?;
        store.set_style(id, choice.value.as_deref().unwrap_or(""));
        self.open = None;
        Ok(id)
    }

    /// Closes the modal without changing anything.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Closes the modal if it belongs to `id`.
    pub(crate) fn forget(&mut self, id: HandleId) {
        if self.open.as_ref().is_some_and(|(open, _)| *open == id) {
            self.open = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::catalog::LayerId;
    use crate::handle::{HandleSpec, STYLES_PARAM, SourceInfo, SourceKind};

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
            "categories": [],
            "layers": [
                {"id": 1, "name": "Geology"},
                {"id": 2, "name": "Soils", "proxyMetaRequests": true}
            ]
        }"#,
        )
        .unwrap()
    }

    fn wms(layer: u32, style: Option<&str>) -> HandleSpec {
        let mut source = SourceInfo::new(SourceKind::WmsTile)
            .with_url("https://maps.example.org/wms?map=geo")
            .with_param(LAYERS_PARAM, "geo:units");
        if let Some(style) = style {
            source = source.with_param(STYLES_PARAM, style);
        }
        HandleSpec::new(LayerId(layer), "Geology", SourceKind::WmsTile).with_source(source)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn open_rejects_plain_tiles() {
        let mut store = HandleStore::new();
        let id = store.insert(HandleSpec::new(LayerId(1), "OSM", SourceKind::Tile));
        let mut switcher = StyleSwitcher::default();
        assert_eq!(
            switcher.open(&store, &catalog(), id),
            Err(StyleError::NotStyleable(id))
        );
        assert!(switcher.modal().is_none());
    }

    #[test]
    fn open_builds_capabilities_request() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, None));
        let mut switcher = StyleSwitcher::new(Some(String::from("/proxy?url=")));
        let request = switcher.open(&store, &catalog(), id).unwrap();
        assert_eq!(request.service_url, "https://maps.example.org/wms");
        assert_eq!(request.layer_name.as_deref(), Some("geo:units"));
        assert_eq!(
            request.url,
            "https://maps.example.org/wms?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetCapabilities"
        );
        assert_eq!(switcher.modal(), Some((id, &StyleModal::Loading)));
    }

    #[test]
    fn proxied_layers_encode_the_target() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(2, None));
        let mut switcher = StyleSwitcher::new(Some(String::from("/proxy?url=")));
        let request = switcher.open(&store, &catalog(), id).unwrap();
        assert_eq!(
            request.url,
            "/proxy?url=https%3A%2F%2Fmaps.example.org%2Fwms%3FSERVICE%3DWMS%26VERSION%3D1.3.0%26REQUEST%3DGetCapabilities"
        );
    }

    #[test]
    fn current_style_is_marked_active() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, Some("night")));
        let mut switcher = StyleSwitcher::default();
        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let modal = switcher
            .resolve(&store, Ok(names(&["default", "night", "satellite"])))
            .unwrap();
        let StyleModal::Choices(choices) = modal else {
            panic!("expected choices, got {modal:?}");
        };
        let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Default", "default", "night", "satellite"]);
        let active: Vec<_> = choices.iter().map(|c| c.active).collect();
        assert_eq!(active, vec![false, false, true, false]);
    }

    #[test]
    fn unset_style_activates_default() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, Some("")));
        let mut switcher = StyleSwitcher::default();
        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let modal = switcher.resolve(&store, Ok(names(&["a", "b"]))).unwrap();
        let StyleModal::Choices(choices) = modal else {
            panic!("expected choices, got {modal:?}");
        };
        assert!(choices[0].active);
    }

    #[test]
    fn failures_and_single_styles_stay_in_modal() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, None));
        let mut switcher = StyleSwitcher::default();

        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let modal = switcher
            .resolve(&store, Err(String::from("HTTP 502")))
            .unwrap();
        assert!(matches!(modal, StyleModal::Failed { detail, .. } if detail == "HTTP 502"));

        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let modal = switcher.resolve(&store, Ok(names(&["only"]))).unwrap();
        assert!(matches!(modal, StyleModal::Unavailable { .. }));
        assert_eq!(switcher.select(&mut store, 0), Err(StyleError::NoChoices));
    }

    #[test]
    fn select_writes_param_and_closes() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, Some("night")));
        let mut switcher = StyleSwitcher::default();
        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let _ = switcher
            .resolve(&store, Ok(names(&["night", "satellite"])))
            .unwrap();
        assert_eq!(switcher.select(&mut store, 5), Err(StyleError::NoSuchChoice(5)));

        assert_eq!(switcher.select(&mut store, 2), Ok(id));
        assert_eq!(store.source(id).style(), Some("satellite"));
        assert!(switcher.modal().is_none());

        let _ = switcher.open(&store, &catalog(), id).unwrap();
        let _ = switcher
            .resolve(&store, Ok(names(&["night", "satellite"])))
            .unwrap();
        assert_eq!(switcher.select(&mut store, 0), Ok(id));
        assert_eq!(store.source(id).style(), None);
        assert_eq!(
            store.source(id).params.get(STYLES_PARAM).map(String::as_str),
            Some("")
        );
    }

    #[test]
    fn removed_handle_closes_modal() {
        let mut store = HandleStore::new();
        let id = store.insert(wms(1, None));
        let mut switcher = StyleSwitcher::default();
        let _ = switcher.open(&store, &catalog(), id).unwrap();
        store.remove(id);
        assert_eq!(
            switcher.resolve(&store, Ok(Vec::new())).map(|_| ()),
            Err(StyleError::Removed(id))
        );
        assert_eq!(switcher.resolve(&store, Ok(Vec::new())).map(|_| ()), Err(StyleError::NotOpen));
    }
}
