// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM badge management.
//!
//! Mirrors [`BadgeBoard`] state onto the layer-list items rendered by the
//! host application, applying incremental updates from [`ViewChanges`].
//! Items are located by their `data-layer-id` attribute.
//!
//! [`BadgeBoard`]: strata_core::badge::BadgeBoard
//! [`ViewChanges`]: strata_core::backend::ViewChanges

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use strata_core::backend::{Presenter, ViewChanges};
use strata_core::badge::{BadgeBoard, Badges};
use strata_core::catalog::LayerId;
use strata_core::handle::HandleStore;
use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement};

const LOADING_CLASS: &str = "is-loading";
const ERROR_CLASS: &str = "has-error";
const RANGE_CLASS: &str = "out-of-range";
const ERROR_TOOLTIP: &str = "This layer failed to load";

/// Maps badge changes onto every `[data-layer-id]` element inside a list
/// container.
///
/// The presenter never creates list items; rendering the list from
/// [`ListTree`](strata_core::list::ListTree) patches is the host's job. An
/// item that is not in the DOM yet is skipped and picks up its badges on the
/// next change.
pub struct DomPresenter {
    container: HtmlElement,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("container", &"HtmlElement")
            .finish()
    }
}

impl DomPresenter {
    /// Creates a presenter that decorates items below `container`.
    #[must_use]
    pub fn new(container: HtmlElement) -> Self {
        Self { container }
    }

    /// Returns a reference to the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Every list row of `layer`; a layer listed in several categories has
    /// one row per category.
    fn items(&self, layer: LayerId) -> Vec<Element> {
        let Ok(nodes) = self.container.query_selector_all(&layer_selector(layer)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn decorate(&self, layer: LayerId, badges: Badges) {
        let text = tooltip(badges);
        for el in self.items(layer) {
            let classes = el.class_list();
            for (class, on) in badge_classes(badges) {
                let _ = classes.toggle_with_force(class, on);
            }
            match text {
                Some(text) => {
                    let _ = el.set_attribute("title", text);
                }
                None => {
                    let _ = el.remove_attribute("title");
                }
            }
        }
    }
}

impl Presenter for DomPresenter {
    /// Applies badge changes from a [`ViewChanges`] to the DOM.
    fn apply(&mut self, store: &HandleStore, badges: &BadgeBoard, changes: &ViewChanges) {
        // 1. Removed handles lose every badge.
        for &idx in &changes.handles.removed {
            self.decorate(store.attrs_at(idx).layer_id, Badges::default());
        }

        // 2. Badge changes on live handles.
        for &idx in &changes.badges.changed {
            let Some(id) = store.id_at(idx) else {
                continue;
            };
            self.decorate(store.attrs_at(idx).layer_id, badges.get(id));
        }
    }
}

fn layer_selector(layer: LayerId) -> String {
    format!("[data-layer-id=\"{}\"]", layer.0)
}

fn badge_classes(badges: Badges) -> [(&'static str, bool); 3] {
    [
        (LOADING_CLASS, badges.spinner),
        (ERROR_CLASS, badges.error),
        (RANGE_CLASS, badges.range.is_out_of_range()),
    ]
}

/// Range advice wins over the error tooltip.
fn tooltip(badges: Badges) -> Option<&'static str> {
    badges
        .range
        .tooltip()
        .or(badges.error.then_some(ERROR_TOOLTIP))
}
