// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer list rendering.
//!
//! [`render_list`] is a pure function from catalog state to a [`ListTree`].
//! Hosts keep the previous tree and call [`ListTree::diff`] to turn a
//! rebuild into the smallest set of [`ListPatch`]es they can apply to their
//! widgets. Any structural change (a category or layer item appearing,
//! disappearing or moving, e.g. after a sort-mode switch) collapses into a
//! single [`ListPatch::Replace`].

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::catalog::{Catalog, Category, CategoryId, LayerId, SortMode};
use crate::search::SearchOutcome;

/// One layer row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerItem {
    /// The layer.
    pub layer: LayerId,
    /// Display name.
    pub name: String,
    /// Hidden by the current search.
    pub hidden: bool,
    /// A render handle for this layer is on the map.
    pub active: bool,
    /// Shows a remove affordance.
    pub removable: bool,
    /// Shows a filter affordance.
    pub filterable: bool,
    /// The default filter may be edited.
    pub filter_editable: bool,
}

/// One category row with its nested content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryNode {
    /// The category.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Expanded.
    pub open: bool,
    /// Hidden by the current search.
    pub hidden: bool,
    /// Layer rows, sorted by position.
    pub layers: Vec<LayerItem>,
    /// Child categories, sorted by the active sort mode.
    pub children: Vec<CategoryNode>,
}

/// The rendered layer list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListTree {
    /// Root categories.
    pub roots: Vec<CategoryNode>,
    /// The active query matched nothing; show an inline message.
    pub no_results: bool,
}

/// An incremental update between two [`ListTree`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListPatch {
    /// Structure changed; rebuild the whole list.
    Replace,
    /// Show or hide the "no results" message.
    NoResults(bool),
    /// A category row changed visibility.
    CategoryHidden {
        /// The category.
        id: CategoryId,
        /// New state.
        hidden: bool,
    },
    /// A category row was expanded or collapsed.
    CategoryOpen {
        /// The category.
        id: CategoryId,
        /// New state.
        open: bool,
    },
    /// A layer row changed visibility.
    LayerHidden {
        /// Containing category.
        category: CategoryId,
        /// The layer.
        layer: LayerId,
        /// New state.
        hidden: bool,
    },
    /// A layer row's active marker changed.
    LayerActive {
        /// Containing category.
        category: CategoryId,
        /// The layer.
        layer: LayerId,
        /// New state.
        active: bool,
    },
}

/// Renders the list for the given catalog state.
///
/// `active` holds the layers that currently have a render handle.
#[must_use]
pub fn render_list(
    catalog: &Catalog,
    outcome: &SearchOutcome,
    mode: SortMode,
    active: &BTreeSet<LayerId>,
) -> ListTree {
    ListTree {
        roots: catalog
            .sorted_roots(mode)
            .into_iter()
            .map(|c| render_category(catalog, c, outcome, mode, active))
            .collect(),
        no_results: matches!(outcome, SearchOutcome::NoResults),
    }
}

fn render_category(
    catalog: &Catalog,
    category: &Category,
    outcome: &SearchOutcome,
    mode: SortMode,
    active: &BTreeSet<LayerId>,
) -> CategoryNode {
    let layers = catalog
        .sorted_layers(category.id)
        .into_iter()
        .map(|(r, cfg)| LayerItem {
            layer: r.layer,
            name: cfg.name.clone(),
            hidden: !outcome.is_layer_visible(category.id, r.layer),
            active: active.contains(&r.layer),
            removable: cfg.removable,
            filterable: cfg.filterable,
            filter_editable: cfg.default_filter_editable,
        })
        .collect();
    let children = catalog
        .sorted_children(category.id, mode)
        .into_iter()
        .map(|c| render_category(catalog, c, outcome, mode, active))
        .collect();
    CategoryNode {
        id: category.id,
        name: category.name.clone(),
        open: category.open,
        hidden: !outcome.is_category_visible(category.id),
        layers,
        children,
    }
}

impl ListTree {
    /// Returns the patches that turn `self` into `new`.
    #[must_use]
    pub fn diff(&self, new: &Self) -> Vec<ListPatch> {
        if !same_shape(&self.roots, &new.roots) {
            return vec![ListPatch::Replace];
        }
        let mut patches = Vec::new();
        if self.no_results != new.no_results {
            patches.push(ListPatch::NoResults(new.no_results));
        }
        diff_nodes(&self.roots, &new.roots, &mut patches);
        patches
    }

    /// Finds a category node anywhere in the tree.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&CategoryNode> {
        let mut stack: Vec<&CategoryNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Finds a layer row inside a category.
    #[must_use]
    pub fn layer(&self, category: CategoryId, layer: LayerId) -> Option<&LayerItem> {
        self.category(category)?
            .layers
            .iter()
            .find(|item| item.layer == layer)
    }
}

fn same_shape(old: &[CategoryNode], new: &[CategoryNode]) -> bool {
    old.len() == new.len()
        && old.iter().zip(new).all(|(a, b)| {
            a.id == b.id
                && a.name == b.name
                && a.layers.len() == b.layers.len()
                && a.layers.iter().zip(&b.layers).all(|(x, y)| {
                    x.layer == y.layer
                        && x.name == y.name
                        && x.removable == y.removable
                        && x.filterable == y.filterable
                        && x.filter_editable == y.filter_editable
                })
                && same_shape(&a.children, &b.children)
        })
}

fn diff_nodes(old: &[CategoryNode], new: &[CategoryNode], out: &mut Vec<ListPatch>) {
    for (a, b) in old.iter().zip(new) {
        if a.hidden != b.hidden {
            out.push(ListPatch::CategoryHidden {
                id: b.id,
                hidden: b.hidden,
            });
        }
        if a.open != b.open {
            out.push(ListPatch::CategoryOpen {
                id: b.id,
                open: b.open,
            });
        }
        for (x, y) in a.layers.iter().zip(&b.layers) {
            if x.hidden != y.hidden {
                out.push(ListPatch::LayerHidden {
                    category: b.id,
                    layer: y.layer,
                    hidden: y.hidden,
                });
            }
            if x.active != y.active {
                out.push(ListPatch::LayerActive {
                    category: b.id,
                    layer: y.layer,
                    active: y.active,
                });
            }
        }
        diff_nodes(&a.children, &b.children, out);
    }
}
