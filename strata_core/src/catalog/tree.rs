// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built category forest with sorted queries.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use super::error::CatalogError;
use super::id::{CategoryId, LayerId};
use super::snapshot::{CatalogSnapshot, CategoryLayer, CategorySpec, LayerConfig};
use super::sort::SortMode;

/// A category retained in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Explicit position for [`SortMode::Default`].
    pub order: i32,
    /// Expand/collapse state. The only mutable part of the catalog.
    pub open: bool,
    /// Parent category; a non-owning link.
    pub parent: Option<CategoryId>,
    /// Layer references that resolved to configured layers.
    pub layers: Vec<CategoryLayer>,
    /// Retained child categories, in configuration order.
    pub(crate) children: Vec<CategoryId>,
}

/// Immutable-per-session category forest plus layer configuration.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    categories: BTreeMap<CategoryId, Category>,
    layers: BTreeMap<LayerId, LayerConfig>,
    roots: Vec<CategoryId>,
}

impl Catalog {
    /// Parses a JSON snapshot and builds the catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Self::build(snapshot)
    }

    /// Builds the catalog from a flat snapshot.
    ///
    /// Categories with a `null` layer list, categories whose parent is
    /// unknown or dropped, and layer references to unknown layers are
    /// filtered out without error.
    pub fn build(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        let mut layers = BTreeMap::new();
        for layer in snapshot.layers {
            let id = layer.id;
            if layers.insert(id, layer).is_some() {
                return Err(CatalogError::DuplicateLayer(id));
            }
        }

        let mut specs: BTreeMap<CategoryId, CategorySpec> = BTreeMap::new();
        let mut config_order = Vec::with_capacity(snapshot.categories.len());
        for spec in snapshot.categories {
            let id = spec.id;
            config_order.push(id);
            if specs.insert(id, spec).is_some() {
                return Err(CatalogError::DuplicateCategory(id));
            }
        }

        for &id in &config_order {
            check_acyclic(&specs, id)?;
        }

        let mut retained: BTreeMap<CategoryId, bool> = BTreeMap::new();
        for &id in &config_order {
            is_retained(&specs, id, &mut retained);
        }

        let mut categories = BTreeMap::new();
        let mut roots = Vec::new();
        for &id in &config_order {
            if !retained.get(&id).copied().unwrap_or(false) {
                log::debug!("dropping category {id:?}: no layer list or dropped ancestor");
                continue;
            }
            let Some(spec) = specs.remove(&id) else {
                continue;
            };
            let refs = spec
                .layers
                .unwrap_or_default()
                .into_iter()
                .filter(|r| {
                    let known = layers.contains_key(&r.layer);
                    if !known {
                        log::debug!("category {id:?} references unknown layer {:?}", r.layer);
                    }
                    known
                })
                .collect();
            if spec.parent.is_none() {
                roots.push(id);
            }
            categories.insert(
                id,
                Category {
                    id,
                    name: spec.name,
                    order: spec.order,
                    open: spec.open,
                    parent: spec.parent,
                    layers: refs,
                    children: Vec::new(),
                },
            );
        }

        for &id in &config_order {
            let parent = categories.get(&id).and_then(|c| c.parent);
            if let Some(parent) = parent
                && let Some(p) = categories.get_mut(&parent)
            {
                p.children.push(id);
            }
        }

        Ok(Self {
            categories,
            layers,
            roots,
        })
    }

    /// Returns the category with the given id.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Returns the configuration of a layer.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&LayerConfig> {
        self.layers.get(&id)
    }

    /// Iterates over all retained categories in id order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Returns the number of retained categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns whether no category was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns root categories ordered by `mode`.
    #[must_use]
    pub fn sorted_roots(&self, mode: SortMode) -> Vec<&Category> {
        self.sorted(&self.roots, mode)
    }

    /// Returns the child categories of `id` ordered by `mode`.
    #[must_use]
    pub fn sorted_children(&self, id: CategoryId, mode: SortMode) -> Vec<&Category> {
        match self.categories.get(&id) {
            Some(c) => self.sorted(&c.children, mode),
            None => Vec::new(),
        }
    }

    /// Returns the layers of `id` ordered by their per-category position.
    #[must_use]
    pub fn sorted_layers(&self, id: CategoryId) -> Vec<(CategoryLayer, &LayerConfig)> {
        let Some(category) = self.categories.get(&id) else {
            return Vec::new();
        };
        let mut out: Vec<_> = category
            .layers
            .iter()
            .filter_map(|r| self.layers.get(&r.layer).map(|cfg| (*r, cfg)))
            .collect();
        out.sort_by(|(a, _), (b, _)| a.position.cmp(&b.position).then(a.layer.cmp(&b.layer)));
        out
    }

    /// Returns the ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut out = Vec::new();
        let mut cursor = self.categories.get(&id).and_then(|c| c.parent);
        while let Some(p) = cursor {
            out.push(p);
            cursor = self.categories.get(&p).and_then(|c| c.parent);
        }
        out
    }

    /// Returns every category below `id` in depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut out = Vec::new();
        let mut stack: Vec<CategoryId> = match self.categories.get(&id) {
            Some(c) => c.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(c) = self.categories.get(&next) {
                stack.extend(c.children.iter().rev().copied());
            }
        }
        out
    }

    /// Sets the expand state of a category. Returns whether it changed.
    pub fn set_open(&mut self, id: CategoryId, open: bool) -> bool {
        match self.categories.get_mut(&id) {
            Some(c) if c.open != open => {
                c.open = open;
                true
            }
            _ => false,
        }
    }

    /// Flips the expand state of a category, returning the new state.
    pub fn toggle_open(&mut self, id: CategoryId) -> Option<bool> {
        let c = self.categories.get_mut(&id)?;
        c.open = !c.open;
        Some(c.open)
    }

    fn sorted(&self, ids: &[CategoryId], mode: SortMode) -> Vec<&Category> {
        let mut out: Vec<&Category> = ids.iter().filter_map(|id| self.categories.get(id)).collect();
        out.sort_by(|a, b| compare_categories(a, b, mode));
        out
    }
}

fn compare_categories(a: &Category, b: &Category, mode: SortMode) -> Ordering {
    let primary = match mode {
        SortMode::Default => a.order.cmp(&b.order),
        SortMode::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    };
    primary.then(a.id.cmp(&b.id))
}

fn check_acyclic(
    specs: &BTreeMap<CategoryId, CategorySpec>,
    start: CategoryId,
) -> Result<(), CatalogError> {
    let mut cursor = specs.get(&start).and_then(|s| s.parent);
    let mut steps = 0_usize;
    while let Some(p) = cursor {
        if p == start || steps > specs.len() {
            return Err(CatalogError::ParentCycle(start));
        }
        steps += 1;
        cursor = specs.get(&p).and_then(|s| s.parent);
    }
    Ok(())
}

/// Resolves (and memoizes) whether a category survives filtering.
///
/// Requires the forest to be acyclic.
fn is_retained(
    specs: &BTreeMap<CategoryId, CategorySpec>,
    id: CategoryId,
    memo: &mut BTreeMap<CategoryId, bool>,
) -> bool {
    if let Some(&known) = memo.get(&id) {
        return known;
    }
    let keep = match specs.get(&id) {
        None => false,
        Some(spec) if spec.layers.is_none() => false,
        Some(spec) => match spec.parent {
            None => true,
            Some(parent) => is_retained(specs, parent, memo),
        },
    };
    memo.insert(id, keep);
    keep
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    const SAMPLE: &str = r#"{
        "categories": [
            {"id": 1, "name": "transport", "order": 2, "layers": [
                {"layer": 10, "position": 2},
                {"layer": 11, "position": 1}
            ]},
            {"id": 2, "name": "Base", "order": 1, "layers": []},
            {"id": 3, "name": "Rail", "order": 1, "parent": 1, "layers": [
                {"layer": 12, "position": 0},
                {"layer": 99, "position": 1}
            ]},
            {"id": 4, "name": "Folder only", "order": 3, "layers": null},
            {"id": 5, "name": "Under folder", "order": 0, "parent": 4, "layers": [
                {"layer": 10, "position": 0}
            ]},
            {"id": 6, "name": "Orphan", "parent": 77, "layers": []}
        ],
        "layers": [
            {"id": 10, "name": "Roads", "maxZoom": 12},
            {"id": 11, "name": "Bridges", "removable": true},
            {"id": 12, "name": "Stations", "proxyMetaRequests": true}
        ]
    }"#;

    fn sample() -> Catalog {
        Catalog::from_json(SAMPLE).unwrap()
    }

    fn ids(cats: &[&Category]) -> Vec<u32> {
        cats.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn null_layer_lists_and_orphans_are_dropped_with_subtree() {
        let catalog = sample();
        assert!(catalog.category(CategoryId(4)).is_none());
        assert!(catalog.category(CategoryId(5)).is_none());
        assert!(catalog.category(CategoryId(6)).is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn empty_layer_list_is_kept() {
        assert!(sample().category(CategoryId(2)).is_some());
    }

    #[test]
    fn default_sort_uses_order() {
        let catalog = sample();
        assert_eq!(ids(&catalog.sorted_roots(SortMode::Default)), vec![2, 1]);
    }

    #[test]
    fn alphabetical_sort_ignores_case() {
        let catalog = sample();
        assert_eq!(ids(&catalog.sorted_roots(SortMode::Alphabetical)), vec![2, 1]);

        let snapshot = r#"{"categories": [
            {"id": 1, "name": "beta", "order": 1, "layers": []},
            {"id": 2, "name": "Alpha", "order": 2, "layers": []},
            {"id": 3, "name": "gamma", "order": 0, "layers": []}
        ]}"#;
        let catalog = Catalog::from_json(snapshot).unwrap();
        assert_eq!(ids(&catalog.sorted_roots(SortMode::Alphabetical)), vec![2, 1, 3]);
        assert_eq!(ids(&catalog.sorted_roots(SortMode::Default)), vec![3, 1, 2]);
    }

    #[test]
    fn layers_sorted_by_position_and_unknown_refs_skipped() {
        let catalog = sample();
        let layers: Vec<u32> = catalog
            .sorted_layers(CategoryId(1))
            .iter()
            .map(|(r, _)| r.layer.0)
            .collect();
        assert_eq!(layers, vec![11, 10]);
        assert_eq!(catalog.sorted_layers(CategoryId(3)).len(), 1);
    }

    #[test]
    fn ancestors_and_descendants() {
        let catalog = sample();
        assert_eq!(catalog.ancestors(CategoryId(3)), vec![CategoryId(1)]);
        assert!(catalog.ancestors(CategoryId(1)).is_empty());
        assert_eq!(catalog.descendants(CategoryId(1)), vec![CategoryId(3)]);
        assert_eq!(ids(&catalog.sorted_children(CategoryId(1), SortMode::Default)), vec![3]);
    }

    #[test]
    fn open_state_is_mutable() {
        let mut catalog = sample();
        assert!(catalog.set_open(CategoryId(1), true));
        assert!(!catalog.set_open(CategoryId(1), true));
        assert_eq!(catalog.toggle_open(CategoryId(1)), Some(false));
        assert_eq!(catalog.toggle_open(CategoryId(42)), None);
    }

    #[test]
    fn parent_cycle_is_rejected() {
        let snapshot = r#"{"categories": [
            {"id": 1, "name": "a", "parent": 2, "layers": []},
            {"id": 2, "name": "b", "parent": 1, "layers": []}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(snapshot),
            Err(CatalogError::ParentCycle(_))
        ));
    }

    #[test]
    fn duplicates_are_rejected() {
        let snapshot = r#"{"categories": [
            {"id": 1, "name": "a", "layers": []},
            {"id": 1, "name": "b", "layers": []}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(snapshot),
            Err(CatalogError::DuplicateCategory(CategoryId(1)))
        ));

        let snapshot = r#"{"layers": [
            {"id": 5, "name": "a"},
            {"id": 5, "name": "b"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(snapshot),
            Err(CatalogError::DuplicateLayer(LayerId(5)))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json("{\"categories\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn layer_config_fields_parse() {
        let catalog = sample();
        let roads = catalog.layer(LayerId(10)).unwrap();
        assert_eq!(roads.max_zoom, Some(12.0));
        assert_eq!(roads.min_zoom, None);
        assert!(catalog.layer(LayerId(11)).unwrap().removable);
        assert!(catalog.layer(LayerId(12)).unwrap().proxy_meta_requests);
    }
}
