// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fuzzy name search over the catalog.
//!
//! [`SearchIndex`] holds one entry per category and one per layer
//! *occurrence* (a layer listed in two categories is two entries). Matching
//! is an approximate-substring edit distance on lowercased characters: a name
//! matches when the cheapest alignment of the query against any substring of
//! the name needs at most `threshold × query length` edits.
//!
//! [`SearchIndex::query`] turns matches into a [`SearchOutcome`]:
//!
//! - blank query → [`SearchOutcome::ShowAll`]
//! - no matches → [`SearchOutcome::NoResults`] (everything stays visible)
//! - otherwise → [`SearchOutcome::Filtered`], revealing matched categories
//!   with all their descendants, matched layer items, and the ancestor chain
//!   of every hit (marked for expansion).

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::catalog::{Catalog, CategoryId, LayerId};

/// What a search entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchTarget {
    /// A category name.
    Category(CategoryId),
    /// A layer item inside a specific category.
    Layer {
        /// Containing category.
        category: CategoryId,
        /// The layer.
        layer: LayerId,
    },
}

#[derive(Clone, Debug)]
struct Entry {
    target: SearchTarget,
    text: Vec<char>,
}

/// Fuzzy index over category and layer names.
#[derive(Clone, Debug)]
pub struct SearchIndex {
    entries: Vec<Entry>,
    threshold: f32,
}

/// Items revealed by a filtering search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReveal {
    /// Categories left visible.
    pub categories: BTreeSet<CategoryId>,
    /// Layer items left visible.
    pub layers: BTreeSet<(CategoryId, LayerId)>,
    /// Ancestor categories that must be expanded.
    pub expand: BTreeSet<CategoryId>,
}

/// Result of applying a query to the index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No active query; everything is visible.
    #[default]
    ShowAll,
    /// The query matched nothing; everything is visible and an inline
    /// "no results" message is shown.
    NoResults,
    /// Everything is hidden except the revealed items.
    Filtered(SearchReveal),
}

impl SearchOutcome {
    /// Returns whether the category is visible under this outcome.
    #[must_use]
    pub fn is_category_visible(&self, id: CategoryId) -> bool {
        match self {
            Self::ShowAll | Self::NoResults => true,
            Self::Filtered(r) => r.categories.contains(&id),
        }
    }

    /// Returns whether a layer item is visible under this outcome.
    #[must_use]
    pub fn is_layer_visible(&self, category: CategoryId, layer: LayerId) -> bool {
        match self {
            Self::ShowAll | Self::NoResults => true,
            Self::Filtered(r) => r.layers.contains(&(category, layer)),
        }
    }
}

impl SearchIndex {
    /// Indexes every category and layer occurrence of `catalog`.
    #[must_use]
    pub fn build(catalog: &Catalog, threshold: f32) -> Self {
        let mut entries = Vec::new();
        for category in catalog.categories() {
            entries.push(Entry {
                target: SearchTarget::Category(category.id),
                text: normalize(&category.name),
            });
            for (r, cfg) in catalog.sorted_layers(category.id) {
                entries.push(Entry {
                    target: SearchTarget::Layer {
                        category: category.id,
                        layer: r.layer,
                    },
                    text: normalize(&cfg.name),
                });
            }
        }
        Self { entries, threshold }
    }

    /// Returns the number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every entry matching `query`, in index order.
    #[must_use]
    pub fn matches(&self, query: &str) -> Vec<SearchTarget> {
        let pattern = normalize(query.trim());
        if pattern.is_empty() {
            return Vec::new();
        }
        let budget = self.threshold * pattern.len() as f32;
        self.entries
            .iter()
            .filter(|e| substring_distance(&pattern, &e.text) as f32 <= budget)
            .map(|e| e.target)
            .collect()
    }

    /// Applies `query` and computes which list items stay visible.
    #[must_use]
    pub fn query(&self, catalog: &Catalog, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::ShowAll;
        }
        let hits = self.matches(query);
        if hits.is_empty() {
            return SearchOutcome::NoResults;
        }

        let mut reveal = SearchReveal::default();
        for hit in hits {
            match hit {
                SearchTarget::Category(id) => {
                    let mut subtree = vec![id];
                    subtree.extend(catalog.descendants(id));
                    for c in subtree {
                        reveal.categories.insert(c);
                        for (r, _) in catalog.sorted_layers(c) {
                            reveal.layers.insert((c, r.layer));
                        }
                    }
                    reveal_ancestors(catalog, id, &mut reveal);
                }
                SearchTarget::Layer { category, layer } => {
                    reveal.layers.insert((category, layer));
                    reveal.categories.insert(category);
                    reveal.expand.insert(category);
                    reveal_ancestors(catalog, category, &mut reveal);
                }
            }
        }
        SearchOutcome::Filtered(reveal)
    }
}

fn reveal_ancestors(catalog: &Catalog, id: CategoryId, reveal: &mut SearchReveal) {
    for a in catalog.ancestors(id) {
        reveal.categories.insert(a);
        reveal.expand.insert(a);
    }
}

fn normalize(s: &str) -> Vec<char> {
    let lower: String = s.to_lowercase();
    lower.chars().collect()
}

/// Minimum edit distance between `pattern` and any substring of `text`.
fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    // col[i]: cost of aligning pattern[..i] so that it ends at the current
    // text position; the text prefix is free.
    let mut col: Vec<usize> = (0..=m).collect();
    let mut best = m;
    for &t in text {
        let mut diag = col[0];
        for i in 1..=m {
            let above = col[i];
            let substitute = diag + usize::from(pattern[i - 1] != t);
            col[i] = substitute.min(above + 1).min(col[i - 1] + 1);
            diag = above;
        }
        best = best.min(col[m]);
    }
    best
}
