// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The active layer stack: visible overlays in draw order.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::handle::{GroupType, HandleId, HandleStore};

/// One row of the active stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackEntry {
    /// The handle.
    pub handle: HandleId,
    /// Display name.
    pub name: String,
    /// Current stacking index.
    pub z_index: i32,
}

/// Errors raised by [`reorder`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StackError {
    /// The requested order names a handle that is not in the active stack.
    #[error("{0:?} is not in the active stack")]
    NotInStack(HandleId),
    /// A handle appears more than once.
    #[error("{0:?} appears more than once")]
    Duplicate(HandleId),
    /// Some active handles are missing from the requested order.
    #[error("expected {expected} handles, got {actual}")]
    Incomplete {
        /// Size of the active stack.
        expected: usize,
        /// Size of the requested order.
        actual: usize,
    },
}

/// Returns visible non-basemap handles, topmost first.
///
/// Ties on the stacking index go to the most recently added handle.
#[must_use]
pub fn active_stack(store: &HandleStore) -> Vec<StackEntry> {
    let mut ids: Vec<HandleId> = store
        .iter()
        .filter(|&id| store.visible(id) && store.attrs(id).group_type != GroupType::Basemap)
        .collect();
    ids.sort_by(|&a, &b| {
        store
            .z_index(b)
            .cmp(&store.z_index(a))
            .then(store.added_seq(b).cmp(&store.added_seq(a)))
    });
    ids.into_iter()
        .map(|id| StackEntry {
            handle: id,
            name: String::from(store.name(id)),
            z_index: store.z_index(id),
        })
        .collect()
}

/// Applies a user reorder, given top to bottom.
///
/// `order` must be a permutation of the current [`active_stack`]. Handles get
/// stacking indices −1, −2, … so that user-ordered layers sit below the
/// baseline index 0 that new layers start at.
pub fn reorder(store: &mut HandleStore, order: &[HandleId]) -> Result<(), StackError> {
    let current: BTreeSet<HandleId> = active_stack(store).into_iter().map(|e| e.handle).collect();
    let mut seen = BTreeSet::new();
    for &id in order {
        if !current.contains(&id) {
            return Err(StackError::NotInStack(id));
        }
        if !seen.insert(id) {
            return Err(StackError::Duplicate(id));
        }
    }
    if seen.len() != current.len() {
        return Err(StackError::Incomplete {
            expected: current.len(),
            actual: order.len(),
        });
    }

    let mut z = -1_i32;
    for &id in order {
        store.set_z_index(id, z);
        z = z.saturating_sub(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::catalog::LayerId;
    use crate::handle::{HandleSpec, SourceKind};

    fn spec(layer: u32, name: &str) -> HandleSpec {
        HandleSpec::new(LayerId(layer), name, SourceKind::Tile)
    }

    fn names(store: &HandleStore) -> Vec<String> {
        active_stack(store).into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn excludes_hidden_and_basemap() {
        let mut store = HandleStore::new();
        let _ = store.insert(spec(1, "OSM").with_group(GroupType::Basemap));
        let _ = store.insert(spec(2, "Roads"));
        let _ = store.insert(spec(3, "Water").with_visible(false));
        assert_eq!(names(&store), vec!["Roads"]);
    }

    #[test]
    fn sorts_by_z_then_recency() {
        let mut store = HandleStore::new();
        let _ = store.insert(spec(1, "Low").with_z_index(-5));
        let _ = store.insert(spec(2, "Older"));
        let _ = store.insert(spec(3, "Newer"));
        let _ = store.insert(spec(4, "High").with_z_index(3));
        assert_eq!(names(&store), vec!["High", "Newer", "Older", "Low"]);
    }

    #[test]
    fn reorder_assigns_contiguous_negative_indices() {
        let mut store = HandleStore::new();
        let a = store.insert(spec(1, "A"));
        let b = store.insert(spec(2, "B"));
        let c = store.insert(spec(3, "C"));
        reorder(&mut store, &[a, c, b]).unwrap();
        assert_eq!(store.z_index(a), -1);
        assert_eq!(store.z_index(c), -2);
        assert_eq!(store.z_index(b), -3);
        assert_eq!(names(&store), vec!["A", "C", "B"]);
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut store = HandleStore::new();
        let a = store.insert(spec(1, "A"));
        let b = store.insert(spec(2, "B"));
        let hidden = store.insert(spec(3, "H").with_visible(false));

        assert_eq!(
            reorder(&mut store, &[a]),
            Err(StackError::Incomplete {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(reorder(&mut store, &[a, a]), Err(StackError::Duplicate(a)));
        assert_eq!(
            reorder(&mut store, &[a, b, hidden]),
            Err(StackError::NotInStack(hidden))
        );
        assert_eq!(store.z_index(a), 0, "failed reorder leaves indices alone");
    }
}
