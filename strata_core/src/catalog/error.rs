// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use super::id::{CategoryId, LayerId};

/// Errors raised while building a [`Catalog`](super::Catalog).
///
/// Only structural violations are errors. Anomalies such as layer-less
/// categories or dangling layer references are filtered out silently.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The snapshot is not valid JSON or does not match the expected shape.
    #[error("malformed catalog snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two categories share an id.
    #[error("duplicate category id {0:?}")]
    DuplicateCategory(CategoryId),

    /// Two layers share an id.
    #[error("duplicate layer id {0:?}")]
    DuplicateLayer(LayerId),

    /// Following parent links from this category loops back on itself.
    #[error("category {0:?} is part of a parent cycle")]
    ParentCycle(CategoryId),
}
