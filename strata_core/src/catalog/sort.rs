// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category sort modes.

/// How sibling categories are ordered in the layer list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Ascending explicit `order`.
    #[default]
    Default,
    /// Case-insensitive name comparison.
    Alphabetical,
}

impl SortMode {
    /// Restores a mode from its persisted form.
    ///
    /// Anything unrecognized (including an absent value) yields
    /// [`SortMode::Default`].
    #[must_use]
    pub fn from_persisted(value: Option<&str>) -> Self {
        match value {
            Some("alphabetical") => Self::Alphabetical,
            Some("default") | None => Self::Default,
            Some(other) => {
                log::debug!("unknown persisted sort mode {other:?}, using default");
                Self::Default
            }
        }
    }

    /// Returns the persisted form of this mode.
    #[must_use]
    pub const fn as_persisted(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Alphabetical => "alphabetical",
        }
    }
}
