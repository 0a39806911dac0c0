// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom-range validation.
//!
//! After every view move the coordinator rounds the zoom up to an integer
//! and checks each handle's bounds. Out-of-range handles get a badge and a
//! tooltip; visible handles that crossed out of range since the previous
//! rounded zoom are reported for a toast. Visibility is never touched.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::badge::{BadgeBoard, RangeStatus};
use crate::handle::{HandleId, HandleStore, ZoomBounds};
use crate::signal::{Notice, NoticeKind};

/// Rounds a continuous zoom level up to the next integer.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "map zoom levels are far below i64 range"
)]
pub fn rounded_zoom(zoom: f64) -> i64 {
    let truncated = zoom as i64;
    if (truncated as f64) < zoom {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}

/// Classifies a handle's bounds at a rounded zoom.
///
/// The minimum bound uses `rounded >= min`, which flags every zoom at or
/// above the minimum as underzoomed.
#[must_use]
pub fn classify(bounds: ZoomBounds, rounded: i64) -> RangeStatus {
    let z = rounded as f64;
    match (bounds.min, bounds.max) {
        (_, Some(max)) if z > max => RangeStatus::Overzoomed,
        (Some(min), _) if z >= min => RangeStatus::Underzoomed,
        _ => RangeStatus::InRange,
    }
}

/// Result of one range evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeReport {
    /// Rounded zoom the report was computed at.
    pub rounded_zoom: i64,
    /// Every handle out of range at this zoom.
    pub out_of_range: Vec<HandleId>,
    /// Visible handles that were in range at the previous rounded zoom.
    pub crossed: Vec<HandleId>,
}

impl RangeReport {
    /// Builds the toast for handles that just crossed out of range.
    #[must_use]
    pub fn toast(&self, store: &HandleStore) -> Option<Notice> {
        let message = match self.crossed.as_slice() {
            [] => return None,
            [one] => format!(
                "Layer \"{}\" was hidden because it is not visible at this zoom level",
                store.name(*one)
            ),
            many => format!(
                "{} layers were hidden because they are not visible at this zoom level",
                many.len()
            ),
        };
        Some(Notice {
            kind: NoticeKind::Toast,
            message,
            handles: self.crossed.clone(),
        })
    }
}

/// Tracks the previous rounded zoom for transition detection.
#[derive(Clone, Copy, Debug, Default)]
pub struct RangeValidator {
    previous: Option<i64>,
}

impl RangeValidator {
    /// Creates a validator without a baseline.
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Returns the rounded zoom of the previous evaluation.
    #[must_use]
    pub const fn previous_zoom(&self) -> Option<i64> {
        self.previous
    }

    /// Updates range badges for every handle at `zoom`.
    ///
    /// The first call only establishes the baseline and never reports
    /// crossings.
    pub fn evaluate(
        &mut self,
        zoom: f64,
        store: &HandleStore,
        badges: &mut BadgeBoard,
    ) -> RangeReport {
        let rounded = rounded_zoom(zoom);
        let previous = self.previous.replace(rounded);

        let mut report = RangeReport {
            rounded_zoom: rounded,
            ..RangeReport::default()
        };
        for id in store.iter() {
            let bounds = store.zoom(id);
            let status = classify(bounds, rounded);
            badges.set_range(id, status);
            if !status.is_out_of_range() {
                continue;
            }
            report.out_of_range.push(id);
            if let Some(prev) = previous
                && prev != rounded
                && store.visible(id)
                && !classify(bounds, prev).is_out_of_range()
            {
                report.crossed.push(id);
            }
        }
        if !report.crossed.is_empty() {
            let names: Vec<String> = report
                .crossed
                .iter()
                .map(|&id| String::from(store.name(id)))
                .collect();
            log::debug!("zoom {rounded}: {names:?} left their range");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::catalog::LayerId;
    use crate::handle::{HandleSpec, SourceKind};

    #[test]
    fn rounds_up() {
        assert_eq!(rounded_zoom(10.0), 10);
        assert_eq!(rounded_zoom(10.2), 11);
        assert_eq!(rounded_zoom(0.0), 0);
        assert_eq!(rounded_zoom(-0.5), 0);
        assert_eq!(rounded_zoom(-1.5), -1);
    }

    #[test]
    fn huge_zoom_saturates() {
        assert_eq!(rounded_zoom(f64::INFINITY), i64::MAX);
        assert_eq!(rounded_zoom(1e19), i64::MAX);
        assert_eq!(rounded_zoom(f64::NEG_INFINITY), i64::MIN);
        assert_eq!(rounded_zoom(f64::NAN), 0);
    }

    #[test]
    fn classification_follows_literal_comparisons() {
        let max10 = ZoomBounds {
            min: None,
            max: Some(10.0),
        };
        assert_eq!(classify(max10, 10), RangeStatus::InRange);
        assert_eq!(classify(max10, 11), RangeStatus::Overzoomed);

        let min5 = ZoomBounds {
            min: Some(5.0),
            max: None,
        };
        assert_eq!(classify(min5, 4), RangeStatus::InRange);
        assert_eq!(classify(min5, 5), RangeStatus::Underzoomed);
        assert_eq!(classify(ZoomBounds::default(), 30), RangeStatus::InRange);
    }

    #[test]
    fn max_zoom_sets_zoom_out_badge() {
        let mut store = HandleStore::new();
        let roads = store.insert(
            HandleSpec::new(LayerId(1), "Roads", SourceKind::Tile).with_zoom(None, Some(10.0)),
        );
        let mut badges = BadgeBoard::new();
        let mut validator = RangeValidator::new();

        let report = validator.evaluate(10.4, &store, &mut badges);
        assert_eq!(report.rounded_zoom, 11);
        assert_eq!(report.out_of_range, vec![roads]);
        assert!(report.crossed.is_empty(), "first evaluation is the baseline");
        assert_eq!(
            badges.get(roads).range.tooltip(),
            Some("Zoom out to see this layer")
        );
        assert!(store.visible(roads), "visibility is untouched");
    }

    #[test]
    fn crossing_reports_visible_handles_once() {
        let mut store = HandleStore::new();
        let spec = |name: &str| {
            HandleSpec::new(LayerId(1), name, SourceKind::Tile).with_zoom(None, Some(10.0))
        };
        let a = store.insert(spec("A"));
        let b = store.insert(spec("B"));
        let hidden = store.insert(spec("Hidden").with_visible(false));
        let mut badges = BadgeBoard::new();
        let mut validator = RangeValidator::new();

        let _ = validator.evaluate(9.0, &store, &mut badges);
        let report = validator.evaluate(12.0, &store, &mut badges);
        assert_eq!(report.crossed, vec![a, b]);
        assert_eq!(report.out_of_range, vec![a, b, hidden]);
        let toast = report.toast(&store).unwrap();
        assert_eq!(
            toast.message,
            "2 layers were hidden because they are not visible at this zoom level"
        );

        // Still out of range: no new crossing.
        let report = validator.evaluate(13.0, &store, &mut badges);
        assert!(report.crossed.is_empty());

        // Back in range clears the badge.
        let _ = validator.evaluate(8.0, &store, &mut badges);
        assert_eq!(badges.get(a).range, RangeStatus::InRange);
    }

    #[test]
    fn single_crossing_names_the_layer() {
        let mut store = HandleStore::new();
        let _ = store.insert(
            HandleSpec::new(LayerId(1), "Roads", SourceKind::Tile).with_zoom(None, Some(3.0)),
        );
        let mut badges = BadgeBoard::new();
        let mut validator = RangeValidator::new();
        let _ = validator.evaluate(3.0, &store, &mut badges);
        let toast = validator.evaluate(4.0, &store, &mut badges).toast(&store).unwrap();
        assert_eq!(
            toast.message,
            "Layer \"Roads\" was hidden because it is not visible at this zoom level"
        );
    }
}
