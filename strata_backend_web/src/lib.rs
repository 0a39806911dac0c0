// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for strata.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`now`]: `performance.now()` clock in milliseconds
//! - [`DomPresenter`]: badge classes and tooltips on layer-list items

#![no_std]

extern crate alloc;

mod presenter;

pub use presenter::DomPresenter;
pub use strata_core::backend::Presenter;

use strata_core::time::HostTime;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] counts whole milliseconds since page load.
#[must_use]
pub fn now() -> HostTime {
    HostTime(millis_from_f64(performance_now()))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "performance.now() returns a small non-negative f64"
)]
fn millis_from_f64(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}
