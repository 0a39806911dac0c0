// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for the control-state coordinator.

use alloc::string::String;

use crate::time::Duration;

/// Configuration for the [`ControlStateCoordinator`](crate::coordinator::ControlStateCoordinator).
#[derive(Clone, Debug, PartialEq)]
pub struct ControlConfig {
    /// How long a load may stay pending before a one-shot stall warning.
    pub stall_timeout: Duration,
    /// Coalescing window between a load completion (or error) and the
    /// counter update it causes.
    pub settle_delay: Duration,
    /// Maximum fraction of query characters that may be edited for a name
    /// to count as a search match (0.0 = exact substring only).
    pub search_threshold: f32,
    /// Step of the opacity and saturation range controls, in percent.
    pub slider_step: u8,
    /// Prefix for metadata requests of layers that proxy them. The encoded
    /// target URL is appended.
    pub proxy_url: Option<String>,
}

impl ControlConfig {
    /// Default configuration for the browser map panel.
    #[must_use]
    pub fn web() -> Self {
        Self {
            stall_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(500),
            search_threshold: 0.3,
            slider_step: 1,
            proxy_url: None,
        }
    }

    /// Returns this configuration with the given metadata proxy prefix.
    #[must_use]
    pub fn with_proxy(mut self, prefix: impl Into<String>) -> Self {
        self.proxy_url = Some(prefix.into());
        self
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::web()
    }
}
