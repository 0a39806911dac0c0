// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opacity and saturation range controls.

use alloc::format;
use alloc::string::String;

use crate::handle::HandleId;

/// Which property a slider drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliderKind {
    /// Layer opacity; the minimum toggle reads "Invisible".
    Opacity,
    /// Layer saturation; the minimum toggle reads "Greyscale".
    Saturation,
}

impl SliderKind {
    /// Label of the control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opacity => "Opacity",
            Self::Saturation => "Saturation",
        }
    }

    /// Label of the minimum toggle.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Opacity => "Invisible",
            Self::Saturation => "Greyscale",
        }
    }
}

/// What a slider is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliderTarget {
    /// A single overlay handle.
    Layer(HandleId),
    /// Whichever basemap is currently visible.
    Basemap,
}

/// A 0–100 range control with a "minimum" checkbox.
///
/// Dragging to 0 checks the toggle and dragging above 0 unchecks it.
/// Checking the toggle snaps the value to 0; unchecking resets it to 100.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliderControl {
    /// Driven property.
    pub kind: SliderKind,
    /// Control label.
    pub label: String,
    /// Step in percent; values snap to multiples of it.
    pub step: u8,
    value: u8,
    minimum: bool,
}

impl SliderControl {
    /// Creates a control at `value` (clamped and snapped).
    #[must_use]
    pub fn new(kind: SliderKind, label: impl Into<String>, step: u8, value: u8) -> Self {
        let mut control = Self {
            kind,
            label: label.into(),
            step: step.max(1),
            value: 0,
            minimum: false,
        };
        control.drag(value);
        control
    }

    /// Current value in percent.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Whether the minimum toggle is checked.
    #[must_use]
    pub const fn minimum(&self) -> bool {
        self.minimum
    }

    /// Percent readout, e.g. `"40%"`.
    #[must_use]
    pub fn readout(&self) -> String {
        format!("{}%", self.value)
    }

    /// Moves the slider. Returns the snapped value.
    pub fn drag(&mut self, value: u8) -> u8 {
        let value = value.min(100);
        let step = self.step;
        let snapped = (value + step / 2) / step * step;
        self.value = snapped.min(100);
        self.minimum = self.value == 0;
        self.value
    }

    /// Checks or unchecks the minimum toggle. Returns the new value.
    pub fn set_minimum(&mut self, checked: bool) -> u8 {
        self.minimum = checked;
        self.value = if checked { 0 } else { 100 };
        self.value
    }
}
