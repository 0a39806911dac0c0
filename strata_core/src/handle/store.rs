// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays mirror of render-engine layer handles.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::HandleId;
use super::source::{GroupType, HandleAttrs, STYLES_PARAM, SourceInfo, SourceKind, ZoomBounds};
use crate::catalog::LayerId;
use crate::dirty;

/// Default saturation of a handle, in percent.
pub const DEFAULT_SATURATION: u8 = 100;

/// Everything needed to mirror a newly added render handle.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleSpec {
    /// Typed attributes.
    pub attrs: HandleAttrs,
    /// Backing source.
    pub source: SourceInfo,
    /// Zoom bounds.
    pub zoom: ZoomBounds,
    /// Initial visibility.
    pub visible: bool,
    /// Initial opacity (0–1).
    pub opacity: f32,
    /// Initial saturation (0–100).
    pub saturation: u8,
    /// Initial stacking index.
    pub z_index: i32,
}

impl HandleSpec {
    /// Creates a visible overlay handle at baseline stacking index 0, full
    /// opacity and default saturation.
    #[must_use]
    pub fn new(layer_id: LayerId, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            attrs: HandleAttrs {
                layer_id,
                name: name.into(),
                group_type: GroupType::Overlay,
            },
            source: SourceInfo::new(kind),
            zoom: ZoomBounds::default(),
            visible: true,
            opacity: 1.0,
            saturation: DEFAULT_SATURATION,
            z_index: 0,
        }
    }

    /// Returns this spec with the given source.
    #[must_use]
    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = source;
        self
    }

    /// Returns this spec with the given zoom bounds.
    #[must_use]
    pub fn with_zoom(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.zoom = ZoomBounds { min, max };
        self
    }

    /// Returns this spec with the given group type.
    #[must_use]
    pub fn with_group(mut self, group_type: GroupType) -> Self {
        self.attrs.group_type = group_type;
        self
    }

    /// Returns this spec with the given initial visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns this spec with the given stacking index.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Slots changed since the previous [`HandleStore::evaluate`] call.
///
/// Each list holds raw slot indices; resolve them with
/// [`HandleStore::id_at`] or [`HandleStore::attrs_at`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandleChanges {
    /// Visibility flag changed.
    pub visibility: Vec<u32>,
    /// Opacity changed.
    pub opacities: Vec<u32>,
    /// Saturation changed.
    pub saturations: Vec<u32>,
    /// Stacking index changed.
    pub stacking: Vec<u32>,
    /// Style parameter changed.
    pub styles: Vec<u32>,
    /// Handles added since the last evaluate.
    pub added: Vec<u32>,
    /// Handles removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any handle was added or removed.
    pub topology_changed: bool,
}

impl HandleChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.visibility.clear();
        self.opacities.clear();
        self.saturations.clear();
        self.stacking.clear();
        self.styles.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
            && self.opacities.is_empty()
            && self.saturations.is_empty()
            && self.stacking.is_empty()
            && self.styles.is_empty()
            && !self.topology_changed
    }
}

/// Struct-of-arrays storage for all mirrored handles.
///
/// Handles are addressed by [`HandleId`]. Removed handles are recycled via a
/// free list, and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct HandleStore {
    // -- Attributes --
    pub(crate) attrs: Vec<HandleAttrs>,
    pub(crate) source: Vec<SourceInfo>,
    pub(crate) zoom: Vec<ZoomBounds>,
    pub(crate) tags: Vec<BTreeMap<String, String>>,

    // -- Live properties --
    pub(crate) visible: Vec<bool>,
    pub(crate) opacity: Vec<f32>,
    pub(crate) saturation: Vec<u8>,
    pub(crate) z_index: Vec<i32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) added_seq: Vec<u64>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    next_seq: u64,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for HandleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attrs: Vec::new(),
            source: Vec::new(),
            zoom: Vec::new(),
            tags: Vec::new(),
            visible: Vec::new(),
            opacity: Vec::new(),
            saturation: Vec::new(),
            z_index: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            added_seq: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            next_seq: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Mirrors a new render handle and returns its id.
    pub fn insert(&mut self, spec: HandleSpec) -> HandleId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.attrs[i] = spec.attrs;
            self.source[i] = spec.source;
            self.zoom[i] = spec.zoom;
            self.tags[i].clear();
            self.visible[i] = spec.visible;
            self.opacity[i] = spec.opacity.clamp(0.0, 1.0);
            self.saturation[i] = spec.saturation.min(100);
            self.z_index[i] = spec.z_index;
            self.alive[i] = true;
            self.added_seq[i] = seq;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.attrs.push(spec.attrs);
            self.source.push(spec.source);
            self.zoom.push(spec.zoom);
            self.tags.push(BTreeMap::new());
            self.visible.push(spec.visible);
            self.opacity.push(spec.opacity.clamp(0.0, 1.0));
            self.saturation.push(spec.saturation.min(100));
            self.z_index.push(spec.z_index);
            self.generation.push(0);
            self.alive.push(true);
            self.added_seq.push(seq);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        HandleId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes a handle, freeing its slot for reuse.
    ///
    /// Attributes of the slot stay readable through [`attrs_at`](Self::attrs_at)
    /// until the slot is reused, so presenters can resolve removals.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: HandleId) {
        self.validate(id);
        let idx = id.idx;

        self.dirty.remove_key(idx);
        self.alive[idx as usize] = false;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live slot.
    #[must_use]
    pub fn is_alive(&self, id: HandleId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.alive[id.idx as usize]
    }

    /// Iterates over live handles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = HandleId> + '_ {
        (0..self.len).filter_map(|idx| self.id_at(idx))
    }

    /// Returns the number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    /// Returns whether there are no live handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.alive.iter().any(|a| *a)
    }

    /// Returns the first live handle rendering the given catalog layer.
    #[must_use]
    pub fn find_by_layer(&self, layer: LayerId) -> Option<HandleId> {
        self.iter().find(|&id| self.attrs[id.idx as usize].layer_id == layer)
    }

    /// Returns live handles whose display name equals `name`.
    pub fn with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = HandleId> + 'a {
        self.iter()
            .filter(move |&id| self.attrs[id.idx as usize].name == name)
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the typed attributes of a handle.
    #[must_use]
    pub fn attrs(&self, id: HandleId) -> &HandleAttrs {
        self.validate(id);
        &self.attrs[id.idx as usize]
    }

    /// Returns the display name of a handle.
    #[must_use]
    pub fn name(&self, id: HandleId) -> &str {
        &self.attrs(id).name
    }

    /// Returns the source of a handle.
    #[must_use]
    pub fn source(&self, id: HandleId) -> &SourceInfo {
        self.validate(id);
        &self.source[id.idx as usize]
    }

    /// Returns the zoom bounds of a handle.
    #[must_use]
    pub fn zoom(&self, id: HandleId) -> ZoomBounds {
        self.validate(id);
        self.zoom[id.idx as usize]
    }

    /// Returns whether a handle is visible.
    #[must_use]
    pub fn visible(&self, id: HandleId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the opacity of a handle (0–1).
    #[must_use]
    pub fn opacity(&self, id: HandleId) -> f32 {
        self.validate(id);
        self.opacity[id.idx as usize]
    }

    /// Returns the saturation of a handle (0–100).
    #[must_use]
    pub fn saturation(&self, id: HandleId) -> u8 {
        self.validate(id);
        self.saturation[id.idx as usize]
    }

    /// Returns the stacking index of a handle.
    #[must_use]
    pub fn z_index(&self, id: HandleId) -> i32 {
        self.validate(id);
        self.z_index[id.idx as usize]
    }

    /// Returns an open-ended tag of a handle.
    #[must_use]
    pub fn tag(&self, id: HandleId, key: &str) -> Option<&str> {
        self.validate(id);
        self.tags[id.idx as usize].get(key).map(String::as_str)
    }

    /// Returns the insertion sequence number of a handle (later is larger).
    pub(crate) fn added_seq(&self, id: HandleId) -> u64 {
        self.validate(id);
        self.added_seq[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the visibility of a handle.
    pub fn set_visible(&mut self, id: HandleId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
        self.dirty.mark(id.idx, dirty::VISIBILITY);
    }

    /// Sets the opacity of a handle, clamped to 0–1.
    pub fn set_opacity(&mut self, id: HandleId, opacity: f32) {
        self.validate(id);
        self.opacity[id.idx as usize] = opacity.clamp(0.0, 1.0);
        self.dirty.mark(id.idx, dirty::OPACITY);
    }

    /// Sets the saturation of a handle, clamped to 0–100.
    pub fn set_saturation(&mut self, id: HandleId, saturation: u8) {
        self.validate(id);
        self.saturation[id.idx as usize] = saturation.min(100);
        self.dirty.mark(id.idx, dirty::SATURATION);
    }

    /// Sets the stacking index of a handle.
    pub fn set_z_index(&mut self, id: HandleId, z_index: i32) {
        self.validate(id);
        self.z_index[id.idx as usize] = z_index;
        self.dirty.mark(id.idx, dirty::STACKING);
    }

    /// Sets the source style parameter. An empty string selects the
    /// service default.
    pub fn set_style(&mut self, id: HandleId, style: &str) {
        self.validate(id);
        self.source[id.idx as usize]
            .params
            .insert(String::from(STYLES_PARAM), String::from(style));
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets an open-ended tag. Tags are not tracked for changes.
    pub fn set_tag(&mut self, id: HandleId, key: impl Into<String>, value: impl Into<String>) {
        self.validate(id);
        self.tags[id.idx as usize].insert(key.into(), value.into());
    }

    // -- Raw-index accessors for presenters --

    /// Returns the live handle at raw slot `idx`, if any.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<HandleId> {
        (idx < self.len && self.alive[idx as usize]).then(|| HandleId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Returns the attributes last stored at raw slot `idx`, live or not.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn attrs_at(&self, idx: u32) -> &HandleAttrs {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.attrs[idx as usize]
    }

    // -- Evaluation --

    /// Drains every dirty channel into a fresh [`HandleChanges`].
    pub fn evaluate(&mut self) -> HandleChanges {
        let mut changes = HandleChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided
    /// buffer.
    pub fn evaluate_into(&mut self, changes: &mut HandleChanges) {
        changes.clear();

        changes.visibility = self.drain(dirty::VISIBILITY);
        changes.opacities = self.drain(dirty::OPACITY);
        changes.saturations = self.drain(dirty::SATURATION);
        changes.stacking = self.drain(dirty::STACKING);
        changes.styles = self.drain(dirty::STYLE);
        let topology = self.drain(dirty::TOPOLOGY);
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    // -- Internal helpers --

    fn drain(&mut self, channel: understory_dirty::Channel) -> Vec<u32> {
        self.dirty.drain(channel).deterministic().run().collect()
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: HandleId) {
        assert!(
            self.is_alive(id),
            "stale HandleId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
