// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The control-state coordinator.
//!
//! [`ControlStateCoordinator`] owns every piece of layer-panel state and is
//! the only thing hosts talk to. It never performs I/O: time arrives as a
//! [`HostTime`] argument, timers fire from [`advance`], style fetches go out
//! as a [`StyleRequest`] and come back through [`resolve_style_fetch`], and
//! everything other subsystems must learn about is queued for
//! [`drain_outbound`].
//!
//! [`advance`]: ControlStateCoordinator::advance
//! [`resolve_style_fetch`]: ControlStateCoordinator::resolve_style_fetch
//! [`drain_outbound`]: ControlStateCoordinator::drain_outbound

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::backend::ViewChanges;
use crate::badge::BadgeBoard;
use crate::catalog::{Catalog, CategoryId, LayerId, SortMode};
use crate::config::ControlConfig;
use crate::error::ControlError;
use crate::event::EngineEvent;
use crate::handle::{GroupType, HandleId, HandleSpec, HandleStore};
use crate::list::{ListTree, render_list};
use crate::load::{LoadContext, LoadTimer, LoadTracker};
use crate::range::{RangeReport, RangeValidator, classify};
use crate::search::{SearchIndex, SearchOutcome};
use crate::signal::{ChangeReason, Signal};
use crate::slider::{SliderControl, SliderKind, SliderTarget};
use crate::stack::{self, StackEntry};
use crate::style::{StyleModal, StyleRequest, StyleSwitcher};
use crate::time::HostTime;
use crate::timer::TimerQueue;
use crate::trace::{RangeEvent, ReorderEvent, SearchEvent, TraceSink, Tracer};

/// Single owner of the layer panel's state.
#[derive(Debug)]
pub struct ControlStateCoordinator {
    config: ControlConfig,
    catalog: Catalog,
    index: SearchIndex,
    query: String,
    search: SearchOutcome,
    sort: SortMode,
    store: HandleStore,
    badges: BadgeBoard,
    loads: LoadTracker,
    range: RangeValidator,
    styles: StyleSwitcher,
    timers: TimerQueue<LoadTimer>,
    outbound: Vec<Signal>,
    list_dirty: bool,
    tracer: Tracer,
}

impl ControlStateCoordinator {
    /// Creates a coordinator for `catalog` with no layers on the map.
    #[must_use]
    pub fn new(catalog: Catalog, config: ControlConfig) -> Self {
        let index = SearchIndex::build(&catalog, config.search_threshold);
        Self {
            index,
            catalog,
            query: String::new(),
            search: SearchOutcome::ShowAll,
            sort: SortMode::Default,
            store: HandleStore::new(),
            badges: BadgeBoard::new(),
            loads: LoadTracker::new(&config),
            range: RangeValidator::new(),
            styles: StyleSwitcher::new(config.proxy_url.clone()),
            timers: TimerQueue::new(),
            outbound: Vec::new(),
            list_dirty: true,
            tracer: Tracer::none(),
            config,
        }
    }

    /// Builds the catalog from a JSON snapshot and creates a coordinator.
    pub fn from_json(json: &str, config: ControlConfig) -> Result<Self, ControlError> {
        Ok(Self::new(Catalog::from_json(json)?, config))
    }

    /// Installs a trace sink. Without the `trace` feature the sink is
    /// dropped.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    // -- Accessors --

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the handle mirror.
    #[must_use]
    pub fn store(&self) -> &HandleStore {
        &self.store
    }

    /// Returns the badge board.
    #[must_use]
    pub fn badges(&self) -> &BadgeBoard {
        &self.badges
    }

    /// Returns the load tracker.
    #[must_use]
    pub fn loads(&self) -> &LoadTracker {
        &self.loads
    }

    /// Returns the current sort mode.
    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Returns the active query (empty when cleared).
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the outcome of the active query.
    #[must_use]
    pub fn search_outcome(&self) -> &SearchOutcome {
        &self.search
    }

    /// Returns the handle and body of the open style modal.
    #[must_use]
    pub fn style_modal(&self) -> Option<(HandleId, &StyleModal)> {
        self.styles.modal()
    }

    /// Returns the earliest pending timer deadline, so hosts know when to
    /// call [`advance`](Self::advance) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.timers.next_deadline()
    }

    // -- Engine events --

    /// Dispatches an engine event. Events naming removed handles are
    /// ignored.
    ///
    /// The id minted for [`EngineEvent::LayerAdded`] is not returned; call
    /// [`layer_added`](Self::layer_added) directly to get it, or read it back
    /// from the `handles.added` slots of the next [`evaluate`](Self::evaluate)
    /// through [`HandleStore::id_at`].
    pub fn handle_event(&mut self, now: HostTime, event: EngineEvent) {
        let result = match event {
            EngineEvent::LayerAdded(spec) => {
                let _ = self.layer_added(spec);
                Ok(())
            }
            EngineEvent::LayerRemoved(id) => self.layer_removed(id),
            EngineEvent::VisibilityChanged(id, visible) => self.set_layer_visible(id, visible),
            EngineEvent::ViewMoveEnd { zoom } => {
                let _ = self.view_move_end(zoom);
                Ok(())
            }
            EngineEvent::RenderComplete => {
                self.render_complete(now);
                Ok(())
            }
            EngineEvent::LoadStart(id) => self.load_start(now, id),
            EngineEvent::LoadEnd(id) => self.load_end(now, id),
            EngineEvent::LoadError(id) => self.load_error(now, id),
        };
        if let Err(err) = result {
            log::debug!("ignoring engine event: {err}");
        }
    }

    /// Mirrors a layer the engine added.
    ///
    /// Zoom bounds missing from `spec` are taken from the layer's catalog
    /// configuration.
    pub fn layer_added(&mut self, mut spec: HandleSpec) -> HandleId {
        if let Some(config) = self.catalog.layer(spec.attrs.layer_id) {
            spec.zoom.min = spec.zoom.min.or(config.min_zoom);
            spec.zoom.max = spec.zoom.max.or(config.max_zoom);
        }
        let id = self.store.insert(spec);
        if let Some(rounded) = self.range.previous_zoom() {
            self.badges
                .set_range(id, classify(self.store.zoom(id), rounded));
        }
        self.list_dirty = true;
        id
    }

    /// Drops a layer the engine removed, with all of its per-handle state.
    pub fn layer_removed(&mut self, id: HandleId) -> Result<(), ControlError> {
        self.check(id)?;
        let name = String::from(self.store.name(id));
        self.store.remove(id);
        self.badges.forget(id);
        self.loads
            .forget_handle(id, &name, &self.store, &mut self.timers);
        self.styles.forget(id);
        self.list_dirty = true;
        Ok(())
    }

    /// Shows or hides a layer.
    ///
    /// Hiding clears its error badge and error memory, so a failure after it
    /// is shown again alerts anew.
    pub fn set_layer_visible(&mut self, id: HandleId, visible: bool) -> Result<(), ControlError> {
        self.check(id)?;
        if self.store.visible(id) != visible {
            self.store.set_visible(id, visible);
        }
        if !visible {
            self.badges.set_error(id, false);
            self.loads.forget_error(id);
        }
        Ok(())
    }

    /// Re-validates zoom ranges after the view settled.
    pub fn view_move_end(&mut self, zoom: f64) -> RangeReport {
        let report = self.range.evaluate(zoom, &self.store, &mut self.badges);
        self.tracer.range(&RangeEvent {
            rounded_zoom: report.rounded_zoom,
            out_of_range: report.out_of_range.len(),
            crossed: report.crossed.len(),
        });
        if let Some(notice) = report.toast(&self.store) {
            self.outbound.push(Signal::Notice(notice));
        }
        report
    }

    /// Runs error reconciliation after a rendered frame.
    pub fn render_complete(&mut self, now: HostTime) {
        self.with_loads(now, |loads, cx| loads.reconcile(cx));
    }

    /// Records a load start.
    pub fn load_start(&mut self, now: HostTime, id: HandleId) -> Result<(), ControlError> {
        self.check(id)?;
        self.with_loads(now, |loads, cx| loads.start(cx, id));
        Ok(())
    }

    /// Records a successful load.
    pub fn load_end(&mut self, now: HostTime, id: HandleId) -> Result<(), ControlError> {
        self.check(id)?;
        self.with_loads(now, |loads, cx| loads.end(cx, id));
        Ok(())
    }

    /// Records a failed load.
    pub fn load_error(&mut self, now: HostTime, id: HandleId) -> Result<(), ControlError> {
        self.check(id)?;
        self.with_loads(now, |loads, cx| loads.error(cx, id));
        Ok(())
    }

    /// Fires every timer due at `now`, in deadline order.
    pub fn advance(&mut self, now: HostTime) {
        while let Some((token, timer)) = self.timers.pop_due(now) {
            self.with_loads(now, |loads, cx| loads.fire(cx, token, timer));
        }
    }

    // -- Layer list --

    /// Expands or collapses a category. Returns the new state.
    pub fn toggle_category(&mut self, id: CategoryId) -> Option<bool> {
        let open = self.catalog.toggle_open(id)?;
        self.list_dirty = true;
        Some(open)
    }

    /// Changes how sibling categories are ordered.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        if self.sort != mode {
            self.sort = mode;
            self.list_dirty = true;
        }
    }

    /// Applies a search query and expands the ancestors of every hit.
    pub fn search(&mut self, query: &str) -> &SearchOutcome {
        let outcome = self.index.query(&self.catalog, query);
        let revealed = match &outcome {
            SearchOutcome::Filtered(reveal) => {
                for &id in &reveal.expand {
                    self.catalog.set_open(id, true);
                }
                reveal.layers.len()
            }
            SearchOutcome::ShowAll | SearchOutcome::NoResults => 0,
        };
        self.tracer.search(&SearchEvent { query, revealed });
        self.query = String::from(query.trim());
        self.search = outcome;
        self.list_dirty = true;
        &self.search
    }

    /// Clears the search. Categories expanded by it stay expanded.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.search = SearchOutcome::ShowAll;
        self.list_dirty = true;
    }

    /// Renders the layer list for the current state.
    #[must_use]
    pub fn render_list(&self) -> ListTree {
        let active: BTreeSet<LayerId> = self
            .store
            .iter()
            .map(|id| self.store.attrs(id).layer_id)
            .collect();
        render_list(&self.catalog, &self.search, self.sort, &active)
    }

    // -- Active stack --

    /// Returns visible overlays, topmost first.
    #[must_use]
    pub fn active_stack(&self) -> Vec<StackEntry> {
        stack::active_stack(&self.store)
    }

    /// Applies a user reorder of the active stack, given top to bottom.
    pub fn reorder_stack(&mut self, order: &[HandleId]) -> Result<(), ControlError> {
        stack::reorder(&mut self.store, order)?;
        self.tracer.reorder(&ReorderEvent { count: order.len() });
        self.outbound.push(Signal::StateChanged(ChangeReason::Reorder));
        Ok(())
    }

    // -- Sliders --

    /// Builds a slider control reflecting the target's current value.
    pub fn slider(
        &self,
        kind: SliderKind,
        target: SliderTarget,
    ) -> Result<SliderControl, ControlError> {
        let id = self.resolve_slider(target)?;
        let value = match kind {
            SliderKind::Opacity => percent(self.store.opacity(id)),
            SliderKind::Saturation => self.store.saturation(id),
        };
        Ok(SliderControl::new(
            kind,
            kind.label(),
            self.config.slider_step,
            value,
        ))
    }

    /// Applies a slider's value to its target immediately.
    pub fn apply_slider(
        &mut self,
        target: SliderTarget,
        control: &SliderControl,
    ) -> Result<(), ControlError> {
        let id = self.resolve_slider(target)?;
        match control.kind {
            SliderKind::Opacity => self
                .store
                .set_opacity(id, f32::from(control.value()) / 100.0),
            SliderKind::Saturation => self.store.set_saturation(id, control.value()),
        }
        self.outbound.push(Signal::StateChanged(ChangeReason::Slider));
        Ok(())
    }

    fn resolve_slider(&self, target: SliderTarget) -> Result<HandleId, ControlError> {
        match target {
            SliderTarget::Layer(id) => {
                self.check(id)?;
                Ok(id)
            }
            SliderTarget::Basemap => self
                .store
                .iter()
                .find(|&id| {
                    self.store.visible(id)
                        && self.store.attrs(id).group_type == GroupType::Basemap
                })
                .ok_or(ControlError::NoBasemap),
        }
    }

    // -- Style modal --

    /// Opens the style modal for a layer and describes the fetch to run.
    pub fn open_style_modal(&mut self, id: HandleId) -> Result<StyleRequest, ControlError> {
        self.check(id)?;
        Ok(self.styles.open(&self.store, &self.catalog, id)?)
    }

    /// Completes the style fetch started by
    /// [`open_style_modal`](Self::open_style_modal).
    pub fn resolve_style_fetch(
        &mut self,
        fetched: Result<Vec<String>, String>,
    ) -> Result<&StyleModal, ControlError> {
        Ok(self.styles.resolve(&self.store, fetched)?)
    }

    /// Applies the style choice at `index` and closes the modal.
    pub fn select_style(&mut self, index: usize) -> Result<HandleId, ControlError> {
        let id = self.styles.select(&mut self.store, index)?;
        self.outbound.push(Signal::StateChanged(ChangeReason::Style));
        self.outbound.push(Signal::StyleUpdated(id));
        Ok(id)
    }

    /// Closes the style modal without changes.
    pub fn close_style_modal(&mut self) {
        self.styles.close();
    }

    // -- Output --

    /// Drains handle, badge and list changes for presenters.
    pub fn evaluate(&mut self) -> ViewChanges {
        ViewChanges {
            handles: self.store.evaluate(),
            badges: self.badges.evaluate(),
            list_dirty: core::mem::take(&mut self.list_dirty),
        }
    }

    /// Hands over queued signals, oldest first.
    pub fn drain_outbound(&mut self) -> impl Iterator<Item = Signal> + '_ {
        self.outbound.drain(..)
    }

    // -- Internal helpers --

    fn check(&self, id: HandleId) -> Result<(), ControlError> {
        if self.store.is_alive(id) {
            Ok(())
        } else {
            Err(ControlError::StaleHandle(id))
        }
    }

    fn with_loads<R>(
        &mut self,
        now: HostTime,
        f: impl FnOnce(&mut LoadTracker, &mut LoadContext<'_>) -> R,
    ) -> R {
        let mut cx = LoadContext {
            now,
            store: &self.store,
            badges: &mut self.badges,
            timers: &mut self.timers,
            outbound: &mut self.outbound,
            tracer: &mut self.tracer,
        };
        f(&mut self.loads, &mut cx)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "opacity is clamped to 0-1, so the percentage fits in u8"
)]
fn percent(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 100.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::handle::{LAYERS_PARAM, SourceInfo, SourceKind};
    use crate::list::ListPatch;
    use crate::signal::NoticeKind;

    const CATALOG: &str = r#"{
        "categories": [
            {"id": 1, "name": "Transport", "order": 1, "layers": [
                {"layer": 10, "position": 0},
                {"layer": 11, "position": 1}
            ]},
            {"id": 2, "name": "Rail", "order": 1, "parent": 1, "layers": [
                {"layer": 12, "position": 0}
            ]},
            {"id": 3, "name": "Base maps", "order": 0, "layers": [
                {"layer": 1, "position": 0}
            ]}
        ],
        "layers": [
            {"id": 1, "name": "OSM"},
            {"id": 10, "name": "Roads", "maxZoom": 10},
            {"id": 11, "name": "Water"},
            {"id": 12, "name": "Stations"}
        ]
    }"#;

    fn coordinator() -> ControlStateCoordinator {
        ControlStateCoordinator::from_json(CATALOG, ControlConfig::web()).unwrap()
    }

    fn overlay(layer: u32, name: &str) -> HandleSpec {
        HandleSpec::new(LayerId(layer), name, SourceKind::Tile)
    }

    fn drain(c: &mut ControlStateCoordinator) -> Vec<Signal> {
        c.drain_outbound().collect()
    }

    #[test]
    fn structural_changes_mark_list_dirty() {
        let mut c = coordinator();
        assert!(c.evaluate().list_dirty, "first render");
        assert!(!c.evaluate().list_dirty);

        let roads = c.layer_added(overlay(10, "Roads"));
        let changes = c.evaluate();
        assert!(changes.list_dirty);
        assert_eq!(changes.handles.added, vec![roads.index()]);
        assert!(c.render_list().layer(CategoryId(1), LayerId(10)).unwrap().active);

        c.layer_removed(roads).unwrap();
        assert!(c.evaluate().list_dirty);
        assert!(!c.render_list().layer(CategoryId(1), LayerId(10)).unwrap().active);
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut c = coordinator();
        let roads = c.layer_added(overlay(10, "Roads"));
        c.layer_removed(roads).unwrap();
        c.handle_event(HostTime(0), EngineEvent::LoadStart(roads));
        c.handle_event(HostTime(0), EngineEvent::VisibilityChanged(roads, false));
        assert!(matches!(
            c.load_error(HostTime(0), roads),
            Err(ControlError::StaleHandle(_))
        ));
        assert!(c.next_deadline().is_none());
    }

    #[test]
    fn removal_drops_per_handle_state() {
        let mut c = coordinator();
        let roads = c.layer_added(overlay(10, "Roads"));
        c.load_start(HostTime(0), roads).unwrap();
        assert!(c.badges().has_spinner(roads));
        c.layer_removed(roads).unwrap();
        assert_eq!(c.loads().state("Roads"), None);
        assert!(!c.badges().has_spinner(roads));
        assert!(c.next_deadline().is_none(), "stall timer cancelled");
    }

    #[test]
    fn hiding_resets_error_memory() {
        let mut c = coordinator();
        let water = c.layer_added(HandleSpec::new(LayerId(11), "Water", SourceKind::Feature));

        c.load_error(HostTime(0), water).unwrap();
        assert_eq!(drain(&mut c).len(), 1);
        c.render_complete(HostTime(10));
        assert!(drain(&mut c).is_empty(), "deduplicated");

        c.set_layer_visible(water, false).unwrap();
        assert!(!c.badges().has_error(water));
        c.set_layer_visible(water, true).unwrap();
        c.load_error(HostTime(20), water).unwrap();
        let signals = drain(&mut c);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].as_notice().unwrap().kind, NoticeKind::Alert);
    }

    #[test]
    fn search_expands_ancestors_and_clear_keeps_them_open() {
        let mut c = coordinator();
        let _ = c.evaluate();
        let before = c.render_list();

        let outcome = c.search("stations").clone();
        assert!(matches!(outcome, SearchOutcome::Filtered(_)));
        assert!(c.catalog().category(CategoryId(1)).unwrap().open);
        assert!(c.catalog().category(CategoryId(2)).unwrap().open);
        assert!(c.evaluate().list_dirty);

        let during = c.render_list();
        let patches = before.diff(&during);
        assert!(patches.contains(&ListPatch::CategoryHidden {
            id: CategoryId(3),
            hidden: true
        }));
        assert!(patches.contains(&ListPatch::LayerHidden {
            category: CategoryId(1),
            layer: LayerId(10),
            hidden: true
        }));

        c.clear_search();
        assert_eq!(c.query(), "");
        let after = c.render_list();
        assert!(after.roots.iter().all(|n| !n.hidden));
        assert!(after.category(CategoryId(2)).unwrap().open);
    }

    #[test]
    fn sort_mode_and_toggle_rebuild_list() {
        let mut c = coordinator();
        let _ = c.evaluate();
        c.set_sort_mode(SortMode::Default);
        assert!(!c.evaluate().list_dirty, "unchanged mode");
        c.set_sort_mode(SortMode::Alphabetical);
        assert!(c.evaluate().list_dirty);
        assert_eq!(c.toggle_category(CategoryId(1)), Some(true));
        assert_eq!(c.toggle_category(CategoryId(99)), None);
        assert!(c.evaluate().list_dirty);
    }

    #[test]
    fn reorder_emits_state_change() {
        let mut c = coordinator();
        let _ = c.layer_added(
            HandleSpec::new(LayerId(1), "OSM", SourceKind::Tile).with_group(GroupType::Basemap),
        );
        let roads = c.layer_added(overlay(10, "Roads"));
        let water = c.layer_added(overlay(11, "Water"));

        let stack: Vec<_> = c.active_stack().into_iter().map(|e| e.handle).collect();
        assert_eq!(stack, vec![water, roads]);

        c.reorder_stack(&[roads, water]).unwrap();
        assert_eq!(
            drain(&mut c),
            vec![Signal::StateChanged(ChangeReason::Reorder)]
        );
        assert_eq!(c.evaluate().handles.stacking.len(), 2);
        assert!(c.reorder_stack(&[roads]).is_err());
        assert!(drain(&mut c).is_empty());
    }

    #[test]
    fn basemap_slider_targets_visible_basemap() {
        let mut c = coordinator();
        assert!(matches!(
            c.slider(SliderKind::Opacity, SliderTarget::Basemap),
            Err(ControlError::NoBasemap)
        ));
        let osm = c.layer_added(
            HandleSpec::new(LayerId(1), "OSM", SourceKind::Tile).with_group(GroupType::Basemap),
        );

        let mut control = c
            .slider(SliderKind::Saturation, SliderTarget::Basemap)
            .unwrap();
        assert_eq!(control.value(), 100);
        control.set_minimum(true);
        c.apply_slider(SliderTarget::Basemap, &control).unwrap();
        assert_eq!(c.store().saturation(osm), 0);
        assert_eq!(drain(&mut c), vec![Signal::StateChanged(ChangeReason::Slider)]);
    }

    #[test]
    fn opacity_slider_round_trips_percent() {
        let mut c = coordinator();
        let roads = c.layer_added(overlay(10, "Roads"));
        let mut control = c
            .slider(SliderKind::Opacity, SliderTarget::Layer(roads))
            .unwrap();
        control.drag(35);
        c.apply_slider(SliderTarget::Layer(roads), &control).unwrap();
        assert!((c.store().opacity(roads) - 0.35).abs() < 1e-6);
        let again = c
            .slider(SliderKind::Opacity, SliderTarget::Layer(roads))
            .unwrap();
        assert_eq!(again.value(), 35);
        assert_eq!(again.label, "Opacity");
    }

    #[test]
    fn style_selection_signals_collaborators() {
        let mut c = coordinator();
        let source = SourceInfo::new(SourceKind::WmsImage)
            .with_url("https://maps.example.org/wms")
            .with_param(LAYERS_PARAM, "rail:stations");
        let stations = c.layer_added(
            HandleSpec::new(LayerId(12), "Stations", SourceKind::WmsImage).with_source(source),
        );
        let request = c.open_style_modal(stations).unwrap();
        assert_eq!(request.handle, stations);
        let _ = c
            .resolve_style_fetch(Ok(vec![String::from("day"), String::from("night")]))
            .unwrap();
        assert_eq!(c.select_style(2).unwrap(), stations);
        assert_eq!(
            drain(&mut c),
            vec![
                Signal::StateChanged(ChangeReason::Style),
                Signal::StyleUpdated(stations)
            ]
        );
        assert_eq!(c.store().source(stations).style(), Some("night"));
        assert!(c.style_modal().is_none());
    }

    #[test]
    fn removing_target_closes_style_modal() {
        let mut c = coordinator();
        let source = SourceInfo::new(SourceKind::WmsTile).with_url("https://maps.example.org/wms");
        let id = c.layer_added(
            HandleSpec::new(LayerId(12), "Stations", SourceKind::WmsTile).with_source(source),
        );
        let _ = c.open_style_modal(id).unwrap();
        c.layer_removed(id).unwrap();
        assert!(c.style_modal().is_none());
        c.close_style_modal();
    }

    #[test]
    fn late_added_layers_get_range_badges() {
        let mut c = coordinator();
        let _ = c.view_move_end(10.5);
        let roads = c.layer_added(overlay(10, "Roads").with_zoom(None, Some(10.0)));
        assert!(c.badges().get(roads).range.is_out_of_range());
        assert!(drain(&mut c).is_empty(), "no toast for new layers");
    }

    #[test]
    fn catalog_zoom_bounds_fill_missing_handle_bounds() {
        let mut c = coordinator();
        let roads = c.layer_added(overlay(10, "Roads"));
        assert_eq!(c.store().zoom(roads).max, Some(10.0));
        assert_eq!(c.store().zoom(roads).min, None);

        let _ = c.view_move_end(10.3);
        assert_eq!(
            c.badges().get(roads).range,
            crate::badge::RangeStatus::Overzoomed
        );

        // Bounds on the handle win over the catalog.
        let wide = c.layer_added(overlay(10, "Roads wide").with_zoom(None, Some(18.0)));
        assert_eq!(c.store().zoom(wide).max, Some(18.0));
        assert!(!c.badges().get(wide).range.is_out_of_range());
    }

    #[test]
    fn added_event_handle_is_reported_in_changes() {
        let mut c = coordinator();
        let _ = c.evaluate();
        c.handle_event(HostTime(0), EngineEvent::LayerAdded(overlay(11, "Water")));
        let changes = c.evaluate();
        assert_eq!(changes.handles.added.len(), 1);
        let id = c.store().id_at(changes.handles.added[0]).unwrap();
        assert_eq!(c.store().name(id), "Water");
    }
}
