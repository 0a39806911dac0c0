// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios driven through the coordinator's public API.

use strata_core::badge::RangeStatus;
use strata_core::catalog::{CategoryId, LayerId};
use strata_core::config::ControlConfig;
use strata_core::coordinator::ControlStateCoordinator;
use strata_core::event::EngineEvent;
use strata_core::handle::{HandleSpec, LAYERS_PARAM, STYLES_PARAM, SourceInfo, SourceKind};
use strata_core::search::SearchOutcome;
use strata_core::signal::{NoticeKind, Signal};
use strata_core::slider::{SliderKind, SliderTarget};
use strata_core::style::StyleModal;
use strata_core::time::{Duration, HostTime};

const CATALOG: &str = r#"{
    "categories": [
        {"id": 1, "name": "Infrastructure", "order": 1, "layers": [
            {"layer": 10, "position": 0}
        ]},
        {"id": 2, "name": "Hydrology", "order": 2, "layers": [
            {"layer": 11, "position": 0}
        ]},
        {"id": 3, "name": "Geology", "order": 3, "layers": []},
        {"id": 4, "name": "Bedrock", "order": 1, "parent": 3, "layers": [
            {"layer": 12, "position": 0}
        ]},
        {"id": 5, "name": "Faults", "order": 1, "parent": 4, "layers": [
            {"layer": 13, "position": 0}
        ]}
    ],
    "layers": [
        {"id": 10, "name": "Roads", "maxZoom": 10},
        {"id": 11, "name": "Water"},
        {"id": 12, "name": "Lithology", "proxyMetaRequests": true},
        {"id": 13, "name": "Thrust faults"}
    ]
}"#;

fn coordinator() -> ControlStateCoordinator {
    ControlStateCoordinator::from_json(CATALOG, ControlConfig::web()).unwrap()
}

fn notices(c: &mut ControlStateCoordinator) -> Vec<(NoticeKind, String)> {
    c.drain_outbound()
        .filter_map(|s| match s {
            Signal::Notice(n) => Some((n.kind, n.message)),
            _ => None,
        })
        .collect()
}

#[test]
fn stalled_layer_warns_once_and_finished_layer_is_clean() {
    let mut c = coordinator();
    let t0 = HostTime(1_000);
    let roads = c.layer_added(HandleSpec::new(LayerId(10), "Roads", SourceKind::Tile));
    let water = c.layer_added(HandleSpec::new(LayerId(11), "Water", SourceKind::WmsTile));

    c.handle_event(t0, EngineEvent::LoadStart(roads));
    c.handle_event(t0, EngineEvent::LoadStart(water));
    let t200 = t0 + Duration::from_millis(200);
    c.handle_event(t200, EngineEvent::LoadEnd(roads));

    // Host polls at every deadline it is told about.
    let end = t0 + Duration::from_secs(31);
    while let Some(deadline) = c.next_deadline() {
        if deadline > end {
            break;
        }
        c.advance(deadline);
    }
    c.advance(end);

    let notices = notices(&mut c);
    assert_eq!(
        notices,
        vec![(
            NoticeKind::Warning,
            String::from("Layer \"Water\" is taking a long time to load")
        )]
    );
    assert!(!c.badges().has_spinner(roads));
    assert!(!c.badges().has_error(roads));
    assert!(c.badges().has_spinner(water), "stall is not a failure");
    assert_eq!(c.loads().pending("Water"), 1);
}

#[test]
fn max_zoom_exceeded_shows_zoom_out_badge() {
    let mut c = coordinator();
    // The bound comes from the catalog's layer config.
    let roads = c.layer_added(HandleSpec::new(LayerId(10), "Roads", SourceKind::Tile));
    let report = c.view_move_end(10.3);
    assert_eq!(report.rounded_zoom, 11);
    let badges = c.badges().get(roads);
    assert_eq!(badges.range, RangeStatus::Overzoomed);
    assert_eq!(badges.range.tooltip(), Some("Zoom out to see this layer"));
    assert!(c.store().visible(roads));
}

#[test]
fn zooming_past_bounds_toasts_without_hiding() {
    let mut c = coordinator();
    let roads = c.layer_added(HandleSpec::new(LayerId(10), "Roads", SourceKind::Tile));
    c.handle_event(HostTime(0), EngineEvent::ViewMoveEnd { zoom: 9.0 });
    assert!(notices(&mut c).is_empty());
    c.handle_event(HostTime(0), EngineEvent::ViewMoveEnd { zoom: 10.7 });
    assert_eq!(
        notices(&mut c),
        vec![(
            NoticeKind::Toast,
            String::from("Layer \"Roads\" was hidden because it is not visible at this zoom level")
        )]
    );
    assert!(c.store().visible(roads));
}

#[test]
fn leaf_search_reveals_chain_and_clear_restores_visibility() {
    let mut c = coordinator();
    let outcome = c.search("thrust").clone();
    let SearchOutcome::Filtered(reveal) = outcome else {
        panic!("expected a filtered outcome, got {outcome:?}");
    };
    assert!(reveal.layers.contains(&(CategoryId(5), LayerId(13))));

    let tree = c.render_list();
    assert!(!tree.layer(CategoryId(5), LayerId(13)).unwrap().hidden);
    for id in [3, 4, 5] {
        let node = tree.category(CategoryId(id)).unwrap();
        assert!(!node.hidden && node.open, "ancestor {id} revealed and expanded");
    }
    assert!(tree.category(CategoryId(1)).unwrap().hidden);
    assert!(tree.layer(CategoryId(4), LayerId(12)).unwrap().hidden);

    c.clear_search();
    let tree = c.render_list();
    assert!(!tree.no_results);
    assert!(tree.roots.iter().all(|n| !n.hidden));
    assert!(!tree.layer(CategoryId(4), LayerId(12)).unwrap().hidden);
}

#[test]
fn unmatched_search_keeps_everything_and_flags_no_results() {
    let mut c = coordinator();
    assert_eq!(c.search("zzzzzzzz"), &SearchOutcome::NoResults);
    let tree = c.render_list();
    assert!(tree.no_results);
    assert!(tree.roots.iter().all(|n| !n.hidden));
}

#[test]
fn opacity_slider_toggle_round_trip() {
    let mut c = coordinator();
    let water = c.layer_added(HandleSpec::new(LayerId(11), "Water", SourceKind::Image));
    let target = SliderTarget::Layer(water);

    let mut slider = c.slider(SliderKind::Opacity, target).unwrap();
    slider.drag(0);
    assert!(slider.minimum());
    assert_eq!(slider.kind.toggle_label(), "Invisible");
    c.apply_slider(target, &slider).unwrap();
    assert_eq!(c.store().opacity(water), 0.0);

    slider.set_minimum(false);
    assert_eq!(slider.value(), 100);
    assert_eq!(slider.readout(), "100%");
    c.apply_slider(target, &slider).unwrap();
    assert_eq!(c.store().opacity(water), 1.0);
}

#[test]
fn style_modal_marks_current_style() {
    let mut c = coordinator();
    let source = SourceInfo::new(SourceKind::WmsTile)
        .with_url("https://geo.example.org/ows?service=WMS")
        .with_param(LAYERS_PARAM, "geo:lithology")
        .with_param(STYLES_PARAM, "night");
    let litho = c.layer_added(
        HandleSpec::new(LayerId(12), "Lithology", SourceKind::WmsTile).with_source(source),
    );

    let request = c.open_style_modal(litho).unwrap();
    assert_eq!(request.service_url, "https://geo.example.org/ows");
    assert_eq!(c.style_modal(), Some((litho, &StyleModal::Loading)));

    let styles = ["default", "night", "satellite"].map(String::from).to_vec();
    let StyleModal::Choices(choices) = c.resolve_style_fetch(Ok(styles)).unwrap() else {
        panic!("expected choices");
    };
    let active: Vec<_> = choices
        .iter()
        .filter(|ch| ch.active)
        .map(|ch| ch.label.as_str())
        .collect();
    assert_eq!(active, vec!["night"]);
    assert_eq!(choices[0].label, "Default");
    assert!(!choices[0].active);
}

#[test]
fn reorder_yields_contiguous_negative_indices() {
    let mut c = coordinator();
    let ids: Vec<_> = [(10, "Roads"), (11, "Water"), (13, "Thrust faults")]
        .into_iter()
        .map(|(layer, name)| c.layer_added(HandleSpec::new(LayerId(layer), name, SourceKind::Tile)))
        .collect();
    let order = [ids[1], ids[2], ids[0]];
    c.reorder_stack(&order).unwrap();

    let stack = c.active_stack();
    let z: Vec<_> = stack.iter().map(|e| e.z_index).collect();
    assert_eq!(z, vec![-1, -2, -3]);
    let handles: Vec<_> = stack.iter().map(|e| e.handle).collect();
    assert_eq!(handles, order);
}

#[test]
fn repeated_failures_alert_once_until_toggled() {
    let mut c = coordinator();
    let water = c.layer_added(HandleSpec::new(LayerId(11), "Water", SourceKind::Tile));
    let settle = ControlConfig::web().settle_delay;

    let mut now = HostTime(0);
    for _ in 0..3 {
        c.handle_event(now, EngineEvent::LoadError(water));
        now = now + settle;
        c.advance(now);
        c.handle_event(now, EngineEvent::RenderComplete);
    }
    let alerts = notices(&mut c);
    assert_eq!(
        alerts,
        vec![(NoticeKind::Alert, String::from("Layer \"Water\" failed to load"))]
    );

    c.handle_event(now, EngineEvent::VisibilityChanged(water, false));
    c.handle_event(now, EngineEvent::VisibilityChanged(water, true));
    c.handle_event(now, EngineEvent::LoadError(water));
    c.advance(now + settle);
    assert_eq!(notices(&mut c).len(), 1);
}
