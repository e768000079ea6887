//! Map session tests against the in-memory canvas.

use snotrack_core::canvas::Canvas;
use snotrack_core::geometry::{self, GeometryType, Point, Polygon};
use snotrack_core::interaction::{InteractionState, MapEvent, ModifyEvent};
use snotrack_core::{
    Feature, Hydrant, Interaction, InteractionMode, MapSession, MapSnapshot, MemoryCanvas, Trail,
    View,
};

const BASE_LON: f64 = -106.553668;
const BASE_LAT: f64 = 39.612616;

/// Square of `size_m` metres with its south-west corner at a lon/lat offset.
fn square_at(d_lon: f64, d_lat: f64, size_m: f64) -> Polygon {
    let [x, y] = geometry::from_lon_lat(BASE_LON + d_lon, BASE_LAT + d_lat);
    Polygon::new(vec![
        [x, y],
        [x + size_m, y],
        [x + size_m, y + size_m],
        [x, y + size_m],
        [x, y],
    ])
}

fn base_snapshot() -> MapSnapshot {
    MapSnapshot::new(
        vec![
            Trail::new("7")
                .with_polygon(square_at(0.0, 0.0, 200.0))
                .with_polygon(square_at(0.01, 0.0, 200.0)),
            Trail::new("8").with_polygon(square_at(0.0, 0.01, 300.0)),
        ],
        vec![
            Hydrant::new("42", "7", [BASE_LON + 0.005, BASE_LAT + 0.005]).with_name("H1"),
            Hydrant::new("43", "7", [BASE_LON + 0.006, BASE_LAT + 0.004]).with_name("H2"),
            Hydrant::new("50", "8", [BASE_LON - 0.005, BASE_LAT + 0.010]).with_name("H1"),
        ],
    )
}

fn sorted_ids(canvas: &MemoryCanvas) -> Vec<String> {
    let mut ids = canvas.feature_ids();
    ids.sort();
    ids
}

fn domain_ids(snapshot: &MapSnapshot) -> Vec<String> {
    let mut ids: Vec<String> = snapshot
        .trails
        .values()
        .flat_map(|trail| trail.feature_ids().collect::<Vec<_>>())
        .chain(snapshot.hydrants.values().map(Hydrant::feature_id))
        .collect();
    ids.sort();
    ids
}

fn session() -> MapSession<MemoryCanvas> {
    MapSession::new(MemoryCanvas::new(), View::new([1024.0, 768.0]))
}

#[test]
fn canvas_matches_model_after_each_changing_update() {
    let mut session = session();
    let mut snapshot = base_snapshot();
    session.update(&snapshot);
    assert_eq!(sorted_ids(session.canvas()), domain_ids(&snapshot));

    // Delete a hydrant.
    snapshot.hydrants.remove("43");
    session.update(&snapshot);
    assert_eq!(sorted_ids(session.canvas()), domain_ids(&snapshot));

    // Import a new trail with two polygons.
    snapshot.trails.insert(
        "9".into(),
        Trail::new("9")
            .with_polygon(square_at(0.02, 0.0, 100.0))
            .with_polygon(square_at(0.02, 0.01, 100.0)),
    );
    session.update(&snapshot);
    assert_eq!(sorted_ids(session.canvas()), domain_ids(&snapshot));

    // Remove one polygon from trail 7 and the whole of trail 8.
    if let Some(trail) = snapshot.trails.get_mut("7") {
        trail.features.retain(|feature| feature.index != 1);
    }
    snapshot.trails.remove("8");
    snapshot.hydrants.remove("50");
    session.update(&snapshot);
    assert_eq!(sorted_ids(session.canvas()), domain_ids(&snapshot));
}

#[test]
fn repeated_update_does_not_touch_canvas() {
    let mut session = session();
    let snapshot = base_snapshot();
    session.update(&snapshot);
    let mutations = session.canvas().mutation_count();

    let report = session.update(&snapshot);
    assert!(report.sync.is_noop());
    assert!(!report.interactions_swapped);
    assert_eq!(session.canvas().mutation_count(), mutations);
}

#[test]
fn selecting_trail_for_editing_installs_draw_modify_snap() {
    let mut session = session();
    let snapshot = base_snapshot();
    session.update(&snapshot);
    assert_eq!(session.canvas().interaction_count(), 0);

    let editing = snapshot
        .clone()
        .with_mode(InteractionMode::DrawModifyTrail)
        .with_selected_trail(Some("7".into()));
    let report = session.update(&editing);
    assert!(report.interactions_swapped);
    assert_eq!(
        session.state(),
        &InteractionState::DrawModifyTrail {
            trail: Some("7".into())
        }
    );

    let installed: Vec<Interaction> = session
        .canvas()
        .interactions()
        .map(|(_, interaction)| interaction.clone())
        .collect();
    assert_eq!(installed.len(), 3);
    assert!(installed.contains(&Interaction::Draw {
        geometry_type: GeometryType::Polygon
    }));
    assert!(installed.contains(&Interaction::Modify {
        features: vec!["t-7-0".into(), "t-7-1".into()]
    }));
    assert!(installed.contains(&Interaction::Snap {
        pixel_tolerance: 5.0
    }));

    let idle = editing.with_mode(InteractionMode::None);
    session.update(&idle);
    assert_eq!(session.canvas().interaction_count(), 0);
    assert_eq!(session.state(), &InteractionState::Idle);
}

#[test]
fn selecting_trail_pans_to_its_first_polygon() {
    let mut session = session();
    let snapshot = base_snapshot().with_selected_trail(Some("8".into()));
    let report = session.update(&snapshot);

    let target = report.focus.expect("focus target");
    let polygon = &snapshot.trails["8"].features[0];
    assert!(polygon.polygon.as_ref().unwrap().contains(target.center));
    assert_eq!(session.view().center, target.center);

    // Same selection again: no new pan.
    assert!(session.update(&snapshot).focus.is_none());
}

#[test]
fn selecting_trail_without_geometry_leaves_view_alone() {
    let mut session = session();
    let mut snapshot = base_snapshot();
    snapshot.trails.insert("empty".into(), Trail::new("empty"));
    let before = session.view().clone();

    let report = session.update(&snapshot.with_selected_trail(Some("empty".into())));
    assert!(report.focus.is_none());
    assert_eq!(session.view(), &before);
}

#[test]
fn drawing_onto_existing_hydrant_is_discarded() {
    let mut session = session();
    let snapshot = base_snapshot()
        .with_mode(InteractionMode::DrawModifyHydrants)
        .with_selected_trail(Some("7".into()));
    session.update(&snapshot);

    let mut events: Vec<MapEvent> = Vec::new();
    let on_hydrant = snapshot.hydrants["42"].feature.clone();
    session.draw_end(on_hydrant.into(), &mut events);
    assert!(events.is_empty());

    let open_ground = Point::from_lon_lat(BASE_LON + 0.003, BASE_LAT - 0.003);
    session.draw_end(open_ground.clone().into(), &mut events);
    assert_eq!(events, vec![MapEvent::DrawEnd(open_ground.into())]);
}

#[test]
fn grabbing_hydrant_selects_it_instead_of_reporting_modify_start() {
    let mut session = session();
    let snapshot = base_snapshot()
        .with_mode(InteractionMode::DrawModifyHydrants)
        .with_selected_trail(Some("7".into()));
    session.update(&snapshot);
    let pixel = session
        .view()
        .pixel_from_coordinate(snapshot.hydrants["43"].feature.coord);

    let mut events: Vec<MapEvent> = Vec::new();
    session.modify_start(
        ModifyEvent {
            pixel,
            features: Vec::new(),
        },
        &mut events,
    );
    assert_eq!(events, vec![MapEvent::HydrantSelected("43".into())]);

    events.clear();
    session.click(pixel, &mut events);
    assert_eq!(events, vec![MapEvent::HydrantSelected("43".into())]);
}

#[test]
fn trail_mode_reports_modify_and_writes_geometry_back() {
    let mut session = session();
    let snapshot = base_snapshot()
        .with_mode(InteractionMode::DrawModifyTrail)
        .with_selected_trail(Some("7".into()));
    session.update(&snapshot);

    let edited = Feature::new("t-7-0", square_at(0.0, 0.0, 250.0));
    let event = ModifyEvent {
        pixel: [10.0, 10.0],
        features: vec![edited.clone()],
    };
    let mut events: Vec<MapEvent> = Vec::new();
    session.modify_start(event.clone(), &mut events);
    session.modify_end(event.clone(), &mut events);

    assert_eq!(
        events,
        vec![MapEvent::ModifyStart(event.clone()), MapEvent::ModifyEnd(event)]
    );
    assert_eq!(
        session.canvas().feature_by_id("t-7-0").map(|f| &f.geometry),
        Some(&edited.geometry)
    );
}

#[test]
fn hover_highlight_and_close() {
    let mut session = session();
    let snapshot = base_snapshot()
        .with_mode(InteractionMode::DrawModifyTrail)
        .with_selected_trail(Some("7".into()));
    session.update(&snapshot);

    assert!(session.set_hydrant_highlighted("42", true));
    assert!(!session.set_hydrant_highlighted("missing", true));
    assert!(session.canvas().feature_by_id("h-42").unwrap().highlighted);

    let canvas = session.close();
    assert_eq!(canvas.interaction_count(), 0);
    assert_eq!(canvas.feature_count(), 6);
}
