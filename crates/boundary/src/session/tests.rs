use super::*;
use crate::coord;
use crate::geodesic::{destination, distance};
use crate::ring::{close, normalize, round_coord};

fn rect() -> Vec<Coord> {
    vec![
        coord(0.0, 0.0),
        coord(0.0, 0.0002),
        coord(0.0003, 0.0002),
        coord(0.0003, 0.0),
    ]
}

fn session() -> Session {
    Session::new(&rect(), SessionCfg::default())
}

#[test]
fn new_session_is_seeded_and_valid() {
    let s = session();
    assert_eq!(s.ring(), close(&rect()).as_slice());
    assert_eq!(s.vertices(), rect());
    assert_eq!(s.history().len(), 1);
    assert!(!s.can_undo() && !s.can_redo());
    assert!(s.validation().valid);
    assert_eq!(s.metrics().vertices, 4);
}

#[test]
fn transient_updates_do_not_touch_history() {
    let mut s = session();
    for k in 1..=20 {
        let p = coord(0.0003 + k as f64 * 1e-6, 0.000_25);
        let out = s.update_vertex_transient(2, p).unwrap();
        assert_eq!(out.ring[2], round_coord(p));
    }
    assert!(s.is_dirty());
    assert_eq!(s.history().len(), 1);
    let out = s.commit();
    assert!(!s.is_dirty());
    assert_eq!(s.history().len(), 2);
    assert_eq!(out.ring[2], coord(0.000_32, 0.000_25));
    assert!(s.can_undo());
}

#[test]
fn self_intersecting_drag_is_refused() {
    let mut s = session();
    let before = s.ring().to_vec();
    let err = s.update_vertex_transient(2, coord(0.0003, -0.0002)).unwrap_err();
    assert_eq!(err, EditError::WouldSelfIntersect { index: 2 });
    assert_eq!(s.ring(), before.as_slice());
    assert!(!s.is_dirty());
    assert!(matches!(
        s.update_vertex_transient(9, coord(0.0, 0.0)),
        Err(EditError::IndexOutOfRange { index: 9, len: 4 })
    ));
}

#[test]
fn committed_moves_may_be_invalid_but_are_reported() {
    let mut s = session();
    let out = s.move_vertex(2, coord(0.0003, -0.0002)).unwrap();
    assert!(!out.validation.valid);
    assert!(out.metrics.self_intersects);
    assert!(s.undo().unwrap().validation.valid);
}

#[test]
fn undo_first_reverts_only_the_transient_state() {
    let mut s = session();
    s.move_vertex_by(0, 2.0, 180.0).unwrap();
    let committed = s.ring().to_vec();
    s.update_vertex_transient(1, coord(-0.000_01, 0.000_21)).unwrap();
    assert!(s.can_undo());
    let out = s.undo().unwrap();
    assert_eq!(out.ring, committed);
    assert!(!s.is_dirty());
    assert_eq!(s.history().len(), 2);
    let out = s.undo().unwrap();
    assert_eq!(out.ring, close(&rect()));
    let out = s.redo().unwrap();
    assert_eq!(out.ring, committed);
    assert!(s.redo().is_none());
}

#[test]
fn dragging_onto_a_neighbour_merges_the_vertices() {
    let mut s = session();
    let out = s.update_vertex_transient(1, coord(0.0, 0.0)).unwrap();
    assert_eq!(out.ring, normalize(&out.ring).ring);
    assert_eq!(s.vertices().len(), 3);
    assert_eq!(s.vertices().len(), s.metrics().vertices);
    assert_eq!(s.metrics().segments.len(), 3);
    s.commit();
    let snapshot = s.history().current().clone();
    assert_eq!(snapshot, normalize(&snapshot).ring);
    assert_eq!(snapshot.len(), 4);
}

#[test]
fn sixty_commits_with_a_fifty_entry_bound() {
    let mut s = session();
    for k in 1..=60 {
        s.move_vertex(0, coord(-(k as f64) * 1e-6, 0.0)).unwrap();
    }
    assert_eq!(s.history().len(), 50);
    for _ in 0..49 {
        assert!(s.undo().is_some());
    }
    assert!(!s.can_undo());
    let oldest = s.ring().to_vec();
    assert!(s.undo().is_none());
    assert_eq!(s.ring(), oldest.as_slice());
    assert_eq!(oldest[0], coord(-11e-6, 0.0));
}

#[test]
fn batch_is_one_undo_step() {
    let mut s = session();
    s.start_batch();
    s.insert_vertex(2, coord(0.000_15, 0.000_25)).unwrap();
    s.set_segment_length(0, 30.0).unwrap();
    s.start_batch();
    s.remove_vertex(4).unwrap();
    s.end_batch().unwrap();
    assert_eq!(s.history().len(), 1);
    assert!(s.in_batch());
    assert!(!s.can_undo());
    assert!(s.undo().is_none());
    let out = s.end_batch().unwrap();
    assert_eq!(out.metrics.vertices, 4);
    assert_eq!(s.history().len(), 2);
    assert_eq!(s.undo().unwrap().ring, close(&rect()));
    assert_eq!(s.end_batch(), Err(EditError::NoOpenBatch));
}

#[test]
fn unchanged_batch_adds_no_step() {
    let mut s = session();
    s.start_batch();
    s.end_batch().unwrap();
    assert_eq!(s.history().len(), 1);
}

#[test]
fn insert_on_edge_splits_the_nearest_edge() {
    let mut s = session();
    let mid = destination(coord(0.0, 0.0), 16.0, 90.0);
    let near = destination(mid, 0.8, 0.0);
    let out = s.insert_on_edge(near, 1.0).unwrap();
    assert_eq!(out.metrics.vertices, 5);
    assert!(distance(out.ring[4], mid) < 0.05, "{:?}", out.ring);
    assert!(matches!(
        s.insert_on_edge(coord(0.000_15, 0.0001), 1.0),
        Err(EditError::NoEdgeInRange { .. })
    ));
}

#[test]
fn measured_edits() {
    let mut s = session();
    let out = s.set_segment_bearing(0, 10.0).unwrap();
    assert!((out.metrics.segments[0].bearing - 10.0).abs() < 0.05);
    let out = s.ensure_orientation(false);
    assert!(!crate::topology::is_clockwise(&out.ring));
    assert_eq!(s.history().len(), 3);
    // already counter-clockwise: no new step
    s.ensure_orientation(false);
    assert_eq!(s.history().len(), 3);
}

#[test]
fn import_failure_leaves_ring_untouched() {
    let mut s = session();
    let before = s.ring().to_vec();
    assert!(matches!(
        s.import_wkt("POLYGON ((0 0, 1 1, 0 0))"),
        Err(CodecError::TooFewVertices { found: 2 })
    ));
    assert!(s.import_geojson("{").is_err());
    assert_eq!(s.ring(), before.as_slice());
    assert_eq!(s.history().len(), 1);

    let out = s
        .import_csv("longitude,latitude\n10,50\n10,50.0002\n10.0003,50.0002\n")
        .unwrap();
    assert_eq!(out.metrics.vertices, 3);
    assert_eq!(s.history().len(), 2);
}

#[test]
fn exports_round_trip_through_a_new_session() {
    let s = session();
    for text in [s.export_geojson(), s.export_wkt(), s.export_csv()] {
        let format = if text.starts_with('{') {
            Format::GeoJson
        } else if text.starts_with("POLYGON") {
            Format::Wkt
        } else {
            Format::Csv
        };
        let t = Session::from_text(format, &text, SessionCfg::default()).unwrap();
        assert_eq!(t.ring(), s.ring());
    }
    assert_eq!(s.export(Format::Wkt), s.export_wkt());
}

#[test]
fn derived_data_is_memoized_per_ring_value() {
    let mut s = session();
    let first: *const Report = s.validation();
    s.transient_update(&rect());
    let second: *const Report = s.validation();
    assert!(std::ptr::eq(first, second));
    s.transient_update(&[coord(0.0, 0.0), coord(0.0, 0.0003), coord(0.0003, 0.0)]);
    assert_eq!(s.metrics().vertices, 3);
}

#[test]
fn threshold_changes_revalidate() {
    let mut s = session();
    assert!(s.validation().warnings.is_empty());
    s.set_thresholds(ValidationThresholds {
        min_area_m2: 5_000.0,
        ..Default::default()
    });
    assert_eq!(s.validation().warnings.len(), 1);
}
