//! Flat pure-function surface over rings and reports.
//!
//! Adapters that do not need a `Session` import from here; everything is a
//! plain function of coordinate data with no mapping-SDK dependency.

// Precision & ring model
pub use crate::ring::{
    close, is_closed, normalize, open, remove_consecutive_duplicates, round, round_coord,
    round_to, vertex_count, Normalized,
};
// Geodesic metrics
pub use crate::geodesic::{
    angles, area, bearing, centroid, destination, distance, midpoint, perimeter,
    point_segment_distance, segments, Segment, SegmentProjection, VertexAngle,
};
// Topology
pub use crate::topology::{
    bounds, contains, ensure_orientation, is_clockwise, is_self_intersecting,
    segment_intersection, would_cause_intersection, Bounds, SelfIntersection,
};
// Snapping
pub use crate::snap::{
    constrain_to_angle, meters_per_pixel, snap_bearing, snap_to_edge, snap_to_vertex, EdgeSnap,
    VertexSnap, DEFAULT_BEARING_INCREMENT,
};
// Validation
pub use crate::validate::{metrics, validate, Metrics, Report, ValidationThresholds};
// Edits
pub use crate::edit::{
    insert_vertex, move_vertex_by, remove_vertex, replace_vertex, set_segment_bearing,
    set_segment_length, EditError,
};
// Codecs & simplification
pub use crate::codec::{
    from_csv, from_geojson, from_wkt, to_csv, to_geojson, to_geojson_feature, to_wkt, CodecError,
    Format,
};
pub use crate::simplify::simplify;
