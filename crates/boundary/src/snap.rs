//! Snapping: vertex, edge and angle.
//!
//! Tolerances are metres on the ground. Converting a pixel threshold needs the
//! map zoom, which only the caller knows; `meters_per_pixel` is provided for
//! that conversion and is never used inside the core.

use serde::Serialize;

use crate::geodesic::{bearing, destination, distance, normalize_degrees, point_segment_distance};
use crate::ring::{open, round_coord};
use crate::Coord;

/// Web-Mercator ground resolution at the equator for zoom 0 (256 px tiles).
const MERCATOR_M_PER_PX_Z0: f64 = 156_543.033_92;

/// Metres covered by one screen pixel at `latitude` and `zoom`.
pub fn meters_per_pixel(latitude: f64, zoom: f64) -> f64 {
    MERCATOR_M_PER_PX_Z0 * latitude.to_radians().cos() / 2f64.powf(zoom)
}

/// Outcome of `snap_to_vertex`. When nothing snaps, `point` is the query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VertexSnap {
    pub snapped: bool,
    pub point: Coord,
    pub index: Option<usize>,
    pub distance: Option<f64>,
}

/// Outcome of `snap_to_edge`. When nothing snaps, `point` is the query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EdgeSnap {
    pub snapped: bool,
    pub point: Coord,
    pub edge_index: Option<usize>,
    pub distance: Option<f64>,
}

/// Nearest candidate within `tolerance_m`; the first one wins ties.
pub fn snap_to_vertex(point: Coord, candidates: &[Coord], tolerance_m: f64) -> VertexSnap {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in candidates.iter().enumerate() {
        let d = distance(point, *c);
        if d <= tolerance_m && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    match best {
        Some((i, d)) => VertexSnap {
            snapped: true,
            point: candidates[i],
            index: Some(i),
            distance: Some(d),
        },
        None => VertexSnap {
            snapped: false,
            point,
            index: None,
            distance: None,
        },
    }
}

/// Perpendicular projection onto the nearest ring edge within `tolerance_m`.
///
/// `edge_index` follows the open-ring convention (edge `i` starts at vertex
/// `i`), so inserting the snapped point at `edge_index + 1` splits that edge.
pub fn snap_to_edge(point: Coord, ring: &[Coord], tolerance_m: f64) -> EdgeSnap {
    let v = open(ring);
    let n = v.len();
    let mut best: Option<(usize, f64, Coord)> = None;
    if n >= 2 {
        for i in 0..n {
            let proj = point_segment_distance(point, v[i], v[(i + 1) % n]);
            if proj.distance <= tolerance_m && best.map_or(true, |(_, bd, _)| proj.distance < bd) {
                best = Some((i, proj.distance, proj.point));
            }
        }
    }
    match best {
        Some((i, d, p)) => EdgeSnap {
            snapped: true,
            point: round_coord(p),
            edge_index: Some(i),
            distance: Some(d),
        },
        None => EdgeSnap {
            snapped: false,
            point,
            edge_index: None,
            distance: None,
        },
    }
}

/// Round a bearing to the nearest multiple of `increment_deg`, modulo 360.
/// Non-positive increments only normalize.
pub fn snap_bearing(bearing_deg: f64, increment_deg: f64) -> f64 {
    if !(increment_deg > 0.0) {
        return normalize_degrees(bearing_deg);
    }
    normalize_degrees((bearing_deg / increment_deg).round() * increment_deg)
}

/// Default quantization step for `snap_bearing`.
pub const DEFAULT_BEARING_INCREMENT: f64 = 45.0;

/// Keep the anchor→target distance, snap its bearing, reproject.
pub fn constrain_to_angle(anchor: Coord, target: Coord, increment_deg: f64) -> Coord {
    let d = distance(anchor, target);
    if d == 0.0 {
        return target;
    }
    let b = snap_bearing(bearing(anchor, target), increment_deg);
    round_coord(destination(anchor, d, b))
}
