//! Geodesic metrics on a sphere (Haversine model).
//!
//! Purpose
//! - Distances, bearings and forward projection between coordinates, plus the
//!   ring-level measurements shown to users (area, perimeter, centroid,
//!   per-segment lengths/bearings and interior angles).
//!
//! Model
//! - Great-circle math on a sphere of radius `EARTH_RADIUS_M`. Good enough for
//!   sub-hectare sites; not ellipsoid-accurate.
//! - Outputs for display are rounded (metres to 3 places, degrees to 2); the
//!   ring coordinates themselves are never rounded to display precision.
//!
//! Conventions
//! - Bearings are degrees in `[0, 360)`, clockwise from north.
//! - `segments` and `angles` are indexed by open-ring vertex order.

use serde::Serialize;

use crate::cfg::{ANGLE_PLACES, AREA_PLACES, DEGENERATE_AREA_DEG2, EARTH_RADIUS_M, LENGTH_PLACES};
use crate::ring::{is_closed, open, round_coord, round_to};
use crate::topology::is_clockwise;
use crate::{Coord, Vec2};

/// Great-circle distance in metres.
pub fn distance(a: Coord, b: Coord) -> f64 {
    let (phi1, phi2) = (a.y.to_radians(), b.y.to_radians());
    let dphi = phi2 - phi1;
    let dlambda = (b.x - a.x).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Initial great-circle bearing from `a` to `b`, degrees in `[0, 360)`.
pub fn bearing(a: Coord, b: Coord) -> f64 {
    let (phi1, phi2) = (a.y.to_radians(), b.y.to_radians());
    let dlambda = (b.x - a.x).to_radians();
    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point reached from `origin` after `distance_m` along `bearing_deg`.
///
/// Longitude is wrapped into `[-180, 180)`. The result is not rounded.
pub fn destination(origin: Coord, distance_m: f64, bearing_deg: f64) -> Coord {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.y.to_radians();
    let lambda1 = origin.x.to_radians();
    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());
    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coord::new(lon, phi2.to_degrees())
}

#[inline]
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Area of a closed ring in square metres (spherical-excess shoelace).
///
/// Returns 0 when the ring is not closed or has fewer than 4 points. The sign
/// is dropped, so the result does not depend on orientation.
pub fn area(closed_ring: &[Coord]) -> f64 {
    if !is_closed(closed_ring) || closed_ring.len() < 4 {
        return 0.0;
    }
    let sum: f64 = closed_ring
        .windows(2)
        .map(|w| {
            let (p1, p2) = (w[0], w[1]);
            (p2.x - p1.x).to_radians() * (2.0 + p1.y.to_radians().sin() + p2.y.to_radians().sin())
        })
        .sum();
    (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Sum of segment lengths including the closing segment. Accepts either form.
pub fn perimeter(ring: &[Coord]) -> f64 {
    let v = open(ring);
    let n = v.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| distance(v[i], v[(i + 1) % n])).sum()
}

/// Area-weighted centroid, falling back to the vertex average for degenerate
/// rings. `None` only for an empty ring.
///
/// Computed in lon/lat relative to the first vertex; at site scale the planar
/// approximation is well below the coordinate precision.
pub fn centroid(ring: &[Coord]) -> Option<Coord> {
    let v = open(ring);
    let n = v.len();
    if n == 0 {
        return None;
    }
    let mean = v.iter().fold(Coord::zeros(), |acc, p| acc + p) / n as f64;
    if n < 3 {
        return Some(round_coord(mean));
    }
    let origin = v[0];
    let mut a2 = 0.0;
    let mut c = Coord::zeros();
    for i in 0..n {
        let p = v[i] - origin;
        let q = v[(i + 1) % n] - origin;
        let cross = p.x * q.y - q.x * p.y;
        a2 += cross;
        c += (p + q) * cross;
    }
    if (a2 / 2.0).abs() < DEGENERATE_AREA_DEG2 {
        return Some(round_coord(mean));
    }
    Some(round_coord(origin + c / (3.0 * a2)))
}

/// Great-circle midpoint of `a` and `b`.
pub fn midpoint(a: Coord, b: Coord) -> Coord {
    let (phi1, phi2) = (a.y.to_radians(), b.y.to_radians());
    let lambda1 = a.x.to_radians();
    let dlambda = (b.x - a.x).to_radians();
    let bx = phi2.cos() * dlambda.cos();
    let by = phi2.cos() * dlambda.sin();
    let phi3 = (phi1.sin() + phi2.sin()).atan2(((phi1.cos() + bx).powi(2) + by * by).sqrt());
    let lambda3 = lambda1 + by.atan2(phi1.cos() + bx);
    Coord::new(lambda3.to_degrees(), phi3.to_degrees())
}

/// One edge of the ring, from vertex `index` to the next (wrapping).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    /// Metres, 3 decimals.
    pub length: f64,
    /// Degrees from north, 2 decimals.
    pub bearing: f64,
    pub start: Coord,
    pub end: Coord,
    pub midpoint: Coord,
}

/// Interior angle at vertex `index`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VertexAngle {
    pub index: usize,
    /// Degrees in `[0, 360)`, 2 decimals.
    pub angle: f64,
    pub vertex: Coord,
}

/// Edges in open vertex order, including the closing edge; empty below 2 vertices.
pub fn segments(ring: &[Coord]) -> Vec<Segment> {
    let v = open(ring);
    let n = v.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let (start, end) = (v[i], v[(i + 1) % n]);
            Segment {
                index: i,
                length: round_to(distance(start, end), LENGTH_PLACES),
                bearing: round_to(bearing(start, end), ANGLE_PLACES),
                start,
                end,
                midpoint: round_coord(midpoint(start, end)),
            }
        })
        .collect()
}

/// Interior angles from the bearings towards each vertex's two neighbours.
///
/// The ring's winding decides which side is "interior", so the angles of a
/// simple ring sum to `(n - 2) · 180` for either orientation.
pub fn angles(ring: &[Coord]) -> Vec<VertexAngle> {
    let v = open(ring);
    let n = v.len();
    if n < 3 {
        return Vec::new();
    }
    let cw = is_clockwise(&v);
    (0..n)
        .map(|i| {
            let vertex = v[i];
            let to_prev = bearing(vertex, v[(i + n - 1) % n]);
            let to_next = bearing(vertex, v[(i + 1) % n]);
            let raw = if cw { to_prev - to_next } else { to_next - to_prev };
            VertexAngle {
                index: i,
                angle: round_to(normalize_degrees(raw), ANGLE_PLACES),
                vertex,
            }
        })
        .collect()
}

/// Display-rounded area of a closed ring.
#[inline]
pub fn area_display(closed_ring: &[Coord]) -> f64 {
    round_to(area(closed_ring), AREA_PLACES)
}

/// Display-rounded perimeter.
#[inline]
pub fn perimeter_display(ring: &[Coord]) -> f64 {
    round_to(perimeter(ring), LENGTH_PLACES)
}

/// Closest point on segment `a → b` to `p`, measured in a local tangent frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// Haversine distance from `p` to `point`, metres.
    pub distance: f64,
    pub point: Coord,
    /// Position along the segment in `[0, 1]`.
    pub t: f64,
}

/// Perpendicular projection of `p` onto segment `a → b`, clamped to the
/// segment.
///
/// Uses an equirectangular frame centred on `p` (metres east/north), which is
/// accurate for the few-hundred-metre spans of a site boundary.
pub fn point_segment_distance(p: Coord, a: Coord, b: Coord) -> SegmentProjection {
    let frame = LocalFrame::at(p);
    let al = frame.to_local(a);
    let bl = frame.to_local(b);
    let ab = bl - al;
    let len2 = ab.norm_squared();
    let t = if len2 > 0.0 {
        (-al.dot(&ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let point = match t {
        t if t <= 0.0 => a,
        t if t >= 1.0 => b,
        t => frame.to_geo(al + ab * t),
    };
    SegmentProjection {
        distance: distance(p, point),
        point,
        t,
    }
}

/// Equirectangular tangent frame: metres east (x) and north (y) of `origin`.
#[derive(Clone, Copy, Debug)]
struct LocalFrame {
    origin: Coord,
    m_per_deg_lon: f64,
    m_per_deg_lat: f64,
}

impl LocalFrame {
    fn at(origin: Coord) -> Self {
        let m_per_deg_lat = EARTH_RADIUS_M.to_radians();
        Self {
            origin,
            m_per_deg_lon: m_per_deg_lat * origin.y.to_radians().cos(),
            m_per_deg_lat,
        }
    }

    fn to_local(&self, q: Coord) -> Vec2<f64> {
        let dlon = (q.x - self.origin.x + 540.0).rem_euclid(360.0) - 180.0;
        Vec2::new(
            dlon * self.m_per_deg_lon,
            (q.y - self.origin.y) * self.m_per_deg_lat,
        )
    }

    fn to_geo(&self, l: Vec2<f64>) -> Coord {
        let dlon = if self.m_per_deg_lon.abs() > f64::EPSILON {
            l.x / self.m_per_deg_lon
        } else {
            0.0
        };
        Coord::new(
            self.origin.x + dlon,
            self.origin.y + l.y / self.m_per_deg_lat,
        )
    }
}
