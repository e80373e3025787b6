//! Topology: self-intersection, winding and containment.
//!
//! Purpose
//! - Decide whether a ring is simple, which way it winds, and whether a
//!   proposed vertex move would break simplicity.
//!
//! Conventions
//! - Planar predicates in lon/lat degrees (x = east, y = north). At site scale
//!   this agrees with the geodesic picture; only the sign/ordering matters.
//! - Proper intersections only: both segment parameters must lie strictly in
//!   `(INTERSECT_EPS, 1 - INTERSECT_EPS)`; touching at endpoints and collinear
//!   overlaps do not count.
//! - Edge `i` runs from vertex `i` to `i + 1` of the open ring (wrapping).
//!   Edges `i` and `i + 1` share a vertex, as do edge `0` and edge `n - 1`; every
//!   other pair is tested, so a 4-vertex bowtie is still detected.

use serde::Serialize;

use crate::cfg::INTERSECT_EPS;
use crate::ring::{close, is_closed, open};
use crate::Coord;

#[inline]
fn cross(a: Coord, b: Coord) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Proper intersection point of segments `a1→a2` and `b1→b2`, if any.
pub fn segment_intersection(a1: Coord, a2: Coord, b1: Coord, b2: Coord) -> Option<Coord> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(r, s);
    // parallel, collinear or zero-length
    if denom.abs() <= f64::EPSILON * r.norm() * s.norm() {
        return None;
    }
    let qp = b1 - a1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    let inside = |x: f64| x > INTERSECT_EPS && x < 1.0 - INTERSECT_EPS;
    if inside(t) && inside(u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

/// Result of a ring-level self-intersection scan.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SelfIntersection {
    pub intersects: bool,
    pub points: Vec<Coord>,
}

/// Scan every pair of non-adjacent edges and collect crossing points.
pub fn is_self_intersecting(ring: &[Coord]) -> SelfIntersection {
    let v = open(ring);
    let n = v.len();
    let mut points = Vec::new();
    if n >= 4 {
        for i in 0..n {
            let (a1, a2) = (v[i], v[(i + 1) % n]);
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if let Some(p) = segment_intersection(a1, a2, v[j], v[(j + 1) % n]) {
                    points.push(p);
                }
            }
        }
    }
    SelfIntersection {
        intersects: !points.is_empty(),
        points,
    }
}

/// Planar shoelace area in deg²; positive for counter-clockwise rings.
pub fn signed_area_deg2(ring: &[Coord]) -> f64 {
    let v = open(ring);
    let n = v.len();
    if n < 3 {
        return 0.0;
    }
    let origin = v[0];
    let twice: f64 = (0..n)
        .map(|i| cross(v[i] - origin, v[(i + 1) % n] - origin))
        .sum();
    twice / 2.0
}

/// Clockwise as seen on a north-up map.
#[inline]
pub fn is_clockwise(ring: &[Coord]) -> bool {
    signed_area_deg2(ring) < 0.0
}

/// Reverse vertex order only if the winding differs from the requested one.
/// Keeps the closed/open form of the input.
pub fn ensure_orientation(ring: &[Coord], clockwise: bool) -> Vec<Coord> {
    let mut v = open(ring);
    if v.len() < 3 || is_clockwise(&v) == clockwise {
        return ring.to_vec();
    }
    v.reverse();
    if is_closed(ring) {
        close(&v)
    } else {
        v
    }
}

/// Would replacing vertex `vertex_index` with `candidate` make the ring
/// self-intersect? Out-of-range indices never do.
pub fn would_cause_intersection(ring: &[Coord], vertex_index: usize, candidate: Coord) -> bool {
    let mut v = open(ring);
    match v.get_mut(vertex_index) {
        Some(slot) => *slot = candidate,
        None => return false,
    }
    is_self_intersecting(&v).intersects
}

/// Ray-casting point-in-polygon test (boundary points are unspecified).
pub fn contains(ring: &[Coord], p: Coord) -> bool {
    let v = open(ring);
    let n = v.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (v[i], v[j]);
        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Axis-aligned lon/lat bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// `None` for an empty ring.
pub fn bounds(ring: &[Coord]) -> Option<Bounds> {
    let first = ring.first()?;
    let init = Bounds {
        min_lon: first.x,
        min_lat: first.y,
        max_lon: first.x,
        max_lat: first.y,
    };
    Some(ring.iter().fold(init, |b, p| Bounds {
        min_lon: b.min_lon.min(p.x),
        min_lat: b.min_lat.min(p.y),
        max_lon: b.max_lon.max(p.x),
        max_lat: b.max_lat.max(p.y),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord;

    fn bowtie() -> Vec<Coord> {
        close(&[
            coord(0.0, 0.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
            coord(0.0, 1.0),
        ])
    }

    fn square() -> Vec<Coord> {
        vec![
            coord(0.0, 0.0),
            coord(0.0, 1.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
        ]
    }

    #[test]
    fn bowtie_has_exactly_one_crossing() {
        let si = is_self_intersecting(&bowtie());
        assert!(si.intersects);
        assert_eq!(si.points.len(), 1);
        let p = si.points[0];
        assert!((p.x - 0.5).abs() < 1e-12 && (p.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn simple_rings_do_not_intersect() {
        assert!(!is_self_intersecting(&square()).intersects);
        assert!(!is_self_intersecting(&close(&square())).intersects);
        let tri = [coord(0.0, 0.0), coord(1.0, 0.0), coord(0.0, 1.0)];
        assert!(!is_self_intersecting(&tri).intersects);
    }

    #[test]
    fn endpoint_touch_is_not_an_intersection() {
        // T-junction: b1 lies on a's interior but b ends there
        let a1 = coord(0.0, 0.0);
        let a2 = coord(2.0, 0.0);
        assert!(segment_intersection(a1, a2, coord(1.0, 1.0), coord(1.0, 0.0)).is_none());
        assert!(segment_intersection(a1, a2, coord(2.0, 0.0), coord(3.0, 1.0)).is_none());
        // collinear overlap
        assert!(segment_intersection(a1, a2, coord(1.0, 0.0), coord(3.0, 0.0)).is_none());
        assert!(segment_intersection(a1, a2, coord(1.0, -1.0), coord(1.0, 1.0)).is_some());
    }

    #[test]
    fn pentagram_reports_all_crossings() {
        let star: Vec<Coord> = (0..5)
            .map(|k| {
                let th = std::f64::consts::FRAC_PI_2 + (k as f64) * 4.0 * std::f64::consts::PI / 5.0;
                coord(th.cos() * 0.001, th.sin() * 0.001)
            })
            .collect();
        assert_eq!(is_self_intersecting(&star).points.len(), 5);
    }

    #[test]
    fn winding_and_orientation() {
        let cw = square();
        assert!(is_clockwise(&cw));
        let ccw = ensure_orientation(&cw, false);
        assert!(!is_clockwise(&ccw));
        assert_eq!(ensure_orientation(&ccw, false), ccw);
        assert_eq!(ensure_orientation(&cw, true), cw);
        let closed = ensure_orientation(&close(&cw), false);
        assert!(is_closed(&closed));
        assert_eq!(closed.len(), 5);
    }

    #[test]
    fn speculative_move_check() {
        let sq = square();
        // dragging (1,1) below the bottom edge folds the ring into a bowtie
        assert!(would_cause_intersection(&sq, 2, coord(1.0, -1.0)));
        assert!(would_cause_intersection(&sq, 2, coord(-0.5, 0.5)));
        assert!(!would_cause_intersection(&sq, 2, coord(1.2, 1.3)));
        assert_eq!(sq, square());
        assert!(!would_cause_intersection(&sq, 9, coord(5.0, 5.0)));
    }

    #[test]
    fn containment_and_bounds() {
        let sq = close(&square());
        assert!(contains(&sq, coord(0.5, 0.5)));
        assert!(!contains(&sq, coord(1.5, 0.5)));
        let b = bounds(&sq).unwrap();
        assert_eq!((b.min_lon, b.min_lat, b.max_lon, b.max_lat), (0.0, 0.0, 1.0, 1.0));
        assert!(bounds(&[]).is_none());
    }
}
