//! Douglas-Peucker simplification with geodesic perpendicular distances.
//!
//! Works on the open vertex list, keeps both endpoints, and returns a
//! subsequence of the input in the input's closed/open form. If the tolerance
//! would collapse the ring below a triangle, the vertex farthest from the
//! endpoint chord is kept as well.

use crate::geodesic::point_segment_distance;
use crate::ring::{close, is_closed, open};
use crate::Coord;

pub fn simplify(ring: &[Coord], tolerance_m: f64) -> Vec<Coord> {
    let v = open(ring);
    if v.len() <= 3 || !(tolerance_m > 0.0) {
        return ring.to_vec();
    }
    let last = v.len() - 1;
    let mut keep = vec![false; v.len()];
    keep[0] = true;
    keep[last] = true;
    reduce(&v, 0, last, tolerance_m, &mut keep);

    if keep.iter().filter(|k| **k).count() < 3 {
        if let Some((k, _)) = farthest(&v, 0, last) {
            keep[k] = true;
        }
    }
    let out: Vec<Coord> = v
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(p, _)| *p)
        .collect();
    if is_closed(ring) {
        close(&out)
    } else {
        out
    }
}

fn reduce(v: &[Coord], first: usize, last: usize, tol: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    if let Some((idx, d)) = farthest(v, first, last) {
        if d > tol {
            keep[idx] = true;
            reduce(v, first, idx, tol, keep);
            reduce(v, idx, last, tol, keep);
        }
    }
}

/// Interior vertex of `(first, last)` farthest from the chord `first → last`.
fn farthest(v: &[Coord], first: usize, last: usize) -> Option<(usize, f64)> {
    let (a, b) = (v[first], v[last]);
    ((first + 1)..last)
        .map(|i| (i, point_segment_distance(v[i], a, b).distance))
        .fold(None, |best, (i, d)| match best {
            Some((_, bd)) if bd >= d => best,
            _ => Some((i, d)),
        })
}
