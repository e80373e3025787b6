//! Precision and ring model.
//!
//! Purpose
//! - Canonical coordinate rounding and the open/closed ring transforms every
//!   other module builds on.
//!
//! Invariants
//! - `close` and `open` are pure, idempotent and mutually inverse on
//!   deduplicated rings.
//! - After `normalize`, no two consecutive vertices (including last → first)
//!   are identical and every coordinate carries at most `PRECISION` decimals.

use crate::cfg::PRECISION;
use crate::Coord;

/// Round `value` to `places` decimal places. Negative zero collapses to zero so
/// that closure checks stay bit-exact.
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let f = 10f64.powi(places as i32);
    let r = (value * f).round() / f;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Round to the storage precision (7 decimal places).
#[inline]
pub fn round(value: f64) -> f64 {
    round_to(value, PRECISION)
}

/// Both ordinates rounded with `round`.
#[inline]
pub fn round_coord(p: Coord) -> Coord {
    Coord::new(round(p.x), round(p.y))
}

/// First and last coordinates are identical (no tolerance).
#[inline]
pub fn is_closed(ring: &[Coord]) -> bool {
    ring.len() >= 2 && ring[0] == ring[ring.len() - 1]
}

/// Append the first coordinate unless the ring is already closed or empty.
pub fn close(ring: &[Coord]) -> Vec<Coord> {
    let mut out = ring.to_vec();
    if !ring.is_empty() && !is_closed(ring) {
        out.push(ring[0]);
    }
    out
}

/// Drop the trailing duplicate of a closed ring; open rings pass through.
pub fn open(ring: &[Coord]) -> Vec<Coord> {
    if is_closed(ring) {
        ring[..ring.len() - 1].to_vec()
    } else {
        ring.to_vec()
    }
}

/// Number of distinct editing vertices (length of the open form).
#[inline]
pub fn vertex_count(ring: &[Coord]) -> usize {
    if is_closed(ring) {
        ring.len() - 1
    } else {
        ring.len()
    }
}

/// Remove consecutive identical coordinates, including the wrap-around pair.
/// The closed/open form of the input is preserved.
pub fn remove_consecutive_duplicates(ring: &[Coord]) -> Vec<Coord> {
    let was_closed = is_closed(ring);
    let mut v = open(ring);
    v.dedup();
    while v.len() > 1 && v[0] == v[v.len() - 1] {
        v.pop();
    }
    if was_closed {
        close(&v)
    } else {
        v
    }
}

/// Result of `normalize`: the canonical closed ring plus its validity.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub ring: Vec<Coord>,
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Round → open → dedup → minimum-vertex check → close.
///
/// Non-finite coordinates are dropped and reported. The returned ring is
/// closed even when invalid so callers can still display it.
pub fn normalize(ring: &[Coord]) -> Normalized {
    let mut errors = Vec::new();
    let finite: Vec<Coord> = ring
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .map(|p| round_coord(*p))
        .collect();
    let dropped = ring.len() - finite.len();
    if dropped > 0 {
        errors.push(format!("Dropped {dropped} non-finite coordinate(s)"));
    }
    let v = remove_consecutive_duplicates(&open(&finite));
    if v.len() < 3 {
        errors.push(format!(
            "Polygon must have at least 3 distinct vertices (found {})",
            v.len()
        ));
    }
    Normalized {
        ring: close(&v),
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord;

    fn square() -> Vec<Coord> {
        vec![
            coord(0.0, 0.0),
            coord(0.0, 0.0002),
            coord(0.0003, 0.0002),
            coord(0.0003, 0.0),
        ]
    }

    #[test]
    fn rounding_keeps_seven_places() {
        assert_eq!(round(1.234_567_891), 1.234_567_9);
        assert_eq!(round(-0.000_000_01), 0.0);
        assert!(round(-0.000_000_01).is_sign_positive());
        assert_eq!(round_to(2.345_678, 2), 2.35);
    }

    #[test]
    fn repeated_rounding_is_stable() {
        let mut x = 13.404_954_321_9;
        for _ in 0..100 {
            x = round(round(x) + 0.1 - 0.1);
        }
        assert_eq!(x, round(13.404_954_321_9));
    }

    #[test]
    fn close_and_open_are_idempotent_and_reversible() {
        let open_r = square();
        let closed = close(&open_r);
        assert!(is_closed(&closed));
        assert_eq!(close(&closed), closed);
        assert_eq!(open(&closed), open_r);
        assert_eq!(open(&open(&closed)), open_r);
        assert_eq!(close(&open(&closed)), closed);
        assert!(close(&[]).is_empty());
    }

    #[test]
    fn dedup_handles_wraparound_and_preserves_form() {
        let mut v = square();
        v.insert(1, v[0]);
        v.insert(3, v[2]);
        assert_eq!(remove_consecutive_duplicates(&v), square());
        // a run of closing duplicates collapses to a single closure
        let mut runs = close(&square());
        runs.push(runs[0]);
        assert_eq!(remove_consecutive_duplicates(&runs), close(&square()));
        let closed = close(&square());
        let mut noisy = closed.clone();
        noisy.insert(2, noisy[2]);
        assert_eq!(remove_consecutive_duplicates(&noisy), closed);
    }

    #[test]
    fn normalize_pipeline() {
        let raw: Vec<Coord> = square()
            .into_iter()
            .map(|p| p + Coord::new(1e-9, -1e-9))
            .collect();
        let n = normalize(&raw);
        assert!(n.valid, "{:?}", n.errors);
        assert_eq!(n.ring, close(&square()));
        assert_eq!(normalize(&n.ring), n);
    }

    #[test]
    fn normalize_reports_too_few_vertices_and_non_finite() {
        let n = normalize(&[coord(0.0, 0.0), coord(1.0, 1.0), coord(1.0, 1.0)]);
        assert!(!n.valid);
        assert_eq!(n.ring, vec![coord(0.0, 0.0), coord(1.0, 1.0), coord(0.0, 0.0)]);
        let n = normalize(&[coord(0.0, 0.0), coord(f64::NAN, 1.0), coord(1.0, 0.0)]);
        assert!(!n.valid);
        assert_eq!(n.errors.len(), 2);
    }
}
