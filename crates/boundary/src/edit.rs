//! Pure vertex edits: copy-on-write transforms returning a new vertex list.
//!
//! Every function accepts either ring form and returns the open form (index
//! `i` is a real vertex). New coordinates are rounded to storage precision.
//! History snapshots stay valid because nothing is mutated in place.

use thiserror::Error;

use crate::geodesic::{bearing, destination, distance};
use crate::ring::{open, round_coord};
use crate::Coord;

/// Reasons an edit is refused.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EditError {
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("a polygon needs at least {min} vertices; cannot go down to {remaining}")]
    TooFewVertices { min: usize, remaining: usize },

    #[error("moving vertex {index} would make the boundary cross itself")]
    WouldSelfIntersect { index: usize },

    #[error("invalid measure: {0}")]
    InvalidMeasure(String),

    #[error("no edge within {tolerance_m} m of the point")]
    NoEdgeInRange { tolerance_m: f64 },

    #[error("end_batch called without a matching start_batch")]
    NoOpenBatch,
}

const MIN_VERTICES: usize = 3;

fn check_index(v: &[Coord], index: usize) -> Result<(), EditError> {
    if index < v.len() {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            index,
            len: v.len(),
        })
    }
}

/// Insert `point` so that it becomes vertex `at` (`at == len` appends).
pub fn insert_vertex(ring: &[Coord], at: usize, point: Coord) -> Result<Vec<Coord>, EditError> {
    let mut v = open(ring);
    if at > v.len() {
        return Err(EditError::IndexOutOfRange {
            index: at,
            len: v.len(),
        });
    }
    v.insert(at, round_coord(point));
    Ok(v)
}

pub fn remove_vertex(ring: &[Coord], index: usize) -> Result<Vec<Coord>, EditError> {
    let mut v = open(ring);
    check_index(&v, index)?;
    if v.len() <= MIN_VERTICES {
        return Err(EditError::TooFewVertices {
            min: MIN_VERTICES,
            remaining: v.len() - 1,
        });
    }
    v.remove(index);
    Ok(v)
}

pub fn replace_vertex(ring: &[Coord], index: usize, point: Coord) -> Result<Vec<Coord>, EditError> {
    let mut v = open(ring);
    check_index(&v, index)?;
    v[index] = round_coord(point);
    Ok(v)
}

fn finite_measure(name: &str, value: f64) -> Result<f64, EditError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::InvalidMeasure(format!("{name} must be finite, got {value}")))
    }
}

/// Move vertex `index` by `distance_m` along `bearing_deg`.
pub fn move_vertex_by(
    ring: &[Coord],
    index: usize,
    distance_m: f64,
    bearing_deg: f64,
) -> Result<Vec<Coord>, EditError> {
    let d = finite_measure("distance", distance_m)?;
    let b = finite_measure("bearing", bearing_deg)?;
    let v = open(ring);
    check_index(&v, index)?;
    replace_vertex(&v, index, destination(v[index], d, b))
}

/// Resize segment `index` to `length_m`, keeping its start and bearing; the
/// end vertex moves.
pub fn set_segment_length(
    ring: &[Coord],
    index: usize,
    length_m: f64,
) -> Result<Vec<Coord>, EditError> {
    let len = finite_measure("length", length_m)?;
    if len <= 0.0 {
        return Err(EditError::InvalidMeasure(format!(
            "length must be positive, got {len}"
        )));
    }
    let v = open(ring);
    check_index(&v, index)?;
    let end = (index + 1) % v.len();
    let b = bearing(v[index], v[end]);
    replace_vertex(&v, end, destination(v[index], len, b))
}

/// Rotate segment `index` to `bearing_deg`, keeping its start and length; the
/// end vertex moves.
pub fn set_segment_bearing(
    ring: &[Coord],
    index: usize,
    bearing_deg: f64,
) -> Result<Vec<Coord>, EditError> {
    let b = finite_measure("bearing", bearing_deg)?;
    let v = open(ring);
    check_index(&v, index)?;
    let end = (index + 1) % v.len();
    let d = distance(v[index], v[end]);
    replace_vertex(&v, end, destination(v[index], d, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord;
    use crate::ring::close;

    fn rect() -> Vec<Coord> {
        vec![
            coord(0.0, 0.0),
            coord(0.0, 0.0002),
            coord(0.0003, 0.0002),
            coord(0.0003, 0.0),
        ]
    }

    #[test]
    fn insert_and_remove_are_copy_on_write() {
        let r = close(&rect());
        let v = insert_vertex(&r, 2, coord(0.000_15, 0.000_25)).unwrap();
        assert_eq!(v.len(), 5);
        assert_eq!(v[2], coord(0.000_15, 0.000_25));
        assert_eq!(r.len(), 5);
        let back = remove_vertex(&v, 2).unwrap();
        assert_eq!(back, rect());
        assert!(insert_vertex(&r, 5, coord(0.0, 0.0)).is_err());
        assert_eq!(insert_vertex(&r, 4, coord(1.0, 1.0)).unwrap()[4], coord(1.0, 1.0));
    }

    #[test]
    fn cannot_remove_below_triangle() {
        let tri = vec![coord(0.0, 0.0), coord(0.0, 1.0), coord(1.0, 0.0)];
        assert_eq!(
            remove_vertex(&tri, 0),
            Err(EditError::TooFewVertices {
                min: 3,
                remaining: 2
            })
        );
        assert!(matches!(
            remove_vertex(&rect(), 7),
            Err(EditError::IndexOutOfRange { index: 7, len: 4 })
        ));
    }

    #[test]
    fn replacement_is_rounded() {
        let v = replace_vertex(&rect(), 1, coord(0.000_000_123_4, 0.000_200_04)).unwrap();
        assert_eq!(v[1], coord(0.000_000_1, 0.000_2));
    }

    #[test]
    fn move_by_distance_and_bearing() {
        let v = move_vertex_by(&rect(), 0, 3.0, 225.0).unwrap();
        let d = distance(rect()[0], v[0]);
        assert!((d - 3.0).abs() < 0.02, "{d}");
        assert!(v[0].x < 0.0 && v[0].y < 0.0);
        assert!(move_vertex_by(&rect(), 0, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn segment_length_edit_moves_the_end_vertex() {
        let r = rect();
        let v = set_segment_length(&r, 0, 30.0).unwrap();
        assert_eq!(v[0], r[0]);
        assert!((distance(v[0], v[1]) - 30.0).abs() < 0.02);
        assert!(v[1].x.abs() < 1e-7);
        // the wrap-around segment moves vertex 0
        let v = set_segment_length(&r, 3, 10.0).unwrap();
        assert!((distance(v[3], v[0]) - 10.0).abs() < 0.02);
        assert!(set_segment_length(&r, 0, 0.0).is_err());
    }

    #[test]
    fn segment_bearing_edit_keeps_length() {
        let r = rect();
        let before = distance(r[0], r[1]);
        let v = set_segment_bearing(&r, 0, 45.0).unwrap();
        assert!((distance(v[0], v[1]) - before).abs() < 0.02);
        assert!((bearing(v[0], v[1]) - 45.0).abs() < 0.05);
    }
}
