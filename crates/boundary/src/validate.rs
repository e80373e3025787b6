//! Validation suite: hard errors, soft warnings and the metrics behind them.
//!
//! Pipeline
//! - normalize → vertex-count gate (short-circuits with zeroed metrics) →
//!   self-intersection (hard error) → full metrics → advisory warnings.
//!
//! Errors block "completing" an edit; warnings never block anything. Neither
//! mutates the ring: an invalid ring stays representable and displayable.

use serde::{Deserialize, Serialize};

use crate::geodesic::{angles, area_display, perimeter_display, segments, Segment, VertexAngle};
use crate::ring::{normalize, open};
use crate::topology::is_self_intersecting;
use crate::Coord;

/// Configurable limits. Missing fields in a config file take the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Hard floor; values below 3 are treated as 3.
    pub min_vertices: usize,
    pub min_area_m2: f64,
    pub max_area_m2: f64,
    pub min_segment_m: f64,
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_vertices: 3,
            min_area_m2: 10.0,
            max_area_m2: 1_000_000.0,
            min_segment_m: 0.5,
            min_angle_deg: 15.0,
            max_angle_deg: 345.0,
        }
    }
}

/// Derived measurements of one ring value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Square metres, 2 decimals.
    pub area: f64,
    /// Metres, 3 decimals.
    pub perimeter: f64,
    pub vertices: usize,
    pub segments: Vec<Segment>,
    pub angles: Vec<VertexAngle>,
    pub self_intersects: bool,
    pub intersection_points: Vec<Coord>,
}

impl Metrics {
    /// Metrics of an already-normalized closed ring.
    pub fn of(closed_ring: &[Coord]) -> Self {
        let si = is_self_intersecting(closed_ring);
        Self {
            area: area_display(closed_ring),
            perimeter: perimeter_display(closed_ring),
            vertices: open(closed_ring).len(),
            segments: segments(closed_ring),
            angles: angles(closed_ring),
            self_intersects: si.intersects,
            intersection_points: si.points,
        }
    }

    fn zeroed(vertices: usize) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }
}

/// Normalize and measure in one step.
pub fn metrics(ring: &[Coord]) -> Metrics {
    Metrics::of(&normalize(ring).ring)
}

/// Validation outcome for one ring value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metrics: Metrics,
}

pub fn validate(ring: &[Coord], thresholds: &ValidationThresholds) -> Report {
    let normalized = normalize(ring);
    let closed = normalized.ring;
    let vertex_count = open(&closed).len();
    let min_vertices = thresholds.min_vertices.max(3);

    // normalize already phrases the 3-vertex case
    let mut errors: Vec<String> = normalized.errors;
    if vertex_count < min_vertices {
        if vertex_count >= 3 {
            errors.push(format!(
                "Polygon must have at least {min_vertices} vertices (found {vertex_count})"
            ));
        }
        return Report {
            valid: false,
            errors,
            warnings: Vec::new(),
            metrics: Metrics::zeroed(vertex_count),
        };
    }

    let metrics = Metrics::of(&closed);
    if metrics.self_intersects {
        errors.push(format!(
            "Polygon edges cross each other ({} intersection{})",
            metrics.intersection_points.len(),
            if metrics.intersection_points.len() == 1 { "" } else { "s" }
        ));
    }

    let mut warnings = Vec::new();
    if metrics.area < thresholds.min_area_m2 {
        warnings.push(format!(
            "Area {:.1} m² is below the recommended minimum of {} m²",
            metrics.area, thresholds.min_area_m2
        ));
    }
    if metrics.area > thresholds.max_area_m2 {
        warnings.push(format!(
            "Area {:.1} m² exceeds the recommended maximum of {} m²",
            metrics.area, thresholds.max_area_m2
        ));
    }
    for s in metrics
        .segments
        .iter()
        .filter(|s| s.length < thresholds.min_segment_m)
    {
        warnings.push(format!(
            "Segment {} is {:.2} m long, shorter than {} m",
            s.index + 1,
            s.length,
            thresholds.min_segment_m
        ));
    }
    for a in &metrics.angles {
        if a.angle < thresholds.min_angle_deg {
            warnings.push(format!(
                "Vertex {} has a very sharp angle ({:.1}°)",
                a.index + 1,
                a.angle
            ));
        } else if a.angle > thresholds.max_angle_deg {
            warnings.push(format!(
                "Vertex {} has a nearly flat reflex angle ({:.1}°)",
                a.index + 1,
                a.angle
            ));
        }
    }

    Report {
        valid: errors.is_empty(),
        errors,
        warnings,
        metrics,
    }
}
