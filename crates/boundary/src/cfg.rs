//! Numeric constants shared across the core.
//!
//! Policy
//! - Fixed constants, not runtime options. Thresholds that users tune live in
//!   `validate::ValidationThresholds` instead.

/// Decimal places kept on every stored coordinate (≈1 cm at the equator).
pub const PRECISION: u32 = 7;

/// Mean Earth radius used by the Haversine model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Parametric slack for proper segment intersections: both parameters must lie
/// in `(INTERSECT_EPS, 1 - INTERSECT_EPS)`.
pub const INTERSECT_EPS: f64 = 1e-10;

/// Display precision for lengths (metres).
pub(crate) const LENGTH_PLACES: u32 = 3;
/// Display precision for bearings and angles (degrees).
pub(crate) const ANGLE_PLACES: u32 = 2;
/// Display precision for areas (square metres).
pub(crate) const AREA_PLACES: u32 = 2;

/// Planar signed area (deg²) below which a ring counts as degenerate for the
/// centroid; roughly a 1 cm × 1 cm square.
pub(crate) const DEGENERATE_AREA_DEG2: f64 = 1e-14;
