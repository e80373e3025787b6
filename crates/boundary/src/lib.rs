//! Site boundary geometry core.
//!
//! One closed 2D geodesic ring (a site boundary) with its derived measurements,
//! validation, snapping helpers, codecs, and an undo/redo editing session.
//!
//! Conventions
//! - Coordinates are `(longitude, latitude)` in degrees stored in a
//!   `Vector2<f64>` (`x = lon`, `y = lat`), rounded to 7 decimal places on
//!   ingestion (see `ring::round`).
//! - Closed rings (first == last) are the storage/export/measurement form;
//!   open rings (vertex lists) are the editing form.
//! - All distances are metres on a sphere of radius 6,371,000 m.
//!
//! API Policy
//! - `api` is the flat pure-function surface; `session::Session` is the stateful
//!   editing surface. Nothing in here knows about pixels, input devices or maps.

mod cfg;

pub mod api;
pub mod codec;
pub mod edit;
pub mod geodesic;
pub mod history;
pub mod rand;
pub mod ring;
pub mod session;
pub mod simplify;
pub mod snap;
pub mod topology;
pub mod validate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{EARTH_RADIUS_M, INTERSECT_EPS, PRECISION};
pub use nalgebra::Vector2 as Vec2;

/// Geodetic coordinate: `x = longitude`, `y = latitude` (degrees).
pub type Coord = Vec2<f64>;

/// Build a coordinate from longitude and latitude (no rounding).
#[inline]
pub fn coord(lon: f64, lat: f64) -> Coord {
    Coord::new(lon, lat)
}

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::codec::{CodecError, Format};
    pub use crate::edit::EditError;
    pub use crate::geodesic::{Segment, VertexAngle};
    pub use crate::history::History;
    pub use crate::session::{EditOutcome, Session, SessionCfg};
    pub use crate::snap::{EdgeSnap, VertexSnap};
    pub use crate::topology::SelfIntersection;
    pub use crate::validate::{Metrics, Report, ValidationThresholds};
    pub use crate::{coord, Coord};
}
