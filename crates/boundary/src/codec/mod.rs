//! Text codecs for a single boundary ring: GeoJSON, WKT and CSV.
//!
//! Contract
//! - Encoders take either ring form and write the closed ring (CSV writes one
//!   row per vertex; the closing row is implied).
//! - Decoders return a normalized closed ring, or a `CodecError` for malformed
//!   text (including NaN or infinite ordinates) and for rings with fewer than
//!   3 distinct vertices. They never panic,
//!   so callers can show a message and keep the current ring.

mod csv;
mod geojson;
mod wkt;

use std::path::Path;

use thiserror::Error;

use crate::ring::{normalize, open};
use crate::Coord;

pub use self::csv::{from_csv, to_csv};
pub use self::geojson::{from_geojson, to_geojson, to_geojson_feature};
pub use self::wkt::{from_wkt, to_wkt};

/// Why an import failed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CodecError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed {format}: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },

    #[error("not enough points: a boundary needs at least 3 distinct vertices (found {found})")]
    TooFewVertices { found: usize },
}

impl CodecError {
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// Supported text formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    GeoJson,
    Wkt,
    Csv,
}

impl Format {
    /// Guess from a file extension (`.geojson`, `.json`, `.wkt`, `.csv`, `.txt`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_name(&ext)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "geojson" | "json" => Some(Self::GeoJson),
            "wkt" | "txt" => Some(Self::Wkt),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::GeoJson => "geojson",
            Self::Wkt => "wkt",
            Self::Csv => "csv",
        }
    }

    pub fn encode(self, ring: &[Coord]) -> String {
        match self {
            Self::GeoJson => to_geojson(ring),
            Self::Wkt => to_wkt(ring),
            Self::Csv => to_csv(ring),
        }
    }

    pub fn decode(self, text: &str) -> Result<Vec<Coord>, CodecError> {
        match self {
            Self::GeoJson => from_geojson(text),
            Self::Wkt => from_wkt(text),
            Self::Csv => from_csv(text),
        }
    }
}

/// Shared decoder tail: reject non-finite ordinates, normalize, and enforce
/// the vertex minimum.
fn finish(format: &'static str, coords: &[Coord]) -> Result<Vec<Coord>, CodecError> {
    if let Some(i) = coords
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(CodecError::malformed(
            format,
            format!("position {i} is not a finite coordinate"),
        ));
    }
    let normalized = normalize(coords);
    let found = open(&normalized.ring).len();
    if found < 3 {
        return Err(CodecError::TooFewVertices { found });
    }
    Ok(normalized.ring)
}
