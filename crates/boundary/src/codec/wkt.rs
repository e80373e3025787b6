use std::str::FromStr;

use geo_types::{Geometry, LineString, Polygon};
use wkt::{ToWkt, Wkt};

use super::{finish, CodecError};
use crate::ring::close;
use crate::Coord;

const FORMAT: &str = "WKT";

/// `POLYGON((lon lat,lon lat,...))` with the closing vertex repeated.
pub fn to_wkt(ring: &[Coord]) -> String {
    let exterior: LineString<f64> = close(ring).iter().map(|p| (p.x, p.y)).collect();
    Polygon::new(exterior, Vec::new()).wkt_string()
}

/// Reads the exterior ring of a `POLYGON`, or of the first polygon of a
/// `MULTIPOLYGON`. Holes are ignored; anything after the closing parenthesis
/// is an error.
pub fn from_wkt(text: &str) -> Result<Vec<Coord>, CodecError> {
    let trimmed = text.trim();
    if trimmed
        .split_whitespace()
        .last()
        .is_some_and(|w| w.eq_ignore_ascii_case("EMPTY"))
    {
        return Err(CodecError::TooFewVertices { found: 0 });
    }
    if !trimmed.ends_with(')') {
        return Err(CodecError::malformed(
            FORMAT,
            "expected the text to end with ')'",
        ));
    }
    let parsed = Wkt::<f64>::from_str(trimmed).map_err(|e| CodecError::malformed(FORMAT, e))?;
    let geometry: Geometry<f64> = parsed
        .try_into()
        .map_err(|e: wkt::conversion::Error| CodecError::malformed(FORMAT, e.to_string()))?;
    let exterior = match geometry {
        Geometry::Polygon(p) => p.into_inner().0,
        Geometry::MultiPolygon(mp) => match mp.0.into_iter().next() {
            Some(p) => p.into_inner().0,
            None => return Err(CodecError::TooFewVertices { found: 0 }),
        },
        _ => {
            return Err(CodecError::malformed(
                FORMAT,
                "expected POLYGON or MULTIPOLYGON",
            ))
        }
    };
    let coords: Vec<Coord> = exterior.0.iter().map(|c| Coord::new(c.x, c.y)).collect();
    finish(FORMAT, &coords)
}
