use serde_json::{json, Value};

use super::{finish, CodecError};
use crate::ring::close;
use crate::Coord;

const FORMAT: &str = "GeoJSON";

fn positions(ring: &[Coord]) -> Vec<[f64; 2]> {
    close(ring).iter().map(|p| [p.x, p.y]).collect()
}

/// `Polygon` geometry with a single closed outer ring.
pub fn to_geojson(ring: &[Coord]) -> String {
    json!({
        "type": "Polygon",
        "coordinates": [positions(ring)],
    })
    .to_string()
}

/// `Feature` wrapping the polygon, with caller-supplied properties.
pub fn to_geojson_feature(ring: &[Coord], properties: Value) -> String {
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {
            "type": "Polygon",
            "coordinates": [positions(ring)],
        },
    })
    .to_string()
}

/// Accepts `Polygon`, `MultiPolygon` (first polygon), `Feature`,
/// `FeatureCollection` and `GeometryCollection` (first polygon found).
/// Holes are ignored.
pub fn from_geojson(text: &str) -> Result<Vec<Coord>, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let ring = outer_ring(&value)?
        .ok_or_else(|| CodecError::malformed(FORMAT, "no Polygon geometry found"))?;
    finish(FORMAT, &ring)
}

fn outer_ring(value: &Value) -> Result<Option<Vec<Coord>>, CodecError> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "Polygon" => parse_ring(value.pointer("/coordinates/0")).map(Some),
        "MultiPolygon" => parse_ring(value.pointer("/coordinates/0/0")).map(Some),
        "Feature" => match value.get("geometry") {
            Some(g) if !g.is_null() => outer_ring(g),
            _ => Ok(None),
        },
        "FeatureCollection" => first_polygon(value.get("features")),
        "GeometryCollection" => first_polygon(value.get("geometries")),
        "" => Err(CodecError::malformed(FORMAT, "missing \"type\" member")),
        _ => Ok(None),
    }
}

fn first_polygon(items: Option<&Value>) -> Result<Option<Vec<Coord>>, CodecError> {
    let Some(items) = items.and_then(Value::as_array) else {
        return Ok(None);
    };
    for item in items {
        if let Some(ring) = outer_ring(item)? {
            return Ok(Some(ring));
        }
    }
    Ok(None)
}

fn parse_ring(ring: Option<&Value>) -> Result<Vec<Coord>, CodecError> {
    let ring = ring
        .and_then(Value::as_array)
        .ok_or_else(|| CodecError::malformed(FORMAT, "polygon has no outer ring"))?;
    ring.iter()
        .enumerate()
        .map(|(i, pos)| {
            let lon = pos.get(0).and_then(Value::as_f64);
            let lat = pos.get(1).and_then(Value::as_f64);
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok(Coord::new(lon, lat)),
                _ => Err(CodecError::malformed(
                    FORMAT,
                    format!("position {i} is not a [longitude, latitude] pair"),
                )),
            }
        })
        .collect()
}
