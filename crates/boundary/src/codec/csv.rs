use super::{finish, CodecError};
use crate::ring::open;
use crate::Coord;

const FORMAT: &str = "CSV";

/// `longitude,latitude` header, one row per vertex (no closing row).
pub fn to_csv(ring: &[Coord]) -> String {
    let mut out = String::from("longitude,latitude\n");
    for p in open(ring) {
        out.push_str(&format!("{},{}\n", p.x, p.y));
    }
    out
}

/// Column order comes from the header when present (`lon`/`lng`/`longitude`/`x`
/// and `lat`/`latitude`/`y`, any order); headerless files are `lon,lat`.
/// Separators `,` `;` and tab are recognised; blank and `#` lines are skipped.
pub fn from_csv(text: &str) -> Result<Vec<Coord>, CodecError> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .peekable();

    let Some(&(_, first)) = rows.peek() else {
        return Err(CodecError::TooFewVertices { found: 0 });
    };
    let sep = if first.contains(';') {
        ';'
    } else if first.contains('\t') {
        '\t'
    } else {
        ','
    };

    let fields = |l: &str| -> Vec<String> {
        l.split(sep)
            .map(|f| f.trim().trim_matches('"').to_string())
            .collect()
    };

    let head = fields(first);
    let (lon_col, lat_col) = if head.iter().all(|f| f.parse::<f64>().is_ok()) {
        (0, 1)
    } else {
        rows.next();
        header_columns(&head)?
    };

    let mut coords = Vec::new();
    for (line_no, line) in rows {
        let f = fields(line);
        let get = |col: usize| f.get(col).and_then(|s| s.parse::<f64>().ok());
        match (get(lon_col), get(lat_col)) {
            (Some(lon), Some(lat)) => coords.push(Coord::new(lon, lat)),
            _ => {
                return Err(CodecError::malformed(
                    FORMAT,
                    format!("line {line_no}: expected numeric longitude and latitude"),
                ))
            }
        }
    }
    finish(FORMAT, &coords)
}

fn header_columns(head: &[String]) -> Result<(usize, usize), CodecError> {
    let find = |names: &[&str]| {
        head.iter()
            .position(|h| names.contains(&h.to_ascii_lowercase().as_str()))
    };
    let lon = find(&["lon", "lng", "long", "longitude", "x"]);
    let lat = find(&["lat", "latitude", "y"]);
    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(CodecError::malformed(
            FORMAT,
            "header must name a longitude and a latitude column",
        )),
    }
}
