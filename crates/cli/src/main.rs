mod provenance;

use anyhow::{anyhow, bail, Context, Result};
use boundary::codec::Format;
use boundary::geodesic::segments;
use boundary::validate::{validate, Report, ValidationThresholds};
use boundary::Coord;
use clap::{Parser, Subcommand};
use polars::prelude::*;
use provenance::{Payload, RingSummary};
use serde_json::json;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "boundary-cli")]
#[command(about = "Validate, measure and convert site boundary files")]
struct Cmd {
    /// JSON file with validation thresholds; missing keys keep their defaults
    #[arg(long, global = true)]
    thresholds: Option<PathBuf>,

    /// Input format (geojson, wkt, csv); guessed from the extension otherwise
    #[arg(long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the validation report as JSON
    Validate {
        #[arg(long)]
        input: PathBuf,
        /// Exit with an error when the boundary is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Print area, perimeter, segments and angles as JSON
    Metrics {
        #[arg(long)]
        input: PathBuf,
    },
    /// Re-encode a boundary; the output format follows the extension of --out
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Douglas-Peucker simplification with a tolerance in metres
    Simplify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        tolerance: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Per-segment table (length, bearing, interior angle) as CSV or Parquet
    Segments {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let thresholds = load_thresholds(cmd.thresholds.as_deref())?;
    let format = cmd.format.as_deref();
    match cmd.action {
        Action::Validate { input, strict } => {
            let report = validate(&load(&input, format)?, &thresholds);
            tracing::info!(
                input = %input.display(),
                valid = report.valid,
                errors = report.errors.len(),
                warnings = report.warnings.len(),
                "validate"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            if strict && !report.valid {
                bail!("{}: {}", input.display(), report.errors.join("; "));
            }
            Ok(())
        }
        Action::Metrics { input } => {
            let ring = load(&input, format)?;
            let metrics = boundary::validate::metrics(&ring);
            tracing::info!(input = %input.display(), area = metrics.area, "metrics");
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            Ok(())
        }
        Action::Convert { input, out } => {
            let ring = load(&input, format)?;
            let to = output_format(&out)?;
            tracing::info!(input = %input.display(), out = %out.display(), to = ?to, "convert");
            write_text(&out, &to.encode(&ring))?;
            let payload = Payload::new("convert", json!({ "to": to.extension() }))
                .input(&input)
                .ring(summary(&validate(&ring, &thresholds)));
            provenance::write_sidecar(&out, payload)?;
            Ok(())
        }
        Action::Simplify {
            input,
            tolerance,
            out,
        } => {
            if !(tolerance >= 0.0) {
                bail!("tolerance must be a non-negative number of metres, got {tolerance}");
            }
            let ring = load(&input, format)?;
            let simplified = boundary::simplify::simplify(&ring, tolerance);
            tracing::info!(
                input = %input.display(),
                tolerance,
                before = ring.len() - 1,
                after = simplified.len() - 1,
                "simplify"
            );
            let to = output_format(&out)?;
            write_text(&out, &to.encode(&simplified))?;
            let payload = Payload::new(
                "simplify",
                json!({ "tolerance_m": tolerance, "vertices_before": ring.len() - 1 }),
            )
            .input(&input)
            .ring(summary(&validate(&simplified, &thresholds)));
            provenance::write_sidecar(&out, payload)?;
            Ok(())
        }
        Action::Segments { input, out } => {
            let ring = load(&input, format)?;
            let mut df = segment_frame(&ring)?;
            tracing::info!(rows = df.height(), cols = df.width(), out = %out.display(), "segments");
            write_frame(&mut df, &out)?;
            let payload = Payload::new("segments", json!({ "rows": df.height() }))
                .input(&input)
                .ring(summary(&validate(&ring, &thresholds)));
            provenance::write_sidecar(&out, payload)?;
            Ok(())
        }
        Action::Report => {
            let doc = provenance::document(Payload::new("report", json!({})), &[]);
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
    }
}

fn load_thresholds(path: Option<&Path>) -> Result<ValidationThresholds> {
    let Some(path) = path else {
        return Ok(ValidationThresholds::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading thresholds {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing thresholds {}", path.display()))
}

fn input_format(path: &Path, name: Option<&str>) -> Result<Format> {
    match name {
        Some(name) => Format::from_name(name).ok_or_else(|| anyhow!("unknown format '{name}'")),
        None => Format::from_path(path).ok_or_else(|| {
            anyhow!(
                "cannot guess the format of {}; pass --format",
                path.display()
            )
        }),
    }
}

fn output_format(path: &Path) -> Result<Format> {
    Format::from_path(path)
        .ok_or_else(|| anyhow!("unsupported output extension: {}", path.display()))
}

/// Read and decode a boundary file into a normalized closed ring.
fn load(path: &Path, format: Option<&str>) -> Result<Vec<Coord>> {
    let format = input_format(path, format)?;
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    format
        .decode(&text)
        .with_context(|| format!("decoding {} as {:?}", path.display(), format))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn summary(report: &Report) -> RingSummary {
    RingSummary {
        vertices: report.metrics.vertices,
        area_m2: report.metrics.area,
        valid: report.valid,
    }
}

/// One row per edge; `angle_deg` is the interior angle at the edge's start vertex.
fn segment_frame(ring: &[Coord]) -> PolarsResult<DataFrame> {
    let segs = segments(ring);
    let angles = boundary::geodesic::angles(ring);
    let angle_at = |i: usize| angles.get(i).map(|a| a.angle);
    df!(
        "index" => segs.iter().map(|s| s.index as u32).collect::<Vec<_>>(),
        "start_lon" => segs.iter().map(|s| s.start.x).collect::<Vec<_>>(),
        "start_lat" => segs.iter().map(|s| s.start.y).collect::<Vec<_>>(),
        "end_lon" => segs.iter().map(|s| s.end.x).collect::<Vec<_>>(),
        "end_lat" => segs.iter().map(|s| s.end.y).collect::<Vec<_>>(),
        "length_m" => segs.iter().map(|s| s.length).collect::<Vec<_>>(),
        "bearing_deg" => segs.iter().map(|s| s.bearing).collect::<Vec<_>>(),
        "angle_deg" => segs.iter().map(|s| angle_at(s.index)).collect::<Vec<_>>(),
    )
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match ext.as_deref() {
        Some("csv") => CsvWriter::new(&mut file).include_header(true).finish(df)?,
        Some("parquet") => {
            ParquetWriter::new(file).finish(df)?;
        }
        _ => bail!("segments output must end in .csv or .parquet: {}", path.display()),
    }
    Ok(())
}
