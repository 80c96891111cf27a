//! Export helpers for flux time series.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use spicer_body::{FluxKind, FluxSeries};
use spicer_core::constants::SECONDS_PER_DAY;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Describes the run a series came from.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata<'a> {
    pub body: &'a str,
    pub start_utc: &'a str,
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub tilt_deg: f64,
    pub aspect_deg: f64,
    pub optical_depth: f64,
    pub flux: FluxKind,
    pub dt_s: f64,
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

#[derive(Serialize)]
struct Row<'a> {
    step: usize,
    elapsed_s: f64,
    time: Option<String>,
    energy_j_m2: f64,
    cumulative_j_m2: f64,
    flux: &'a str,
}

/// Write one CSV row per step.
pub fn write_csv<W: Write>(
    writer: W,
    meta: &Metadata<'_>,
    series: &FluxSeries,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    let flux = flux_label(meta.flux);
    let mut cumulative = 0.0;
    for (step, energy) in series.energies.iter().enumerate() {
        cumulative += energy;
        let time = series
            .times
            .as_ref()
            .and_then(|times| times.get(step))
            .map(|sample| sample.to_string());
        csv.serialize(Row {
            step,
            elapsed_s: step as f64 * meta.dt_s,
            time,
            energy_j_m2: *energy,
            cumulative_j_m2: cumulative,
            flux,
        })?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub day_index: usize,
    pub energy_j_m2: f64,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    #[serde(flatten)]
    meta: &'a Metadata<'a>,
    steps: usize,
    total_energy_j_m2: f64,
    daily: Vec<DailyTotal>,
    series: &'a FluxSeries,
}

/// Write the series, its metadata, and per-day totals as pretty JSON.
pub fn write_json<W: Write>(
    mut writer: W,
    meta: &Metadata<'_>,
    series: &FluxSeries,
) -> Result<(), ExportError> {
    let sidecar = Sidecar {
        meta,
        steps: series.len(),
        total_energy_j_m2: series.total_energy(),
        daily: aggregate_daily(&series.energies, meta.dt_s),
        series,
    };
    serde_json::to_writer_pretty(&mut writer, &sidecar)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write CSV or JSON depending on the extension of `path` (`-` means CSV on stdout).
pub fn write_series(
    path: &Path,
    meta: &Metadata<'_>,
    series: &FluxSeries,
) -> Result<(), ExportError> {
    let writer = writer_for_path(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        write_json(writer, meta, series)
    } else {
        write_csv(writer, meta, series)
    }
}

/// Sum step energies into 86 400 s buckets measured from the series start.
pub fn aggregate_daily(energies: &[f64], dt_s: f64) -> Vec<DailyTotal> {
    let mut daily: Vec<DailyTotal> = Vec::new();
    for (step, energy) in energies.iter().enumerate() {
        let day_index = (step as f64 * dt_s / SECONDS_PER_DAY).floor() as usize;
        match daily.last_mut() {
            Some(last) if last.day_index == day_index => last.energy_j_m2 += energy,
            _ => daily.push(DailyTotal {
                day_index,
                energy_j_m2: *energy,
            }),
        }
    }
    daily
}

fn flux_label(kind: FluxKind) -> &'static str {
    match kind {
        FluxKind::Flat => "flat",
        FluxKind::Tilted => "tilted",
        FluxKind::Aspect => "aspect",
    }
}
