//! Illumination geometry at a surface point on a body.
//!
//! Prints the body-centre quantities, the surface point, its illumination
//! angles, local solar time, and the flat/tilted/aspect fluxes. With
//! `--series-steps` it also writes an energy time series.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use spicer::body::parse_timestamp;
use spicer::ephemeris::AberrationCorrection;
use spicer::export::{self, Metadata};
use spicer::session::Session;
use spicer::{FluxKind, SurfacePointRequest, TimeChannel};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Illumination angles and solar flux at a planetary surface point"
)]
struct Cli {
    /// Target body name (case-insensitive)
    #[arg(long)]
    body: String,

    /// UTC time, ISO-8601 (defaults to now)
    #[arg(long)]
    time: Option<String>,

    /// Planetocentric east longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Planetocentric latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Named location from the body profile (instead of --lon/--lat)
    #[arg(long, conflicts_with_all = ["lon", "lat"])]
    location: Option<String>,

    /// Observer for the full illumination model
    #[arg(long)]
    observer: Option<String>,

    /// Body-fixed reference frame (defaults to IAU_<BODY>)
    #[arg(long)]
    frame: Option<String>,

    /// Aberration correction (NONE, LT, LT+S, CN, CN+S, ...)
    #[arg(long, default_value = "NONE")]
    abcorr: String,

    /// Slope tilt in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    tilt: f64,

    /// Slope aspect in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    aspect: f64,

    /// Atmospheric optical depth
    #[arg(long, default_value_t = 0.0)]
    tau: f64,

    /// Kernel configuration file (TOML or YAML)
    #[arg(long)]
    kernels: Option<PathBuf>,

    /// Body profile catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Number of time-series steps (0 disables the series)
    #[arg(long, default_value_t = 0)]
    series_steps: usize,

    /// Time-series step in seconds
    #[arg(long, default_value_t = 600.0)]
    series_dt: f64,

    /// Facet orientation for the time series
    #[arg(long, value_enum, default_value_t = FluxArg::Flat)]
    series_flux: FluxArg,

    /// Time channel recorded alongside the energies
    #[arg(long, value_enum)]
    series_time: Option<TimeArg>,

    /// Output path for the series (.json for JSON, otherwise CSV; '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum FluxArg {
    Flat,
    Tilted,
    Aspect,
}

impl From<FluxArg> for FluxKind {
    fn from(value: FluxArg) -> Self {
        match value {
            FluxArg::Flat => FluxKind::Flat,
            FluxArg::Tilted => FluxKind::Tilted,
            FluxArg::Aspect => FluxKind::Aspect,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum TimeArg {
    Et,
    Utc,
    Ls,
}

impl From<TimeArg> for TimeChannel {
    fn from(value: TimeArg) -> Self {
        match value {
            TimeArg::Et => TimeChannel::EphemerisTime,
            TimeArg::Utc => TimeChannel::Calendar,
            TimeArg::Ls => TimeChannel::SolarLongitude,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let session = Session::from_files(cli.kernels.as_deref(), cli.profiles.as_deref())
        .context("failed to initialize SPICE kernels")?;
    let time = cli
        .time
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;
    let mut state = session.body(&cli.body, time)?;

    if let Some(frame) = &cli.frame {
        state.set_reference_frame(frame.clone());
    }
    state.set_aberration_correction(cli.abcorr.parse::<AberrationCorrection>()?);
    state.set_observer(cli.observer.as_deref())?;
    state.set_tilt(cli.tilt);
    state.set_aspect(cli.aspect);
    state.set_optical_depth(cli.tau);

    match (&cli.location, cli.lon, cli.lat) {
        (Some(location), _, _) => {
            state.goto(location)?;
        }
        (None, lon, lat) => {
            let request = SurfacePointRequest {
                method: None,
                lon: lon.map(f64::to_radians),
                lat: lat.map(f64::to_radians),
            };
            state.set_surface_point_by(&request)?;
        }
    }
    info!(body = %cli.body, utc = %state.utc(), "surface point set");

    let radii = state.radii()?;
    let center_to_sun = state.center_to_sun()?;
    let coords = state.local_surface_coords()?;
    let angles = state.illumination_angles()?;

    println!("=== {} @ {} ===", cli.body.to_uppercase(), state.utc());
    println!("Ephemeris time  : {:.6} s", state.ephemeris_time()?);
    println!("Frame           : {}", state.reference_frame());
    println!(
        "Radii           : a = {:.3} km, b = {:.3} km, c = {:.3} km",
        radii.a, radii.b, radii.c
    );
    println!(
        "Center → Sun    : [{:.6e}, {:.6e}, {:.6e}] km",
        center_to_sun[0], center_to_sun[1], center_to_sun[2]
    );
    println!("Solar constant  : {:.3} W/m²", state.solar_constant()?);
    println!("Solar longitude : {:.3} deg", state.solar_longitude()?);
    println!("--- surface point ---");
    println!("{coords}");
    println!("Local solar time: {}", state.local_solar_time()?);
    println!("--- illumination ---");
    println!("{angles}");
    if state.observer().is_none() {
        println!("(no observer: phase and emission not computed)");
    }
    println!("--- flux ---");
    println!("Flat            : {:.3} W/m²", state.flat_flux()?);
    println!(
        "Tilted ({:>5.1}°) : {:.3} W/m²",
        cli.tilt,
        state.tilted_flux()?
    );
    println!(
        "Aspect ({:>5.1}°) : {:.3} W/m²",
        cli.aspect,
        state.aspect_flux()?
    );

    if cli.series_steps > 0 {
        if cli.series_dt <= 0.0 {
            bail!("--series-dt must be positive (got {})", cli.series_dt);
        }
        let flux = FluxKind::from(cli.series_flux);
        let series = state.time_series(
            flux,
            cli.series_dt,
            cli.series_steps,
            cli.series_time.map(TimeChannel::from),
        )?;
        let start_utc = state.utc();
        let meta = Metadata {
            body: &cli.body,
            start_utc: &start_utc,
            lon_deg: coords.dlon(),
            lat_deg: coords.dlat(),
            tilt_deg: cli.tilt,
            aspect_deg: cli.aspect,
            optical_depth: cli.tau,
            flux,
            dt_s: cli.series_dt,
        };
        export::write_series(&cli.output, &meta, &series)
            .with_context(|| format!("failed to write series to {}", cli.output.display()))?;
        eprintln!(
            "[series] {} steps, total {:.3e} J/m²",
            series.len(),
            series.total_energy()
        );
    }

    Ok(())
}
