//! Geometry of one body observed at one instant.
//!
//! [`BodyState`] owns the mutable inputs (time, target, frame, aberration
//! correction, surface point) and recomputes every derived quantity from
//! them on each call; nothing is cached.

use spicer_ephem_spice::EphemerisError;
use thiserror::Error;

pub mod flux;
pub mod series;
pub mod state;
pub mod surface;

pub use flux::{FluxKind, attenuated_flux};
pub use series::{FluxSeries, TimeChannel, TimeSample};
pub use state::{BodyState, DEFAULT_INTERCEPT_METHOD, ILLUMINATION_METHOD, parse_timestamp};
pub use surface::SurfacePointRequest;

/// Errors surfaced by [`BodyState`] operations.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body `{name}` is not recognized")]
    UnknownBody { name: String },
    #[error("missing required parameter `{parameter}`")]
    MissingParameter { parameter: &'static str },
    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },
    #[error("surface point is not set; call set_surface_point_by or goto first")]
    SurfacePointNotSet,
    #[error("target is fixed to `{target}` by its body profile")]
    TargetLocked { target: String },
    #[error("observer `{observer}` is not allowed for {body}")]
    ObserverNotAllowed { observer: String, body: String },
    #[error("instrument `{instrument}` is not allowed for {body}")]
    InstrumentNotAllowed { instrument: String, body: String },
    #[error("no named location `{name}`")]
    UnknownLocation { name: String },
    #[error("invalid timestamp `{value}`")]
    InvalidTime { value: String },
    #[error("advancing by {seconds} s leaves the representable calendar range")]
    TimeOutOfRange { seconds: f64 },
    #[error(transparent)]
    Ephemeris(EphemerisError),
}

impl From<EphemerisError> for BodyError {
    fn from(err: EphemerisError) -> Self {
        match err {
            EphemerisError::UnknownBody { name } => BodyError::UnknownBody { name },
            other => BodyError::Ephemeris(other),
        }
    }
}
