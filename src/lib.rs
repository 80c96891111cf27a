//! Surface-point and illumination geometry for planetary bodies.
//!
//! The workspace crates are re-exported here so scripts and front-ends can
//! depend on a single crate. [`session::Session`] is the usual entry point:
//! it furnishes kernels explicitly and hands out [`BodyState`]s.

pub use spicer_body as body;
pub use spicer_config as config;
pub use spicer_core as primitives;
pub use spicer_ephem_spice as ephemeris;
pub use spicer_export as export;

pub mod session;

pub use spicer_body::{
    BodyError, BodyState, FluxKind, FluxSeries, SurfacePointRequest, TimeChannel, TimeSample,
};
pub use spicer_core::{IllumAngles, Radii, SurfaceCoords};
