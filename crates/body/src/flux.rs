//! Solar flux on flat, tilted, and tilted-and-rotated surface facets.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use spicer_core::rotation;
use spicer_core::vector::{self, Vector3};
use spicer_ephem_spice::EphemerisProvider;

use crate::{BodyError, BodyState};

/// Which facet orientation a flux value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxKind {
    /// Local ellipsoid normal.
    Flat,
    /// Normal tilted by `tilt` about the local east-west axis; positive tilts face south.
    Tilted,
    /// Tilted normal rotated by `aspect` about the local normal.
    Aspect,
}

/// Attenuated-cosine irradiance on a facet.
///
/// `diff_angle` is the angle between the facet normal and the sun direction;
/// `incidence` is the solar incidence at the site. Either exceeding 90°
/// means the facet is dark. Otherwise the flux is
/// `solar_constant · cos(diff) · exp(−tau / cos(incidence))`.
pub fn attenuated_flux(solar_constant: f64, diff_angle: f64, incidence: f64, tau: f64) -> f64 {
    if diff_angle > FRAC_PI_2 || incidence > FRAC_PI_2 {
        return 0.0;
    }
    solar_constant * diff_angle.cos() * (-tau / incidence.cos()).exp()
}

impl<P: EphemerisProvider> BodyState<P> {
    /// Flux (W/m²) on a facet with the given normal at the surface point.
    pub fn flux_at(&self, normal: &Vector3) -> Result<f64, BodyError> {
        let diff_angle = vector::separation(normal, &self.sun_direction()?);
        let incidence = self.illumination_angles()?.solar;
        Ok(attenuated_flux(
            self.solar_constant()?,
            diff_angle,
            incidence,
            self.optical_depth,
        ))
    }

    pub fn flat_flux(&self) -> Result<f64, BodyError> {
        self.flux_at(&self.surface_normal()?)
    }

    /// Surface normal rotated by `tilt` about `(north_pole − spoint) × spoint`.
    ///
    /// The axis degenerates at the poles, where the normal is returned scaled
    /// by `cos(tilt)`.
    pub fn tilted_normal(&self) -> Result<Vector3, BodyError> {
        let spoint = self.require_surface_point()?;
        let to_north = vector::sub(&self.north_pole()?, &spoint);
        let axis = vector::cross(&to_north, &spoint);
        Ok(rotation::rotate(
            &self.surface_normal()?,
            &axis,
            self.tilt_rad(),
        ))
    }

    pub fn tilted_flux(&self) -> Result<f64, BodyError> {
        self.flux_at(&self.tilted_normal()?)
    }

    /// Tilted normal rotated by `aspect` about the local surface normal.
    pub fn tilted_rotated_normal(&self) -> Result<Vector3, BodyError> {
        Ok(rotation::rotate(
            &self.tilted_normal()?,
            &self.surface_normal()?,
            self.aspect_rad(),
        ))
    }

    pub fn aspect_flux(&self) -> Result<f64, BodyError> {
        self.flux_at(&self.tilted_rotated_normal()?)
    }

    pub fn flux(&self, kind: FluxKind) -> Result<f64, BodyError> {
        match kind {
            FluxKind::Flat => self.flat_flux(),
            FluxKind::Tilted => self.tilted_flux(),
            FluxKind::Aspect => self.aspect_flux(),
        }
    }
}
