//! Surface point selection and the local geometry that depends on it.

use spicer_core::vector::{self, Vector3};
use spicer_core::{IllumAngles, SurfaceCoords};
use spicer_ephem_spice::{EphemerisProvider, IlluminationQuery, LocalSolarTime, LongitudeConvention};
use tracing::debug;

use crate::state::ILLUMINATION_METHOD;
use crate::{BodyError, BodyState};

/// Arguments to [`BodyState::set_surface_point_by`].
///
/// Angles are planetocentric radians; use [`SurfacePointRequest::from_degrees`]
/// when starting from degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfacePointRequest {
    pub method: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl SurfacePointRequest {
    pub fn lon_lat(lon: f64, lat: f64) -> Self {
        Self {
            method: None,
            lon: Some(lon),
            lat: Some(lat),
        }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::lon_lat(lon.to_radians(), lat.to_radians())
    }

    pub fn by_method(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Self::default()
        }
    }
}

impl<P: EphemerisProvider> BodyState<P> {
    pub fn surface_point(&self) -> Option<Vector3> {
        self.surface_point
    }

    pub fn surface_point_set(&self) -> bool {
        self.surface_point.is_some()
    }

    pub fn clear_surface_point(&mut self) {
        self.surface_point = None;
    }

    pub(crate) fn require_surface_point(&self) -> Result<Vector3, BodyError> {
        self.surface_point.ok_or(BodyError::SurfacePointNotSet)
    }

    fn commit_surface_point(&mut self, point: Vector3) {
        debug!(?point, target = ?self.target, "surface point committed");
        self.surface_point = Some(point);
    }

    /// Rectangular body-fixed coordinates for planetocentric `coords`.
    ///
    /// `body` defaults to the target; names are resolved to NAIF IDs, numeric
    /// strings are used as IDs directly. Does not touch the stored surface point.
    pub fn surface_point_from_lon_lat(
        &self,
        coords: &SurfaceCoords,
        body: Option<&str>,
    ) -> Result<Vector3, BodyError> {
        let body = match body {
            Some(body) => body,
            None => self.target_name()?,
        };
        let body_id = match body.trim().parse::<i32>() {
            Ok(id) => id,
            Err(_) => self.provider.resolve_body_id(body)?,
        };
        Ok(self
            .provider
            .lon_lat_to_rectangular(body_id, coords.lon, coords.lat)?)
    }

    /// Establish the working surface point.
    ///
    /// Only the lon/lat path is supported; `subpnt`/`sincpt` need
    /// observer/instrument intercept geometry and fail with `NotImplemented`,
    /// as does any other method name.
    pub fn set_surface_point_by(
        &mut self,
        request: &SurfacePointRequest,
    ) -> Result<Vector3, BodyError> {
        if let Some(method) = request.method.as_deref() {
            let feature = if method.eq_ignore_ascii_case("subpnt")
                || method.eq_ignore_ascii_case("sincpt")
            {
                format!("surface point by `{method}` (intercept method {})", self.intercept_method)
            } else {
                format!("surface point method `{method}`")
            };
            return Err(BodyError::NotImplemented { feature });
        }

        let lon = request
            .lon
            .ok_or(BodyError::MissingParameter { parameter: "lon" })?;
        let lat = request
            .lat
            .ok_or(BodyError::MissingParameter { parameter: "lat" })?;
        let point = self.surface_point_from_lon_lat(&SurfaceCoords::new(lon, lat, 0.0), None)?;
        self.commit_surface_point(point);
        Ok(point)
    }

    /// Jump to a named location from the body profile.
    pub fn goto(&mut self, name: &str) -> Result<Vector3, BodyError> {
        let point = self
            .profile
            .as_ref()
            .and_then(|profile| profile.location(name))
            .map(|location| location.point_km)
            .ok_or_else(|| BodyError::UnknownLocation {
                name: name.to_string(),
            })?;
        self.commit_surface_point(point);
        Ok(point)
    }

    /// Vector from the surface point to the Sun.
    pub fn sun_direction(&self) -> Result<Vector3, BodyError> {
        let spoint = self.require_surface_point()?;
        Ok(vector::sub(&self.center_to_sun()?, &spoint))
    }

    /// Outward ellipsoid normal at the surface point.
    pub fn surface_normal(&self) -> Result<Vector3, BodyError> {
        let spoint = self.require_surface_point()?;
        let radii = self.radii()?;
        Ok(self
            .provider
            .surface_normal_for_ellipsoid(radii.a, radii.b, radii.c, &spoint)?)
    }

    /// Illumination angles at the surface point.
    ///
    /// With an observer this is the provider's full model. Without one only
    /// the solar incidence is computed (sun direction vs. surface normal);
    /// phase and emission are reported as 0 and carry no meaning.
    pub fn illumination_angles(&self) -> Result<IllumAngles, BodyError> {
        let spoint = self.require_surface_point()?;
        match self.observer.as_deref() {
            Some(observer) => {
                let frame = self.reference_frame();
                let query = IlluminationQuery {
                    method: ILLUMINATION_METHOD,
                    target: self.target_name()?,
                    ephemeris_time: self.ephemeris_time()?,
                    reference_frame: &frame,
                    aberration_correction: self.aberration_correction,
                    observer,
                    surface_point: spoint,
                };
                let model = self.provider.illumination_model(&query)?;
                Ok(IllumAngles::new(model.phase, model.solar, model.emission))
            }
            None => {
                let solar = vector::separation(&self.sun_direction()?, &self.surface_normal()?);
                Ok(IllumAngles::new(0.0, solar, 0.0))
            }
        }
    }

    /// The surface point expressed as planetocentric radius/lon/lat.
    pub fn local_surface_coords(&self) -> Result<SurfaceCoords, BodyError> {
        let spoint = self.require_surface_point()?;
        let reclat = self.provider.rectangular_to_lon_lat(&spoint)?;
        Ok(SurfaceCoords::from_tuple(reclat))
    }

    pub fn local_solar_time(&self) -> Result<LocalSolarTime, BodyError> {
        let coords = self.local_surface_coords()?;
        Ok(self.provider.local_solar_time(
            self.ephemeris_time()?,
            self.target_id()?,
            coords.lon,
            LongitudeConvention::Planetographic,
        )?)
    }
}
