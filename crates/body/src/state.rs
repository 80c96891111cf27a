use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use spicer_config::BodyProfile;
use spicer_core::constants::L_SUN;
use spicer_core::units::km_to_m;
use spicer_core::vector::{self, Vector3};
use spicer_core::Radii;
use spicer_ephem_spice::{AberrationCorrection, EphemerisProvider};
use tracing::debug;

use crate::BodyError;

/// Method flag carried for intercept-based surface points.
pub const DEFAULT_INTERCEPT_METHOD: &str = "Near point:ellipsoid";

/// Shape model handed to the full illumination model.
pub const ILLUMINATION_METHOD: &str = "ELLIPSOID";

const UNSET_TARGET: &str = "<unset>";

/// One body observed at one instant.
///
/// The calendar timestamp is the only time state; ephemeris time is derived
/// from it through the provider on every call.
#[derive(Debug, Clone)]
pub struct BodyState<P> {
    pub(crate) provider: P,
    pub(crate) time: NaiveDateTime,
    pub(crate) target: Option<String>,
    pub(crate) frame_override: Option<String>,
    pub(crate) aberration_correction: AberrationCorrection,
    pub(crate) intercept_method: String,
    pub(crate) surface_point: Option<Vector3>,
    pub(crate) tilt_deg: f64,
    pub(crate) aspect_deg: f64,
    pub(crate) optical_depth: f64,
    pub(crate) observer: Option<String>,
    pub(crate) instrument: Option<String>,
    pub(crate) profile: Option<BodyProfile>,
}

impl<P: EphemerisProvider> BodyState<P> {
    /// State for `target` at `time`, or at the current UTC time when `None`.
    pub fn new(provider: P, target: impl Into<String>, time: Option<NaiveDateTime>) -> Self {
        let mut state = Self::generic(provider, time);
        state.target = Some(target.into());
        state
    }

    /// State without a target; queries fail with `UnknownBody` until one is set.
    pub fn generic(provider: P, time: Option<NaiveDateTime>) -> Self {
        Self {
            provider,
            time: time.unwrap_or_else(|| Utc::now().naive_utc()),
            target: None,
            frame_override: None,
            aberration_correction: AberrationCorrection::None,
            intercept_method: DEFAULT_INTERCEPT_METHOD.to_string(),
            surface_point: None,
            tilt_deg: 0.0,
            aspect_deg: 0.0,
            optical_depth: 0.0,
            observer: None,
            instrument: None,
            profile: None,
        }
    }

    /// State whose target is pinned by `profile`.
    pub fn with_profile(provider: P, profile: BodyProfile, time: Option<NaiveDateTime>) -> Self {
        let mut state = Self::new(provider, profile.spice_name.clone(), time);
        state.profile = Some(profile);
        state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn profile(&self) -> Option<&BodyProfile> {
        self.profile.as_ref()
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn set_time(&mut self, time: NaiveDateTime) {
        self.time = time;
    }

    /// ISO-8601 rendering of the timestamp; fractional seconds only when non-zero.
    pub fn utc(&self) -> String {
        self.time.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }

    pub fn ephemeris_time(&self) -> Result<f64, BodyError> {
        Ok(self.provider.time_to_ephemeris_time(&self.utc())?)
    }

    pub fn advance_time_by(&mut self, seconds: f64) -> Result<(), BodyError> {
        let micros = (seconds * 1e6).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(BodyError::TimeOutOfRange { seconds });
        }
        let delta = TimeDelta::microseconds(micros as i64);
        self.time = self
            .time
            .checked_add_signed(delta)
            .ok_or(BodyError::TimeOutOfRange { seconds })?;
        Ok(())
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Change the target and reset the frame to its IAU default.
    pub fn set_target(&mut self, target: impl Into<String>) -> Result<(), BodyError> {
        let target = target.into();
        if let Some(profile) = &self.profile {
            if !profile.spice_name.eq_ignore_ascii_case(&target) {
                return Err(BodyError::TargetLocked {
                    target: profile.spice_name.clone(),
                });
            }
        }
        debug!(target = %target, "target changed");
        self.target = Some(target);
        self.frame_override = None;
        Ok(())
    }

    /// Override when set, else `IAU_<TARGET>`; empty while no target is set.
    pub fn reference_frame(&self) -> String {
        match (&self.frame_override, &self.target) {
            (Some(frame), _) => frame.clone(),
            (None, Some(target)) => format!("IAU_{}", target.to_uppercase()),
            (None, None) => String::new(),
        }
    }

    pub fn set_reference_frame(&mut self, frame: impl Into<String>) {
        self.frame_override = Some(frame.into());
    }

    pub fn aberration_correction(&self) -> AberrationCorrection {
        self.aberration_correction
    }

    pub fn set_aberration_correction(&mut self, correction: AberrationCorrection) {
        self.aberration_correction = correction;
    }

    pub fn intercept_method(&self) -> &str {
        &self.intercept_method
    }

    pub fn observer(&self) -> Option<&str> {
        self.observer.as_deref()
    }

    /// Set or clear the observer, checked against the body profile.
    pub fn set_observer(&mut self, observer: Option<&str>) -> Result<(), BodyError> {
        if let (Some(observer), Some(profile)) = (observer, &self.profile) {
            if !profile.allows_observer(observer) {
                return Err(BodyError::ObserverNotAllowed {
                    observer: observer.to_string(),
                    body: profile.name.clone(),
                });
            }
        }
        self.observer = observer.map(str::to_string);
        Ok(())
    }

    pub fn instrument(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    /// Set or clear the instrument, checked against the body profile.
    pub fn set_instrument(&mut self, instrument: Option<&str>) -> Result<(), BodyError> {
        if let (Some(instrument), Some(profile)) = (instrument, &self.profile) {
            if !profile.allows_instrument(instrument) {
                return Err(BodyError::InstrumentNotAllowed {
                    instrument: instrument.to_string(),
                    body: profile.name.clone(),
                });
            }
        }
        self.instrument = instrument.map(str::to_string);
        Ok(())
    }

    pub fn tilt(&self) -> f64 {
        self.tilt_deg
    }

    pub fn tilt_rad(&self) -> f64 {
        self.tilt_deg.to_radians()
    }

    /// Tilt of the synthetic slope, in degrees.
    pub fn set_tilt(&mut self, degrees: f64) {
        self.tilt_deg = degrees;
    }

    pub fn aspect(&self) -> f64 {
        self.aspect_deg
    }

    pub fn aspect_rad(&self) -> f64 {
        self.aspect_deg.to_radians()
    }

    /// Azimuth of the synthetic slope around the local normal, in degrees.
    pub fn set_aspect(&mut self, degrees: f64) {
        self.aspect_deg = degrees;
    }

    pub fn optical_depth(&self) -> f64 {
        self.optical_depth
    }

    pub fn set_optical_depth(&mut self, tau: f64) {
        self.optical_depth = tau;
    }

    pub(crate) fn target_name(&self) -> Result<&str, BodyError> {
        self.target.as_deref().ok_or_else(|| BodyError::UnknownBody {
            name: UNSET_TARGET.to_string(),
        })
    }

    pub fn target_id(&self) -> Result<i32, BodyError> {
        Ok(self.provider.resolve_body_id(self.target_name()?)?)
    }

    /// Semi-axes of the target, fetched fresh from the provider.
    pub fn radii(&self) -> Result<Radii, BodyError> {
        let values = self.provider.body_radii(self.target_name()?)?;
        Ok(Radii::from_array(values))
    }

    /// Position of `other` relative to the target centre (km) and light time (s).
    pub fn vector_to(&self, other: &str) -> Result<(Vector3, f64), BodyError> {
        let target = self.target_name()?;
        Ok(self.provider.position_vector(
            target,
            other,
            self.ephemeris_time()?,
            &self.reference_frame(),
            self.aberration_correction,
        )?)
    }

    pub fn center_to_sun(&self) -> Result<Vector3, BodyError> {
        Ok(self.vector_to("SUN")?.0)
    }

    /// Solar irradiance at the target centre's distance, in W/m².
    pub fn solar_constant(&self) -> Result<f64, BodyError> {
        let distance_m = km_to_m(vector::norm(&self.center_to_sun()?));
        Ok(L_SUN / (4.0 * std::f64::consts::PI * distance_m * distance_m))
    }

    pub fn north_pole(&self) -> Result<Vector3, BodyError> {
        Ok([0.0, 0.0, self.radii()?.c])
    }

    pub fn south_pole(&self) -> Result<Vector3, BodyError> {
        Ok([0.0, 0.0, -self.radii()?.c])
    }

    /// Solar longitude Ls of the target, in degrees.
    pub fn solar_longitude(&self) -> Result<f64, BodyError> {
        let target = self.target_name()?;
        let ls = self.provider.solar_longitude(
            target,
            self.ephemeris_time()?,
            self.aberration_correction,
        )?;
        Ok(ls.to_degrees())
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS[.ffffff]`, a space-separated variant, or a bare date.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, BodyError> {
    let trimmed = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(time);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| BodyError::InvalidTime {
            value: value.to_string(),
        })
}
