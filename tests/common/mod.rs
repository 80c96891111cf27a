//! Closed-form ephemeris used to exercise `BodyState` without kernels.
//!
//! Bodies are exact ellipsoids. The Sun sits in the body's equatorial plane
//! at a fixed distance and, seen from the body-fixed frame, circles the
//! rotation axis once per `rotation_period_s`.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::f64::consts::{PI, TAU};

use chrono::NaiveDateTime;
use spicer::body::parse_timestamp;
use spicer::ephemeris::{
    AberrationCorrection, EphemerisError, EphemerisProvider, IlluminationModel, IlluminationQuery,
    LocalSolarTime, LongitudeConvention,
};
use spicer::primitives::vector::{self, Vector3};

pub const AU_KM: f64 = 149_597_870.7;
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;
pub const MARS_RADII: [f64; 3] = [3396.19, 3396.19, 3376.20];
pub const SUN_RADII: [f64; 3] = [696_000.0, 696_000.0, 696_000.0];
pub const EARTH_RADII: [f64; 3] = [6378.1366, 6378.1366, 6356.7519];

const BODIES: &[(&str, i32, [f64; 3])] = &[
    ("SUN", 10, SUN_RADII),
    ("EARTH", 399, EARTH_RADII),
    ("MARS", 499, MARS_RADII),
    ("TRITON", 801, [1352.6, 1352.6, 1352.6]),
];

/// Angles reported by the observer branch of the illumination model.
pub const OBSERVER_PHASE: f64 = 0.25;
pub const OBSERVER_EMISSION: f64 = 0.5;

pub struct AnalyticProvider {
    pub sun_distance_km: f64,
    pub rotation_period_s: f64,
    /// Remaining successful position queries before they start failing.
    pub position_budget: Cell<Option<usize>>,
    pub last_illumination: RefCell<Option<(String, String, String, String)>>,
}

impl AnalyticProvider {
    pub fn new() -> Self {
        Self {
            sun_distance_km: 1.5 * AU_KM,
            rotation_period_s: 88_775.0,
            position_budget: Cell::new(None),
            last_illumination: RefCell::new(None),
        }
    }

    pub fn at_distance(sun_distance_km: f64) -> Self {
        Self {
            sun_distance_km,
            ..Self::new()
        }
    }

    pub fn fail_positions_after(&self, calls: usize) {
        self.position_budget.set(Some(calls));
    }

    /// Body-fixed sub-solar longitude at `et`.
    pub fn subsolar_lon(&self, et: f64) -> f64 {
        (-TAU * et / self.rotation_period_s).rem_euclid(TAU)
    }

    pub fn sun_position(&self, et: f64) -> Vector3 {
        let lon = self.subsolar_lon(et);
        [
            self.sun_distance_km * lon.cos(),
            self.sun_distance_km * lon.sin(),
            0.0,
        ]
    }

    fn lookup(name: &str) -> Result<(i32, [f64; 3]), EphemerisError> {
        let upper = name.trim().to_ascii_uppercase();
        BODIES
            .iter()
            .find(|(body, id, _)| *body == upper || id.to_string() == upper)
            .map(|(_, id, radii)| (*id, *radii))
            .ok_or_else(|| EphemerisError::UnknownBody {
                name: name.to_string(),
            })
    }

    fn radii_by_id(id: i32) -> Result<[f64; 3], EphemerisError> {
        BODIES
            .iter()
            .find(|(_, body_id, _)| *body_id == id)
            .map(|(_, _, radii)| *radii)
            .ok_or_else(|| EphemerisError::UnknownBody {
                name: id.to_string(),
            })
    }
}

/// Seconds past J2000 (2000-01-01T12:00:00), ignoring leap seconds.
pub fn seconds_past_j2000(time: NaiveDateTime) -> f64 {
    let epoch = parse_timestamp("2000-01-01T12:00:00").expect("J2000 epoch parses");
    (time - epoch).num_microseconds().expect("in range") as f64 / 1e6
}

pub fn ellipsoid_point(radii: [f64; 3], lon: f64, lat: f64) -> Vector3 {
    let u = [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()];
    let scale = 1.0
        / ((u[0] / radii[0]).powi(2) + (u[1] / radii[1]).powi(2) + (u[2] / radii[2]).powi(2))
            .sqrt();
    vector::scale(&u, scale)
}

impl EphemerisProvider for AnalyticProvider {
    fn time_to_ephemeris_time(&self, timestamp: &str) -> Result<f64, EphemerisError> {
        let time = parse_timestamp(timestamp).map_err(|_| EphemerisError::InvalidEpoch {
            epoch: timestamp.to_string(),
        })?;
        Ok(seconds_past_j2000(time))
    }

    fn resolve_body_id(&self, name: &str) -> Result<i32, EphemerisError> {
        Ok(Self::lookup(name)?.0)
    }

    fn body_radii(&self, target: &str) -> Result<[f64; 3], EphemerisError> {
        Ok(Self::lookup(target)?.1)
    }

    fn position_vector(
        &self,
        from: &str,
        to: &str,
        ephemeris_time: f64,
        _reference_frame: &str,
        _aberration_correction: AberrationCorrection,
    ) -> Result<(Vector3, f64), EphemerisError> {
        if let Some(remaining) = self.position_budget.get() {
            if remaining == 0 {
                return Err(EphemerisError::Spice {
                    message: "SPICE(SPKINSUFFDATA)".to_string(),
                });
            }
            self.position_budget.set(Some(remaining - 1));
        }
        Self::lookup(from)?;
        let (to_id, _) = Self::lookup(to)?;
        if to_id != 10 {
            return Err(EphemerisError::Spice {
                message: format!("no analytic ephemeris for {to}"),
            });
        }
        let position = self.sun_position(ephemeris_time);
        Ok((position, vector::norm(&position) / SPEED_OF_LIGHT_KM_S))
    }

    fn lon_lat_to_rectangular(
        &self,
        body_id: i32,
        lon: f64,
        lat: f64,
    ) -> Result<Vector3, EphemerisError> {
        Ok(ellipsoid_point(Self::radii_by_id(body_id)?, lon, lat))
    }

    fn rectangular_to_lon_lat(&self, point: &Vector3) -> Result<(f64, f64, f64), EphemerisError> {
        let radius = vector::norm(point);
        let lon = point[1].atan2(point[0]);
        let lat = point[2].atan2(point[0].hypot(point[1]));
        Ok((radius, lon, lat))
    }

    fn surface_normal_for_ellipsoid(
        &self,
        a: f64,
        b: f64,
        c: f64,
        point: &Vector3,
    ) -> Result<Vector3, EphemerisError> {
        Ok(vector::unit(&[
            point[0] / (a * a),
            point[1] / (b * b),
            point[2] / (c * c),
        ]))
    }

    fn illumination_model(
        &self,
        query: &IlluminationQuery<'_>,
    ) -> Result<IlluminationModel, EphemerisError> {
        *self.last_illumination.borrow_mut() = Some((
            query.method.to_string(),
            query.target.to_string(),
            query.reference_frame.to_string(),
            query.observer.to_string(),
        ));
        let (_, radii) = Self::lookup(query.target)?;
        let normal = self.surface_normal_for_ellipsoid(
            radii[0],
            radii[1],
            radii[2],
            &query.surface_point,
        )?;
        let to_sun = vector::sub(
            &self.sun_position(query.ephemeris_time),
            &query.surface_point,
        );
        Ok(IlluminationModel {
            target_epoch: query.ephemeris_time,
            surface_vector: [0.0, 0.0, 0.0],
            phase: OBSERVER_PHASE,
            solar: vector::separation(&normal, &to_sun),
            emission: OBSERVER_EMISSION,
        })
    }

    fn solar_longitude(
        &self,
        _target: &str,
        ephemeris_time: f64,
        _aberration_correction: AberrationCorrection,
    ) -> Result<f64, EphemerisError> {
        Ok((TAU * ephemeris_time / (687.0 * 86_400.0)).rem_euclid(TAU))
    }

    fn local_solar_time(
        &self,
        ephemeris_time: f64,
        _body_id: i32,
        lon: f64,
        _convention: LongitudeConvention,
    ) -> Result<LocalSolarTime, EphemerisError> {
        let hour_angle = (lon - self.subsolar_lon(ephemeris_time) + PI).rem_euclid(TAU);
        let total_seconds = (hour_angle / TAU * 86_400.0).round() as i32 % 86_400;
        let (hour, minute, second) = (
            total_seconds / 3600,
            (total_seconds % 3600) / 60,
            total_seconds % 60,
        );
        Ok(LocalSolarTime {
            hour,
            minute,
            second,
            time: format!("{hour:02}:{minute:02}:{second:02}"),
            ampm: String::new(),
        })
    }
}
