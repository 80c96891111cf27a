//! The queries the geometry engine needs from an ephemeris backend.

use std::fmt;
use std::str::FromStr;

use spicer_core::vector::Vector3;

use crate::EphemerisError;

/// Aberration correction applied to apparent positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AberrationCorrection {
    #[default]
    None,
    Lt,
    LtS,
    Cn,
    CnS,
    Xlt,
    XltS,
    Xcn,
    XcnS,
}

impl AberrationCorrection {
    /// The flag string SPICE expects.
    pub fn as_spice_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Lt => "LT",
            Self::LtS => "LT+S",
            Self::Cn => "CN",
            Self::CnS => "CN+S",
            Self::Xlt => "XLT",
            Self::XltS => "XLT+S",
            Self::Xcn => "XCN",
            Self::XcnS => "XCN+S",
        }
    }
}

impl fmt::Display for AberrationCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice_str())
    }
}

impl FromStr for AberrationCorrection {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "NONE" => Ok(Self::None),
            "LT" => Ok(Self::Lt),
            "LT+S" => Ok(Self::LtS),
            "CN" => Ok(Self::Cn),
            "CN+S" => Ok(Self::CnS),
            "XLT" => Ok(Self::Xlt),
            "XLT+S" => Ok(Self::XltS),
            "XCN" => Ok(Self::Xcn),
            "XCN+S" => Ok(Self::XcnS),
            _ => Err(EphemerisError::UnknownCorrection {
                value: s.to_string(),
            }),
        }
    }
}

/// Longitude convention used when evaluating local solar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeConvention {
    Planetocentric,
    Planetographic,
}

impl LongitudeConvention {
    pub fn as_spice_str(self) -> &'static str {
        match self {
            Self::Planetocentric => "PLANETOCENTRIC",
            Self::Planetographic => "PLANETOGRAPHIC",
        }
    }
}

/// Inputs to the full illumination model at a surface point.
#[derive(Debug, Clone, Copy)]
pub struct IlluminationQuery<'a> {
    pub method: &'a str,
    pub target: &'a str,
    pub ephemeris_time: f64,
    pub reference_frame: &'a str,
    pub aberration_correction: AberrationCorrection,
    pub observer: &'a str,
    pub surface_point: Vector3,
}

/// Output of the full illumination model; angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationModel {
    pub target_epoch: f64,
    pub surface_vector: Vector3,
    pub phase: f64,
    pub solar: f64,
    pub emission: f64,
}

/// Local solar time on a body at a given longitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSolarTime {
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// 24-hour `HH:MM:SS` rendering.
    pub time: String,
    /// 12-hour rendering with an `A.M.`/`P.M.` suffix.
    pub ampm: String,
}

impl LocalSolarTime {
    /// Fractional local hour in `[0, 24)`.
    pub fn decimal_hours(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0 + self.second as f64 / 3600.0
    }
}

impl fmt::Display for LocalSolarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.time)
    }
}

/// Backend answering the ephemeris queries a `BodyState` issues.
///
/// Implementations are expected to be synchronous; a failed call fails the
/// calling operation outright.
pub trait EphemerisProvider {
    /// Convert an ISO-8601 UTC timestamp to ephemeris seconds past J2000.
    fn time_to_ephemeris_time(&self, timestamp: &str) -> Result<f64, EphemerisError>;

    /// Resolve a body name (or numeric string) to its NAIF ID.
    fn resolve_body_id(&self, name: &str) -> Result<i32, EphemerisError>;

    /// Triaxial radii `(a, b, c)` in km.
    fn body_radii(&self, target: &str) -> Result<[f64; 3], EphemerisError>;

    /// Position of `to` relative to `from`, in km, with the one-way light time in seconds.
    fn position_vector(
        &self,
        from: &str,
        to: &str,
        ephemeris_time: f64,
        reference_frame: &str,
        aberration_correction: AberrationCorrection,
    ) -> Result<(Vector3, f64), EphemerisError>;

    /// Body-fixed rectangular coordinates of the surface point at planetocentric lon/lat.
    fn lon_lat_to_rectangular(
        &self,
        body_id: i32,
        lon: f64,
        lat: f64,
    ) -> Result<Vector3, EphemerisError>;

    /// Inverse of the planetocentric transform: `(radius, lon, lat)`.
    fn rectangular_to_lon_lat(&self, point: &Vector3) -> Result<(f64, f64, f64), EphemerisError>;

    /// Outward unit normal of the ellipsoid `(a, b, c)` at `point`.
    fn surface_normal_for_ellipsoid(
        &self,
        a: f64,
        b: f64,
        c: f64,
        point: &Vector3,
    ) -> Result<Vector3, EphemerisError>;

    fn illumination_model(
        &self,
        query: &IlluminationQuery<'_>,
    ) -> Result<IlluminationModel, EphemerisError>;

    /// Solar longitude of `target` in radians.
    fn solar_longitude(
        &self,
        target: &str,
        ephemeris_time: f64,
        aberration_correction: AberrationCorrection,
    ) -> Result<f64, EphemerisError>;

    fn local_solar_time(
        &self,
        ephemeris_time: f64,
        body_id: i32,
        lon: f64,
        convention: LongitudeConvention,
    ) -> Result<LocalSolarTime, EphemerisError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn time_to_ephemeris_time(&self, timestamp: &str) -> Result<f64, EphemerisError> {
        (**self).time_to_ephemeris_time(timestamp)
    }

    fn resolve_body_id(&self, name: &str) -> Result<i32, EphemerisError> {
        (**self).resolve_body_id(name)
    }

    fn body_radii(&self, target: &str) -> Result<[f64; 3], EphemerisError> {
        (**self).body_radii(target)
    }

    fn position_vector(
        &self,
        from: &str,
        to: &str,
        ephemeris_time: f64,
        reference_frame: &str,
        aberration_correction: AberrationCorrection,
    ) -> Result<(Vector3, f64), EphemerisError> {
        (**self).position_vector(
            from,
            to,
            ephemeris_time,
            reference_frame,
            aberration_correction,
        )
    }

    fn lon_lat_to_rectangular(
        &self,
        body_id: i32,
        lon: f64,
        lat: f64,
    ) -> Result<Vector3, EphemerisError> {
        (**self).lon_lat_to_rectangular(body_id, lon, lat)
    }

    fn rectangular_to_lon_lat(&self, point: &Vector3) -> Result<(f64, f64, f64), EphemerisError> {
        (**self).rectangular_to_lon_lat(point)
    }

    fn surface_normal_for_ellipsoid(
        &self,
        a: f64,
        b: f64,
        c: f64,
        point: &Vector3,
    ) -> Result<Vector3, EphemerisError> {
        (**self).surface_normal_for_ellipsoid(a, b, c, point)
    }

    fn illumination_model(
        &self,
        query: &IlluminationQuery<'_>,
    ) -> Result<IlluminationModel, EphemerisError> {
        (**self).illumination_model(query)
    }

    fn solar_longitude(
        &self,
        target: &str,
        ephemeris_time: f64,
        aberration_correction: AberrationCorrection,
    ) -> Result<f64, EphemerisError> {
        (**self).solar_longitude(target, ephemeris_time, aberration_correction)
    }

    fn local_solar_time(
        &self,
        ephemeris_time: f64,
        body_id: i32,
        lon: f64,
        convention: LongitudeConvention,
    ) -> Result<LocalSolarTime, EphemerisError> {
        (**self).local_solar_time(ephemeris_time, body_id, lon, convention)
    }
}
