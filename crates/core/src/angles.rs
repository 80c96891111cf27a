//! Angle and surface-coordinate value types.
//!
//! Angles are stored in radians and distances in kilometres; the `d*`
//! accessors convert to degrees on read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::{deg_to_rad, rad_to_deg};

/// Triaxial ellipsoid semi-axes in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radii {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Radii {
    pub fn from_array(values: [f64; 3]) -> Self {
        Self {
            a: values[0],
            b: values[1],
            c: values[2],
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// Phase, solar incidence, and emission angles at a surface point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IllumAngles {
    pub phase: f64,
    pub solar: f64,
    pub emission: f64,
}

impl IllumAngles {
    pub fn new(phase: f64, solar: f64, emission: f64) -> Self {
        Self {
            phase,
            solar,
            emission,
        }
    }

    /// Build from a `(phase, solar, emission)` triple in radians.
    pub fn from_tuple(angles: [f64; 3]) -> Self {
        Self::new(angles[0], angles[1], angles[2])
    }

    /// Build from angles given in degrees.
    pub fn from_degrees(phase: f64, solar: f64, emission: f64) -> Self {
        Self::new(deg_to_rad(phase), deg_to_rad(solar), deg_to_rad(emission))
    }

    pub fn dphase(&self) -> f64 {
        rad_to_deg(self.phase)
    }

    pub fn dsolar(&self) -> f64 {
        rad_to_deg(self.solar)
    }

    pub fn demission(&self) -> f64 {
        rad_to_deg(self.emission)
    }
}

impl fmt::Display for IllumAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Phase: {} deg", self.dphase())?;
        writeln!(f, "Solar Incidence: {} deg", self.dsolar())?;
        write!(f, "Emission: {} deg", self.demission())
    }
}

/// Planetocentric longitude/latitude (radians) and radius (km).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCoords {
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
}

impl SurfaceCoords {
    pub fn new(lon: f64, lat: f64, radius: f64) -> Self {
        Self { lon, lat, radius }
    }

    /// Build from the `(radius, lon, lat)` ordering returned by `reclat`.
    pub fn from_tuple(values: (f64, f64, f64)) -> Self {
        let (radius, lon, lat) = values;
        Self::new(lon, lat, radius)
    }

    /// Build from longitude/latitude in degrees with zero radius.
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(deg_to_rad(lon), deg_to_rad(lat), 0.0)
    }

    /// East longitude in degrees, within `[0, 360)`.
    pub fn dlon(&self) -> f64 {
        let dlon = rad_to_deg(self.lon);
        if dlon < 0.0 { dlon + 360.0 } else { dlon }
    }

    pub fn dlat(&self) -> f64 {
        rad_to_deg(self.lat)
    }
}

impl fmt::Display for SurfaceCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Longitude: {} deg", self.dlon())?;
        writeln!(f, "Latitude: {} deg", self.dlat())?;
        write!(f, "Radius: {} km", self.radius)
    }
}
