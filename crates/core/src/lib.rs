//! Core units, constants, and shared primitives for the spicer workspace.

pub mod angles;
pub mod rotation;

pub use angles::{IllumAngles, Radii, SurfaceCoords};

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Solar luminosity (W).
    pub const L_SUN: f64 = 3.839e26;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres unless stated otherwise.
    pub type Vector3 = [f64; 3];

    /// Row-major 3x3 matrix.
    pub type Matrix3 = [[f64; 3]; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`; the zero vector maps to itself.
    #[inline]
    pub fn unit(v: &Vector3) -> Vector3 {
        let n = norm(v);
        if n == 0.0 { *v } else { scale(v, 1.0 / n) }
    }

    /// Separation angle between two vectors in radians, in `[0, π]`.
    ///
    /// Zero-length inputs yield 0. Uses the half-angle form so nearly
    /// parallel and anti-parallel vectors keep full precision.
    pub fn separation(a: &Vector3, b: &Vector3) -> f64 {
        let ua = unit(a);
        let ub = unit(b);
        if norm(&ua) == 0.0 || norm(&ub) == 0.0 {
            return 0.0;
        }
        if dot(&ua, &ub) >= 0.0 {
            2.0 * (0.5 * norm(&sub(&ua, &ub))).asin()
        } else {
            std::f64::consts::PI - 2.0 * (0.5 * norm(&add(&ua, &ub))).asin()
        }
    }

    /// Matrix-vector product `m · v`.
    #[inline]
    pub fn mat_mul(m: &Matrix3, v: &Vector3) -> Vector3 {
        [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
    }
}
