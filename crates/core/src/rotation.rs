//! Axis-angle rotations for tilting surface normals.

use crate::vector::{self, Matrix3, Vector3};

/// Rotation matrix for a right-handed rotation of `angle` radians about `axis`.
///
/// Built with Rodrigues' formula `R = ddᵀ + cos(a)(I − ddᵀ) + sin(a)·[d]ₓ`
/// where `d` is `axis` normalized. A zero axis yields the identity scaled by
/// `cos(angle)`, so callers should pass a non-degenerate axis.
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix3 {
    let d = vector::unit(axis);
    let (sin_a, cos_a) = angle.sin_cos();
    let skew = skew_symmetric(&d);

    let mut m = [[0.0; 3]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            let outer = d[i] * d[j];
            let identity = if i == j { 1.0 } else { 0.0 };
            *value = outer + cos_a * (identity - outer) + sin_a * skew[i][j];
        }
    }
    m
}

/// Rotate `v` by `angle` radians about `axis`.
pub fn rotate(v: &Vector3, axis: &Vector3, angle: f64) -> Vector3 {
    vector::mat_mul(&rotation_matrix(axis, angle), v)
}

/// Cross-product matrix: `skew(d) · v == d × v`.
pub fn skew_symmetric(d: &Vector3) -> Matrix3 {
    [
        [0.0, -d[2], d[1]],
        [d[2], 0.0, -d[0]],
        [-d[1], d[0], 0.0],
    ]
}
