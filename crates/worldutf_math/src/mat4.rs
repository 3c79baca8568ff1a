//! 4x4 Matrix utilities for 3D affine transforms
//!
//! Matrices are row-major (`m[row][col]`) and act on column vectors, so the
//! translation lives in the last column. This is also the order in which the
//! 16 components are written to a World UTF file.

use crate::{Quat, Vec3};

/// 4x4 matrix type (row-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a translation matrix
pub fn from_translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][3] = t.x;
    m[1][3] = t.y;
    m[2][3] = t.z;
    m
}

/// Create a rotation matrix from a quaternion
pub fn from_quat(q: Quat) -> Mat4 {
    q.to_matrix()
}

/// Compose translation, rotation and scale: `T * R * S`
///
/// This is how a host builds an object's local matrix from its location,
/// rotation and scale channels.
pub fn from_trs(t: Vec3, r: Quat, s: Vec3) -> Mat4 {
    let mut m = r.to_matrix();
    let scale = s.to_array();
    for row in m.iter_mut().take(3) {
        for (col, k) in scale.iter().enumerate() {
            row[col] *= k;
        }
    }
    m[0][3] = t.x;
    m[1][3] = t.y;
    m[2][3] = t.z;
    m
}

/// Multiply two 4x4 matrices: result = a * b
///
/// Applied to a vector, b acts first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }

    result
}

/// Transform a point by an affine matrix (implicit w = 1)
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Translation part of an affine matrix
pub fn translation(m: Mat4) -> Vec3 {
    Vec3::new(m[0][3], m[1][3], m[2][3])
}

/// The matrix with its translation column cleared
///
/// Keeps rotation and scale, the orientation part of an affine transform.
pub fn without_translation(m: Mat4) -> Mat4 {
    let mut r = m;
    r[0][3] = 0.0;
    r[1][3] = 0.0;
    r[2][3] = 0.0;
    r
}

/// Extract XYZ Euler angles (in degrees) from the rotation part of a matrix
///
/// The matrix is interpreted as `Rz * Ry * Rx`. Columns are normalized first
/// so scaled transforms still yield their pure rotation. When the Y rotation
/// is at the ±90° singularity the Z angle is folded into X and reported as 0.
pub fn euler_xyz_degrees(m: Mat4) -> Vec3 {
    let mut r = [[0.0f32; 3]; 3];
    for col in 0..3 {
        let len = (m[0][col] * m[0][col] + m[1][col] * m[1][col] + m[2][col] * m[2][col]).sqrt();
        let inv = if len > 0.0 { 1.0 / len } else { 0.0 };
        for row in 0..3 {
            r[row][col] = m[row][col] * inv;
        }
    }

    let cy = r[0][0].hypot(r[1][0]);
    let (x, y, z) = if cy > 16.0 * f32::EPSILON {
        (
            r[2][1].atan2(r[2][2]),
            (-r[2][0]).atan2(cy),
            r[1][0].atan2(r[0][0]),
        )
    } else {
        ((-r[1][2]).atan2(r[1][1]), (-r[2][0]).atan2(cy), 0.0)
    };

    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
