/// The 3x3 identity matrix.
pub const IDENTITY_33: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Multiply two 3x3 matrices.
///
/// Example:
///
/// ```
/// use zed_3d::linalg::{matmul33, IDENTITY_33};
///
/// let a = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
/// assert_eq!(matmul33(&a, &IDENTITY_33), a);
/// ```
pub fn matmul33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Multiply a 3x3 matrix by a column vector.
pub fn mat33_mul_vec3(a: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        a[0][0] * v[0] + a[0][1] * v[1] + a[0][2] * v[2],
        a[1][0] * v[0] + a[1][1] * v[1] + a[1][2] * v[2],
        a[2][0] * v[0] + a[2][1] * v[1] + a[2][2] * v[2],
    ]
}

/// Transpose a 3x3 matrix.
pub fn transpose33(a: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [a[0][0], a[1][0], a[2][0]],
        [a[0][1], a[1][1], a[2][1]],
        [a[0][2], a[1][2], a[2][2]],
    ]
}

/// Determinant of a 3x3 matrix.
pub fn det33(a: &[[f64; 3]; 3]) -> f64 {
    a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
}

/// Invert a 3x3 matrix through its adjugate.
///
/// Returns `None` when the matrix is singular, i.e. `|det| <= f64::EPSILON`.
///
/// Example:
///
/// ```
/// use zed_3d::linalg::inverse33;
///
/// let k = [[700.0, 0.0, 640.0], [0.0, 700.0, 360.0], [0.0, 0.0, 1.0]];
/// let k_inv = inverse33(&k).unwrap();
/// assert!((k_inv[0][0] - 1.0 / 700.0).abs() < 1e-15);
/// assert!(inverse33(&[[0.0; 3]; 3]).is_none());
/// ```
pub fn inverse33(a: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let det = det33(a);
    if det.abs() <= f64::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    Some([
        [
            (a[1][1] * a[2][2] - a[1][2] * a[2][1]) * inv_det,
            (a[0][2] * a[2][1] - a[0][1] * a[2][2]) * inv_det,
            (a[0][1] * a[1][2] - a[0][2] * a[1][1]) * inv_det,
        ],
        [
            (a[1][2] * a[2][0] - a[1][0] * a[2][2]) * inv_det,
            (a[0][0] * a[2][2] - a[0][2] * a[2][0]) * inv_det,
            (a[0][2] * a[1][0] - a[0][0] * a[1][2]) * inv_det,
        ],
        [
            (a[1][0] * a[2][1] - a[1][1] * a[2][0]) * inv_det,
            (a[0][1] * a[2][0] - a[0][0] * a[2][1]) * inv_det,
            (a[0][0] * a[1][1] - a[0][1] * a[1][0]) * inv_det,
        ],
    ])
}

/// Check that a matrix is a proper rotation: `R^T R = I` and `det(R) = 1` within `tolerance`.
pub fn is_rotation_matrix(r: &[[f64; 3]; 3], tolerance: f64) -> bool {
    let rtr = matmul33(&transpose33(r), r);
    let orthonormal = rtr
        .iter()
        .flatten()
        .zip(IDENTITY_33.iter().flatten())
        .all(|(a, b)| (a - b).abs() <= tolerance);

    orthonormal && (det33(r) - 1.0).abs() <= tolerance
}

/// The leading 3x3 block of a 3x4 matrix.
pub fn leading_block33(p: &[[f64; 4]; 3]) -> [[f64; 3]; 3] {
    [
        [p[0][0], p[0][1], p[0][2]],
        [p[1][0], p[1][1], p[1][2]],
        [p[2][0], p[2][1], p[2][2]],
    ]
}

/// Flatten a matrix into a row-major array.
///
/// Example:
///
/// ```
/// use zed_3d::linalg::flatten_row_major;
///
/// let m = [[1.0, 2.0], [3.0, 4.0]];
/// assert_eq!(flatten_row_major::<2, 2, 4>(&m), [1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn flatten_row_major<const R: usize, const C: usize, const RC: usize>(
    m: &[[f64; C]; R],
) -> [f64; RC] {
    debug_assert_eq!(R * C, RC);
    let mut out = [0.0; RC];
    for (dst, src) in out.iter_mut().zip(m.iter().flatten()) {
        *dst = *src;
    }
    out
}

/// Build a matrix from a row-major array.
pub fn from_row_major<const R: usize, const C: usize, const RC: usize>(
    data: &[f64; RC],
) -> [[f64; C]; R] {
    debug_assert_eq!(R * C, RC);
    let mut out = [[0.0; C]; R];
    for (dst, src) in out.iter_mut().flatten().zip(data.iter()) {
        *dst = *src;
    }
    out
}
