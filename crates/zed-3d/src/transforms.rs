use crate::linalg::IDENTITY_33;

/// Rotation angles below this magnitude are treated as no rotation.
const ANGLE_EPSILON: f64 = 1e-12;

/// The skew-symmetric cross-product matrix `[v]x` of a vector, such that `[v]x w = v x w`.
pub fn skew_symmetric(v: &[f64; 3]) -> [[f64; 3]; 3] {
    [[0.0, -v[2], v[1]], [v[2], 0.0, -v[0]], [-v[1], v[0], 0.0]]
}

/// Compute the rotation matrix from a rotation vector (Rodrigues formula).
///
/// The rotation vector encodes the axis as its direction and the angle (radians) as its norm.
/// With `theta = |v|` and `n = v / theta`:
///
/// `R = cos(theta) I + (1 - cos(theta)) n n^T + sin(theta) [n]x`
///
/// A numerically zero vector gives the identity.
///
/// Example:
///
/// ```
/// use zed_3d::transforms::rotation_vector_to_matrix;
///
/// let r = rotation_vector_to_matrix(&[std::f64::consts::FRAC_PI_2, 0.0, 0.0]);
/// assert!((r[1][2] + 1.0).abs() < 1e-12);
/// assert!((r[2][1] - 1.0).abs() < 1e-12);
///
/// assert_eq!(rotation_vector_to_matrix(&[0.0, 0.0, 0.0])[0], [1.0, 0.0, 0.0]);
/// ```
pub fn rotation_vector_to_matrix(rvec: &[f64; 3]) -> [[f64; 3]; 3] {
    let theta = (rvec[0].powi(2) + rvec[1].powi(2) + rvec[2].powi(2)).sqrt();
    if theta < ANGLE_EPSILON {
        return IDENTITY_33;
    }

    let n = [rvec[0] / theta, rvec[1] / theta, rvec[2] / theta];
    let c = theta.cos();
    let s = theta.sin();
    let t = 1.0 - c;
    let n_x = skew_symmetric(&n);

    let mut rotation = [[0.0; 3]; 3];
    for (i, row) in rotation.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = c * IDENTITY_33[i][j] + t * n[i] * n[j] + s * n_x[i][j];
        }
    }

    rotation
}
