use super::{CalibrationError, CameraIntrinsic};
use crate::interpolation::grid::meshgrid_from_fn;
use zed_3d::linalg::{inverse33, matmul33};
use zed_image::ImageSize;
use zed_tensor::Tensor2;

/// Map coordinates closer than this to a whole pixel are stored as that pixel.
const PIXEL_SNAP_EPSILON: f64 = 1e-6;

/// Round `value` to the nearest whole pixel when it only differs by accumulated rounding error.
fn snap_to_pixel(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < PIXEL_SNAP_EPSILON {
        rounded
    } else {
        value
    }
}

/// Represents the plumb bob distortion parameters of a camera
///
/// Three radial and two tangential coefficients (Brown-Conrady).
///
/// # Fields
///
/// * `k1` - The first radial distortion coefficient
/// * `k2` - The second radial distortion coefficient
/// * `k3` - The third radial distortion coefficient
/// * `p1` - The first tangential distortion coefficient
/// * `p2` - The second tangential distortion coefficient
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlumbBobDistortion {
    /// The first radial distortion coefficient
    pub k1: f64,
    /// The second radial distortion coefficient
    pub k2: f64,
    /// The third radial distortion coefficient
    pub k3: f64,
    /// The first tangential distortion coefficient
    pub p1: f64,
    /// The second tangential distortion coefficient
    pub p2: f64,
}

/// Distort a normalized image point with the plumb bob model
///
/// # Arguments
///
/// * `x` - The normalized x coordinate of the point
/// * `y` - The normalized y coordinate of the point
/// * `distortion` - The distortion parameters of the camera
///
/// # Returns
///
/// The distorted normalized coordinates `(xd, yd)`.
pub fn distort_point_plumb_bob(x: f64, y: f64, distortion: &PlumbBobDistortion) -> (f64, f64) {
    let PlumbBobDistortion { k1, k2, k3, p1, p2 } = *distortion;

    // calculate the radial distance
    let r2 = x * x + y * y;

    // radial distortion
    let kr = 1.0 + k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2;

    // tangential distortion
    let xd = x * kr + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
    let yd = y * kr + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;

    (xd, yd)
}

/// Generate the undistort and rectify map for a plumb bob distortion model
///
/// For every pixel `(u, v)` of the rectified output, the ray `inv(new_camera_matrix * R) [u v 1]^T`
/// is normalized, distorted, and projected with the original intrinsics. The result is the
/// location in the captured image to sample from.
///
/// # Arguments
///
/// * `intrinsic` - The intrinsic parameters of the camera
/// * `distortion` - The distortion parameters of the camera
/// * `rectification` - The rectifying rotation `R` of the camera
/// * `new_camera_matrix` - The camera matrix of the rectified image, usually the leading 3x3
///   block of the projection matrix
/// * `size` - The size of the rectified image
///
/// # Returns
///
/// * `map_x` - The x map for undistorting and rectifying the image
/// * `map_y` - The y map for undistorting and rectifying the image
///
/// # Errors
///
/// * `size` has a zero dimension.
/// * `new_camera_matrix * R` is singular.
pub fn generate_correction_map_plumb_bob(
    intrinsic: &CameraIntrinsic,
    distortion: &PlumbBobDistortion,
    rectification: &[[f64; 3]; 3],
    new_camera_matrix: &[[f64; 3]; 3],
    size: &ImageSize,
) -> Result<(Tensor2<f32>, Tensor2<f32>), CalibrationError> {
    if size.is_empty() {
        return Err(CalibrationError::EmptyMapSize(*size));
    }

    // back-projection from rectified pixels into the unrectified camera frame
    let ir = inverse33(&matmul33(new_camera_matrix, rectification))
        .ok_or(CalibrationError::SingularTransform)?;

    let (fx, fy, cx, cy) = (intrinsic.fx, intrinsic.fy, intrinsic.cx, intrinsic.cy);

    let (map_x, map_y) = meshgrid_from_fn(size.width, size.height, |u, v| {
        let (u, v) = (u as f64, v as f64);
        let x = ir[0][0] * u + ir[0][1] * v + ir[0][2];
        let y = ir[1][0] * u + ir[1][1] * v + ir[1][2];
        let w = ir[2][0] * u + ir[2][1] * v + ir[2][2];

        // rays parallel to the image plane never hit the sensor
        if w.abs() <= f64::EPSILON {
            return (-1.0, -1.0);
        }

        let (xd, yd) = distort_point_plumb_bob(x / w, y / w, distortion);

        (
            snap_to_pixel(fx * xd + cx) as f32,
            snap_to_pixel(fy * yd + cy) as f32,
        )
    });

    Ok((map_x, map_y))
}
