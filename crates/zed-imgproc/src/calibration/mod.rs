/// image distortion module.
pub mod distortion;

use zed_image::ImageSize;

/// Errors raised while generating undistort/rectify maps.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CalibrationError {
    /// The requested map size has a zero dimension.
    #[error("Invalid rectification map size {0}")]
    EmptyMapSize(ImageSize),

    /// The product of the new camera matrix and the rectification rotation is not invertible.
    #[error("The rectification transform is singular")]
    SingularTransform,
}

/// Represents the instrinsic parameters of a pinhole camera
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
}

impl CameraIntrinsic {
    /// The intrinsic matrix `K`, zero skew.
    ///
    /// ```text
    ///     [fx  0 cx]
    /// K = [ 0 fy cy]
    ///     [ 0  0  1]
    /// ```
    pub fn camera_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.fx, 0.0, self.cx],
            [0.0, self.fy, self.cy],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Read the focal lengths and principal point back from an intrinsic matrix.
    ///
    /// The skew term and the last row are ignored.
    pub fn from_camera_matrix(k: &[[f64; 3]; 3]) -> Self {
        Self {
            fx: k[0][0],
            fy: k[1][1],
            cx: k[0][2],
            cy: k[1][2],
        }
    }
}
