use zed_3d::linalg::leading_block33;
use zed_image::ImageSize;
use zed_imgproc::calibration::{distortion::PlumbBobDistortion, CameraIntrinsic};

use crate::error::ValidationError;
use crate::resolution::Resolution;

/// One of the two cameras of the stereo pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    /// The left camera, left half of the side-by-side frame.
    Left,
    /// The right camera, right half of the side-by-side frame.
    Right,
}

impl Eye {
    /// Both cameras, left first.
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Lower case name of the camera.
    pub fn as_str(&self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The pinhole, plumb bob, rectification and projection model of one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraModel {
    /// Focal lengths and principal point.
    pub intrinsic: CameraIntrinsic,
    /// Lens distortion.
    pub distortion: PlumbBobDistortion,
    /// Rectifying rotation `R`.
    pub rectification: [[f64; 3]; 3],
    /// Projection matrix `P` of the rectified camera.
    pub projection: [[f64; 4]; 3],
}

impl CameraModel {
    /// The camera matrix of the rectified image, the leading 3x3 block of `P`.
    pub fn rectified_camera_matrix(&self) -> [[f64; 3]; 3] {
        leading_block33(&self.projection)
    }

    pub(crate) fn validate(&self, eye: Eye) -> Result<(), ValidationError> {
        let CameraIntrinsic { fx, fy, .. } = self.intrinsic;
        if !(fx.is_finite() && fy.is_finite()) || fx <= 0.0 || fy <= 0.0 {
            return Err(ValidationError::NonPositiveFocalLength {
                camera: eye,
                fx,
                fy,
            });
        }
        Ok(())
    }
}

/// The complete calibration state of the stereo pair.
///
/// Built once at startup by [`crate::CameraModelBuilder`] or
/// [`StereoGeometry::from_camera_infos`] and never mutated afterwards; the per-frame path only
/// borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoGeometry {
    pub(crate) resolution: Resolution,
    pub(crate) baseline: f64,
    pub(crate) left: CameraModel,
    pub(crate) right: CameraModel,
}

impl StereoGeometry {
    pub(crate) fn new(
        resolution: Resolution,
        baseline: f64,
        left: CameraModel,
        right: CameraModel,
    ) -> Result<Self, ValidationError> {
        left.validate(Eye::Left)?;
        right.validate(Eye::Right)?;

        if !baseline.is_finite() || baseline < 0.0 {
            return Err(ValidationError::NegativeBaseline(baseline));
        }

        Ok(Self {
            resolution,
            baseline,
            left,
            right,
        })
    }

    /// The resolution profile the geometry was built for.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// The size of one camera image, half the side-by-side frame.
    pub fn eye_size(&self) -> ImageSize {
        self.resolution.eye_size()
    }

    /// The distance between the optical centers, in meters.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// The model of one camera.
    pub fn camera(&self, eye: Eye) -> &CameraModel {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zed_3d::linalg::IDENTITY_33;

    fn model(fx: f64, fy: f64) -> CameraModel {
        let intrinsic = CameraIntrinsic {
            fx,
            fy,
            cx: 640.0,
            cy: 360.0,
        };
        let k = intrinsic.camera_matrix();
        CameraModel {
            intrinsic,
            distortion: PlumbBobDistortion::default(),
            rectification: IDENTITY_33,
            projection: [
                [k[0][0], k[0][1], k[0][2], 0.0],
                [k[1][0], k[1][1], k[1][2], 0.0],
                [k[2][0], k[2][1], k[2][2], 0.0],
            ],
        }
    }

    #[test]
    fn validates_focal_lengths() {
        for (fx, fy) in [(0.0, 700.0), (700.0, -1.0), (f64::NAN, 700.0), (f64::INFINITY, 1.0)] {
            let res = StereoGeometry::new(Resolution::Hd, 0.12, model(700.0, 700.0), model(fx, fy));
            assert!(matches!(
                res,
                Err(ValidationError::NonPositiveFocalLength {
                    camera: Eye::Right,
                    ..
                })
            ));
        }
    }

    #[test]
    fn validates_baseline() {
        let res = StereoGeometry::new(Resolution::Hd, -0.01, model(1.0, 1.0), model(1.0, 1.0));
        assert_eq!(res, Err(ValidationError::NegativeBaseline(-0.01)));

        let res = StereoGeometry::new(Resolution::Hd, 0.0, model(1.0, 1.0), model(1.0, 1.0));
        assert!(res.is_ok());
    }

    #[test]
    fn rectified_camera_matrix_is_leading_block() {
        let m = model(700.0, 710.0);
        assert_eq!(m.rectified_camera_matrix(), m.intrinsic.camera_matrix());
        assert_eq!(Eye::Right.to_string(), "right");
    }
}
