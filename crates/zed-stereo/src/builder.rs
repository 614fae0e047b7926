use zed_3d::transforms::rotation_vector_to_matrix;
use zed_imgproc::calibration::{distortion::PlumbBobDistortion, CameraIntrinsic};

use crate::calibration::CalibrationSource;
use crate::error::{ConfigError, StereoError};
use crate::geometry::{CameraModel, Eye, StereoGeometry};
use crate::resolution::Resolution;

/// Calibration files store the baseline in millimetres.
const MILLIMETERS_TO_METERS: f64 = 0.001;

/// Builds the [`StereoGeometry`] of one resolution profile from a calibration source.
///
/// The lookup keys are:
///
/// * `LEFT_CAM_<RES>.{cx,cy,fx,fy,k1,k2}` and the same for `RIGHT_CAM_<RES>`, required.
/// * `LEFT_CAM_<RES>.{k3,p1,p2}` and the same for `RIGHT_CAM_<RES>`, 0 when absent.
/// * `STEREO.RX_<RES>`, `STEREO.RY_<RES>` (or `STEREO.CV_<RES>`), `STEREO.RZ_<RES>`: the rotation
///   vector between the cameras, radians.
/// * `STEREO.BaseLine` or `STEREO.Baseline`: the baseline, millimetres.
///
/// Both cameras receive the same rectifying rotation. The left projection is `[K_left | 0]` and
/// the right one `[K_right | t]` with `t = (-fx_left * baseline, 0, 0)`.
///
/// # Examples
///
/// ```
/// use zed_stereo::{CameraModelBuilder, Eye, KeyValueCalibration, Resolution};
///
/// let mut calibration = KeyValueCalibration::new();
/// for cam in ["LEFT_CAM_HD", "RIGHT_CAM_HD"] {
///     for (field, value) in [("fx", 700.0), ("fy", 700.0), ("cx", 640.0), ("cy", 360.0), ("k1", 0.0), ("k2", 0.0)] {
///         calibration.insert(format!("{cam}.{field}"), value);
///     }
/// }
/// for key in ["RX_HD", "RY_HD", "RZ_HD"] {
///     calibration.insert(format!("STEREO.{key}"), 0.0);
/// }
/// calibration.insert("STEREO.Baseline", 120.0);
///
/// let geometry = CameraModelBuilder::new(&calibration, Resolution::Hd).build().unwrap();
/// assert_eq!(geometry.camera(Eye::Right).projection[0][3], -84.0);
/// ```
pub struct CameraModelBuilder<'a, S: CalibrationSource + ?Sized> {
    source: &'a S,
    resolution: Resolution,
}

impl<'a, S: CalibrationSource + ?Sized> CameraModelBuilder<'a, S> {
    /// Creates a builder reading `source` for the fields of `resolution`.
    pub fn new(source: &'a S, resolution: Resolution) -> Self {
        Self { source, resolution }
    }

    /// Reads the calibration and builds the geometry.
    ///
    /// # Errors
    ///
    /// * [`ConfigError`] when a required field or the baseline is missing or unparseable.
    /// * [`crate::ValidationError`] when a focal length is not positive or the baseline is
    ///   negative.
    pub fn build(&self) -> Result<StereoGeometry, StereoError> {
        let tag = self.resolution.tag();

        let baseline = self
            .source
            .lookup_first(&["STEREO.BaseLine", "STEREO.Baseline"])?
            .ok_or(ConfigError::BaselineNotFound)?
            * MILLIMETERS_TO_METERS;

        let rvec = [
            self.required(&format!("STEREO.RX_{tag}"))?,
            // factory files name the y component CV
            self.required_first(&format!("STEREO.RY_{tag}"), &format!("STEREO.CV_{tag}"))?,
            self.required(&format!("STEREO.RZ_{tag}"))?,
        ];
        let rotation = rotation_vector_to_matrix(&rvec);

        let (left_intrinsic, left_distortion) = self.read_camera(Eye::Left)?;
        let (right_intrinsic, right_distortion) = self.read_camera(Eye::Right)?;

        let left = CameraModel {
            intrinsic: left_intrinsic,
            distortion: left_distortion,
            rectification: rotation,
            projection: projection_matrix(&left_intrinsic, 0.0),
        };
        let right = CameraModel {
            intrinsic: right_intrinsic,
            distortion: right_distortion,
            rectification: rotation,
            projection: projection_matrix(&right_intrinsic, -left_intrinsic.fx * baseline),
        };

        log::debug!(
            "{} calibration: baseline {baseline} m, rotation vector {rvec:?}",
            self.resolution
        );

        Ok(StereoGeometry::new(self.resolution, baseline, left, right)?)
    }

    fn read_camera(&self, eye: Eye) -> Result<(CameraIntrinsic, PlumbBobDistortion), StereoError> {
        let section = match eye {
            Eye::Left => format!("LEFT_CAM_{}", self.resolution.tag()),
            Eye::Right => format!("RIGHT_CAM_{}", self.resolution.tag()),
        };
        let required = |field: &str| self.required(&format!("{section}.{field}"));
        let optional = |field: &str| -> Result<f64, ConfigError> {
            Ok(self
                .source
                .lookup(&format!("{section}.{field}"))?
                .unwrap_or(0.0))
        };

        let intrinsic = CameraIntrinsic {
            fx: required("fx")?,
            fy: required("fy")?,
            cx: required("cx")?,
            cy: required("cy")?,
        };
        let distortion = PlumbBobDistortion {
            k1: required("k1")?,
            k2: required("k2")?,
            k3: optional("k3")?,
            p1: optional("p1")?,
            p2: optional("p2")?,
        };

        log::debug!("{section}: {intrinsic:?} {distortion:?}");

        Ok((intrinsic, distortion))
    }

    fn required(&self, key: &str) -> Result<f64, ConfigError> {
        self.source
            .lookup(key)?
            .ok_or_else(|| self.missing_field(key))
    }

    fn required_first(&self, key: &str, fallback: &str) -> Result<f64, ConfigError> {
        self.source
            .lookup_first(&[key, fallback])?
            .ok_or_else(|| self.missing_field(key))
    }

    fn missing_field(&self, key: &str) -> ConfigError {
        ConfigError::MissingField {
            key: key.to_string(),
            resolution: self.resolution,
        }
    }
}

/// The projection matrix `[K | (tx, 0, 0)^T]` of a rectified camera.
pub fn projection_matrix(intrinsic: &CameraIntrinsic, tx: f64) -> [[f64; 4]; 3] {
    let k = intrinsic.camera_matrix();
    [
        [k[0][0], k[0][1], k[0][2], tx],
        [k[1][0], k[1][1], k[1][2], 0.0],
        [k[2][0], k[2][1], k[2][2], 0.0],
    ]
}
