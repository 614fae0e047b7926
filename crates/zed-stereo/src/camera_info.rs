use std::path::Path;

use serde::{Deserialize, Serialize};
use zed_3d::linalg::{flatten_row_major, from_row_major, is_rotation_matrix};
use zed_image::ImageSize;
use zed_imgproc::calibration::{distortion::PlumbBobDistortion, CameraIntrinsic};

use crate::error::{MatrixKind, StereoError, ValidationError};
use crate::geometry::{CameraModel, Eye, StereoGeometry};
use crate::resolution::Resolution;

/// The name of the plumb bob distortion model.
pub const PLUMB_BOB: &str = "plumb_bob";

/// Default frame id of the left camera.
pub const DEFAULT_LEFT_FRAME_ID: &str = "left_camera";

/// Default frame id of the right camera.
pub const DEFAULT_RIGHT_FRAME_ID: &str = "right_camera";

// tolerance on R^T R = I for rotations read back from text
const ROTATION_TOLERANCE: f64 = 1e-6;

/// The calibration record of one camera, laid out like a ROS `sensor_msgs/CameraInfo`.
///
/// All matrices are row-major. `d` holds the plumb bob coefficients in the order
/// `(k1, k2, p1, p2, k3)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// The coordinate frame of the camera.
    pub frame_id: String,
    /// Image width in pixels, one half of the side-by-side frame.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Always `plumb_bob`.
    pub distortion_model: String,
    /// Distortion coefficients.
    pub d: Vec<f64>,
    /// Intrinsic matrix, 3x3.
    pub k: Vec<f64>,
    /// Rectification matrix, 3x3.
    pub r: Vec<f64>,
    /// Projection matrix, 3x4.
    pub p: Vec<f64>,
}

impl CameraInfo {
    /// Returns the record with a different frame id.
    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    /// The image size described by the record.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Reads a record from a JSON file.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self, StereoError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Writes the record to a JSON file.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), StereoError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Decodes the camera model of the record.
    ///
    /// # Errors
    ///
    /// A matrix is unset or has the wrong length, or the distortion model is not plumb bob. `K`,
    /// `R` and `P` are unset when empty or all zeros; `D` only when empty.
    pub fn to_camera_model(&self, eye: Eye) -> Result<CameraModel, ValidationError> {
        if self.distortion_model != PLUMB_BOB {
            return Err(ValidationError::UnsupportedDistortionModel {
                camera: eye,
                model: self.distortion_model.clone(),
            });
        }

        let k: [f64; 9] = fixed(&self.k, eye, MatrixKind::K)?;
        let d: [f64; 5] = fixed(&self.d, eye, MatrixKind::D)?;
        let r: [f64; 9] = fixed(&self.r, eye, MatrixKind::R)?;
        let p: [f64; 12] = fixed(&self.p, eye, MatrixKind::P)?;

        Ok(CameraModel {
            intrinsic: CameraIntrinsic::from_camera_matrix(&from_row_major(&k)),
            distortion: PlumbBobDistortion {
                k1: d[0],
                k2: d[1],
                p1: d[2],
                p2: d[3],
                k3: d[4],
            },
            rectification: from_row_major(&r),
            projection: from_row_major(&p),
        })
    }
}

fn fixed<const N: usize>(
    values: &[f64],
    camera: Eye,
    matrix: MatrixKind,
) -> Result<[f64; N], ValidationError> {
    // an all-zero distortion vector is a distortion-free lens
    let all_zero = matrix != MatrixKind::D && values.iter().all(|v| *v == 0.0);
    if values.is_empty() || all_zero {
        return Err(ValidationError::MissingMatrix { camera, matrix });
    }

    values
        .try_into()
        .map_err(|_| ValidationError::MalformedMatrix {
            camera,
            matrix,
            len: values.len(),
            expected: N,
        })
}

/// The camera infos of both cameras.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoCameraInfos {
    /// The left camera.
    pub left: CameraInfo,
    /// The right camera.
    pub right: CameraInfo,
}

impl StereoCameraInfos {
    /// The record of one camera.
    pub fn get(&self, eye: Eye) -> &CameraInfo {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}

impl StereoGeometry {
    /// The camera info of one camera, with the default frame id.
    ///
    /// # Examples
    ///
    /// ```
    /// use zed_stereo::{CameraModelBuilder, Eye, KeyValueCalibration, Resolution};
    ///
    /// let mut calibration = KeyValueCalibration::new();
    /// for cam in ["LEFT_CAM_VGA", "RIGHT_CAM_VGA"] {
    ///     for (field, value) in [("fx", 350.0), ("fy", 350.0), ("cx", 336.0), ("cy", 188.0), ("k1", 0.0), ("k2", 0.0)] {
    ///         calibration.insert(format!("{cam}.{field}"), value);
    ///     }
    /// }
    /// for key in ["RX_VGA", "CV_VGA", "RZ_VGA"] {
    ///     calibration.insert(format!("STEREO.{key}"), 0.0);
    /// }
    /// calibration.insert("STEREO.BaseLine", 120.0);
    ///
    /// let geometry = CameraModelBuilder::new(&calibration, Resolution::Vga).build().unwrap();
    /// let info = geometry.camera_info(Eye::Right);
    /// assert_eq!((info.width, info.height), (672, 376));
    /// assert_eq!(info.distortion_model, "plumb_bob");
    /// assert_eq!(info.p[3], -42.0);
    /// ```
    pub fn camera_info(&self, eye: Eye) -> CameraInfo {
        let camera = self.camera(eye);
        let size = self.eye_size();
        let PlumbBobDistortion { k1, k2, k3, p1, p2 } = camera.distortion;
        let frame_id = match eye {
            Eye::Left => DEFAULT_LEFT_FRAME_ID,
            Eye::Right => DEFAULT_RIGHT_FRAME_ID,
        };

        CameraInfo {
            frame_id: frame_id.to_string(),
            width: size.width,
            height: size.height,
            distortion_model: PLUMB_BOB.to_string(),
            d: vec![k1, k2, p1, p2, k3],
            k: flatten_row_major::<3, 3, 9>(&camera.intrinsic.camera_matrix()).to_vec(),
            r: flatten_row_major::<3, 3, 9>(&camera.rectification).to_vec(),
            p: flatten_row_major::<3, 4, 12>(&camera.projection).to_vec(),
        }
    }

    /// The camera infos of both cameras with the given frame ids.
    pub fn camera_infos(&self, left_frame_id: &str, right_frame_id: &str) -> StereoCameraInfos {
        StereoCameraInfos {
            left: self.camera_info(Eye::Left).with_frame_id(left_frame_id),
            right: self.camera_info(Eye::Right).with_frame_id(right_frame_id),
        }
    }

    /// Rebuilds the geometry from two camera infos, e.g. previously exported ones.
    ///
    /// The baseline is recovered from the right projection as `-P[0][3] / fx_left`.
    ///
    /// # Errors
    ///
    /// * A record does not decode (see [`CameraInfo::to_camera_model`]).
    /// * A record's size differs from the per-camera size of `resolution`.
    /// * A rectification matrix is not a rotation.
    /// * A focal length is not positive or the baseline is negative.
    pub fn from_camera_infos(
        left: &CameraInfo,
        right: &CameraInfo,
        resolution: Resolution,
    ) -> Result<Self, ValidationError> {
        let expected = resolution.eye_size();
        let mut models = Vec::with_capacity(2);

        for (eye, info) in [(Eye::Left, left), (Eye::Right, right)] {
            if info.size() != expected {
                return Err(ValidationError::SizeMismatch {
                    camera: eye,
                    expected,
                    actual: info.size(),
                });
            }

            let model = info.to_camera_model(eye)?;
            model.validate(eye)?;
            if !is_rotation_matrix(&model.rectification, ROTATION_TOLERANCE) {
                return Err(ValidationError::NotARotation(eye));
            }
            models.push(model);
        }

        let (left, right) = (models[0], models[1]);
        let baseline = -right.projection[0][3] / left.intrinsic.fx;

        log::info!("loaded {resolution} calibration from camera infos, baseline {baseline} m");

        StereoGeometry::new(resolution, baseline, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::projection_matrix;
    use approx::assert_relative_eq;
    use zed_3d::{linalg::IDENTITY_33, transforms::rotation_vector_to_matrix};

    fn geometry() -> StereoGeometry {
        let left = CameraIntrinsic {
            fx: 700.0,
            fy: 701.0,
            cx: 640.0,
            cy: 360.0,
        };
        let right = CameraIntrinsic {
            fx: 699.0,
            fy: 698.0,
            cx: 641.0,
            cy: 359.0,
        };
        let rotation = rotation_vector_to_matrix(&[0.001, -0.004, 0.0007]);
        let distortion = PlumbBobDistortion {
            k1: -0.17,
            k2: 0.025,
            k3: 0.001,
            p1: 0.0004,
            p2: -0.0003,
        };
        StereoGeometry {
            resolution: Resolution::Hd,
            baseline: 0.12,
            left: CameraModel {
                intrinsic: left,
                distortion,
                rectification: rotation,
                projection: projection_matrix(&left, 0.0),
            },
            right: CameraModel {
                intrinsic: right,
                distortion,
                rectification: rotation,
                projection: projection_matrix(&right, -left.fx * 0.12),
            },
        }
    }

    #[test]
    fn camera_info_layout() {
        let geometry = geometry();
        let info = geometry.camera_info(Eye::Right);

        assert_eq!(info.frame_id, DEFAULT_RIGHT_FRAME_ID);
        assert_eq!((info.width, info.height), (1280, 720));
        assert_eq!(info.distortion_model, PLUMB_BOB);
        assert_eq!(info.d, vec![-0.17, 0.025, 0.0004, -0.0003, 0.001]);
        assert_eq!(
            info.k,
            vec![699.0, 0.0, 641.0, 0.0, 698.0, 359.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(info.r.len(), 9);
        assert_eq!(info.p.len(), 12);
        assert_eq!(info.p[3], -700.0 * 0.12);
        assert_eq!(info.p[7], 0.0);
        assert_eq!(info.p[11], 0.0);
        assert_eq!(geometry.camera_info(Eye::Left).p[3], 0.0);
    }

    #[test]
    fn frame_ids() {
        let infos = geometry().camera_infos("zed_left", "zed_right");
        assert_eq!(infos.get(Eye::Left).frame_id, "zed_left");
        assert_eq!(infos.get(Eye::Right).frame_id, "zed_right");
    }

    #[test]
    fn rebuild_from_camera_infos() -> Result<(), ValidationError> {
        let geometry = geometry();
        let rebuilt = StereoGeometry::from_camera_infos(
            &geometry.camera_info(Eye::Left),
            &geometry.camera_info(Eye::Right),
            Resolution::Hd,
        )?;

        assert_relative_eq!(rebuilt.baseline(), 0.12, epsilon = 1e-12);
        for eye in Eye::BOTH {
            assert_eq!(rebuilt.camera(eye), geometry.camera(eye));
        }
        Ok(())
    }

    #[test]
    fn json_roundtrip_on_disk() -> Result<(), StereoError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("left.json");

        let info = geometry().camera_info(Eye::Left);
        info.write_json(&path)?;
        assert_eq!(CameraInfo::read_json(&path)?, info);
        Ok(())
    }

    #[test]
    fn unset_matrices() {
        let info = geometry().camera_info(Eye::Left);

        let mut empty_k = info.clone();
        empty_k.k.clear();
        assert_eq!(
            empty_k.to_camera_model(Eye::Left),
            Err(ValidationError::MissingMatrix {
                camera: Eye::Left,
                matrix: MatrixKind::K
            })
        );

        let mut zero_p = info.clone();
        zero_p.p = vec![0.0; 12];
        assert_eq!(
            zero_p.to_camera_model(Eye::Right),
            Err(ValidationError::MissingMatrix {
                camera: Eye::Right,
                matrix: MatrixKind::P
            })
        );

        let mut short_r = info.clone();
        short_r.r = vec![1.0; 4];
        assert_eq!(
            short_r.to_camera_model(Eye::Left),
            Err(ValidationError::MalformedMatrix {
                camera: Eye::Left,
                matrix: MatrixKind::R,
                len: 4,
                expected: 9
            })
        );

        // zero distortion is valid, missing distortion is not
        let mut zero_d = info.clone();
        zero_d.d = vec![0.0; 5];
        assert!(zero_d.to_camera_model(Eye::Left).is_ok());
        zero_d.d.clear();
        assert!(matches!(
            zero_d.to_camera_model(Eye::Left),
            Err(ValidationError::MissingMatrix {
                matrix: MatrixKind::D,
                ..
            })
        ));
    }

    #[test]
    fn rejects_other_distortion_models() {
        let mut info = geometry().camera_info(Eye::Left);
        info.distortion_model = "rational_polynomial".to_string();
        assert!(matches!(
            info.to_camera_model(Eye::Left),
            Err(ValidationError::UnsupportedDistortionModel { .. })
        ));
    }

    #[test]
    fn from_camera_infos_checks_size_and_rotation() {
        let geometry = geometry();
        let left = geometry.camera_info(Eye::Left);
        let right = geometry.camera_info(Eye::Right);

        assert!(matches!(
            StereoGeometry::from_camera_infos(&left, &right, Resolution::Vga),
            Err(ValidationError::SizeMismatch {
                camera: Eye::Left,
                ..
            })
        ));

        let mut scaled = right.clone();
        scaled.r = flatten_row_major::<3, 3, 9>(&IDENTITY_33)
            .iter()
            .map(|v| v * 2.0)
            .collect();
        assert_eq!(
            StereoGeometry::from_camera_infos(&left, &scaled, Resolution::Hd),
            Err(ValidationError::NotARotation(Eye::Right))
        );
    }
}
