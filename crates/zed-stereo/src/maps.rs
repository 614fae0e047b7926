use zed_image::ImageSize;
use zed_imgproc::calibration::{distortion::generate_correction_map_plumb_bob, CalibrationError};
use zed_tensor::Tensor2;

use crate::camera_info::{CameraInfo, StereoCameraInfos};
use crate::error::ValidationError;
use crate::geometry::{CameraModel, Eye, StereoGeometry};

/// The undistort and rectify lookup table of one camera.
///
/// Rectified pixel `(u, v)` samples the captured image at `(map_x[v][u], map_y[v][u])`.
#[derive(Debug, Clone, PartialEq)]
pub struct RectificationMap {
    /// Source x coordinates, shape `[height, width]`.
    pub map_x: Tensor2<f32>,
    /// Source y coordinates, shape `[height, width]`.
    pub map_y: Tensor2<f32>,
}

impl RectificationMap {
    /// The size of the rectified image.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.map_x.shape[1],
            height: self.map_x.shape[0],
        }
    }
}

/// The rectification maps of both cameras.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoRectificationMaps {
    pub(crate) left: RectificationMap,
    pub(crate) right: RectificationMap,
}

impl StereoRectificationMaps {
    /// The map of one camera.
    pub fn get(&self, eye: Eye) -> &RectificationMap {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}

/// Generates the rectification maps of both cameras from their camera infos.
///
/// Every matrix of both records is checked before any map is computed, so a failure never
/// leaves one camera rectified and the other not.
///
/// # Errors
///
/// * One of the eight matrices (`K`, `D`, `R`, `P` per camera) is unset or malformed.
/// * A record has a zero width or height.
/// * `P33 * R` is singular for a camera.
pub fn generate_rectification_maps(
    infos: &StereoCameraInfos,
) -> Result<StereoRectificationMaps, ValidationError> {
    let left = infos.left.to_camera_model(Eye::Left)?;
    let right = infos.right.to_camera_model(Eye::Right)?;

    for (eye, info) in [(Eye::Left, &infos.left), (Eye::Right, &infos.right)] {
        if info.size().is_empty() {
            return Err(ValidationError::ZeroDimension {
                camera: eye,
                size: info.size(),
            });
        }
    }

    Ok(StereoRectificationMaps {
        left: generate_map(Eye::Left, &left, &infos.left)?,
        right: generate_map(Eye::Right, &right, &infos.right)?,
    })
}

fn generate_map(
    eye: Eye,
    model: &CameraModel,
    info: &CameraInfo,
) -> Result<RectificationMap, ValidationError> {
    let size = info.size();
    let (map_x, map_y) = generate_correction_map_plumb_bob(
        &model.intrinsic,
        &model.distortion,
        &model.rectification,
        &model.rectified_camera_matrix(),
        &size,
    )
    .map_err(|err| match err {
        CalibrationError::EmptyMapSize(size) => ValidationError::ZeroDimension { camera: eye, size },
        CalibrationError::SingularTransform => ValidationError::SingularTransform(eye),
    })?;

    log::info!("generated {size} rectification map for the {eye} camera");

    Ok(RectificationMap { map_x, map_y })
}

impl StereoGeometry {
    /// Generates the rectification maps of both cameras.
    ///
    /// Equivalent to [`generate_rectification_maps`] on the camera infos of the geometry.
    pub fn rectification_maps(&self) -> Result<StereoRectificationMaps, ValidationError> {
        generate_rectification_maps(&StereoCameraInfos {
            left: self.camera_info(Eye::Left),
            right: self.camera_info(Eye::Right),
        })
    }
}
