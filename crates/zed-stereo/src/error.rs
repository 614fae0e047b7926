use std::path::PathBuf;

use zed_image::ImageSize;

use crate::geometry::Eye;
use crate::resolution::Resolution;

/// Errors raised while reading the calibration or the node configuration.
///
/// All of them are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required calibration field is absent for the selected resolution.
    #[error("Calibration field {key} is missing for resolution {resolution}")]
    MissingField {
        /// The full lookup key, e.g. `LEFT_CAM_HD.fx`.
        key: String,
        /// The resolution profile being loaded.
        resolution: Resolution,
    },

    /// Neither `STEREO.BaseLine` nor `STEREO.Baseline` is present.
    #[error("Baseline parameter not found")]
    BaselineNotFound,

    /// The resolution selector is not one of the supported profiles.
    #[error("Invalid resolution {0}, expected 0 (2K), 1 (FHD), 2 (HD) or 3 (VGA)")]
    InvalidResolution(String),

    /// A calibration value cannot be parsed as a number.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// The full lookup key.
        key: String,
        /// The raw text found in the calibration source.
        value: String,
    },

    /// A line of a calibration file is neither a section, a comment nor a `key = value` pair.
    #[error("Malformed calibration line {line}: {content:?}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The frame rate is not a finite positive number.
    #[error("Invalid frame rate {0}, must be greater than zero")]
    InvalidFrameRate(f64),

    /// A calibration file cannot be read.
    #[error("Failed to read calibration file {path}. {source}")]
    ReadFile {
        /// The path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// The camera model matrices checked before building rectification maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Intrinsic matrix `K`.
    K,
    /// Distortion coefficients `D`.
    D,
    /// Rectification rotation `R`.
    R,
    /// Projection matrix `P`.
    P,
}

impl std::fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            MatrixKind::K => "K",
            MatrixKind::D => "D",
            MatrixKind::R => "R",
            MatrixKind::P => "P",
        };
        write!(f, "{name}")
    }
}

/// Errors raised when the calibration values are internally inconsistent.
///
/// All of them are fatal: no map is generated and no frame is rectified.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    /// A matrix of the camera model is empty or all zeros.
    #[error("Calibration matrix {matrix} of the {camera} camera is missing")]
    MissingMatrix {
        /// The camera owning the matrix.
        camera: Eye,
        /// The missing matrix.
        matrix: MatrixKind,
    },

    /// A matrix of the camera model has the wrong number of entries.
    #[error("Calibration matrix {matrix} of the {camera} camera has {len} entries, expected {expected}")]
    MalformedMatrix {
        /// The camera owning the matrix.
        camera: Eye,
        /// The malformed matrix.
        matrix: MatrixKind,
        /// The number of entries found.
        len: usize,
        /// The number of entries required.
        expected: usize,
    },

    /// The camera info uses a distortion model other than plumb bob.
    #[error("Unsupported distortion model {model:?} for the {camera} camera")]
    UnsupportedDistortionModel {
        /// The offending camera.
        camera: Eye,
        /// The distortion model found.
        model: String,
    },

    /// The requested output size has a zero dimension.
    #[error("Invalid output size {size} for the {camera} camera")]
    ZeroDimension {
        /// The camera the map is generated for.
        camera: Eye,
        /// The requested size.
        size: ImageSize,
    },

    /// The camera size does not match the resolution profile.
    #[error("The {camera} camera is {actual}, the resolution profile expects {expected}")]
    SizeMismatch {
        /// The offending camera.
        camera: Eye,
        /// The per-camera size of the profile.
        expected: ImageSize,
        /// The size found.
        actual: ImageSize,
    },

    /// A focal length is zero, negative or not finite.
    #[error("Non-positive focal length fx={fx} fy={fy} for the {camera} camera")]
    NonPositiveFocalLength {
        /// The offending camera.
        camera: Eye,
        /// Focal length along x.
        fx: f64,
        /// Focal length along y.
        fy: f64,
    },

    /// The baseline is negative or not finite.
    #[error("Negative baseline {0} m")]
    NegativeBaseline(f64),

    /// The rectification matrix is not a proper rotation.
    #[error("The rectification matrix of the {0} camera is not a rotation")]
    NotARotation(Eye),

    /// `P33 * R` cannot be inverted.
    #[error("The rectification transform of the {0} camera is singular")]
    SingularTransform(Eye),
}

/// A frame could not be acquired. Non-fatal: the session skips the iteration.
#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    /// The device or source produced no frame.
    #[error("No frame available. {0}")]
    FrameUnavailable(String),

    /// The frame does not have the size of the selected resolution profile.
    #[error("Frame size {actual} does not match the expected {expected}")]
    FrameSize {
        /// The full side-by-side size of the profile.
        expected: ImageSize,
        /// The size of the captured frame.
        actual: ImageSize,
    },

    /// The frame could not be read from disk.
    #[error("Failed to read frame. {0}")]
    Io(#[from] zed_io::IoError),

    /// The source has no more frames and will never produce one again.
    #[error("End of stream")]
    EndOfStream,
}

/// The umbrella error of the stereo pipeline.
#[derive(thiserror::Error, Debug)]
pub enum StereoError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Inconsistent calibration.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failed frame acquisition.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Image buffer error.
    #[error(transparent)]
    Image(#[from] zed_image::ImageError),

    /// Image file error.
    #[error(transparent)]
    Io(#[from] zed_io::IoError),

    /// Camera info (de)serialization error.
    #[error("Failed to (de)serialize the camera info. {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("Failed to manipulate the file. {0}")]
    File(#[from] std::io::Error),
}
