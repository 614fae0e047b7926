#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The pipeline runs in two phases:
//!
//! 1. At startup a [`CameraModelBuilder`] reads a [`CalibrationSource`] into an immutable
//!    [`StereoGeometry`] (or [`StereoGeometry::from_camera_infos`] rebuilds it from exported
//!    records), and the rectification maps of both cameras are generated from it.
//! 2. A [`StereoSession`] then grabs side-by-side frames from a [`FrameSource`], splits them,
//!    rectifies both halves with a [`FrameRectifier`] and hands the images and the camera infos
//!    to a [`FramePublisher`].
//!
//! Any configuration or validation error of the first phase is returned before a single frame
//! is grabbed.

/// The key/value calibration store and its INI reader.
pub mod calibration;

/// Camera model builder reading the factory calibration fields.
pub mod builder;

/// The `CameraInfo` record of each camera.
pub mod camera_info;

/// Error types of the stereo pipeline.
pub mod error;

/// Image file frame source and directory publisher.
pub mod file;

/// Stereo geometry and per-camera models.
pub mod geometry;

/// Rectification map generation.
pub mod maps;

/// Per-frame rectification with preallocated buffers.
pub mod rectifier;

/// Resolution profiles of the camera.
pub mod resolution;

/// The per-frame loop.
pub mod session;

pub use crate::builder::CameraModelBuilder;
pub use crate::calibration::{CalibrationSource, KeyValueCalibration};
pub use crate::camera_info::{CameraInfo, StereoCameraInfos};
pub use crate::error::{AcquisitionError, ConfigError, StereoError, ValidationError};
pub use crate::geometry::{CameraModel, Eye, StereoGeometry};
pub use crate::maps::{generate_rectification_maps, RectificationMap, StereoRectificationMaps};
pub use crate::rectifier::FrameRectifier;
pub use crate::resolution::Resolution;
pub use crate::session::{
    FramePublisher, FrameSource, RateLimiter, SessionConfig, SessionStats, StereoFrame,
    StereoSession,
};
