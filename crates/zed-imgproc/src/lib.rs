#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// camera models and undistort/rectify map generation.
pub mod calibration;

/// horizontal image concatenation.
pub mod concat;

/// image cropping module.
pub mod crop;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;
