use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use zed_image::{Image, ImageDtype};

/// Coordinates this close outside the image are sampled from the nearest edge pixel.
const BORDER_EPSILON: f32 = 1e-3;

/// Interpolation mode for resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel, or `None` when `(u, v)` lies outside the image (or is not finite).
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> Option<[f32; C]> {
    let (rows, cols) = (image.rows(), image.cols());
    if rows == 0 || cols == 0 {
        return None;
    }

    let (max_u, max_v) = ((cols - 1) as f32, (rows - 1) as f32);

    // NOTE: every comparison is false for NaN, so non-finite coordinates fall outside
    let inside = u >= -BORDER_EPSILON
        && v >= -BORDER_EPSILON
        && u <= max_u + BORDER_EPSILON
        && v <= max_v + BORDER_EPSILON;
    if !inside {
        return None;
    }

    let (u, v) = (u.clamp(0.0, max_u), v.clamp(0.0, max_v));

    Some(match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    })
}
