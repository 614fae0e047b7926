use crate::parallel;

use super::interpolate::interpolate_pixel;
use super::InterpolationMode;
use zed_image::{Image, ImageDtype, ImageError};
use zed_tensor::Tensor2;

/// Apply generic geometric transformation to an image.
///
/// Every destination pixel `(u, v)` samples `src` at `(map_x[v][u], map_y[v][u])`. Coordinates
/// that fall outside the source image produce the border value `T::default()` (black) in all
/// channels.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// * The mapx and mapy must have the same size.
/// * The output image must have the same size as the mapx and mapy.
pub fn remap<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    map_x: &Tensor2<f32>,
    map_y: &Tensor2<f32>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if map_x.shape != map_y.shape {
        return Err(ImageError::InvalidImageSize(
            map_x.shape[1],
            map_x.shape[0],
            map_y.shape[1],
            map_y.shape[0],
        ));
    }

    if dst.shape[0..2] != map_x.shape {
        return Err(ImageError::InvalidImageSize(
            dst.cols(),
            dst.rows(),
            map_x.shape[1],
            map_x.shape[0],
        ));
    }

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        match interpolate_pixel(src, x, y, interpolation) {
            Some(pixel) => dst_pixel
                .iter_mut()
                .zip(pixel.iter())
                .for_each(|(d, &p)| *d = T::from_f32(p)),
            None => dst_pixel.fill(T::default()),
        }
    });

    Ok(())
}
