use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use zed_image::{Image, ImageError};

/// Crop an image to a specified region.
///
/// The region has the size of `dst` and its top-left corner at `(x, y)` in `src`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// The region does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use zed_image::{Image, ImageSize};
/// use zed_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8);
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            x + dst.cols(),
            y + dst.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Split a side-by-side stereo frame into its left and right halves.
///
/// Both halves are `src.cols() / 2` wide; with an odd width the last column is dropped.
///
/// # Errors
///
/// The halves do not have the size `(src.cols() / 2, src.rows())`.
pub fn split_side_by_side<T, const C: usize>(
    src: &Image<T, C>,
    left: &mut Image<T, C>,
    right: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let half_cols = src.cols() / 2;
    for half in [&*left, &*right] {
        if half.cols() != half_cols || half.rows() != src.rows() {
            return Err(ImageError::InvalidImageSize(
                half_cols,
                src.rows(),
                half.cols(),
                half.rows(),
            ));
        }
    }

    crop_image(src, left, 0, 0)?;
    crop_image(src, right, half_cols, 0)?;

    Ok(())
}
