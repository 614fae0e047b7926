use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use zed_image::{Image, ImageError};

/// Concatenate two images of the same height side by side.
///
/// `dst` receives `left` in its first `left.cols()` columns and `right` in the remaining ones.
///
/// # Errors
///
/// The heights differ, or `dst` is not `left.cols() + right.cols()` wide and as tall as the inputs.
///
/// # Examples
///
/// ```rust
/// use zed_image::Image;
/// use zed_imgproc::concat::hconcat;
///
/// let left = Image::<u8, 1>::from_size_val([1, 2].into(), 1);
/// let right = Image::<u8, 1>::from_size_val([2, 2].into(), 2);
/// let mut whole = Image::<u8, 1>::from_size_val([3, 2].into(), 0);
///
/// hconcat(&left, &right, &mut whole).unwrap();
///
/// assert_eq!(whole.as_slice(), &[1, 2, 2, 1, 2, 2]);
/// ```
pub fn hconcat<T, const C: usize>(
    left: &Image<T, C>,
    right: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if left.rows() != right.rows() {
        return Err(ImageError::InvalidImageSize(
            left.cols(),
            left.rows(),
            right.cols(),
            right.rows(),
        ));
    }

    let cols = left.cols() + right.cols();
    if dst.cols() != cols || dst.rows() != left.rows() {
        return Err(ImageError::InvalidImageSize(
            cols,
            left.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if cols == 0 {
        return Ok(());
    }

    let (left_stride, right_stride) = (left.cols() * C, right.cols() * C);

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            let (dst_left, dst_right) = dst_row.split_at_mut(left_stride);
            dst_left.copy_from_slice(&left.as_slice()[i * left_stride..(i + 1) * left_stride]);
            dst_right
                .copy_from_slice(&right.as_slice()[i * right_stride..(i + 1) * right_stride]);
        });

    Ok(())
}
