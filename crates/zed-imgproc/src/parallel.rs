use rayon::prelude::*;

use zed_image::Image;
use zed_tensor::Tensor2;

/// Apply a function to each pixel for grid sampling in parallel.
///
/// Rows of `dst` are processed in parallel; `f` receives the source coordinate stored in the
/// maps for that pixel and the destination pixel channels.
///
/// PRECONDITION: `map_x` and `map_y` have the shape `[dst.rows(), dst.cols()]`.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    map_x: &Tensor2<f32>,
    map_y: &Tensor2<f32>,
    f: impl Fn(&f32, &f32, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    let dst_slice = dst.as_slice_mut();
    let map_x_slice = map_x.as_slice();
    let map_y_slice = map_y.as_slice();

    dst_slice
        .par_chunks_exact_mut(C * cols)
        .zip(map_x_slice.par_chunks_exact(cols))
        .zip(map_y_slice.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}

/// Fill a pair of coordinate maps in parallel, one row per task.
///
/// `f` receives the column and row of the map entry and returns the `(x, y)` pair to store.
///
/// PRECONDITION: `map_x` and `map_y` have the same shape.
pub fn par_iter_rows_map(
    map_x: &mut Tensor2<f32>,
    map_y: &mut Tensor2<f32>,
    f: impl Fn(usize, usize) -> (f32, f32) + Send + Sync,
) {
    let cols = map_x.shape[1];
    if cols == 0 {
        return;
    }

    map_x
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(map_y.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .for_each(|(row, (xrow, yrow))| {
            xrow.iter_mut()
                .zip(yrow.iter_mut())
                .enumerate()
                .for_each(|(col, (x, y))| {
                    (*x, *y) = f(col, row);
                });
        });
}
