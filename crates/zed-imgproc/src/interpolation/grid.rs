use crate::parallel;
use zed_tensor::Tensor2;

/// Create a meshgrid of x and y coordinates
///
/// # Arguments
///
/// * `rows` - The number of rows indicating the height of the grid
/// * `cols` - The number of columns indicating the width of the grid
///
/// # Returns
///
/// A tuple of 2D arrays of shape (rows, cols) containing the x and y coordinates. Used as
/// coordinate maps it is the identity mapping.
///
/// ```
/// use zed_imgproc::interpolation::grid::meshgrid;
///
/// let (map_x, map_y) = meshgrid(2, 3);
/// assert_eq!(map_x.as_slice(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
/// assert_eq!(map_y.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
/// ```
pub fn meshgrid(rows: usize, cols: usize) -> (Tensor2<f32>, Tensor2<f32>) {
    meshgrid_from_fn(cols, rows, |x, y| (x as f32, y as f32))
}

/// Create a pair of coordinate maps by evaluating `f(col, row)` for every entry.
///
/// Rows are generated in parallel.
///
/// # Arguments
///
/// * `cols` - The width of the maps.
/// * `rows` - The height of the maps.
/// * `f` - Returns the `(x, y)` pair to store at `(col, row)`.
///
/// # Returns
///
/// The maps `(map_x, map_y)`, both of shape `[rows, cols]`.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32) + Send + Sync,
) -> (Tensor2<f32>, Tensor2<f32>) {
    let mut map_x = Tensor2::from_shape_val([rows, cols], 0.0f32);
    let mut map_y = Tensor2::from_shape_val([rows, cols], 0.0f32);

    parallel::par_iter_rows_map(&mut map_x, &mut map_y, f);

    (map_x, map_y)
}
