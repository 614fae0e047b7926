use zed_image::{Image, ImageDtype, ImageError};
use zed_imgproc::{
    concat::hconcat,
    interpolation::{remap, InterpolationMode},
};

use crate::geometry::Eye;
use crate::maps::StereoRectificationMaps;

/// Applies the rectification maps to the halves of each frame.
///
/// The output buffers are allocated once from the map sizes and reused for every frame.
pub struct FrameRectifier<T, const C: usize> {
    maps: StereoRectificationMaps,
    interpolation: InterpolationMode,
    left: Image<T, C>,
    right: Image<T, C>,
    whole: Image<T, C>,
}

impl<T: ImageDtype, const C: usize> FrameRectifier<T, C> {
    /// Creates a rectifier owning `maps`.
    pub fn new(maps: StereoRectificationMaps, interpolation: InterpolationMode) -> Self {
        let left_size = maps.get(Eye::Left).size();
        let right_size = maps.get(Eye::Right).size();
        let whole_size = [left_size.width + right_size.width, left_size.height].into();

        Self {
            left: Image::from_size_val(left_size, T::default()),
            right: Image::from_size_val(right_size, T::default()),
            whole: Image::from_size_val(whole_size, T::default()),
            maps,
            interpolation,
        }
    }

    /// Rectifies one camera image into `dst`.
    ///
    /// # Errors
    ///
    /// `dst` does not have the size of the camera's map.
    pub fn rectify_eye(
        &self,
        eye: Eye,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
    ) -> Result<(), ImageError> {
        let map = self.maps.get(eye);
        remap(src, dst, &map.map_x, &map.map_y, self.interpolation)
    }

    /// Rectifies both halves of a frame and assembles the rectified side-by-side image.
    ///
    /// The results are available through [`Self::left`], [`Self::right`] and [`Self::whole`]
    /// until the next call.
    pub fn rectify(&mut self, left: &Image<T, C>, right: &Image<T, C>) -> Result<(), ImageError> {
        let left_map = self.maps.get(Eye::Left);
        let right_map = self.maps.get(Eye::Right);

        remap(
            left,
            &mut self.left,
            &left_map.map_x,
            &left_map.map_y,
            self.interpolation,
        )?;
        remap(
            right,
            &mut self.right,
            &right_map.map_x,
            &right_map.map_y,
            self.interpolation,
        )?;

        hconcat(&self.left, &self.right, &mut self.whole)
    }

    /// The maps in use.
    pub fn maps(&self) -> &StereoRectificationMaps {
        &self.maps
    }

    /// The last rectified left image.
    pub fn left(&self) -> &Image<T, C> {
        &self.left
    }

    /// The last rectified right image.
    pub fn right(&self) -> &Image<T, C> {
        &self.right
    }

    /// The last rectified side-by-side image.
    pub fn whole(&self) -> &Image<T, C> {
        &self.whole
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::RectificationMap;
    use zed_imgproc::interpolation::grid::meshgrid;
    use zed_tensor::Tensor2;

    fn maps(left: RectificationMap, right: RectificationMap) -> StereoRectificationMaps {
        StereoRectificationMaps { left, right }
    }

    fn identity(rows: usize, cols: usize) -> RectificationMap {
        let (map_x, map_y) = meshgrid(rows, cols);
        RectificationMap { map_x, map_y }
    }

    #[test]
    fn identity_rectification() -> Result<(), ImageError> {
        let mut rectifier = FrameRectifier::<u8, 1>::new(
            maps(identity(2, 3), identity(2, 3)),
            InterpolationMode::Bilinear,
        );
        let left = Image::new([3, 2].into(), vec![1, 2, 3, 4, 5, 6])?;
        let right = Image::new([3, 2].into(), vec![7, 8, 9, 10, 11, 12])?;

        rectifier.rectify(&left, &right)?;

        assert_eq!(rectifier.left(), &left);
        assert_eq!(rectifier.right(), &right);
        assert_eq!(
            rectifier.whole().as_slice(),
            &[1, 2, 3, 7, 8, 9, 4, 5, 6, 10, 11, 12]
        );
        Ok(())
    }

    #[test]
    fn shifted_map_fills_black() -> Result<(), ImageError> {
        // shift one pixel right: the first column has no source
        let shifted = RectificationMap {
            map_x: Tensor2::from_shape_vec([1, 3], vec![-1.0, 0.0, 1.0])?,
            map_y: Tensor2::from_shape_vec([1, 3], vec![0.0, 0.0, 0.0])?,
        };
        let rectifier =
            FrameRectifier::<f32, 1>::new(maps(shifted, identity(1, 3)), InterpolationMode::Nearest);
        let src = Image::new([3, 1].into(), vec![0.5, 0.6, 0.7])?;
        let mut dst = Image::from_size_val([3, 1].into(), 9.0);

        rectifier.rectify_eye(Eye::Left, &src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0.0, 0.5, 0.6]);

        rectifier.rectify_eye(Eye::Right, &src, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0.5, 0.6, 0.7]);
        Ok(())
    }

    #[test]
    fn wrong_input_size() -> Result<(), ImageError> {
        let rectifier = FrameRectifier::<u8, 3>::new(
            maps(identity(2, 2), identity(2, 2)),
            InterpolationMode::Bilinear,
        );
        let src = Image::from_size_val([2, 2].into(), 0);
        let mut dst = Image::from_size_val([3, 2].into(), 0);
        assert!(rectifier.rectify_eye(Eye::Left, &src, &mut dst).is_err());
        Ok(())
    }
}
