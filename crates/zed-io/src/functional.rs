use std::path::{Path, PathBuf};

use zed_image::{Image, ImageSize};

use crate::error::IoError;

/// File extensions recognised when listing a directory of frames.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Reads an image from the given file path as 8-bit RGB.
///
/// The method reads any format supported by the image crate and converts the pixels to rgb8.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an 8-bit RGB image to the given path as PNG.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
/// * `image` - The image to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let size = image.size();
    let (Ok(width), Ok(height)) = (u32::try_from(size.width), u32::try_from(size.height)) else {
        return Err(IoError::ImageTooLarge(size));
    };

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        width,
        height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )?;

    Ok(())
}

/// Lists the image files of a directory, sorted by file name.
///
/// Files are selected by extension (case-insensitive): png, jpg, jpeg, bmp, tiff.
pub fn list_image_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IoError::FileDoesNotExist(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(IoError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if path.is_file() && is_image {
            files.push(path);
        }
    }
    files.sort();

    log::debug!("found {} image files in {}", files.len(), dir.display());

    Ok(files)
}
