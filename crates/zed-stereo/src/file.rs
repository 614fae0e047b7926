use std::path::{Path, PathBuf};

use zed_image::Image;
use zed_io::{
    functional::{list_image_files, read_image_any_rgb8, write_image_png_rgb8},
    IoError,
};

use crate::camera_info::StereoCameraInfos;
use crate::error::{AcquisitionError, StereoError};
use crate::session::{FramePublisher, FrameSource, StereoFrame};

/// Replays side-by-side frames stored as image files.
pub struct ImageFileSource {
    files: Vec<PathBuf>,
    next: usize,
    looping: bool,
}

impl ImageFileSource {
    /// Opens a single image file or a directory of images, replayed in file name order.
    ///
    /// With `looping` the files are replayed forever, otherwise the source ends after the last
    /// one.
    pub fn open(path: impl AsRef<Path>, looping: bool) -> Result<Self, IoError> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            list_image_files(path)?
        } else if path.exists() {
            vec![path.to_path_buf()]
        } else {
            return Err(IoError::FileDoesNotExist(path.to_path_buf()));
        };

        if files.is_empty() {
            log::warn!("no image files found in {}", path.display());
        } else {
            log::info!("replaying {} frames from {}", files.len(), path.display());
        }

        Ok(Self {
            files,
            next: 0,
            looping,
        })
    }

    /// The number of files in the source.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when the source has no file.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageFileSource {
    fn grab(&mut self) -> Result<Image<u8, 3>, AcquisitionError> {
        if self.next >= self.files.len() {
            if !self.looping || self.files.is_empty() {
                return Err(AcquisitionError::EndOfStream);
            }
            self.next = 0;
        }

        let path = &self.files[self.next];
        self.next += 1;

        log::debug!("reading frame {}", path.display());

        Ok(read_image_any_rgb8(path)?)
    }
}

/// The image streams written by [`DirectoryPublisher`], relative to its root.
pub const STREAMS: [&str; 6] = [
    "left/image_raw",
    "right/image_raw",
    "whole/image_raw",
    "left/image_rectified",
    "right/image_rectified",
    "whole/image_rectified",
];

/// Writes every published image as PNG under `<root>/<stream>/<seq>.png`.
///
/// The camera infos are written once, to `<root>/left/camera_info.json` and
/// `<root>/right/camera_info.json`.
pub struct DirectoryPublisher {
    root: PathBuf,
    infos_written: bool,
}

impl DirectoryPublisher {
    /// Creates the stream directories under `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StereoError> {
        let root = root.as_ref().to_path_buf();
        for stream in STREAMS {
            std::fs::create_dir_all(root.join(stream))?;
        }

        Ok(Self {
            root,
            infos_written: false,
        })
    }

    /// The directory the streams are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write(&self, stream: &str, seq: u64, image: &Image<u8, 3>) -> Result<(), StereoError> {
        let path = self.root.join(stream).join(format!("{seq:06}.png"));
        write_image_png_rgb8(path, image)?;
        Ok(())
    }
}

impl FramePublisher for DirectoryPublisher {
    fn publish(
        &mut self,
        frame: &StereoFrame<'_>,
        infos: &StereoCameraInfos,
    ) -> Result<(), StereoError> {
        if !self.infos_written {
            infos
                .left
                .write_json(self.root.join("left").join("camera_info.json"))?;
            infos
                .right
                .write_json(self.root.join("right").join("camera_info.json"))?;
            self.infos_written = true;
        }

        let seq = frame.seq;
        self.write("left/image_raw", seq, frame.raw_left)?;
        self.write("right/image_raw", seq, frame.raw_right)?;
        self.write("whole/image_raw", seq, frame.raw_whole)?;

        if let Some(rectified) = &frame.rectified {
            self.write("left/image_rectified", seq, rectified.left)?;
            self.write("right/image_rectified", seq, rectified.right)?;
            self.write("whole/image_rectified", seq, rectified.whole)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_source() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("frame.png");
        let image = Image::<u8, 3>::from_size_val([4, 2].into(), 10);
        write_image_png_rgb8(&path, &image)?;

        let mut source = ImageFileSource::open(&path, false)?;
        assert_eq!(source.len(), 1);
        assert_eq!(source.grab()?, image);
        assert!(matches!(source.grab(), Err(AcquisitionError::EndOfStream)));
        Ok(())
    }

    #[test]
    fn looping_directory_source() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        for (name, val) in [("001.png", 1), ("000.png", 0)] {
            let image = Image::<u8, 3>::from_size_val([2, 2].into(), val);
            write_image_png_rgb8(tmp_dir.path().join(name), &image)?;
        }

        let mut source = ImageFileSource::open(tmp_dir.path(), true)?;
        let values = (0..5)
            .map(|_| source.grab().map(|frame| frame.as_slice()[0]))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(values, [0, 1, 0, 1, 0]);
        Ok(())
    }

    #[test]
    fn empty_directory_ends_immediately() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut source = ImageFileSource::open(tmp_dir.path(), true)?;
        assert!(source.is_empty());
        assert!(matches!(source.grab(), Err(AcquisitionError::EndOfStream)));
        Ok(())
    }

    #[test]
    fn missing_path() {
        assert!(matches!(
            ImageFileSource::open("/this/path/does/not/exist", false),
            Err(IoError::FileDoesNotExist(_))
        ));
    }
}
