use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant, SystemTime},
};

use zed_image::{Image, ImageSize};
use zed_imgproc::{crop::split_side_by_side, interpolation::InterpolationMode};
use zed_io::fps_counter::FpsCounter;

use crate::camera_info::{StereoCameraInfos, DEFAULT_LEFT_FRAME_ID, DEFAULT_RIGHT_FRAME_ID};
use crate::error::{AcquisitionError, ConfigError, StereoError};
use crate::geometry::StereoGeometry;
use crate::maps::generate_rectification_maps;
use crate::rectifier::FrameRectifier;

/// A producer of side-by-side stereo frames, e.g. a camera device.
pub trait FrameSource {
    /// Grabs the next frame.
    ///
    /// Failures are reported per call; the session logs them and keeps going, except for
    /// [`AcquisitionError::EndOfStream`] which ends it.
    fn grab(&mut self) -> Result<Image<u8, 3>, AcquisitionError>;
}

/// The rectified images of one frame.
pub struct RectifiedFrame<'a> {
    /// Rectified left camera image.
    pub left: &'a Image<u8, 3>,
    /// Rectified right camera image.
    pub right: &'a Image<u8, 3>,
    /// Rectified side-by-side image.
    pub whole: &'a Image<u8, 3>,
}

/// The images produced for one captured frame.
pub struct StereoFrame<'a> {
    /// Sequence number of the frame, counting published frames from 0.
    pub seq: u64,
    /// Capture time.
    pub stamp: SystemTime,
    /// Raw left half.
    pub raw_left: &'a Image<u8, 3>,
    /// Raw right half.
    pub raw_right: &'a Image<u8, 3>,
    /// The raw side-by-side frame.
    pub raw_whole: &'a Image<u8, 3>,
    /// The rectified images, when rectification is enabled.
    pub rectified: Option<RectifiedFrame<'a>>,
}

/// A consumer of the produced images and camera infos.
pub trait FramePublisher {
    /// Publishes one frame together with the camera infos.
    ///
    /// # Errors
    ///
    /// Publishing errors are fatal and end the session.
    fn publish(
        &mut self,
        frame: &StereoFrame<'_>,
        infos: &StereoCameraInfos,
    ) -> Result<(), StereoError>;
}

/// The configuration of a [`StereoSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Target frame rate, frames per second.
    pub fps: f64,
    /// Rectify the frames; raw images are published in any case.
    pub rectify: bool,
    /// Stop after this many published frames.
    pub max_frames: Option<u64>,
    /// The interpolation used by the rectifier.
    pub interpolation: InterpolationMode,
    /// Frame id of the left camera info.
    pub left_frame_id: String,
    /// Frame id of the right camera info.
    pub right_frame_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            rectify: true,
            max_frames: None,
            interpolation: InterpolationMode::Bilinear,
            left_frame_id: DEFAULT_LEFT_FRAME_ID.to_string(),
            right_frame_id: DEFAULT_RIGHT_FRAME_ID.to_string(),
        }
    }
}

/// The time between two frames at `fps` frames per second.
fn frame_period(fps: f64) -> Result<Duration, ConfigError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::InvalidFrameRate(fps));
    }
    Duration::try_from_secs_f64(1.0 / fps).map_err(|_| ConfigError::InvalidFrameRate(fps))
}

/// Paces a loop to a fixed rate.
///
/// Deadlines advance by one period per call; a loop that fell more than one period behind
/// restarts from the current time instead of bursting to catch up.
#[derive(Debug)]
pub struct RateLimiter {
    period: Duration,
    next: Instant,
}

impl RateLimiter {
    /// Creates a limiter for `fps` iterations per second.
    ///
    /// # Errors
    ///
    /// `fps` is not a finite positive number, or its period does not fit a [`Duration`].
    pub fn new(fps: f64) -> Result<Self, ConfigError> {
        let period = frame_period(fps)?;
        let next = Instant::now()
            .checked_add(period)
            .ok_or(ConfigError::InvalidFrameRate(fps))?;
        Ok(Self { period, next })
    }

    /// The time between two iterations.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until the next deadline.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next = self.next.checked_add(self.period).unwrap_or(self.next);
        } else {
            self.next = now.checked_add(self.period).unwrap_or(now);
        }
    }
}

/// Counters of a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames grabbed, split and published.
    pub published: u64,
    /// Iterations skipped because of an acquisition failure.
    pub failures: u64,
}

/// The per-frame loop: grab, split, rectify, publish, sleep.
///
/// A session can only be created once the rectification maps of the geometry were generated
/// successfully, so no frame is ever processed with a missing or invalid map.
pub struct StereoSession<S, P> {
    source: S,
    publisher: P,
    config: SessionConfig,
    infos: StereoCameraInfos,
    frame_size: ImageSize,
    rectifier: Option<FrameRectifier<u8, 3>>,
    raw_left: Image<u8, 3>,
    raw_right: Image<u8, 3>,
}

impl<S: FrameSource, P: FramePublisher> StereoSession<S, P> {
    /// Validates the configuration, generates the rectification maps and allocates the frame
    /// buffers.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidFrameRate`] for a frame rate without a representable period.
    /// * [`crate::ValidationError`] when the maps cannot be generated.
    pub fn new(
        geometry: &StereoGeometry,
        source: S,
        publisher: P,
        config: SessionConfig,
    ) -> Result<Self, StereoError> {
        frame_period(config.fps)?;

        let infos = geometry.camera_infos(&config.left_frame_id, &config.right_frame_id);

        // the maps are validated even when rectification is disabled
        let maps = generate_rectification_maps(&infos)?;
        let rectifier = config
            .rectify
            .then(|| FrameRectifier::new(maps, config.interpolation));

        let eye_size = geometry.eye_size();

        Ok(Self {
            source,
            publisher,
            infos,
            frame_size: geometry.resolution().frame_size(),
            rectifier,
            raw_left: Image::from_size_val(eye_size, 0),
            raw_right: Image::from_size_val(eye_size, 0),
            config,
        })
    }

    /// The camera infos published with every frame.
    pub fn camera_infos(&self) -> &StereoCameraInfos {
        &self.infos
    }

    /// The frame source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Runs the loop until `cancel` is set, the source ends or `max_frames` frames were published.
    ///
    /// Acquisition failures skip the iteration: the first of a series is logged as a warning,
    /// the following ones at debug level.
    ///
    /// # Errors
    ///
    /// Publishing or buffer errors end the session.
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<SessionStats, StereoError> {
        let mut stats = SessionStats::default();
        let mut limiter = RateLimiter::new(self.config.fps)?;
        let mut fps_counter = FpsCounter::default();
        let mut failing = false;

        log::info!(
            "starting stereo session: {} frames at {} fps, rectification {}",
            self.frame_size,
            self.config.fps,
            if self.rectifier.is_some() { "on" } else { "off" }
        );

        while !cancel.load(Ordering::SeqCst) {
            if self.config.max_frames.is_some_and(|max| stats.published >= max) {
                break;
            }

            match self.step(stats.published) {
                Ok(()) => {
                    stats.published += 1;
                    if failing {
                        log::info!("frames are available again");
                        failing = false;
                    }
                    if let Some(fps) = fps_counter.update() {
                        log::info!("publishing at {fps:.1} fps");
                    }
                }
                Err(StereoError::Acquisition(AcquisitionError::EndOfStream)) => {
                    log::info!("frame source exhausted");
                    break;
                }
                Err(StereoError::Acquisition(err)) => {
                    stats.failures += 1;
                    if failing {
                        log::debug!("can't acquire a frame: {err}");
                    } else {
                        log::warn!("can't acquire a frame: {err}");
                        failing = true;
                    }
                }
                Err(err) => return Err(err),
            }

            limiter.wait();
        }

        log::info!(
            "stereo session finished: {} frames published, {} acquisition failures",
            stats.published,
            stats.failures
        );

        Ok(stats)
    }

    fn step(&mut self, seq: u64) -> Result<(), StereoError> {
        let frame = self.source.grab()?;
        let stamp = SystemTime::now();

        if frame.size() != self.frame_size {
            return Err(AcquisitionError::FrameSize {
                expected: self.frame_size,
                actual: frame.size(),
            }
            .into());
        }

        split_side_by_side(&frame, &mut self.raw_left, &mut self.raw_right)?;

        let rectified = match self.rectifier.as_mut() {
            Some(rectifier) => {
                rectifier.rectify(&self.raw_left, &self.raw_right)?;
                Some(RectifiedFrame {
                    left: rectifier.left(),
                    right: rectifier.right(),
                    whole: rectifier.whole(),
                })
            }
            None => None,
        };

        log::debug!("frame {seq} processed");

        let stereo_frame = StereoFrame {
            seq,
            stamp,
            raw_left: &self.raw_left,
            raw_right: &self.raw_right,
            raw_whole: &frame,
            rectified,
        };

        self.publisher.publish(&stereo_frame, &self.infos)
    }
}
