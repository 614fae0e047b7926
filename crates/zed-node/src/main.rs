use argh::FromArgs;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use zed_imgproc::interpolation::InterpolationMode;
use zed_stereo::{
    camera_info::{DEFAULT_LEFT_FRAME_ID, DEFAULT_RIGHT_FRAME_ID},
    file::{DirectoryPublisher, ImageFileSource},
    CameraInfo, CameraModelBuilder, KeyValueCalibration, Resolution, SessionConfig,
    StereoGeometry, StereoSession,
};

#[derive(FromArgs)]
/// Rectify side-by-side stereo frames with the factory calibration of the camera
struct Args {
    /// the factory calibration file (INI format)
    #[argh(option, short = 'c')]
    calibration: Option<PathBuf>,

    /// the camera info of the left camera (JSON), used with --right-info instead of --calibration
    #[argh(option)]
    left_info: Option<PathBuf>,

    /// the camera info of the right camera (JSON)
    #[argh(option)]
    right_info: Option<PathBuf>,

    /// the resolution: 0 (2K), 1 (FHD), 2 (HD) or 3 (VGA)
    #[argh(option, short = 'r', default = "Resolution::Fhd")]
    resolution: Resolution,

    /// the frames per second to publish
    #[argh(option, short = 'f', default = "30.0")]
    fps: f64,

    /// an image or a directory of images holding the side-by-side frames
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// the directory the streams are written to
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// replay the input forever
    #[argh(switch)]
    loop_input: bool,

    /// publish the raw frames only
    #[argh(switch)]
    no_rectify: bool,

    /// use nearest neighbor instead of bilinear interpolation
    #[argh(switch)]
    nearest: bool,

    /// stop after this many frames
    #[argh(option)]
    max_frames: Option<u64>,

    /// the frame id of the left camera info
    #[argh(option, default = "DEFAULT_LEFT_FRAME_ID.to_string()")]
    left_frame_id: String,

    /// the frame id of the right camera info
    #[argh(option, default = "DEFAULT_RIGHT_FRAME_ID.to_string()")]
    right_frame_id: String,
}

fn load_geometry(args: &Args) -> Result<StereoGeometry, Box<dyn std::error::Error>> {
    match (&args.calibration, &args.left_info, &args.right_info) {
        (Some(calibration), None, None) => {
            log::info!("loading the factory calibration {}", calibration.display());
            let calibration = KeyValueCalibration::from_ini_file(calibration)?;
            Ok(CameraModelBuilder::new(&calibration, args.resolution).build()?)
        }
        (None, Some(left), Some(right)) => {
            log::info!(
                "loading the camera infos {} and {}",
                left.display(),
                right.display()
            );
            Ok(StereoGeometry::from_camera_infos(
                &CameraInfo::read_json(left)?,
                &CameraInfo::read_json(right)?,
                args.resolution,
            )?)
        }
        _ => Err("pass either --calibration or both --left-info and --right-info".into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    // configuration and calibration errors end the process before any frame is read
    let geometry = load_geometry(&args)?;
    log::info!(
        "{} geometry: {} per camera, baseline {:.4} m",
        geometry.resolution(),
        geometry.eye_size(),
        geometry.baseline()
    );

    let source = ImageFileSource::open(&args.input, args.loop_input)?;
    let publisher = DirectoryPublisher::new(&args.output)?;

    let config = SessionConfig {
        fps: args.fps,
        rectify: !args.no_rectify,
        max_frames: args.max_frames,
        interpolation: if args.nearest {
            InterpolationMode::Nearest
        } else {
            InterpolationMode::Bilinear
        },
        left_frame_id: args.left_frame_id.clone(),
        right_frame_id: args.right_frame_id.clone(),
    };

    let mut session = StereoSession::new(&geometry, source, publisher, config)?;

    // create a cancel token to stop the session
    let cancel_token = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::info!("received Ctrl-C signal, stopping");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    let stats = session.run(&cancel_token)?;

    log::info!(
        "wrote {} frames to {}",
        stats.published,
        session.publisher().root().display()
    );

    Ok(())
}
