use approx::assert_relative_eq;
use zed_3d::{linalg::IDENTITY_33, transforms::rotation_vector_to_matrix};
use zed_image::{Image, ImageSize};
use zed_imgproc::{
    calibration::{
        distortion::{generate_correction_map_plumb_bob, PlumbBobDistortion},
        CameraIntrinsic,
    },
    concat::hconcat,
    crop::split_side_by_side,
    interpolation::{remap, InterpolationMode},
};

fn checkerboard(size: ImageSize, square: usize) -> Image<u8, 3> {
    let mut data = Vec::with_capacity(size.width * size.height * 3);
    for v in 0..size.height {
        for u in 0..size.width {
            let val = if (u / square + v / square) % 2 == 0 {
                230
            } else {
                20
            };
            data.extend_from_slice(&[val, val / 2, 255 - val]);
        }
    }
    Image::new(size, data).unwrap()
}

#[test]
fn test_identity_rectification_preserves_frame() {
    let size = ImageSize {
        width: 96,
        height: 64,
    };
    let intrinsic = CameraIntrinsic {
        fx: 80.0,
        fy: 80.0,
        cx: 48.0,
        cy: 32.0,
    };
    let (map_x, map_y) = generate_correction_map_plumb_bob(
        &intrinsic,
        &PlumbBobDistortion::default(),
        &rotation_vector_to_matrix(&[0.0, 0.0, 0.0]),
        &intrinsic.camera_matrix(),
        &size,
    )
    .unwrap();

    let src = checkerboard(size, 8);
    let mut dst = Image::<u8, 3>::from_size_val(size, 0);
    remap(&src, &mut dst, &map_x, &map_y, InterpolationMode::Bilinear).unwrap();

    assert_eq!(dst, src);
}

#[test]
fn test_split_rectify_concat_roundtrip() {
    let half = ImageSize {
        width: 32,
        height: 24,
    };
    let frame = checkerboard([half.width * 2, half.height].into(), 4);

    let mut left = Image::<u8, 3>::from_size_val(half, 0);
    let mut right = Image::<u8, 3>::from_size_val(half, 0);
    split_side_by_side(&frame, &mut left, &mut right).unwrap();

    let intrinsic = CameraIntrinsic {
        fx: 30.0,
        fy: 30.0,
        cx: 16.0,
        cy: 12.0,
    };
    let (map_x, map_y) = generate_correction_map_plumb_bob(
        &intrinsic,
        &PlumbBobDistortion::default(),
        &IDENTITY_33,
        &intrinsic.camera_matrix(),
        &half,
    )
    .unwrap();

    let mut left_rect = Image::<u8, 3>::from_size_val(half, 0);
    let mut right_rect = Image::<u8, 3>::from_size_val(half, 0);
    remap(&left, &mut left_rect, &map_x, &map_y, InterpolationMode::Nearest).unwrap();
    remap(&right, &mut right_rect, &map_x, &map_y, InterpolationMode::Nearest).unwrap();

    let mut whole = Image::<u8, 3>::from_size_val(frame.size(), 0);
    hconcat(&left_rect, &right_rect, &mut whole).unwrap();

    assert_eq!(whole, frame);
}

#[test]
fn test_distorted_map_stays_finite_near_center() {
    let size = ImageSize {
        width: 128,
        height: 96,
    };
    let intrinsic = CameraIntrinsic {
        fx: 100.0,
        fy: 100.0,
        cx: 64.0,
        cy: 48.0,
    };
    let distortion = PlumbBobDistortion {
        k1: -0.2,
        k2: 0.05,
        k3: 0.0,
        p1: 0.001,
        p2: -0.001,
    };
    let (map_x, map_y) = generate_correction_map_plumb_bob(
        &intrinsic,
        &distortion,
        &IDENTITY_33,
        &intrinsic.camera_matrix(),
        &size,
    )
    .unwrap();

    assert!(map_x.as_slice().iter().all(|x| x.is_finite()));
    assert!(map_y.as_slice().iter().all(|y| y.is_finite()));
    assert_relative_eq!(*map_x.get([48, 64]).unwrap(), 64.0, epsilon = 1e-3);
    assert_relative_eq!(*map_y.get([48, 64]).unwrap(), 48.0, epsilon = 1e-3);
}
