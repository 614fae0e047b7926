use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use zed_3d::linalg::IDENTITY_33;
use zed_image::{Image, ImageSize};
use zed_imgproc::{
    calibration::{
        distortion::{generate_correction_map_plumb_bob, PlumbBobDistortion},
        CameraIntrinsic,
    },
    crop::split_side_by_side,
    interpolation::{remap, InterpolationMode},
};

// half-frame sizes of the VGA, HD and FHD profiles
const SIZES: [(usize, usize); 3] = [(672, 376), (1280, 720), (1920, 1080)];

fn intrinsic_for(width: usize, height: usize) -> CameraIntrinsic {
    CameraIntrinsic {
        fx: 700.0,
        fy: 700.0,
        cx: width as f64 / 2.0,
        cy: height as f64 / 2.0,
    }
}

fn distortion() -> PlumbBobDistortion {
    PlumbBobDistortion {
        k1: -0.17,
        k2: 0.025,
        ..Default::default()
    }
}

fn bench_correction_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("CorrectionMap");

    for (width, height) in SIZES.iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let size = ImageSize {
            width: *width,
            height: *height,
        };
        let intrinsic = intrinsic_for(*width, *height);
        let distortion = distortion();

        group.bench_with_input(
            BenchmarkId::new("plumb_bob", &parameter_string),
            &size,
            |b, size| {
                b.iter(|| {
                    generate_correction_map_plumb_bob(
                        black_box(&intrinsic),
                        black_box(&distortion),
                        black_box(&IDENTITY_33),
                        black_box(&intrinsic.camera_matrix()),
                        black_box(size),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("Remap");

    for (width, height) in SIZES.iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let size = ImageSize {
            width: *width,
            height: *height,
        };
        let intrinsic = intrinsic_for(*width, *height);
        let (map_x, map_y) = generate_correction_map_plumb_bob(
            &intrinsic,
            &distortion(),
            &IDENTITY_33,
            &intrinsic.camera_matrix(),
            &size,
        )
        .unwrap();

        let image = Image::<u8, 3>::from_size_val(size, 128);
        let output = Image::<u8, 3>::from_size_val(size, 0);

        for mode in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        remap(
                            black_box(src),
                            black_box(&mut dst),
                            black_box(&map_x),
                            black_box(&map_y),
                            black_box(mode),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("SplitSideBySide");

    for (width, height) in SIZES.iter() {
        let parameter_string = format!("{}x{}", width * 2, height);
        let half = ImageSize {
            width: *width,
            height: *height,
        };
        let frame = Image::<u8, 3>::from_size_val([width * 2, *height].into(), 64);
        let mut left = Image::<u8, 3>::from_size_val(half, 0);
        let mut right = Image::<u8, 3>::from_size_val(half, 0);

        group.bench_with_input(
            BenchmarkId::new("par_rows", &parameter_string),
            &frame,
            |b, frame| b.iter(|| split_side_by_side(black_box(frame), &mut left, &mut right)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_correction_map, bench_remap, bench_split);
criterion_main!(benches);
