use super::*;
use crate::error::Error;
use crate::pixel_buffer::{Dimensions, RGB_BANDS};
use crate::testing::{CountingSource, random_image, reference_gradient};

fn all_backends() -> Vec<Backend> {
    vec![
        Backend::Scalar,
        Backend::Auto,
        Backend::Level(SimdLevel::Sse2),
        Backend::Level(SimdLevel::Avx2),
        Backend::Level(SimdLevel::Neon),
    ]
}

fn rows_of<S: Pixel>(buffer: &PixelBuffer<S>, band: usize) -> Vec<Vec<S>> {
    (0..buffer.height())
        .map(|y| buffer.line(y, band).unwrap().to_vec())
        .collect()
}

#[test]
fn test_single_dark_corner() {
    let src = PixelBuffer::<u8>::from_fn(4, 4, 1, |x, y, _| if x == 0 && y == 0 { 0 } else { 8 })
        .unwrap();

    for backend in all_backends() {
        let config = SobelConfig::default().with_backend(backend);
        let mut dx = PixelBuffer::<i8>::new_like(&src).unwrap();
        let mut dy = PixelBuffer::<i8>::new_like(&src).unwrap();
        edge_gradient_with(&src, &mut dx, &mut dy, &config).unwrap();

        assert_eq!(
            rows_of(&dx, 0),
            vec![
                vec![3, 2, 0, -3],
                vec![4, 1, 0, -4],
                vec![4, 0, 0, -4],
                vec![3, 0, 0, -3],
            ],
            "{:?}",
            backend
        );
        assert_eq!(
            rows_of(&dy, 0),
            vec![
                vec![3, 4, 4, 3],
                vec![2, 1, 0, 0],
                vec![0, 0, 0, 0],
                vec![-3, -4, -4, -3],
            ],
            "{:?}",
            backend
        );
    }
}

#[test]
fn test_interior_uses_shift_before_sum() {
    // Each tap is truncated on its own, so the 7s on the corners vanish.
    let src = PixelBuffer::<u8>::from_fn(3, 3, 1, |x, y, _| match (x, y) {
        (2, 0) | (2, 2) => 7,
        (2, 1) => 13,
        _ => 0,
    })
    .unwrap();
    let mut dx = PixelBuffer::<i8>::new_like(&src).unwrap();
    edge_horizontal_gradient(&src, &mut dx).unwrap();
    assert_eq!(dx.pixel(1, 1, 0).unwrap(), (7 >> 3) + (13 >> 2) + (7 >> 3));
    assert_eq!(dx.pixel(1, 1, 0).unwrap(), 3);
}

#[test]
fn test_matches_reference_u8() {
    for kernel in [KernelSize::Three, KernelSize::Five] {
        for (width, height) in [(1, 1), (2, 3), (5, 1), (17, 9), (33, 4), (70, 6)] {
            let src = random_image::<u8>(width, height, 2, (width * 31 + height) as u64);
            let expected_dx = reference_gradient(&src, kernel, false);
            let expected_dy = reference_gradient(&src, kernel, true);

            for backend in all_backends() {
                let config = SobelConfig::default().with_kernel(kernel).with_backend(backend);
                let mut dx = PixelBuffer::new_like(&src).unwrap();
                let mut dy = PixelBuffer::new_like(&src).unwrap();
                edge_gradient_with(&src, &mut dx, &mut dy, &config).unwrap();

                for band in 0..2 {
                    assert_eq!(
                        rows_of(&dx, band),
                        rows_of(&expected_dx, band),
                        "dx {:?} {:?} {}x{}",
                        kernel,
                        backend,
                        width,
                        height
                    );
                    assert_eq!(
                        rows_of(&dy, band),
                        rows_of(&expected_dy, band),
                        "dy {:?} {:?} {}x{}",
                        kernel,
                        backend,
                        width,
                        height
                    );
                }
            }
        }
    }
}

#[test]
fn test_matches_reference_u16() {
    for kernel in [KernelSize::Three, KernelSize::Five] {
        let src = random_image::<u16>(41, 7, 1, 99);
        let expected_dx = reference_gradient(&src, kernel, false);
        let expected_dy = reference_gradient(&src, kernel, true);

        for backend in all_backends() {
            let config = SobelConfig::default().with_kernel(kernel).with_backend(backend);
            let mut dx = PixelBuffer::new_like(&src).unwrap();
            let mut dy = PixelBuffer::new_like(&src).unwrap();
            edge_horizontal_gradient_with(&src, &mut dx, &config).unwrap();
            edge_vertical_gradient_with(&src, &mut dy, &config).unwrap();

            assert_eq!(rows_of(&dx, 0), rows_of(&expected_dx, 0), "{:?} {:?}", kernel, backend);
            assert_eq!(rows_of(&dy, 0), rows_of(&expected_dy, 0), "{:?} {:?}", kernel, backend);
        }
    }
}

#[test]
fn test_flat_image_interior_is_zero() {
    for kernel in [KernelSize::Three, KernelSize::Five] {
        let src = PixelBuffer::<u16>::from_fn(12, 10, 1, |_, _, _| 1000).unwrap();
        let mut dx = PixelBuffer::new_like(&src).unwrap();
        let mut dy = PixelBuffer::new_like(&src).unwrap();
        let config = SobelConfig::default().with_kernel(kernel);
        edge_gradient_with(&src, &mut dx, &mut dy, &config).unwrap();

        let r = kernel.radius();
        for y in r..10 - r {
            for x in r..12 - r {
                assert_eq!(dx.pixel(x, y, 0).unwrap(), 0, "{:?} ({}, {})", kernel, x, y);
                assert_eq!(dy.pixel(x, y, 0).unwrap(), 0, "{:?} ({}, {})", kernel, x, y);
            }
        }
        // Zero padding makes the left edge a rising step.
        assert!(dx.pixel(0, 5, 0).unwrap() > 0);
        assert!(dy.pixel(6, 0, 0).unwrap() > 0);
    }
}

#[test]
fn test_full_scale_step_fits_signed_output() {
    let src = PixelBuffer::<u8>::from_fn(8, 8, 1, |x, _, _| if x < 4 { 0 } else { u8::MAX })
        .unwrap();
    for kernel in [KernelSize::Three, KernelSize::Five] {
        let mut dx = PixelBuffer::new_like(&src).unwrap();
        let config = SobelConfig::default().with_kernel(kernel);
        edge_horizontal_gradient_with(&src, &mut dx, &config).unwrap();
        let expected = reference_gradient(&src, kernel, false);
        assert_eq!(rows_of(&dx, 0), rows_of(&expected, 0));
        assert!(dx.pixel(4, 4, 0).unwrap() > 0);
    }
}

#[test]
fn test_mismatched_output_is_rejected_untouched() {
    let src = PixelBuffer::<u8>::from_fn(6, 6, 1, |x, y, _| (x * y) as u8).unwrap();
    let mut dx = PixelBuffer::<i8>::new(6, 5, 1).unwrap();
    dx.fill(11);
    let mut dy = PixelBuffer::<i8>::new_like(&src).unwrap();
    dy.fill(11);

    let err = edge_gradient(&src, &mut dx, &mut dy).unwrap_err();
    assert_eq!(
        err,
        Error::DimensionMismatch {
            expected: Dimensions::new(6, 6, 1),
            actual: Dimensions::new(6, 5, 1),
        }
    );
    assert!(rows_of(&dx, 0).iter().flatten().all(|&v| v == 11));
    assert!(rows_of(&dy, 0).iter().flatten().all(|&v| v == 11));

    let mut wrong_bands = PixelBuffer::<i8>::new(6, 6, 2).unwrap();
    assert!(matches!(
        edge_vertical_gradient(&src, &mut wrong_bands),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_parallel_bands_match_sequential() {
    let src = random_image::<u8>(37, 11, RGB_BANDS, 5);
    let mut par_dx = PixelBuffer::new_like(&src).unwrap();
    let mut par_dy = PixelBuffer::new_like(&src).unwrap();
    let mut seq_dx = PixelBuffer::new_like(&src).unwrap();
    let mut seq_dy = PixelBuffer::new_like(&src).unwrap();

    let config = SobelConfig::default();
    edge_gradient_with(&src, &mut par_dx, &mut par_dy, &config).unwrap();
    edge_gradient_with(
        &src,
        &mut seq_dx,
        &mut seq_dy,
        &config.with_parallel_bands(false),
    )
    .unwrap();

    for band in 0..RGB_BANDS {
        assert_eq!(rows_of(&par_dx, band), rows_of(&seq_dx, band));
        assert_eq!(rows_of(&par_dy, band), rows_of(&seq_dy, band));
    }
}

#[test]
fn test_bands_are_independent() {
    let src = PixelBuffer::<u8>::from_fn(9, 9, 2, |x, _, z| if z == 0 { (x * 20) as u8 } else { 0 })
        .unwrap();
    let mut dx = PixelBuffer::new_like(&src).unwrap();
    edge_horizontal_gradient(&src, &mut dx).unwrap();
    assert!(rows_of(&dx, 1).iter().flatten().all(|&v| v == 0));
    assert!(rows_of(&dx, 0).iter().flatten().any(|&v| v != 0));
}

#[test]
fn test_sweep_reads_each_row_once() {
    for kernel in [KernelSize::Three, KernelSize::Five] {
        let image = random_image::<u8>(19, 13, 2, 8);
        let source = CountingSource::new(&image);
        let mut out = PixelBuffer::<i8>::new_like(&image).unwrap();
        let stride = out.row_stride();

        let plane = out.band_mut(1).unwrap();
        sweep_band(&source, 1, Some(plane), None, stride, SimdLevel::Scalar, kernel).unwrap();

        for y in 0..13 {
            assert_eq!(source.reads(y, 1), 1, "{:?} row {}", kernel, y);
            assert_eq!(source.reads(y, 0), 0);
        }
        assert_eq!(source.total_reads(), 13);

        let expected = reference_gradient(&image, kernel, false);
        assert_eq!(rows_of(&out, 1), rows_of(&expected, 1));
    }
}

#[test]
fn test_single_row_image() {
    let src = PixelBuffer::<u16>::from_fn(6, 1, 1, |x, _, _| (x as u16) << 8).unwrap();
    let mut dx = PixelBuffer::new_like(&src).unwrap();
    let mut dy = PixelBuffer::new_like(&src).unwrap();
    edge_gradient(&src, &mut dx, &mut dy).unwrap();
    assert_eq!(rows_of(&dx, 0), rows_of(&reference_gradient(&src, KernelSize::Three, false), 0));
    // Rows above and below are padding, so the vertical gradient cancels.
    assert!(rows_of(&dy, 0).iter().flatten().all(|&v| v == 0));
}
