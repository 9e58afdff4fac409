//! Sobel gradient kernels over a sliding stencil window.
//!
//! Each band is swept top to bottom with a [`Window3x3`] or [`Window5x5`];
//! every output row is computed from the window lines with the vector
//! kernel for the longest prefix it supports and the scalar kernel for the
//! remainder. Pixels outside the image read as zero.

mod config;
mod scalar;
#[cfg(feature = "simd")]
mod simd;

#[cfg(test)]
mod tests;

pub use config::{Backend, KernelSize, SobelConfig};

use common::SimdLevel;
use rayon::prelude::*;

use crate::error::Result;
use crate::pixel::{GradientPixel, Pixel};
use crate::pixel_buffer::PixelBuffer;
use crate::window::{LineSource, Window3x3, Window5x5};

/// Horizontal gradient of every band of `src` into `dx`, default settings.
pub fn edge_horizontal_gradient<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dx: &mut PixelBuffer<T::Signed>,
) -> Result<()> {
    edge_horizontal_gradient_with(src, dx, &SobelConfig::default())
}

/// Vertical gradient of every band of `src` into `dy`, default settings.
pub fn edge_vertical_gradient<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dy: &mut PixelBuffer<T::Signed>,
) -> Result<()> {
    edge_vertical_gradient_with(src, dy, &SobelConfig::default())
}

/// Both gradients in a single sweep, default settings.
pub fn edge_gradient<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dx: &mut PixelBuffer<T::Signed>,
    dy: &mut PixelBuffer<T::Signed>,
) -> Result<()> {
    edge_gradient_with(src, dx, dy, &SobelConfig::default())
}

/// Horizontal gradient with explicit settings.
///
/// Fails with [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
/// before writing anything if `dx` differs from `src` in width, height or
/// band count.
pub fn edge_horizontal_gradient_with<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dx: &mut PixelBuffer<T::Signed>,
    config: &SobelConfig,
) -> Result<()> {
    run(src, Some(dx), None, config)
}

pub fn edge_vertical_gradient_with<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dy: &mut PixelBuffer<T::Signed>,
    config: &SobelConfig,
) -> Result<()> {
    run(src, None, Some(dy), config)
}

pub fn edge_gradient_with<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dx: &mut PixelBuffer<T::Signed>,
    dy: &mut PixelBuffer<T::Signed>,
    config: &SobelConfig,
) -> Result<()> {
    run(src, Some(dx), Some(dy), config)
}

/// Output planes of one band, each `row_stride * height` elements.
struct BandJob<'a, S> {
    band: usize,
    dx: Option<&'a mut [S]>,
    dy: Option<&'a mut [S]>,
}

fn run<T: GradientPixel>(
    src: &PixelBuffer<T>,
    dx: Option<&mut PixelBuffer<T::Signed>>,
    dy: Option<&mut PixelBuffer<T::Signed>>,
    config: &SobelConfig,
) -> Result<()> {
    if let Some(out) = dx.as_deref() {
        src.ensure_matched(out)?;
    }
    if let Some(out) = dy.as_deref() {
        src.ensure_matched(out)?;
    }

    let level = config.backend.resolve();
    let dims = src.dimensions();
    let out_stride = dx
        .as_deref()
        .or(dy.as_deref())
        .map_or(src.row_stride(), |out| out.row_stride());

    tracing::debug!(
        "Sobel {:?} on {}: dx={} dy={} level={} parallel={}",
        config.kernel,
        dims,
        dx.is_some(),
        dy.is_some(),
        level,
        config.parallel_bands
    );

    let mut dx_planes = planes(dx, dims.bands);
    let mut dy_planes = planes(dy, dims.bands);
    let jobs: Vec<BandJob<'_, T::Signed>> = (0..dims.bands)
        .map(|band| BandJob {
            band,
            dx: dx_planes[band].take(),
            dy: dy_planes[band].take(),
        })
        .collect();

    let process = |job: BandJob<'_, T::Signed>| {
        sweep_band(src, job.band, job.dx, job.dy, out_stride, level, config.kernel)
    };

    if config.parallel_bands && dims.bands > 1 {
        jobs.into_par_iter().try_for_each(process)
    } else {
        jobs.into_iter().try_for_each(process)
    }
}

fn planes<S: Pixel>(buffer: Option<&mut PixelBuffer<S>>, bands: usize) -> Vec<Option<&mut [S]>> {
    match buffer {
        Some(buffer) => buffer.bands_mut().map(Some).collect(),
        None => (0..bands).map(|_| None).collect(),
    }
}

/// Computes all rows of one band, reading each source row exactly once.
///
/// `dx` and `dy` are whole band planes with rows `out_stride` elements
/// apart.
pub(crate) fn sweep_band<T, S>(
    source: &S,
    band: usize,
    mut dx: Option<&mut [T::Signed]>,
    mut dy: Option<&mut [T::Signed]>,
    out_stride: usize,
    level: SimdLevel,
    kernel: KernelSize,
) -> Result<()>
where
    T: GradientPixel,
    S: LineSource<T> + ?Sized,
{
    let dims = source.dimensions();
    let (width, height) = (dims.width, dims.height);

    let mut emit = |rows: &[&[T]], y: usize| {
        let start = y * out_stride;
        let dx_row = dx.as_deref_mut().map(|plane| &mut plane[start..start + width]);
        let dy_row = dy.as_deref_mut().map(|plane| &mut plane[start..start + width]);
        compute_row(level, kernel, rows, dx_row, dy_row, width);
    };

    match kernel {
        KernelSize::Three => {
            let mut frame = Window3x3::for_image(source)?;
            frame.draft(source, band)?;
            for y in 0..height {
                emit(frame.lines().as_slice(), y);
                if y + 1 < height {
                    frame.shift(source, band)?;
                }
            }
        }
        KernelSize::Five => {
            let mut frame = Window5x5::for_image(source)?;
            frame.draft(source, band)?;
            for y in 0..height {
                emit(frame.lines().as_slice(), y);
                if y + 1 < height {
                    frame.shift(source, band)?;
                }
            }
        }
    }

    Ok(())
}

#[allow(unused_mut, unused_variables)]
fn compute_row<T: GradientPixel>(
    level: SimdLevel,
    kernel: KernelSize,
    rows: &[&[T]],
    mut dx: Option<&mut [T::Signed]>,
    mut dy: Option<&mut [T::Signed]>,
    width: usize,
) {
    #[cfg(feature = "simd")]
    let done = if level.is_vector() {
        simd::gradient_rows(level, kernel, rows, dx.as_deref_mut(), dy.as_deref_mut(), width)
    } else {
        0
    };
    #[cfg(not(feature = "simd"))]
    let done = 0;

    scalar::gradient_span(kernel, rows, dx, dy, done..width);
}
