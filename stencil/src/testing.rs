//! Shared helpers for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use num_traits::NumCast;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::pixel::{GradientPixel, Pixel};
use crate::pixel_buffer::{Dimensions, PixelBuffer};
use crate::sobel::KernelSize;
use crate::window::LineSource;

/// Buffer of uniformly random pixels covering the full range of `T`.
pub(crate) fn random_image<T: GradientPixel>(
    width: usize,
    height: usize,
    bands: usize,
    seed: u64,
) -> PixelBuffer<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    PixelBuffer::from_fn(width, height, bands, |_, _, _| random_pixel(&mut rng)).unwrap()
}

pub(crate) fn random_row<T: GradientPixel>(len: usize, rng: &mut StdRng) -> Vec<T> {
    (0..len).map(|_| random_pixel(rng)).collect()
}

fn random_pixel<T: GradientPixel>(rng: &mut StdRng) -> T {
    let bits = 8 * size_of::<T>();
    let value: u64 = rng.random();
    <T as NumCast>::from(value >> (64 - bits)).unwrap()
}

/// Line source that counts how often every row of every band is read.
pub(crate) struct CountingSource<'a, T: Pixel> {
    inner: &'a PixelBuffer<T>,
    reads: Vec<AtomicUsize>,
}

impl<'a, T: Pixel> CountingSource<'a, T> {
    pub(crate) fn new(inner: &'a PixelBuffer<T>) -> Self {
        let rows = inner.height() * inner.bands();
        Self {
            inner,
            reads: (0..rows).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    pub(crate) fn reads(&self, y: usize, band: usize) -> usize {
        self.reads[band * self.inner.height() + y].load(Ordering::Relaxed)
    }

    pub(crate) fn total_reads(&self) -> usize {
        self.reads.iter().map(|r| r.load(Ordering::Relaxed)).sum()
    }
}

impl<T: Pixel> LineSource<T> for CountingSource<'_, T> {
    fn dimensions(&self) -> Dimensions {
        self.inner.dimensions()
    }

    fn read_horizontal_line(
        &self,
        dest: &mut [T],
        x: usize,
        y: usize,
        band: usize,
    ) -> Result<usize> {
        let copied = self.inner.read_horizontal_line(dest, x, y, band)?;
        self.reads[band * self.inner.height() + y].fetch_add(1, Ordering::Relaxed);
        Ok(copied)
    }
}

/// Positive-side taps `(along, across, shift)` of the horizontal kernel.
/// The negative side mirrors `along`; the vertical kernel swaps the axes.
fn positive_taps(kernel: KernelSize) -> Vec<(isize, isize, u32)> {
    match kernel {
        KernelSize::Three => vec![(1, -1, 3), (1, 0, 2), (1, 1, 3)],
        KernelSize::Five => {
            let near = [3, 4, 6];
            let far = [4, 5, 7];
            (-2isize..=2)
                .flat_map(|across| {
                    let d = across.unsigned_abs();
                    [(1, across, near[d]), (2, across, far[d])]
                })
                .collect()
        }
    }
}

fn padded_pixel<T: GradientPixel>(src: &PixelBuffer<T>, x: isize, y: isize, band: usize) -> i32 {
    if x < 0 || y < 0 {
        return 0;
    }
    src.pixel(x as usize, y as usize, band)
        .map(|v| v.widen())
        .unwrap_or(0)
}

/// Direct evaluation of the gradient with zero padding, one pixel at a time.
pub(crate) fn reference_gradient<T: GradientPixel>(
    src: &PixelBuffer<T>,
    kernel: KernelSize,
    vertical: bool,
) -> PixelBuffer<T::Signed> {
    let taps = positive_taps(kernel);
    let mut out = PixelBuffer::<T::Signed>::new_like(src).unwrap();
    for band in 0..src.bands() {
        for y in 0..src.height() as isize {
            for x in 0..src.width() as isize {
                let mut sum = 0;
                for &(along, across, shift) in &taps {
                    let (ox, oy) = if vertical { (across, along) } else { (along, across) };
                    sum += padded_pixel(src, x + ox, y + oy, band) >> shift;
                    sum -= padded_pixel(src, x - ox, y - oy, band) >> shift;
                }
                out.put_pixel(T::narrow(sum), x as usize, y as usize, band)
                    .unwrap();
            }
        }
    }
    out
}
