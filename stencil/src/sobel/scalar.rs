//! Portable gradient kernels.
//!
//! Every tap is shifted right before it is summed, so the sum of positive
//! taps stays below half the input range and the difference fits the signed
//! output type of the same width.

use std::ops::Range;

use crate::pixel::GradientPixel;

use super::config::KernelSize;

/// Shift for the near (`±1`) and far (`±2`) taps of the 5x5 kernel,
/// indexed by distance `0..=2` from the center along the other axis.
const NEAR_SHIFT_5: [u32; 3] = [3, 4, 6];
const FAR_SHIFT_5: [u32; 3] = [4, 5, 7];

#[inline(always)]
fn tap<T: GradientPixel>(row: &[T], index: usize, shift: u32) -> i32 {
    row[index].widen() >> shift
}

/// Horizontal gradient at padded column `c` of three rows.
#[inline(always)]
fn dx3<T: GradientPixel>(rows: &[&[T]], c: usize) -> i32 {
    let [n, m, s] = [rows[0], rows[1], rows[2]];
    -tap(n, c - 1, 3) + tap(n, c + 1, 3) - tap(m, c - 1, 2) + tap(m, c + 1, 2) - tap(s, c - 1, 3)
        + tap(s, c + 1, 3)
}

/// Vertical gradient at padded column `c` of three rows.
#[inline(always)]
fn dy3<T: GradientPixel>(rows: &[&[T]], c: usize) -> i32 {
    let [n, s] = [rows[0], rows[2]];
    -tap(n, c - 1, 3) - tap(n, c, 2) - tap(n, c + 1, 3) + tap(s, c - 1, 3) + tap(s, c, 2)
        + tap(s, c + 1, 3)
}

#[inline(always)]
fn dx5<T: GradientPixel>(rows: &[&[T]], c: usize) -> i32 {
    let mut sum = 0;
    for (r, row) in rows.iter().enumerate() {
        let d = r.abs_diff(2);
        let (near, far) = (NEAR_SHIFT_5[d], FAR_SHIFT_5[d]);
        sum += tap(row, c + 1, near) + tap(row, c + 2, far) - tap(row, c - 1, near) - tap(row, c - 2, far);
    }
    sum
}

#[inline(always)]
fn dy5<T: GradientPixel>(rows: &[&[T]], c: usize) -> i32 {
    let mut sum = 0;
    for k in 0usize..5 {
        let d = k.abs_diff(2);
        let (near, far) = (NEAR_SHIFT_5[d], FAR_SHIFT_5[d]);
        let col = c + k - 2;
        sum += tap(rows[3], col, near) + tap(rows[4], col, far) - tap(rows[1], col, near) - tap(rows[0], col, far);
    }
    sum
}

/// Computes output columns `range` of one row.
///
/// `rows` are the `kernel.size()` padded window lines, top to bottom, so
/// output column `x` is centered on padded index `x + radius`. Outputs are
/// indexed by image column.
pub(crate) fn gradient_span<T: GradientPixel>(
    kernel: KernelSize,
    rows: &[&[T]],
    mut dx: Option<&mut [T::Signed]>,
    mut dy: Option<&mut [T::Signed]>,
    range: Range<usize>,
) {
    let radius = kernel.radius();
    debug_assert_eq!(rows.len(), kernel.size());

    for x in range {
        let c = x + radius;
        if let Some(out) = dx.as_deref_mut() {
            let value = match kernel {
                KernelSize::Three => dx3(rows, c),
                KernelSize::Five => dx5(rows, c),
            };
            out[x] = T::narrow(value);
        }
        if let Some(out) = dy.as_deref_mut() {
            let value = match kernel {
                KernelSize::Three => dy3(rows, c),
                KernelSize::Five => dy5(rows, c),
            };
            out[x] = T::narrow(value);
        }
    }
}
