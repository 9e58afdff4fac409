//! Vector gradient kernels.
//!
//! Lanes hold unsigned input elements. Each tap is shifted right in its own
//! lane width, taps are summed with wrapping adds and the negative side is
//! subtracted; the bit pattern of the result is then stored as the signed
//! output type. Because the positive and negative sums never exceed the
//! signed maximum, the wrapped result equals the scalar `i32` result
//! narrowed to the output width.
//!
//! Each routine handles the longest prefix of the row that is a multiple of
//! its lane count and returns how many columns it wrote. The scalar path
//! finishes the tail.

use bytemuck::{try_cast_slice, try_cast_slice_mut};
use common::SimdLevel;
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
use common::cpu_features;

use crate::pixel::GradientPixel;

use super::config::KernelSize;

/// Sum of shifted taps `(row, padded offset, shift)` at column `$x`.
macro_rules! taps {
    ($ops:ident, $x:expr; ($row:expr, $off:expr, $s:literal)) => {
        $ops::shr::<$s>($ops::load($row.as_ptr().add($x + $off)))
    };
    ($ops:ident, $x:expr; ($row:expr, $off:expr, $s:literal), $($rest:tt),+) => {
        $ops::add(taps!($ops, $x; ($row, $off, $s)), taps!($ops, $x; $($rest),+))
    };
}

/// Defines a lane routine over the operations in module `$ops`: `load`,
/// `store`, `shr::<S>`, `add` and `sub`, all processing `$ops::LANES`
/// elements.
macro_rules! gradient_lanes {
    ($(#[$attr:meta])* $name:ident, $ops:ident, $elem:ty => $out:ty) => {
        $(#[$attr])*
        pub(super) unsafe fn $name(
            kernel: KernelSize,
            rows: &[&[$elem]],
            dx: Option<&mut [$out]>,
            dy: Option<&mut [$out]>,
            width: usize,
        ) -> usize {
            let dx = dx.map(|out| out.as_mut_ptr());
            let dy = dy.map(|out| out.as_mut_ptr());
            let mut x = 0;

            unsafe {
                match kernel {
                    KernelSize::Three => {
                        let (r0, r1, r2) = (rows[0], rows[1], rows[2]);
                        while x + $ops::LANES <= width {
                            if let Some(out) = dx {
                                let pos = taps!($ops, x; (r0, 2, 3), (r1, 2, 2), (r2, 2, 3));
                                let neg = taps!($ops, x; (r0, 0, 3), (r1, 0, 2), (r2, 0, 3));
                                $ops::store(out.add(x), $ops::sub(pos, neg));
                            }
                            if let Some(out) = dy {
                                let pos = taps!($ops, x; (r2, 0, 3), (r2, 1, 2), (r2, 2, 3));
                                let neg = taps!($ops, x; (r0, 0, 3), (r0, 1, 2), (r0, 2, 3));
                                $ops::store(out.add(x), $ops::sub(pos, neg));
                            }
                            x += $ops::LANES;
                        }
                    }
                    KernelSize::Five => {
                        let (r0, r1, r2, r3, r4) = (rows[0], rows[1], rows[2], rows[3], rows[4]);
                        while x + $ops::LANES <= width {
                            if let Some(out) = dx {
                                let pos = taps!($ops, x;
                                    (r0, 3, 6), (r0, 4, 7), (r1, 3, 4), (r1, 4, 5), (r2, 3, 3),
                                    (r2, 4, 4), (r3, 3, 4), (r3, 4, 5), (r4, 3, 6), (r4, 4, 7));
                                let neg = taps!($ops, x;
                                    (r0, 1, 6), (r0, 0, 7), (r1, 1, 4), (r1, 0, 5), (r2, 1, 3),
                                    (r2, 0, 4), (r3, 1, 4), (r3, 0, 5), (r4, 1, 6), (r4, 0, 7));
                                $ops::store(out.add(x), $ops::sub(pos, neg));
                            }
                            if let Some(out) = dy {
                                let pos = taps!($ops, x;
                                    (r3, 0, 6), (r4, 0, 7), (r3, 1, 4), (r4, 1, 5), (r3, 2, 3),
                                    (r4, 2, 4), (r3, 3, 4), (r4, 3, 5), (r3, 4, 6), (r4, 4, 7));
                                let neg = taps!($ops, x;
                                    (r1, 0, 6), (r0, 0, 7), (r1, 1, 4), (r0, 1, 5), (r1, 2, 3),
                                    (r0, 2, 4), (r1, 3, 4), (r0, 3, 5), (r1, 4, 6), (r0, 4, 7));
                                $ops::store(out.add(x), $ops::sub(pos, neg));
                            }
                            x += $ops::LANES;
                        }
                    }
                }
            }

            x
        }
    };
}

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod sse;


/// Runs the vector kernel for `level` over the leading columns of one row.
///
/// Returns the number of columns written, which is a multiple of the lane
/// count and may be zero. Returns zero when `level` is not supported by the
/// host or the inputs are shorter than `width` requires.
pub(crate) fn gradient_rows<T: GradientPixel>(
    level: SimdLevel,
    kernel: KernelSize,
    rows: &[&[T]],
    dx: Option<&mut [T::Signed]>,
    dy: Option<&mut [T::Signed]>,
    width: usize,
) -> usize {
    let padded = width + 2 * kernel.radius();
    if rows.len() != kernel.size()
        || rows.iter().any(|row| row.len() < padded)
        || dx.as_deref().is_some_and(|out| out.len() < width)
        || dy.as_deref().is_some_and(|out| out.len() < width)
    {
        debug_assert!(false, "gradient rows shorter than width {}", width);
        return 0;
    }

    match size_of::<T>() {
        1 => match (cast_rows::<T, u8>(rows), cast_out::<T, i8>(dx), cast_out::<T, i8>(dy)) {
            (Some((rows, count)), Some(dx), Some(dy)) => {
                gradient_u8(level, kernel, &rows[..count], dx, dy, width)
            }
            _ => 0,
        },
        2 => match (cast_rows::<T, u16>(rows), cast_out::<T, i16>(dx), cast_out::<T, i16>(dy)) {
            (Some((rows, count)), Some(dx), Some(dy)) => {
                gradient_u16(level, kernel, &rows[..count], dx, dy, width)
            }
            _ => 0,
        },
        _ => 0,
    }
}

fn cast_rows<'a, T: GradientPixel, U: bytemuck::Pod>(rows: &[&'a [T]]) -> Option<([&'a [U]; 5], usize)> {
    let mut out: [&[U]; 5] = [&[]; 5];
    if rows.len() > out.len() {
        return None;
    }
    for (dst, &row) in out.iter_mut().zip(rows) {
        *dst = try_cast_slice::<T, U>(row).ok()?;
    }
    Some((out, rows.len()))
}

/// `Some(None)` for an absent output, `None` if the cast fails.
#[allow(clippy::option_option)]
fn cast_out<T: GradientPixel, U: bytemuck::Pod>(out: Option<&mut [T::Signed]>) -> Option<Option<&mut [U]>> {
    match out {
        Some(out) => try_cast_slice_mut(out).ok().map(Some),
        None => Some(None),
    }
}

#[allow(unused_variables)]
fn gradient_u8(
    level: SimdLevel,
    kernel: KernelSize,
    rows: &[&[u8]],
    dx: Option<&mut [i8]>,
    dy: Option<&mut [i8]>,
    width: usize,
) -> usize {
    match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if cpu_features::has_avx2() => unsafe {
            sse::gradient_avx2_u8(kernel, rows, dx, dy, width)
        },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Sse2 if cpu_features::has_sse2() => unsafe {
            sse::gradient_sse2_u8(kernel, rows, dx, dy, width)
        },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if cpu_features::has_neon() => unsafe {
            neon::gradient_neon_u8(kernel, rows, dx, dy, width)
        },
        _ => 0,
    }
}

#[allow(unused_variables)]
fn gradient_u16(
    level: SimdLevel,
    kernel: KernelSize,
    rows: &[&[u16]],
    dx: Option<&mut [i16]>,
    dy: Option<&mut [i16]>,
    width: usize,
) -> usize {
    match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if cpu_features::has_avx2() => unsafe {
            sse::gradient_avx2_u16(kernel, rows, dx, dy, width)
        },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Sse2 if cpu_features::has_sse2() => unsafe {
            sse::gradient_sse2_u16(kernel, rows, dx, dy, width)
        },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon if cpu_features::has_neon() => unsafe {
            neon::gradient_neon_u16(kernel, rows, dx, dy, width)
        },
        _ => 0,
    }
}
