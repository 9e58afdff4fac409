//! Pixel element types.
//!
//! Buffers are generic over a small closed set of fixed-width integers:
//! 8- and 16-bit, signed and unsigned.

use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::{PrimInt, Signed, Unsigned};

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
}

/// A fixed-width integer element stored in a [`PixelBuffer`](crate::PixelBuffer).
pub trait Pixel: sealed::Sealed + PrimInt + Pod + Default + Debug + Send + Sync + 'static {}

impl Pixel for u8 {}
impl Pixel for i8 {}
impl Pixel for u16 {}
impl Pixel for i16 {}

/// Unsigned input element of a gradient kernel, paired with the signed
/// element of the same width that the kernel writes.
pub trait GradientPixel: Pixel + Unsigned {
    type Signed: Pixel + Signed;

    fn widen(self) -> i32;

    /// Truncating conversion to the signed output width.
    fn narrow(value: i32) -> Self::Signed;
}

impl GradientPixel for u8 {
    type Signed = i8;

    #[inline(always)]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline(always)]
    fn narrow(value: i32) -> i8 {
        value as i8
    }
}

impl GradientPixel for u16 {
    type Signed = i16;

    #[inline(always)]
    fn widen(self) -> i32 {
        self as i32
    }

    #[inline(always)]
    fn narrow(value: i32) -> i16 {
        value as i16
    }
}
