//! NEON gradient kernels.

use crate::sobel::config::KernelSize;

#[allow(unused_unsafe)]
mod neon_u8 {
    use std::arch::aarch64::*;

    pub const LANES: usize = 16;

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn load(ptr: *const u8) -> uint8x16_t {
        unsafe { vld1q_u8(ptr) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn store(ptr: *mut i8, v: uint8x16_t) {
        unsafe { vst1q_s8(ptr, vreinterpretq_s8_u8(v)) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn shr<const S: i32>(v: uint8x16_t) -> uint8x16_t {
        unsafe { vshrq_n_u8::<S>(v) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn add(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vaddq_u8(a, b) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn sub(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
        unsafe { vsubq_u8(a, b) }
    }
}

#[allow(unused_unsafe)]
mod neon_u16 {
    use std::arch::aarch64::*;

    pub const LANES: usize = 8;

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn load(ptr: *const u16) -> uint16x8_t {
        unsafe { vld1q_u16(ptr) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn store(ptr: *mut i16, v: uint16x8_t) {
        unsafe { vst1q_s16(ptr, vreinterpretq_s16_u16(v)) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn shr<const S: i32>(v: uint16x8_t) -> uint16x8_t {
        unsafe { vshrq_n_u16::<S>(v) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn add(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
        unsafe { vaddq_u16(a, b) }
    }

    #[inline]
    #[target_feature(enable = "neon")]
    pub unsafe fn sub(a: uint16x8_t, b: uint16x8_t) -> uint16x8_t {
        unsafe { vsubq_u16(a, b) }
    }
}

gradient_lanes!(
    /// # Safety
    /// Every row must hold at least `width + 2 * radius` elements and every
    /// output `width`.
    #[target_feature(enable = "neon")]
    gradient_neon_u8, neon_u8, u8 => i8
);

gradient_lanes!(
    /// # Safety
    /// Same contract as [`gradient_neon_u8`].
    #[target_feature(enable = "neon")]
    gradient_neon_u16, neon_u16, u16 => i16
);
