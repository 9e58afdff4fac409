//! SSE2 and AVX2 gradient kernels.
//!
//! x86 has no 8-bit shift, so `u8` lanes are shifted as 16-bit lanes and the
//! bits carried in from the neighboring byte are masked off.

use crate::sobel::config::KernelSize;

#[allow(unused_unsafe)]
mod sse2_u8 {
    use std::arch::x86_64::*;

    pub const LANES: usize = 16;

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn load(ptr: *const u8) -> __m128i {
        unsafe { _mm_loadu_si128(ptr as *const __m128i) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn store(ptr: *mut i8, v: __m128i) {
        unsafe { _mm_storeu_si128(ptr as *mut __m128i, v) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn shr<const S: i32>(v: __m128i) -> __m128i {
        unsafe { _mm_and_si128(_mm_srli_epi16::<S>(v), _mm_set1_epi8((0xFFu8 >> S) as i8)) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn add(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_add_epi8(a, b) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn sub(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_sub_epi8(a, b) }
    }
}

#[allow(unused_unsafe)]
mod sse2_u16 {
    use std::arch::x86_64::*;

    pub const LANES: usize = 8;

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn load(ptr: *const u16) -> __m128i {
        unsafe { _mm_loadu_si128(ptr as *const __m128i) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn store(ptr: *mut i16, v: __m128i) {
        unsafe { _mm_storeu_si128(ptr as *mut __m128i, v) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn shr<const S: i32>(v: __m128i) -> __m128i {
        unsafe { _mm_srli_epi16::<S>(v) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn add(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_add_epi16(a, b) }
    }

    #[inline]
    #[target_feature(enable = "sse2")]
    pub unsafe fn sub(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_sub_epi16(a, b) }
    }
}

#[allow(unused_unsafe)]
mod avx2_u8 {
    use std::arch::x86_64::*;

    pub const LANES: usize = 32;

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn load(ptr: *const u8) -> __m256i {
        unsafe { _mm256_loadu_si256(ptr as *const __m256i) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn store(ptr: *mut i8, v: __m256i) {
        unsafe { _mm256_storeu_si256(ptr as *mut __m256i, v) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn shr<const S: i32>(v: __m256i) -> __m256i {
        unsafe { _mm256_and_si256(_mm256_srli_epi16::<S>(v), _mm256_set1_epi8((0xFFu8 >> S) as i8)) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_add_epi8(a, b) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn sub(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi8(a, b) }
    }
}

#[allow(unused_unsafe)]
mod avx2_u16 {
    use std::arch::x86_64::*;

    pub const LANES: usize = 16;

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn load(ptr: *const u16) -> __m256i {
        unsafe { _mm256_loadu_si256(ptr as *const __m256i) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn store(ptr: *mut i16, v: __m256i) {
        unsafe { _mm256_storeu_si256(ptr as *mut __m256i, v) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn shr<const S: i32>(v: __m256i) -> __m256i {
        unsafe { _mm256_srli_epi16::<S>(v) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_add_epi16(a, b) }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    pub unsafe fn sub(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_sub_epi16(a, b) }
    }
}

gradient_lanes!(
    /// # Safety
    /// Caller must ensure SSE2 is available and that every row holds at
    /// least `width + 2 * radius` elements and every output `width`.
    #[target_feature(enable = "sse2")]
    gradient_sse2_u8, sse2_u8, u8 => i8
);

gradient_lanes!(
    /// # Safety
    /// Same contract as [`gradient_sse2_u8`].
    #[target_feature(enable = "sse2")]
    gradient_sse2_u16, sse2_u16, u16 => i16
);

gradient_lanes!(
    /// # Safety
    /// Caller must ensure AVX2 is available; buffer contract as
    /// [`gradient_sse2_u8`].
    #[target_feature(enable = "avx2")]
    gradient_avx2_u8, avx2_u8, u8 => i8
);

gradient_lanes!(
    /// # Safety
    /// Same contract as [`gradient_avx2_u8`].
    #[target_feature(enable = "avx2")]
    gradient_avx2_u16, avx2_u16, u16 => i16
);
