//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once per process and is cached. Kernels should ask this
//! module instead of calling `is_x86_feature_detected!` in hot paths.

use std::fmt;
use std::sync::OnceLock;

/// Widest vector instruction set usable for integer lane arithmetic.
///
/// Ordered from narrowest to widest so levels can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SimdLevel {
    /// No vector unit; portable per-pixel code only.
    Scalar,
    /// 128-bit SSE2 (always present on x86_64).
    Sse2,
    /// 256-bit AVX2.
    Avx2,
    /// 128-bit NEON (always present on aarch64).
    Neon,
}

impl SimdLevel {
    /// Register width in bytes, or 0 for [`SimdLevel::Scalar`].
    pub fn register_bytes(self) -> usize {
        match self {
            SimdLevel::Scalar => 0,
            SimdLevel::Sse2 | SimdLevel::Neon => 16,
            SimdLevel::Avx2 => 32,
        }
    }

    pub fn is_vector(self) -> bool {
        self != SimdLevel::Scalar
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimdLevel::Scalar => "scalar",
            SimdLevel::Sse2 => "sse2",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Neon => "neon",
        };
        f.write_str(name)
    }
}

/// CPU feature flags detected once at startup.
#[derive(Debug, Clone, Copy)]
pub struct CpuFeatures {
    pub sse2: bool,
    pub avx2: bool,
    pub neon: bool,
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Get cached CPU features (detected once on first call).
#[inline]
pub fn get() -> CpuFeatures {
    *FEATURES.get_or_init(|| {
        let features = detect();
        tracing::debug!(
            "Detected CPU features: sse2={} avx2={} neon={}",
            features.sse2,
            features.avx2,
            features.neon
        );
        features
    })
}

#[cfg(target_arch = "x86_64")]
fn detect() -> CpuFeatures {
    CpuFeatures {
        sse2: is_x86_feature_detected!("sse2"),
        avx2: is_x86_feature_detected!("avx2"),
        neon: false,
    }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> CpuFeatures {
    CpuFeatures {
        sse2: false,
        avx2: false,
        neon: true,
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> CpuFeatures {
    CpuFeatures {
        sse2: false,
        avx2: false,
        neon: false,
    }
}

/// Check if SSE2 is available.
#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}

/// Check if AVX2 is available.
#[inline]
pub fn has_avx2() -> bool {
    get().avx2
}

/// Check if NEON is available.
#[inline]
pub fn has_neon() -> bool {
    get().neon
}

/// Widest vector level available on this host.
#[inline]
pub fn best_level() -> SimdLevel {
    let f = get();
    if f.avx2 {
        SimdLevel::Avx2
    } else if f.sse2 {
        SimdLevel::Sse2
    } else if f.neon {
        SimdLevel::Neon
    } else {
        SimdLevel::Scalar
    }
}
