use common::SimdLevel;
use common::cpu_features;

/// Stencil footprint of the gradient kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelSize {
    /// 3x3 Sobel with power-of-two shift weights.
    #[default]
    Three,
    /// 5x5 extension with the same weighting scheme.
    Five,
}

impl KernelSize {
    /// Padding needed on every side of the window.
    pub const fn radius(self) -> usize {
        match self {
            KernelSize::Three => 1,
            KernelSize::Five => 2,
        }
    }

    /// Rows (and columns) the kernel reads.
    pub const fn size(self) -> usize {
        2 * self.radius() + 1
    }
}

/// Which implementation computes each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Widest vector level detected at runtime.
    #[default]
    Auto,
    /// Portable per-pixel code.
    Scalar,
    /// Vector path if the host has one, scalar otherwise.
    Simd,
    /// One specific instruction set, scalar if the host lacks it.
    Level(SimdLevel),
}

impl Backend {
    /// Level the kernels will actually run at on this host.
    pub fn resolve(self) -> SimdLevel {
        if !cfg!(feature = "simd") {
            if !matches!(self, Backend::Scalar | Backend::Auto) {
                tracing::debug!("Vector kernels not compiled in, using scalar path");
            }
            return SimdLevel::Scalar;
        }

        match self {
            Backend::Scalar => SimdLevel::Scalar,
            Backend::Auto => cpu_features::best_level(),
            Backend::Simd => {
                let level = cpu_features::best_level();
                if !level.is_vector() {
                    tracing::debug!("No vector unit detected, using scalar path");
                }
                level
            }
            Backend::Level(level) => {
                if is_supported(level) {
                    level
                } else {
                    tracing::debug!("SIMD level {} unavailable, using scalar path", level);
                    SimdLevel::Scalar
                }
            }
        }
    }
}

fn is_supported(level: SimdLevel) -> bool {
    match level {
        SimdLevel::Scalar => true,
        SimdLevel::Sse2 => cpu_features::has_sse2(),
        SimdLevel::Avx2 => cpu_features::has_avx2(),
        SimdLevel::Neon => cpu_features::has_neon(),
    }
}

/// Gradient kernel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SobelConfig {
    pub kernel: KernelSize,
    pub backend: Backend,
    /// Process bands concurrently, one window per band.
    pub parallel_bands: bool,
}

impl Default for SobelConfig {
    fn default() -> Self {
        Self {
            kernel: KernelSize::Three,
            backend: Backend::Auto,
            parallel_bands: true,
        }
    }
}

impl SobelConfig {
    pub fn with_kernel(mut self, kernel: KernelSize) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_parallel_bands(mut self, parallel_bands: bool) -> Self {
        self.parallel_bands = parallel_bands;
        self
    }
}
