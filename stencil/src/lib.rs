//! Stencil - strided pixel buffers and sliding-window edge kernels.
//!
//! This library provides:
//! - Aligned, strided, multi-band integer pixel storage
//! - A zero-padded sliding window that reads each source row once per sweep
//! - 3x3 and 5x5 Sobel gradients with scalar and SIMD paths
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stencil::{PixelBuffer, edge_gradient};
//!
//! let image = PixelBuffer::<u8>::from_fn(640, 480, 1, |x, y, _| (x ^ y) as u8)?;
//! let mut dx = PixelBuffer::<i8>::new_like(&image)?;
//! let mut dy = PixelBuffer::<i8>::new_like(&image)?;
//! edge_gradient(&image, &mut dx, &mut dy)?;
//! ```

mod error;
mod pixel;
mod pixel_buffer;
mod sobel;
mod window;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Storage
// ============================================================================

pub use error::{Error, Result};
pub use pixel::{GradientPixel, Pixel};
pub use pixel_buffer::{
    ALIGNMENT, BLUE_BAND, Dimensions, GREEN_BAND, PixelBuffer, RED_BAND, RGB_BANDS, ROW_ALIGNMENT,
};

// ============================================================================
// Windows
// ============================================================================

pub use window::{LineSource, StencilSlice, StencilWindow, Window3x3, Window5x5, WindowRows};

// ============================================================================
// Kernels
// ============================================================================

pub use common::SimdLevel;
pub use sobel::{
    Backend, KernelSize, SobelConfig, edge_gradient, edge_gradient_with, edge_horizontal_gradient,
    edge_horizontal_gradient_with, edge_vertical_gradient, edge_vertical_gradient_with,
};
