//! Strided, multi-band pixel storage.
//!
//! Bands are stored planar: band `z` starts at `z * band_stride`, row `y` of
//! that band at `y * row_stride`. Every row starts on a [`ROW_ALIGNMENT`]
//! byte boundary and the whole allocation on an [`ALIGNMENT`] boundary, so
//! vector loads can read rows directly.


use std::fmt;
use std::mem::size_of;
use std::slice::ChunksExactMut;

use aligned_vec::{AVec, ConstAlign};

use crate::error::{Error, Result};
use crate::pixel::Pixel;

/// Alignment of the start of every allocation, in bytes.
pub const ALIGNMENT: usize = 32;

/// Alignment of the start of every row, in bytes.
pub const ROW_ALIGNMENT: usize = 8;

/// Band index conventions for three-band color imagery.
pub const BLUE_BAND: usize = 0;
pub const GREEN_BAND: usize = 1;
pub const RED_BAND: usize = 2;
pub const RGB_BANDS: usize = 3;

pub(crate) type AlignedStorage<T> = AVec<T, ConstAlign<ALIGNMENT>>;

/// Rounds a byte count up to [`ROW_ALIGNMENT`]. `None` on overflow.
pub(crate) fn align_stride(bytes: usize) -> Option<usize> {
    bytes
        .checked_add(ROW_ALIGNMENT - 1)
        .map(|b| b & !(ROW_ALIGNMENT - 1))
}

pub(crate) fn zeroed_storage<T: Pixel>(len: usize) -> AlignedStorage<T> {
    let mut storage = AVec::with_capacity(ALIGNMENT, len);
    storage.resize(len, T::zero());
    storage
}

/// Width, height and band count of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize, bands: usize) -> Self {
        Self {
            width,
            height,
            bands,
        }
    }

    /// Whether `(x, y, band)` lies inside these dimensions.
    #[inline]
    pub fn contains(&self, x: usize, y: usize, band: usize) -> bool {
        x < self.width && y < self.height && band < self.bands
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.bands)
    }
}

/// Row and band strides, in elements, plus the total element count.
#[derive(Debug, Clone, Copy)]
struct Layout {
    row_stride: usize,
    band_stride: usize,
    len: usize,
}

impl Layout {
    fn compute<T: Pixel>(dims: Dimensions) -> Result<Self> {
        let invalid = |reason| Error::InvalidDimension {
            width: dims.width,
            height: dims.height,
            bands: dims.bands,
            reason,
        };

        if dims.width == 0 || dims.height == 0 || dims.bands == 0 {
            return Err(invalid("every extent must be non-zero"));
        }

        let elem = size_of::<T>();
        let row_bytes = dims
            .width
            .checked_mul(elem)
            .and_then(align_stride)
            .ok_or_else(|| invalid("row size overflows"))?;
        let band_bytes = row_bytes
            .checked_mul(dims.height)
            .ok_or_else(|| invalid("band size overflows"))?;
        let total_bytes = band_bytes
            .checked_mul(dims.bands)
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| invalid("buffer size overflows"))?;

        Ok(Self {
            row_stride: row_bytes / elem,
            band_stride: band_bytes / elem,
            len: total_bytes / elem,
        })
    }
}

/// Owned `width x height x bands` array of fixed-width integer pixels.
///
/// Storage is zero-initialized and exclusively owned. Resizing reallocates,
/// which the borrow checker already requires to happen with no outstanding
/// row borrows.
#[derive(Debug, Clone)]
pub struct PixelBuffer<T: Pixel> {
    dims: Dimensions,
    row_stride: usize,
    band_stride: usize,
    data: AlignedStorage<T>,
}

impl<T: Pixel> PixelBuffer<T> {
    /// Allocates a zeroed buffer.
    pub fn new(width: usize, height: usize, bands: usize) -> Result<Self> {
        let dims = Dimensions::new(width, height, bands);
        let layout = Layout::compute::<T>(dims)?;

        Ok(Self {
            dims,
            row_stride: layout.row_stride,
            band_stride: layout.band_stride,
            data: zeroed_storage(layout.len),
        })
    }

    /// Allocates a zeroed buffer with the same geometry as `other`.
    pub fn new_like<U: Pixel>(other: &PixelBuffer<U>) -> Result<Self> {
        Self::new(other.width(), other.height(), other.bands())
    }

    /// Builds a buffer by evaluating `f(x, y, band)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, bands: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut buffer = Self::new(width, height, bands)?;
        for z in 0..bands {
            for y in 0..height {
                let start = buffer.offset(0, y, z);
                let row = &mut buffer.data[start..start + width];
                for (x, px) in row.iter_mut().enumerate() {
                    *px = f(x, y, z);
                }
            }
        }
        Ok(buffer)
    }

    /// Reallocates to a new geometry. Contents are reset to zero.
    pub fn resize(&mut self, width: usize, height: usize, bands: usize) -> Result<()> {
        let dims = Dimensions::new(width, height, bands);
        let layout = Layout::compute::<T>(dims)?;

        self.dims = dims;
        self.row_stride = layout.row_stride;
        self.band_stride = layout.band_stride;
        self.data = zeroed_storage(layout.len);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn bands(&self) -> usize {
        self.dims.bands
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Distance between consecutive rows, in elements.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Distance between consecutive rows, in bytes.
    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.row_stride * size_of::<T>()
    }

    /// Distance between consecutive bands, in bytes.
    #[inline]
    pub fn band_stride_bytes(&self) -> usize {
        self.band_stride * size_of::<T>()
    }

    /// Whether `other` has identical width, height and band count.
    pub fn is_matched<U: Pixel>(&self, other: &PixelBuffer<U>) -> bool {
        self.dims == other.dims
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` matches.
    pub fn ensure_matched<U: Pixel>(&self, other: &PixelBuffer<U>) -> Result<()> {
        if self.is_matched(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dims,
                actual: other.dims,
            })
        }
    }

    /// The whole backing storage, padding included.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, band: usize) -> usize {
        band * self.band_stride + y * self.row_stride + x
    }

    fn check(&self, context: &'static str, x: usize, y: usize, band: usize) -> Result<()> {
        if self.dims.contains(x, y, band) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                context,
                x: x as isize,
                y: y as isize,
                band,
            })
        }
    }

    /// Plane of `band`, including row padding.
    pub fn band(&self, band: usize) -> Result<&[T]> {
        self.check("Band", 0, 0, band)?;
        let start = band * self.band_stride;
        Ok(&self.data[start..start + self.band_stride])
    }

    pub fn band_mut(&mut self, band: usize) -> Result<&mut [T]> {
        self.check("Band", 0, 0, band)?;
        let start = band * self.band_stride;
        Ok(&mut self.data[start..start + self.band_stride])
    }

    /// Disjoint mutable planes, one per band, for band-parallel writers.
    pub fn bands_mut(&mut self) -> ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.band_stride)
    }

    /// The `width` visible pixels of row `y` in `band`.
    pub fn line(&self, y: usize, band: usize) -> Result<&[T]> {
        self.check("Line", 0, y, band)?;
        let start = self.offset(0, y, band);
        Ok(&self.data[start..start + self.dims.width])
    }

    pub fn line_mut(&mut self, y: usize, band: usize) -> Result<&mut [T]> {
        self.check("Line", 0, y, band)?;
        let start = self.offset(0, y, band);
        let width = self.dims.width;
        Ok(&mut self.data[start..start + width])
    }

    pub fn pixel(&self, x: usize, y: usize, band: usize) -> Result<T> {
        self.check("Pixel", x, y, band)?;
        Ok(self.data[self.offset(x, y, band)])
    }

    pub fn put_pixel(&mut self, value: T, x: usize, y: usize, band: usize) -> Result<()> {
        self.check("Pixel", x, y, band)?;
        let index = self.offset(x, y, band);
        self.data[index] = value;
        Ok(())
    }

    /// Sets every visible pixel of every band to `value`. Row padding is
    /// left untouched.
    pub fn fill(&mut self, value: T) {
        let width = self.dims.width;
        for plane in self.data.chunks_exact_mut(self.band_stride) {
            for row in plane.chunks_exact_mut(self.row_stride) {
                row[..width].fill(value);
            }
        }
    }

    /// Copies pixels along row `y` starting at column `x` into `dest`.
    ///
    /// Copies `min(dest.len(), width - x)` elements and returns that count;
    /// a request running past the right edge is truncated, not rejected.
    pub fn read_horizontal_line(
        &self,
        dest: &mut [T],
        x: usize,
        y: usize,
        band: usize,
    ) -> Result<usize> {
        self.check("Horizontal line", x, y, band)?;
        let count = dest.len().min(self.dims.width - x);
        let start = self.offset(x, y, band);
        dest[..count].copy_from_slice(&self.data[start..start + count]);
        Ok(count)
    }

    /// Copies pixels down column `x` starting at row `y` into `dest`.
    ///
    /// Copies `min(dest.len(), height - y)` elements and returns that count.
    pub fn read_vertical_line(
        &self,
        dest: &mut [T],
        x: usize,
        y: usize,
        band: usize,
    ) -> Result<usize> {
        self.check("Vertical line", x, y, band)?;
        let count = dest.len().min(self.dims.height - y);
        let start = self.offset(x, y, band);
        for (i, out) in dest[..count].iter_mut().enumerate() {
            *out = self.data[start + i * self.row_stride];
        }
        Ok(count)
    }
}
