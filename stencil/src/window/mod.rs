//! Sliding, zero-padded row windows over a pixel source.
//!
//! A [`StencilWindow`] holds `height + 2 * v_pad` lines, each
//! `width + 2 * h_pad` elements long, copied out of a source band. Lines
//! live in a ring of fixed slots: advancing the window by `n` rows moves the
//! ring head and refills only the `n` slots that became the bottom lines, so
//! a top-to-bottom sweep reads every source row exactly once regardless of
//! the window height.

mod views;


pub use views::{StencilSlice, Window3x3, Window5x5};

use std::mem::size_of;

use crate::error::{Error, Result};
use crate::pixel::Pixel;
use crate::pixel_buffer::{AlignedStorage, Dimensions, PixelBuffer, align_stride, zeroed_storage};

/// Read access to rows of a banded image.
pub trait LineSource<T: Pixel> {
    fn dimensions(&self) -> Dimensions;

    /// Copies up to `dest.len()` pixels of row `y` starting at column `x`,
    /// truncated at the right edge. Returns the number copied.
    fn read_horizontal_line(&self, dest: &mut [T], x: usize, y: usize, band: usize)
    -> Result<usize>;
}

impl<T: Pixel> LineSource<T> for PixelBuffer<T> {
    fn dimensions(&self) -> Dimensions {
        PixelBuffer::dimensions(self)
    }

    fn read_horizontal_line(
        &self,
        dest: &mut [T],
        x: usize,
        y: usize,
        band: usize,
    ) -> Result<usize> {
        PixelBuffer::read_horizontal_line(self, dest, x, y, band)
    }
}

/// Logical line access used by the fixed-size frame views.
///
/// Logical line 0 is the top of the window. Line order follows the ring, so
/// callers must re-fetch lines after every advance.
pub trait WindowRows<T: Pixel> {
    fn line_count(&self) -> usize;

    /// Unchecked access for kernel loops.
    ///
    /// # Panics
    /// Panics if `index >= line_count()`.
    fn logical_line(&self, index: usize) -> &[T];
}

/// Fixed-height ring of zero-padded lines copied from one band of a source.
#[derive(Debug, Clone)]
pub struct StencilWindow<T: Pixel> {
    width: usize,
    height: usize,
    h_pad: usize,
    v_pad: usize,
    line_len: usize,
    line_stride: usize,
    lines: usize,
    origin_x: isize,
    origin_y: isize,
    head: usize,
    drafted: bool,
    storage: AlignedStorage<T>,
}

impl<T: Pixel> StencilWindow<T> {
    /// Creates a window whose useful region is `width x height`, surrounded
    /// by `h_pad` columns and `v_pad` lines of padding on each side.
    pub fn new(width: usize, height: usize, h_pad: usize, v_pad: usize) -> Result<Self> {
        let mut window = Self {
            width: 0,
            height: 0,
            h_pad: 0,
            v_pad: 0,
            line_len: 0,
            line_stride: 0,
            lines: 0,
            origin_x: 0,
            origin_y: 0,
            head: 0,
            drafted: false,
            storage: zeroed_storage(0),
        };
        window.configure(width, height, h_pad, v_pad)?;
        Ok(window)
    }

    /// Reallocates the ring for a new geometry, discarding all content.
    pub fn configure(&mut self, width: usize, height: usize, h_pad: usize, v_pad: usize) -> Result<()> {
        let invalid = |reason| Error::InvalidDimension {
            width,
            height,
            bands: 1,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(invalid("window content must be non-empty"));
        }

        let line_len = h_pad
            .checked_mul(2)
            .and_then(|pad| pad.checked_add(width))
            .ok_or_else(|| invalid("line length overflows"))?;
        let lines = v_pad
            .checked_mul(2)
            .and_then(|pad| pad.checked_add(height))
            .ok_or_else(|| invalid("line count overflows"))?;
        let line_bytes = line_len
            .checked_mul(size_of::<T>())
            .and_then(align_stride)
            .ok_or_else(|| invalid("line size overflows"))?;
        let line_stride = line_bytes / size_of::<T>();
        let total = line_stride
            .checked_mul(lines)
            .filter(|&len| len.saturating_mul(size_of::<T>()) <= isize::MAX as usize)
            .ok_or_else(|| invalid("window size overflows"))?;

        tracing::trace!(
            "Configuring stencil window {}x{} with padding ({}, {}): {} lines of {} elements",
            width,
            height,
            h_pad,
            v_pad,
            lines,
            line_len
        );

        self.width = width;
        self.height = height;
        self.h_pad = h_pad;
        self.v_pad = v_pad;
        self.line_len = line_len;
        self.line_stride = line_stride;
        self.lines = lines;
        self.origin_x = 0;
        self.origin_y = 0;
        self.head = 0;
        self.drafted = false;
        self.storage = zeroed_storage(total);
        Ok(())
    }

    /// Loads the window so that its useful region starts at image
    /// coordinates `(x, y)`. Everything outside the source is zero.
    pub fn draft<S>(&mut self, source: &S, x: usize, y: usize, band: usize) -> Result<()>
    where
        S: LineSource<T> + ?Sized,
    {
        let dims = source.dimensions();
        if !dims.contains(x, y, band) {
            return Err(Error::OutOfRange {
                context: "Window draft",
                x: x as isize,
                y: y as isize,
                band,
            });
        }

        self.origin_x = x as isize - self.h_pad as isize;
        self.origin_y = y as isize - self.v_pad as isize;
        self.head = 0;
        self.storage.fill(T::zero());

        for index in 0..self.lines {
            self.load_line(source, dims, index, band)?;
        }

        self.drafted = true;
        Ok(())
    }

    /// Moves the window down by `n` rows.
    ///
    /// The top `n` lines are recycled as the new bottom lines and refilled
    /// from the source (or zeroed past its bottom edge). The other lines are
    /// not touched.
    pub fn advance<S>(&mut self, n: usize, source: &S, band: usize) -> Result<()>
    where
        S: LineSource<T> + ?Sized,
    {
        if !self.drafted {
            return Err(Error::NotDrafted);
        }
        if n > self.lines {
            return Err(Error::InvalidAdvance {
                requested: n,
                capacity: self.lines,
            });
        }

        let dims = source.dimensions();
        if band >= dims.bands {
            return Err(Error::OutOfRange {
                context: "Window advance",
                x: self.origin_x,
                y: self.origin_y,
                band,
            });
        }
        if n == 0 {
            return Ok(());
        }

        self.head = (self.head + n) % self.lines;
        self.origin_y += n as isize;

        for index in self.lines - n..self.lines {
            self.load_line(source, dims, index, band)?;
        }
        Ok(())
    }

    /// Refills logical line `index` for the current origin.
    fn load_line<S>(&mut self, source: &S, dims: Dimensions, index: usize, band: usize) -> Result<()>
    where
        S: LineSource<T> + ?Sized,
    {
        let row = self.origin_y + index as isize;
        let h_offset = (self.origin_x.max(0) - self.origin_x) as usize;
        let src_x = self.origin_x + h_offset as isize;
        let slot = self.slot_mut(index);

        if row < 0 || row as usize >= dims.height || src_x as usize >= dims.width {
            slot.fill(T::zero());
            return Ok(());
        }

        slot[..h_offset].fill(T::zero());
        let copied = source.read_horizontal_line(&mut slot[h_offset..], src_x as usize, row as usize, band)?;
        slot[h_offset + copied..].fill(T::zero());
        Ok(())
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        debug_assert!(index < self.lines);
        let slot = self.head + index;
        if slot >= self.lines { slot - self.lines } else { slot }
    }

    #[inline]
    fn slot(&self, index: usize) -> &[T] {
        let start = self.physical(index) * self.line_stride;
        &self.storage[start..start + self.line_len]
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> &mut [T] {
        let start = self.physical(index) * self.line_stride;
        let len = self.line_len;
        &mut self.storage[start..start + len]
    }

    /// Padded line holding image row `y`.
    pub fn line(&self, y: isize) -> Result<&[T]> {
        let index = self.line_index(y, self.origin_x)?;
        Ok(self.slot(index))
    }

    /// Element at image coordinates `(x, y)`.
    ///
    /// Fails unless the coordinate is inside the currently materialized
    /// window, padding included.
    pub fn at(&self, y: isize, x: isize) -> Result<T> {
        let index = self.line_index(y, x)?;
        let column = x - self.origin_x;
        if column < 0 || column as usize >= self.line_len {
            return Err(Error::OutOfRange {
                context: "Window",
                x,
                y,
                band: 0,
            });
        }
        Ok(self.slot(index)[column as usize])
    }

    fn line_index(&self, y: isize, x: isize) -> Result<usize> {
        if !self.drafted {
            return Err(Error::NotDrafted);
        }
        let index = y - self.origin_y;
        if index < 0 || index as usize >= self.lines {
            return Err(Error::OutOfRange {
                context: "Window",
                x,
                y,
                band: 0,
            });
        }
        Ok(index as usize)
    }

    /// Width of the useful region.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the useful region.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn horizontal_padding(&self) -> usize {
        self.h_pad
    }

    #[inline]
    pub fn vertical_padding(&self) -> usize {
        self.v_pad
    }

    /// Number of line slots in the ring.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Elements per padded line.
    #[inline]
    pub fn line_len(&self) -> usize {
        self.line_len
    }

    /// Distance between line slots, in bytes.
    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.line_stride * size_of::<T>()
    }

    /// Image coordinates `(x, y)` of the top-left padded element.
    #[inline]
    pub fn origin(&self) -> (isize, isize) {
        (self.origin_x, self.origin_y)
    }

    #[inline]
    pub fn is_drafted(&self) -> bool {
        self.drafted
    }
}

impl<T: Pixel> WindowRows<T> for StencilWindow<T> {
    #[inline]
    fn line_count(&self) -> usize {
        self.lines
    }

    #[inline]
    fn logical_line(&self, index: usize) -> &[T] {
        assert!(index < self.lines, "line {} outside a ring of {}", index, self.lines);
        self.slot(index)
    }
}
