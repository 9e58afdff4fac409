//! Fixed-size frames over a [`StencilWindow`].
//!
//! The frames own their window and expose its lines by role. Column `x` of
//! the image sits at index `x + pad` of every line, so a kernel centered on
//! column `x` reads indices `x ..= x + 2 * pad`.

use crate::error::{Error, Result};
use crate::pixel::Pixel;

use super::{LineSource, StencilWindow, WindowRows};

/// One-line window with one line and one column of padding on each side.
#[derive(Debug, Clone)]
pub struct Window3x3<T: Pixel> {
    window: StencilWindow<T>,
}

impl<T: Pixel> Window3x3<T> {
    pub const PAD: usize = 1;

    pub fn new(width: usize) -> Result<Self> {
        Ok(Self {
            window: StencilWindow::new(width, 1, Self::PAD, Self::PAD)?,
        })
    }

    /// Window spanning the full width of `source`.
    pub fn for_image<S: LineSource<T> + ?Sized>(source: &S) -> Result<Self> {
        Self::new(source.dimensions().width)
    }

    pub fn reset_width(&mut self, width: usize) -> Result<()> {
        self.window.configure(width, 1, Self::PAD, Self::PAD)
    }

    /// Centers the window on image row 0.
    pub fn draft<S: LineSource<T> + ?Sized>(&mut self, source: &S, band: usize) -> Result<()> {
        self.window.draft(source, 0, 0, band)
    }

    /// Moves the center down one row.
    pub fn shift<S: LineSource<T> + ?Sized>(&mut self, source: &S, band: usize) -> Result<()> {
        self.window.advance(1, source, band)
    }

    #[inline]
    pub fn prev_line(&self) -> &[T] {
        self.window.logical_line(0)
    }

    #[inline]
    pub fn curr_line(&self) -> &[T] {
        self.window.logical_line(1)
    }

    #[inline]
    pub fn next_line(&self) -> &[T] {
        self.window.logical_line(2)
    }

    /// Lines from top to bottom.
    #[inline]
    pub fn lines(&self) -> [&[T]; 3] {
        [self.prev_line(), self.curr_line(), self.next_line()]
    }

    /// Element at image coordinates, padding included.
    pub fn at(&self, y: isize, x: isize) -> Result<T> {
        self.window.at(y, x)
    }

    pub fn window(&self) -> &StencilWindow<T> {
        &self.window
    }
}

/// One-line window with two lines and two columns of padding on each side.
#[derive(Debug, Clone)]
pub struct Window5x5<T: Pixel> {
    window: StencilWindow<T>,
}

impl<T: Pixel> Window5x5<T> {
    pub const PAD: usize = 2;

    pub fn new(width: usize) -> Result<Self> {
        Ok(Self {
            window: StencilWindow::new(width, 1, Self::PAD, Self::PAD)?,
        })
    }

    pub fn for_image<S: LineSource<T> + ?Sized>(source: &S) -> Result<Self> {
        Self::new(source.dimensions().width)
    }

    pub fn reset_width(&mut self, width: usize) -> Result<()> {
        self.window.configure(width, 1, Self::PAD, Self::PAD)
    }

    pub fn draft<S: LineSource<T> + ?Sized>(&mut self, source: &S, band: usize) -> Result<()> {
        self.window.draft(source, 0, 0, band)
    }

    pub fn shift<S: LineSource<T> + ?Sized>(&mut self, source: &S, band: usize) -> Result<()> {
        self.window.advance(1, source, band)
    }

    /// Line `dy` rows from the center.
    ///
    /// # Panics
    /// Panics if `dy` is outside `-2..=2`.
    #[inline]
    pub fn row(&self, dy: isize) -> &[T] {
        assert!((-2..=2).contains(&dy), "row offset {} outside the 5x5 frame", dy);
        self.window.logical_line((dy + 2) as usize)
    }

    #[inline]
    pub fn lines(&self) -> [&[T]; 5] {
        [
            self.window.logical_line(0),
            self.window.logical_line(1),
            self.window.logical_line(2),
            self.window.logical_line(3),
            self.window.logical_line(4),
        ]
    }

    pub fn at(&self, y: isize, x: isize) -> Result<T> {
        self.window.at(y, x)
    }

    pub fn window(&self) -> &StencilWindow<T> {
        &self.window
    }
}

/// A taller band of lines with arbitrary padding.
#[derive(Debug, Clone)]
pub struct StencilSlice<T: Pixel> {
    window: StencilWindow<T>,
}

impl<T: Pixel> StencilSlice<T> {
    pub fn new(width: usize, lines: usize, h_pad: usize, v_pad: usize) -> Result<Self> {
        Ok(Self {
            window: StencilWindow::new(width, lines, h_pad, v_pad)?,
        })
    }

    pub fn for_image<S: LineSource<T> + ?Sized>(
        source: &S,
        lines: usize,
        h_pad: usize,
        v_pad: usize,
    ) -> Result<Self> {
        Self::new(source.dimensions().width, lines, h_pad, v_pad)
    }

    /// Loads the slice with its first useful line at image row `y`.
    pub fn draft<S: LineSource<T> + ?Sized>(&mut self, source: &S, y: usize, band: usize) -> Result<()> {
        self.window.draft(source, 0, y, band)
    }

    pub fn shift<S: LineSource<T> + ?Sized>(
        &mut self,
        n: usize,
        source: &S,
        band: usize,
    ) -> Result<()> {
        self.window.advance(n, source, band)
    }

    /// Padded line `index`, counted from the top of the slice.
    pub fn line(&self, index: usize) -> Result<&[T]> {
        if !self.window.is_drafted() {
            return Err(Error::NotDrafted);
        }
        if index >= self.window.line_count() {
            return Err(Error::OutOfRange {
                context: "Slice line",
                x: 0,
                y: index as isize,
                band: 0,
            });
        }
        Ok(self.window.logical_line(index))
    }

    pub fn at(&self, y: isize, x: isize) -> Result<T> {
        self.window.at(y, x)
    }

    pub fn window(&self) -> &StencilWindow<T> {
        &self.window
    }
}
