//! Logical pixel grid the driver blits from
#[cfg(feature = "graphics")]
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::{DISPLAY_COLS, DISPLAY_ROWS};

/// Read access to a row-major on/off pixel grid
pub trait PixelSource {
    /// True if the pixel at `row`/`col` is on. Cells outside the grid are off.
    fn pixel(&self, row: usize, col: usize) -> bool;
}

impl<P: PixelSource + ?Sized> PixelSource for &P {
    fn pixel(&self, row: usize, col: usize) -> bool {
        P::pixel(self, row, col)
    }
}

/// Rectangle of the pixel grid, in rows and columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Top row
    pub row: usize,
    /// Left column
    pub col: usize,
    /// Rows covered
    pub height: usize,
    /// Columns covered
    pub width: usize,
}

impl Region {
    /// Region of `height` x `width` pixels with its top left corner at `row`/`col`
    pub const fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Region {
            row,
            col,
            height,
            width,
        }
    }

    /// The whole visible panel
    pub const fn full() -> Self {
        Region::new(0, 0, DISPLAY_ROWS, DISPLAY_COLS)
    }

    /// One past the bottom row
    pub fn row_end(&self) -> usize {
        self.row.saturating_add(self.height)
    }

    /// One past the rightmost column
    pub fn col_end(&self) -> usize {
        self.col.saturating_add(self.width)
    }

    /// True if the region covers no pixel
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let row = self.row.min(other.row);
        let col = self.col.min(other.col);
        Region::new(
            row,
            col,
            self.row_end().max(other.row_end()) - row,
            self.col_end().max(other.col_end()) - col,
        )
    }
}

const BYTES_PER_ROW: usize = DISPLAY_COLS.div_ceil(8);

/// Bit-packed 64 x 100 pixel grid with dirty tracking
pub struct Framebuffer {
    bits: [u8; BYTES_PER_ROW * DISPLAY_ROWS],
    dirty: Option<Region>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// All pixels off, nothing dirty
    pub const fn new() -> Self {
        Framebuffer {
            bits: [0; BYTES_PER_ROW * DISPLAY_ROWS],
            dirty: None,
        }
    }

    /// Set one pixel; pixels outside the grid are ignored
    pub fn set_pixel(&mut self, row: usize, col: usize, on: bool) {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return;
        }
        let index = row * BYTES_PER_ROW + col / 8;
        let bit = 0x80 >> (col % 8);
        if on {
            self.bits[index] |= bit;
        } else {
            self.bits[index] &= !bit;
        }
        self.mark_dirty(Region::new(row, col, 1, 1));
    }

    /// Turn every pixel off and mark the whole grid dirty
    pub fn clear(&mut self) {
        self.bits.fill(0);
        self.mark_dirty(Region::full());
    }

    /// Region changed since the last call, if any
    pub fn take_dirty(&mut self) -> Option<Region> {
        self.dirty.take()
    }

    /// Add `region` to the area that needs to be sent
    pub fn mark_dirty(&mut self, region: Region) {
        if region.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&region),
            None => region,
        });
    }
}

impl PixelSource for Framebuffer {
    fn pixel(&self, row: usize, col: usize) -> bool {
        if row >= DISPLAY_ROWS || col >= DISPLAY_COLS {
            return false;
        }
        self.bits[row * BYTES_PER_ROW + col / 8] & (0x80 >> (col % 8)) != 0
    }
}

#[cfg(feature = "graphics")]
impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.y as usize, point.x as usize, color.is_on());
        }
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_COLS as u32, DISPLAY_ROWS as u32)
    }
}
