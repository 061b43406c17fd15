//! Packed monochrome framebuffer.
//!
//! Pixels are stored column by column. Each column holds `height / 8`
//! bytes and every byte packs eight vertically stacked pixels, bit 0
//! being the topmost one of the group.

/// Pixel source read by the driver on every update.
pub trait Framebuffer {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows, a multiple of 8.
    fn height(&self) -> usize;

    /// Packed byte holding rows `group * 8 .. group * 8 + 8` of `column`.
    fn byte_at(&self, column: usize, group: usize) -> u8;
}

/// Framebuffer of `WIDTH` columns by `GROUPS * 8` rows.
#[derive(Clone)]
pub struct MonoFramebuffer<const WIDTH: usize, const GROUPS: usize> {
    buffer: [[u8; GROUPS]; WIDTH],
}

/// Framebuffer matching the full S65 panel.
pub type S65Framebuffer = MonoFramebuffer<{ crate::WIDTH }, { crate::HEIGHT / 8 }>;

impl<const WIDTH: usize, const GROUPS: usize> MonoFramebuffer<WIDTH, GROUPS> {
    /// All pixels blank.
    pub const fn new() -> Self {
        MonoFramebuffer {
            buffer: [[0; GROUPS]; WIDTH],
        }
    }

    /// Sets every pixel to filled (`true`) or blank.
    pub fn clear(&mut self, filled: bool) {
        let byte = if filled { 0xFF } else { 0x00 };
        for column in self.buffer.iter_mut() {
            for group in column.iter_mut() {
                *group = byte;
            }
        }
    }

    /// Sets a pixel. Coordinates outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, filled: bool) {
        if x >= WIDTH || y >= GROUPS * 8 {
            return;
        }
        let bitmask = 1 << (y % 8);
        let group = &mut self.buffer[x][y / 8];
        if filled {
            *group |= bitmask;
        } else {
            *group &= !bitmask;
        }
    }

    /// Reads a pixel. Coordinates outside the buffer read as blank.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= GROUPS * 8 {
            return false;
        }
        self.buffer[x][y / 8] & (1 << (y % 8)) != 0
    }

    /// Raw packed bytes, indexed `[column][group]`.
    pub fn as_columns(&self) -> &[[u8; GROUPS]; WIDTH] {
        &self.buffer
    }

    /// Mutable access to the packed bytes, e.g. to blit a prerendered image.
    pub fn as_columns_mut(&mut self) -> &mut [[u8; GROUPS]; WIDTH] {
        &mut self.buffer
    }
}

impl<const WIDTH: usize, const GROUPS: usize> Default for MonoFramebuffer<WIDTH, GROUPS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WIDTH: usize, const GROUPS: usize> Framebuffer for MonoFramebuffer<WIDTH, GROUPS> {
    fn width(&self) -> usize {
        WIDTH
    }

    fn height(&self) -> usize {
        GROUPS * 8
    }

    fn byte_at(&self, column: usize, group: usize) -> u8 {
        self.buffer[column][group]
    }
}

#[cfg(feature = "graphics")]
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor, prelude::*};

#[cfg(feature = "graphics")]
impl<const WIDTH: usize, const GROUPS: usize> DrawTarget for MonoFramebuffer<WIDTH, GROUPS> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels.into_iter() {
            // Only draw pixels that would be on screen
            if coord.x >= 0 && coord.y >= 0 {
                self.set_pixel(coord.x as usize, coord.y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        MonoFramebuffer::clear(self, color.is_on());
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl<const WIDTH: usize, const GROUPS: usize> OriginDimensions for MonoFramebuffer<WIDTH, GROUPS> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, (GROUPS * 8) as u32)
    }
}
