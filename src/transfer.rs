//! Framebuffer to panel RAM transfer.
//!
//! The panel scans its RAM in the opposite column order to the
//! framebuffer, so columns are sent last to first. Within a column the
//! groups go top to bottom and every group bit 0 first. Each monochrome
//! pixel becomes one RGB565 word taken from a [`ColorMask`].

use embedded_hal::blocking::spi;

use crate::framebuffer::Framebuffer;
use crate::Error;

/// Words a 1-bit pixel is expanded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMask {
    pub blank: u16,
    pub filled: u16,
}

impl ColorMask {
    pub const fn new(blank: u16, filled: u16) -> Self {
        ColorMask { blank, filled }
    }

    pub const fn color_for(&self, filled: bool) -> u16 {
        if filled {
            self.filled
        } else {
            self.blank
        }
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        //                    RRRR RGGG GGGB BBBB
        ColorMask::new(0x0000, 0x37E0)
    }
}

/// Expands a group of 8 pixels into the 16 bytes sent on the wire.
pub fn expand_group(mut group: u8, mask: &ColorMask) -> [u8; 16] {
    let mut bytes = [0; 16];
    for pixel in bytes.chunks_exact_mut(2) {
        let word = mask.color_for(group & 1 != 0);
        pixel.copy_from_slice(&word.to_be_bytes());
        group >>= 1;
    }
    bytes
}

/// Streams pixel data behind an already opened memory write.
///
/// Implementations only produce the pixel payload. Framing and chip
/// select are handled by the driver.
pub trait TransferStrategy<SPI> {
    /// Sends every pixel of `framebuffer`.
    fn transfer_frame<F>(&mut self, spi: &mut SPI, framebuffer: &F) -> Result<(), Error>
    where
        F: Framebuffer + ?Sized;

    /// Sends `pixels` copies of `color`.
    fn fill(&mut self, spi: &mut SPI, color: u16, pixels: usize) -> Result<(), Error>;
}

/// Expands each 8-pixel group into a scratch buffer and hands it to the
/// bus in one write.
#[derive(Debug, Clone, Copy, Default)]
pub struct Buffered {
    mask: ColorMask,
}

impl Buffered {
    pub const fn new(mask: ColorMask) -> Self {
        Buffered { mask }
    }

    pub fn mask(&self) -> ColorMask {
        self.mask
    }
}

impl<SPI> TransferStrategy<SPI> for Buffered
where
    SPI: spi::Write<u8>,
{
    fn transfer_frame<F>(&mut self, spi: &mut SPI, framebuffer: &F) -> Result<(), Error>
    where
        F: Framebuffer + ?Sized,
    {
        let groups = framebuffer.height() / 8;
        for column in (0..framebuffer.width()).rev() {
            for group in 0..groups {
                let buffer = expand_group(framebuffer.byte_at(column, group), &self.mask);
                spi.write(&buffer).map_err(|_| Error::Bus)?;
            }
        }
        Ok(())
    }

    fn fill(&mut self, spi: &mut SPI, color: u16, pixels: usize) -> Result<(), Error> {
        let mut buffer = [0; 16];
        for pixel in buffer.chunks_exact_mut(2) {
            pixel.copy_from_slice(&color.to_be_bytes());
        }
        for _ in 0..pixels / 8 {
            spi.write(&buffer).map_err(|_| Error::Bus)?;
        }
        let remainder = pixels % 8;
        if remainder > 0 {
            spi.write(&buffer[..remainder * 2]).map_err(|_| Error::Bus)?;
        }
        Ok(())
    }
}

/// Width of one bus transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSize {
    Eight,
    Sixteen,
}

/// SPI peripheral with a transmit FIFO that can be fed 16-bit words.
///
/// A 16-bit word goes out most significant byte first, so it is
/// identical on the wire to two 8-bit transfers.
pub trait BurstBus {
    type Error;

    /// Changes the frame width. Only called with an empty FIFO.
    fn set_word_size(&mut self, size: WordSize) -> Result<(), Self::Error>;

    /// Completes once the transmit FIFO is empty.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Queues one word, `WouldBlock` while the FIFO is full.
    fn send_word(&mut self, word: u16) -> nb::Result<(), Self::Error>;
}

/// Pushes 16-bit words straight into the transmit FIFO, busy-waiting
/// whenever it is full. Halves the bus accesses per pixel compared to
/// byte transfers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Burst {
    mask: ColorMask,
}

impl Burst {
    pub const fn new(mask: ColorMask) -> Self {
        Burst { mask }
    }

    pub fn mask(&self) -> ColorMask {
        self.mask
    }

    fn with_wide_words<SPI, W>(spi: &mut SPI, words: W) -> Result<(), Error>
    where
        SPI: BurstBus,
        W: FnOnce(&mut SPI) -> Result<(), Error>,
    {
        nb::block!(spi.flush()).map_err(|_| Error::Bus)?;
        spi.set_word_size(WordSize::Sixteen).map_err(|_| Error::Bus)?;

        let result = words(spi);

        // Back to byte transfers even if the stream failed
        let restored = nb::block!(spi.flush())
            .and_then(|_| spi.set_word_size(WordSize::Eight))
            .map_err(|_| Error::Bus);
        result.and(restored)
    }
}

impl<SPI> TransferStrategy<SPI> for Burst
where
    SPI: BurstBus,
{
    fn transfer_frame<F>(&mut self, spi: &mut SPI, framebuffer: &F) -> Result<(), Error>
    where
        F: Framebuffer + ?Sized,
    {
        let mask = self.mask;
        Self::with_wide_words(spi, |spi| {
            let groups = framebuffer.height() / 8;
            for column in (0..framebuffer.width()).rev() {
                for group in 0..groups {
                    let mut bits = framebuffer.byte_at(column, group);
                    for _ in 0..8 {
                        let word = mask.color_for(bits & 1 != 0);
                        nb::block!(spi.send_word(word)).map_err(|_| Error::Bus)?;
                        bits >>= 1;
                    }
                }
            }
            Ok(())
        })
    }

    fn fill(&mut self, spi: &mut SPI, color: u16, pixels: usize) -> Result<(), Error> {
        Self::with_wide_words(spi, |spi| {
            for _ in 0..pixels {
                nb::block!(spi.send_word(color)).map_err(|_| Error::Bus)?;
            }
            Ok(())
        })
    }
}
