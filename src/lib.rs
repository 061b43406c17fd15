#![no_std]

//! This crate provides a driver for the Siemens S65 LCD (LS020 type
//! controller, 132 x 176 pixels) connected over SPI.
//!
//! The driver renders a caller owned, packed monochrome
//! [`Framebuffer`](framebuffer::Framebuffer) into the panel's RGB565
//! memory. How the pixel stream reaches the bus is chosen when the
//! driver is built: [`Buffered`](transfer::Buffered) works with any
//! blocking SPI, [`Burst`](transfer::Burst) feeds 16-bit words into a
//! hardware FIFO.
//!
//! The driver is not reentrant. Only one context may call into it.

pub mod frame;
pub mod framebuffer;
pub mod power;
pub mod register;
pub mod transfer;

// =======================
// For unit tests only!
#[cfg(test)]
#[macro_use]
extern crate std;
// =======================

use crate::frame::{Frame, DATA_START};
use crate::framebuffer::Framebuffer;
use crate::power::{PowerStep, ScanDirection, DISPLAY_ON, INIT_COLOR, POWER_ON};
use crate::register::Register;
use crate::transfer::{Buffered, TransferStrategy};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;

/// Panel width in pixels.
pub const WIDTH: usize = 132;

/// Panel height in pixels.
pub const HEIGHT: usize = 176;

/// Errors reported by the bus or the control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// SPI write or FIFO failure.
    Bus,
    /// Chip select, register select or reset pin failure.
    Pin,
}

/// Siemens S65 driver.
pub struct SiemensS65<SPI, CS, RS, RST, T = Buffered>
where
    SPI: spi::Write<u8>,
    CS: OutputPin,
    RS: OutputPin,
    RST: OutputPin,
    T: TransferStrategy<SPI>,
{
    /// SPI
    pub spi: SPI,

    /// Chip select pin, active low.
    pub cs: CS,

    /// Register select pin. Held low, the start byte carries RS.
    pub rs: RS,

    /// Reset pin, active low.
    pub rst: RST,

    transfer: T,
    scan: ScanDirection,
}

impl<SPI, CS, RS, RST, T> SiemensS65<SPI, CS, RS, RST, T>
where
    SPI: spi::Write<u8>,
    CS: OutputPin,
    RS: OutputPin,
    RST: OutputPin,
    T: TransferStrategy<SPI>,
{
    /// Creates a new driver instance. Nothing is sent until [`init`](Self::init).
    pub fn new(spi: SPI, cs: CS, rs: RS, rst: RST, transfer: T, scan: ScanDirection) -> Self {
        SiemensS65 {
            spi,
            cs,
            rs,
            rst,
            transfer,
            scan,
        }
    }

    /// Gives back the bus and the pins.
    pub fn release(self) -> (SPI, CS, RS, RST) {
        (self.spi, self.cs, self.rs, self.rst)
    }

    /// Horizontal scan direction written to the entry mode register on `init`.
    pub fn scan_direction(&self) -> ScanDirection {
        self.scan
    }

    /// Resets the panel and runs the power-on sequence, leaving it on and
    /// filled with [`INIT_COLOR`].
    ///
    /// Safe to call again at any time to recover the panel.
    pub fn init<DELAY>(&mut self, delay: &mut DELAY) -> Result<(), Error>
    where
        DELAY: DelayMs<u8>,
    {
        log::debug!("S65: power on, scan direction {:?}", self.scan);

        self.cs.set_high().map_err(|_| Error::Pin)?;
        self.rs.set_low().map_err(|_| Error::Pin)?;
        self.hard_reset(delay)?;

        self.run_steps(POWER_ON, delay)?;
        let entry_mode = self.scan.entry_mode();
        self.run_steps(&[entry_mode], delay)?;
        self.run_steps(DISPLAY_ON, delay)?;

        self.clear(INIT_COLOR)?;
        log::debug!("S65: display on");
        Ok(())
    }

    /// Pulses the reset line.
    pub fn hard_reset<DELAY>(&mut self, delay: &mut DELAY) -> Result<(), Error>
    where
        DELAY: DelayMs<u8>,
    {
        self.rst.set_low().map_err(|_| Error::Pin)?;
        delay.delay_ms(power::RESET_HOLD_MS);

        self.rst.set_high().map_err(|_| Error::Pin)?;
        delay.delay_ms(power::RESET_RECOVERY_MS);
        Ok(())
    }

    fn run_steps<DELAY>(&mut self, steps: &[PowerStep], delay: &mut DELAY) -> Result<(), Error>
    where
        DELAY: DelayMs<u8>,
    {
        for step in steps {
            self.write_register(step.register, step.value)?;
            if step.delay_ms > 0 {
                delay.delay_ms(step.delay_ms);
            }
        }
        Ok(())
    }

    /// Fills the whole panel with one RGB565 colour, bypassing the
    /// framebuffer.
    pub fn clear(&mut self, color: u16) -> Result<(), Error> {
        self.start_memory_write()?;
        let result = self.transfer.fill(&mut self.spi, color, WIDTH * HEIGHT);
        self.end_memory_write(result)
    }

    /// Sends the framebuffer to the panel.
    ///
    /// Returns once the last byte is handed to the bus. The panel gives no
    /// acknowledgement.
    pub fn update<F>(&mut self, framebuffer: &F) -> Result<(), Error>
    where
        F: Framebuffer + ?Sized,
    {
        log::trace!(
            "S65: update {}x{}",
            framebuffer.width(),
            framebuffer.height()
        );
        self.start_memory_write()?;
        let result = self.transfer.transfer_frame(&mut self.spi, framebuffer);
        self.end_memory_write(result)
    }

    /// Writes a value to a register: one index frame, then one data frame.
    pub fn write_register(&mut self, register: Register, value: u16) -> Result<(), Error> {
        log::trace!("S65: {:?} <- {:#06x}", register, value);
        self.send_index(register.address())?;
        self.send_data(value)
    }

    /// Selects a register.
    pub fn send_index(&mut self, register: u8) -> Result<(), Error> {
        self.send_frame(Frame::Index(register))
    }

    /// Writes to the selected register.
    pub fn send_data(&mut self, value: u16) -> Result<(), Error> {
        self.send_frame(Frame::Data(value))
    }

    fn send_frame(&mut self, frame: Frame) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)?;
        let result = self.spi.write(&frame.bytes()).map_err(|_| Error::Bus);
        self.cs.set_high().map_err(|_| Error::Pin)?;
        result
    }

    // Chip select stays low from the index frame until the last pixel.
    // The data start byte opens the RAM stream without a data frame of
    // its own.
    fn start_memory_write(&mut self) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)?;
        let index = Frame::index(Register::MemoryWrite).bytes();
        let opened = self
            .spi
            .write(&index)
            .and_then(|_| self.spi.write(&[DATA_START]))
            .map_err(|_| Error::Bus);
        if opened.is_err() {
            self.cs.set_high().map_err(|_| Error::Pin)?;
        }
        opened
    }

    fn end_memory_write(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        self.cs.set_high().map_err(|_| Error::Pin)?;
        result
    }
}
