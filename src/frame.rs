//! Wire framing for the S65 serial interface.
//!
//! Every transfer opens with a start byte. `0x74` selects the index
//! register (RS = 0), `0x76` addresses the selected register or RAM
//! (RS = 1).

use crate::register::Register;

/// Start byte of an index frame.
pub const INDEX_START: u8 = 0x74;

/// Start byte of a data frame and of the pixel stream.
pub const DATA_START: u8 = 0x76;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Selects the register addressed by following data.
    Index(u8),
    /// Carries a 16-bit value to the selected register.
    Data(u16),
}

impl Frame {
    pub fn index(register: Register) -> Self {
        Frame::Index(register.address())
    }

    /// The three bytes sent for this frame.
    pub fn bytes(self) -> [u8; 3] {
        match self {
            Frame::Index(register) => [INDEX_START, 0x00, register],
            Frame::Data(value) => [DATA_START, (value >> 8) as u8, value as u8],
        }
    }

    /// Decodes a frame captured on the wire, e.g. by a bus analyser or a
    /// recording mock bus.
    pub fn parse(bytes: [u8; 3]) -> Option<Self> {
        match bytes {
            [INDEX_START, 0x00, register] => Some(Frame::Index(register)),
            [DATA_START, hi, lo] => Some(Frame::Data(u16::from_be_bytes([hi, lo]))),
            _ => None,
        }
    }

    /// The register a decoded index frame selects, if it is a known one.
    pub fn register(self) -> Option<Register> {
        match self {
            Frame::Index(address) => Register::from_address(address),
            Frame::Data(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_frame_layout() {
        assert_eq!(Frame::index(Register::EntryMode).bytes(), [0x74, 0x00, 0x05]);
        assert_eq!(Frame::Index(0xAB).bytes(), [0x74, 0x00, 0xAB]);
    }

    #[test]
    fn data_frame_is_big_endian() {
        assert_eq!(Frame::Data(0x2D1F).bytes(), [0x76, 0x2D, 0x1F]);
        assert_eq!(Frame::Data(0x00FF).bytes(), [0x76, 0x00, 0xFF]);
    }

    #[test]
    fn parse_recovers_frames() {
        assert_eq!(Frame::parse([0x74, 0x00, 0x0E]), Some(Frame::Index(0x0E)));
        assert_eq!(Frame::parse([0x76, 0x10, 0x10]), Some(Frame::Data(0x1010)));
        assert_eq!(
            Frame::parse([0x74, 0x00, 0x0E]).and_then(Frame::register),
            Some(Register::PowerControl5)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Frame::parse([0x74, 0x01, 0x0E]), None);
        assert_eq!(Frame::parse([0x00, 0x00, 0x00]), None);
        assert_eq!(Frame::Data(1).register(), None);
    }
}
