use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// S65 controller registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Register {
    /// LCD Drive Control
    DriveControl = 0x02,
    /// Power Control 1: BT, DC, AP
    PowerControl1 = 0x03,
    /// Power Control 2: CAD
    PowerControl2 = 0x04,
    /// Entry Mode
    EntryMode = 0x05,
    /// Display Control: D0, D1, GON, DTE
    DisplayControl = 0x07,
    /// Power Control 3: VC
    PowerControl3 = 0x0C,
    /// Power Control 4: VRH, VRL, PON
    PowerControl4 = 0x0D,
    /// Power Control 5: VCM, VDV, VCOMG
    PowerControl5 = 0x0E,
    // Memory Write
    MemoryWrite = 0x22,
}

impl Register {
    pub fn address(self) -> u8 {
        self as u8
    }

    /// Maps a raw register address back to a known register.
    pub fn from_address(address: u8) -> Option<Self> {
        Self::from_u8(address)
    }
}
