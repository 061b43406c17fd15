//! Power-on and display-on sequences of the S65 panel.

use crate::register::Register;

/// Time the reset line is held low.
pub const RESET_HOLD_MS: u8 = 50;

/// Time the controller needs after reset is released.
pub const RESET_RECOVERY_MS: u8 = 50;

/// Colour the panel is cleared to once it is switched on. RGB565 green.
pub const INIT_COLOR: u16 = 0x03E0;

/// One register write of a sequence, followed by an optional wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerStep {
    pub register: Register,
    pub value: u16,
    pub delay_ms: u8,
}

impl PowerStep {
    const fn new(register: Register, value: u16) -> Self {
        PowerStep {
            register,
            value,
            delay_ms: 0,
        }
    }

    const fn wait(self, delay_ms: u8) -> Self {
        PowerStep { delay_ms, ..self }
    }
}

/// Display off followed by the charge pump bring-up.
///
/// The 40 ms waits after AP and VCOMG and the 100 ms wait after PON let
/// the booster settle. Shortening them leaves a washed-out or blank panel.
pub const POWER_ON: &[PowerStep] = &[
    PowerStep::new(Register::DisplayControl, 0x0000).wait(10),
    PowerStep::new(Register::DriveControl, 0x0400),
    // Step 1
    PowerStep::new(Register::PowerControl3, 0x0001), // VC
    PowerStep::new(Register::PowerControl4, 0x0006), // VRH
    PowerStep::new(Register::PowerControl2, 0x0000), // CAD
    PowerStep::new(Register::PowerControl4, 0x0616), // VRL
    PowerStep::new(Register::PowerControl5, 0x0010), // VCM
    PowerStep::new(Register::PowerControl5, 0x1010), // VDV
    // Step 2
    PowerStep::new(Register::PowerControl1, 0x0000), // BT
    PowerStep::new(Register::PowerControl1, 0x0000), // DC
    PowerStep::new(Register::PowerControl1, 0x000C).wait(40), // AP
    // Step 3
    PowerStep::new(Register::PowerControl5, 0x2D1F).wait(40), // VCOMG
    // Step 4
    PowerStep::new(Register::PowerControl4, 0x0616).wait(100), // PON
];

/// Display control bits switched on one at a time: D0, GON, D1, DTE.
/// Bit 2 would reverse the colours.
pub const DISPLAY_ON: &[PowerStep] = &[
    PowerStep::new(Register::DisplayControl, 0x0005),
    PowerStep::new(Register::DisplayControl, 0x0025),
    PowerStep::new(Register::DisplayControl, 0x0027),
    PowerStep::new(Register::DisplayControl, 0x0037).wait(10),
];

/// Horizontal scan direction, written to the entry mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Address counter incremented in both directions.
    Normal,
    /// Horizontal address counter decremented.
    Mirrored,
}

impl ScanDirection {
    pub fn entry_mode(self) -> PowerStep {
        let value = match self {
            ScanDirection::Normal => 0x0038,
            ScanDirection::Mirrored => 0x0008,
        };
        PowerStep::new(Register::EntryMode, value)
    }
}

impl Default for ScanDirection {
    #[cfg(not(feature = "mirror"))]
    fn default() -> Self {
        ScanDirection::Normal
    }

    #[cfg(feature = "mirror")]
    fn default() -> Self {
        ScanDirection::Mirrored
    }
}

/// Sum of every wait the panel requires between reset and the first
/// pixel write.
pub fn minimum_settle_ms() -> u32 {
    let steps: u32 = POWER_ON
        .iter()
        .chain(DISPLAY_ON)
        .map(|step| step.delay_ms as u32)
        .sum();
    RESET_HOLD_MS as u32 + RESET_RECOVERY_MS as u32 + steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_time() {
        assert_eq!(minimum_settle_ms(), 300);
    }

    #[test]
    fn charge_pump_waits() {
        let waits: [(Register, u16, u8); 4] = [
            (Register::DisplayControl, 0x0000, 10),
            (Register::PowerControl1, 0x000C, 40),
            (Register::PowerControl5, 0x2D1F, 40),
            (Register::PowerControl4, 0x0616, 100),
        ];
        let delayed = POWER_ON.iter().filter(|step| step.delay_ms > 0);
        for (step, (register, value, delay_ms)) in delayed.zip(waits.iter()) {
            assert_eq!(step.register, *register);
            assert_eq!(step.value, *value);
            assert_eq!(step.delay_ms, *delay_ms);
        }
        assert_eq!(POWER_ON.iter().filter(|step| step.delay_ms > 0).count(), 4);
    }

    #[test]
    fn display_on_sets_one_bit_per_write() {
        for pair in DISPLAY_ON.windows(2) {
            let added = pair[1].value & !pair[0].value;
            assert_eq!(added.count_ones(), 1);
            assert_eq!(pair[0].value & !pair[1].value, 0);
        }
        assert!(DISPLAY_ON
            .iter()
            .all(|step| step.register == Register::DisplayControl));
    }

    #[test]
    fn entry_mode_values() {
        assert_eq!(ScanDirection::Normal.entry_mode().value, 0x0038);
        assert_eq!(ScanDirection::Mirrored.entry_mode().value, 0x0008);
        assert_eq!(ScanDirection::Mirrored.entry_mode().register, Register::EntryMode);
    }
}
