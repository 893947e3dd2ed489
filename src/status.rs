//! The OUTPUT register, decoded

use crate::fmt::*;
use crate::interface::RegisterInterface;
use crate::registers::{output, StatusFlags};
use crate::types::{ChargerState, NtcStatus};
use crate::{ChipError, Ltc4099};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub flags: StatusFlags,
    pub ntc: NtcStatus,
    pub charger: ChargerState,
}

impl From<u8> for Status {
    fn from(raw: u8) -> Self {
        Self {
            flags: StatusFlags::from_bits_truncate(raw),
            ntc: output::NTC.extract(raw).into(),
            charger: output::CHRGR.extract(raw).into(),
        }
    }
}

impl Status {
    /// Either input (USB or wall) is usable
    pub fn input_present(&self) -> bool {
        self.flags
            .intersects(StatusFlags::USBGOOD | StatusFlags::WALLGOOD)
    }

    pub fn charging(&self) -> bool {
        self.charger != ChargerState::Off
    }

    /// C/x has been reached
    pub fn charge_complete(&self) -> bool {
        self.charger == ChargerState::ConstantVoltageBelowCx
    }
}

impl<T: RegisterInterface> Ltc4099<T> {
    /// Reads and decodes the status byte in a single transaction
    pub async fn status(&mut self) -> Result<Status, ChipError<T::Error>> {
        let raw = self.get_output().await?;
        let status = Status::from(raw);

        if status.flags.contains(StatusFlags::BADCELL) {
            info!("battery reported as bad cell");
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChip;

    #[test]
    fn decodes_every_part_of_the_byte() {
        let status = Status::from(0b1001_1010);

        assert_eq!(status.flags, StatusFlags::USBGOOD | StatusFlags::THERMAL_REG);
        assert_eq!(status.ntc, NtcStatus::TooHot);
        assert_eq!(status.charger, ChargerState::ConstantVoltageAboveCx);
        assert!(status.input_present());
        assert!(status.charging());
        assert!(!status.charge_complete());
    }

    #[test]
    fn idle_without_input() {
        let status = Status::from(0);

        assert!(!status.input_present());
        assert!(!status.charging());
        assert_eq!(status.ntc, NtcStatus::NoFault);
    }

    #[tokio::test]
    async fn one_read_of_output() {
        let mut chip = FakeChip::new();
        chip.regs[output::ADDRESS as usize] = 0b0110_0111;

        let mut ltc = Ltc4099::new(&mut chip);
        let status = ltc.status().await.unwrap();

        assert_eq!(status.flags, StatusFlags::WALLGOOD | StatusFlags::BADCELL);
        assert_eq!(status.ntc, NtcStatus::TooCold);
        assert!(status.charge_complete());
        assert_eq!((chip.reads, chip.writes), (1, 0));
    }

    #[tokio::test]
    async fn bus_failure() {
        let mut chip = FakeChip::failing();
        let mut ltc = Ltc4099::new(&mut chip);

        assert_eq!(ltc.status().await, Err(ChipError::Bus(crate::testing::BusFault)));
    }
}
