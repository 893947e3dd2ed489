#![cfg_attr(not(test), no_std)]

//! A small driver for the Linear Technology LTC4099 USB power manager / Li-Ion charger.
//!
//! The part has four byte-wide registers. [`Ltc4099`] gives raw access to each
//! of them, field-level read-modify-write on top of the descriptor tables in
//! [`registers`], and typed helpers for every setting. Bus access goes through
//! a [`RegisterInterface`], normally an [`I2cInterface`] wrapping an
//! `embedded-hal-async` I2C bus.
//!
//! The driver keeps no copy of the register contents: every getter reads the
//! part, every setter writes it, and nothing is retried.

pub(crate) mod fmt;

pub mod config;
pub mod interface;
pub mod registers;
pub mod status;
pub mod types;

#[cfg(test)]
mod testing;

use fmt::*;

pub use config::ChargerConfig;
pub use interface::{I2cInterface, RegisterInterface, DEFAULT_ADDRESS};
pub use registers::{Field, IrqMask, Register, StatusFlags};
pub use status::Status;
pub use types::*;

use registers::{command_0, command_1, irq_mask, output};

/// Chip error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipError<E> {
    /// The transport failed. The error is passed on as is
    Bus(E),
    /// Value does not fit into the field it was meant for. Nothing was sent
    ValueOutOfRange { field: &'static str, value: u8 },
}

impl<E> From<E> for ChipError<E> {
    fn from(e: E) -> Self {
        Self::Bus(e)
    }
}

/// Chip handle
pub struct Ltc4099<T> {
    iface: T,
}

impl<T: RegisterInterface> Ltc4099<T> {
    /// Creates the driver instance. Pass `&mut iface` to keep ownership of the transport
    pub fn new(iface: T) -> Self {
        Self { iface }
    }

    /// Gives the transport back
    pub fn release(self) -> T {
        self.iface
    }

    /// Reads a whole register in one transaction
    pub async fn read_register(&mut self, reg: &Register) -> Result<u8, ChipError<T::Error>> {
        Ok(self.iface.read_register(reg.address).await?)
    }

    /// Writes a whole register in one transaction. Accepted for read-only
    /// registers too, it is up to the part what happens then
    pub async fn write_register(
        &mut self,
        reg: &Register,
        value: u8,
    ) -> Result<(), ChipError<T::Error>> {
        Ok(self.iface.write_register(reg.address, value).await?)
    }

    pub async fn get_command_0(&mut self) -> Result<u8, ChipError<T::Error>> {
        self.read_register(&command_0::REGISTER).await
    }

    pub async fn set_command_0(&mut self, value: u8) -> Result<(), ChipError<T::Error>> {
        self.write_register(&command_0::REGISTER, value).await
    }

    pub async fn get_command_1(&mut self) -> Result<u8, ChipError<T::Error>> {
        self.read_register(&command_1::REGISTER).await
    }

    /// Setting DISABLE_CHARGER through here sticks until DVCC drops, see
    /// [`Ltc4099::set_charger_disabled`]
    pub async fn set_command_1(&mut self, value: u8) -> Result<(), ChipError<T::Error>> {
        self.write_register(&command_1::REGISTER, value).await
    }

    pub async fn get_irq_mask(&mut self) -> Result<u8, ChipError<T::Error>> {
        self.read_register(&irq_mask::REGISTER).await
    }

    pub async fn set_irq_mask(&mut self, value: u8) -> Result<(), ChipError<T::Error>> {
        self.write_register(&irq_mask::REGISTER, value).await
    }

    pub async fn get_output(&mut self) -> Result<u8, ChipError<T::Error>> {
        self.read_register(&output::REGISTER).await
    }

    /// OUTPUT is a status register, the part does not take writes to it
    pub async fn set_output(&mut self, value: u8) -> Result<(), ChipError<T::Error>> {
        self.write_register(&output::REGISTER, value).await
    }

    /// Reads the register and returns the (shifted down) field value
    pub async fn get_field(
        &mut self,
        reg: &Register,
        field: &Field,
    ) -> Result<u8, ChipError<T::Error>> {
        let raw = self.read_register(reg).await?;
        Ok(field.extract(raw))
    }

    /// Read-modify-write of a single field. Other bits keep whatever the part
    /// reported. Values wider than the field are refused before touching the bus
    pub async fn set_field(
        &mut self,
        reg: &Register,
        field: &Field,
        value: u8,
    ) -> Result<(), ChipError<T::Error>> {
        let out_of_range = || ChipError::ValueOutOfRange {
            field: field.name,
            value,
        };

        if value > field.max() {
            return Err(out_of_range());
        }

        let raw = self.read_register(reg).await?;
        let updated = field.insert(raw, value).ok_or_else(out_of_range)?;

        debug!(
            "{}.{}: {=u8:#x} -> {=u8:#x}",
            reg.name, field.name, raw, updated
        );

        self.write_register(reg, updated).await
    }

    async fn get_flag(&mut self, reg: &Register, field: &Field) -> Result<bool, ChipError<T::Error>> {
        Ok(self.get_field(reg, field).await? != 0)
    }

    pub async fn input_current_limit(&mut self) -> Result<InputCurrentLimit, ChipError<T::Error>> {
        let value = self.get_field(&command_0::REGISTER, &command_0::ILIM).await?;
        Ok(value.into())
    }

    pub async fn set_input_current_limit(
        &mut self,
        limit: InputCurrentLimit,
    ) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_0::REGISTER, &command_0::ILIM, limit.into())
            .await
    }

    pub async fn charge_current(&mut self) -> Result<ChargeCurrent, ChipError<T::Error>> {
        let value = self
            .get_field(&command_0::REGISTER, &command_0::ICHARGE)
            .await?;
        Ok(value.into())
    }

    pub async fn set_charge_current(
        &mut self,
        current: ChargeCurrent,
    ) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_0::REGISTER, &command_0::ICHARGE, current.into())
            .await
    }

    pub async fn end_of_charge_threshold(
        &mut self,
    ) -> Result<EndOfChargeThreshold, ChipError<T::Error>> {
        let value = self
            .get_field(&command_0::REGISTER, &command_0::COVERX)
            .await?;
        Ok(value.into())
    }

    pub async fn set_end_of_charge_threshold(
        &mut self,
        threshold: EndOfChargeThreshold,
    ) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_0::REGISTER, &command_0::COVERX, threshold.into())
            .await
    }

    pub async fn safety_timer(&mut self) -> Result<SafetyTimer, ChipError<T::Error>> {
        let value = self.get_field(&command_1::REGISTER, &command_1::TIMER).await?;
        Ok(value.into())
    }

    pub async fn set_safety_timer(&mut self, timer: SafetyTimer) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_1::REGISTER, &command_1::TIMER, timer.into())
            .await
    }

    pub async fn charger_disabled(&mut self) -> Result<bool, ChipError<T::Error>> {
        self.get_flag(&command_1::REGISTER, &command_1::DISABLE_CHARGER)
            .await
    }

    /// Use with caution: once charging is disabled it may not be possible to
    /// bring the battery back up. Without I2C access only a low voltage on
    /// DVCC resets the port and re-enables charging
    pub async fn set_charger_disabled(&mut self, disabled: bool) -> Result<(), ChipError<T::Error>> {
        if disabled {
            info!("disabling the charger");
        }

        self.set_field(
            &command_1::REGISTER,
            &command_1::DISABLE_CHARGER,
            disabled as u8,
        )
        .await
    }

    pub async fn battery_conditioner_enabled(&mut self) -> Result<bool, ChipError<T::Error>> {
        self.get_flag(&command_1::REGISTER, &command_1::ENABLE_BATTERY_CONDITIONER)
            .await
    }

    pub async fn set_battery_conditioner_enabled(
        &mut self,
        enabled: bool,
    ) -> Result<(), ChipError<T::Error>> {
        self.set_field(
            &command_1::REGISTER,
            &command_1::ENABLE_BATTERY_CONDITIONER,
            enabled as u8,
        )
        .await
    }

    pub async fn float_voltage(&mut self) -> Result<FloatVoltage, ChipError<T::Error>> {
        let value = self.get_field(&command_1::REGISTER, &command_1::VFLOAT).await?;
        Ok(value.into())
    }

    pub async fn set_float_voltage(&mut self, voltage: FloatVoltage) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_1::REGISTER, &command_1::VFLOAT, voltage.into())
            .await
    }

    pub async fn thermal_regulation(&mut self) -> Result<ThermalRegulation, ChipError<T::Error>> {
        let value = self.get_field(&command_1::REGISTER, &command_1::TREG).await?;
        Ok(value.into())
    }

    pub async fn set_thermal_regulation(
        &mut self,
        treg: ThermalRegulation,
    ) -> Result<(), ChipError<T::Error>> {
        self.set_field(&command_1::REGISTER, &command_1::TREG, treg.into())
            .await
    }

    /// Reads the interrupt enables. Reserved bits are dropped
    pub async fn interrupt_mask(&mut self) -> Result<IrqMask, ChipError<T::Error>> {
        let raw = self.get_irq_mask().await?;
        Ok(IrqMask::from_bits_truncate(raw))
    }

    /// Replaces the interrupt enables with `mask` in one write
    pub async fn set_interrupt_mask(&mut self, mask: IrqMask) -> Result<(), ChipError<T::Error>> {
        self.set_irq_mask(mask.bits()).await
    }

    /// Reads back every writable setting
    pub async fn config(&mut self) -> Result<ChargerConfig, ChipError<T::Error>> {
        let c0 = self.get_command_0().await?;
        let c1 = self.get_command_1().await?;
        let irq = self.get_irq_mask().await?;

        Ok(ChargerConfig::from_registers(c0, c1, irq))
    }

    /// Writes COMMAND_0, COMMAND_1 and IRQ_MASK as whole bytes, in that order.
    /// Stops at the first failing write
    pub async fn apply_config(&mut self, config: &ChargerConfig) -> Result<(), ChipError<T::Error>> {
        info!("applying charger configuration...");

        self.set_command_0(config.command_0()).await?;
        self.set_command_1(config.command_1()).await?;
        self.set_irq_mask(config.irq_mask()).await?;

        info!("charger configured!");

        Ok(())
    }

    /// Puts every writable register back to its power-on value. Does not undo
    /// a previously set DISABLE_CHARGER, the part ignores that
    pub async fn restore_defaults(&mut self) -> Result<(), ChipError<T::Error>> {
        self.apply_config(&ChargerConfig::default()).await
    }
}

impl<I: embedded_hal_async::i2c::I2c> Ltc4099<I2cInterface<I>> {
    /// Shortcut for a part sitting at [`DEFAULT_ADDRESS`] on `i2c`
    pub fn new_i2c(i2c: I) -> Self {
        Self::new(I2cInterface::with_default_address(i2c))
    }
}


#[cfg(test)]
mod i2c_tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    const ADDR: u8 = DEFAULT_ADDRESS;

    #[tokio::test]
    async fn set_field_over_i2c() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x01], vec![0b0001_0001]),
            Transaction::write(ADDR, vec![0x01, 0b1011_0001]),
        ];
        let mut ltc = Ltc4099::new_i2c(Mock::new(&expectations));

        ltc.set_safety_timer(SafetyTimer::Hours1).await.unwrap();

        ltc.release().release().done();
    }

    #[tokio::test]
    async fn out_of_range_sends_nothing() {
        let expectations: [Transaction; 0] = [];
        let mut ltc = Ltc4099::new_i2c(Mock::new(&expectations));

        assert!(matches!(
            ltc.set_field(&output::REGISTER, &output::NTC, 4).await,
            Err(ChipError::ValueOutOfRange { field: "NTC", value: 4 })
        ));

        ltc.release().release().done();
    }

    #[tokio::test]
    async fn nack_is_surfaced() {
        let expectations = [Transaction::write_read(ADDR, vec![0x03], vec![0])
            .with_error(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ))];
        let mut ltc = Ltc4099::new_i2c(Mock::new(&expectations));

        assert_eq!(
            ltc.status().await,
            Err(ChipError::Bus(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address
            )))
        );

        ltc.release().release().done();
    }

    #[tokio::test]
    async fn apply_config_is_three_plain_writes() {
        let config = ChargerConfig {
            charge_current: ChargeCurrent::Prog800mV,
            thermal_regulation: ThermalRegulation::C85,
            interrupts: IrqMask::CHARGER_STATUS,
            ..Default::default()
        };
        let expectations = [
            Transaction::write(ADDR, vec![0x00, 0b0000_1100]),
            Transaction::write(ADDR, vec![0x01, 0b0000_0010]),
            Transaction::write(ADDR, vec![0x02, 0b0000_0100]),
        ];
        let mut ltc = Ltc4099::new_i2c(Mock::new(&expectations));

        ltc.apply_config(&config).await.unwrap();

        ltc.release().release().done();
    }
}
