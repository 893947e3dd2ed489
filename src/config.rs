//! Typed bundle of every writable charger setting

use crate::registers::{command_0, command_1, Field, IrqMask};
use crate::types::*;

/// Charger settings. `Default` is the power-on state of the part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargerConfig {
    pub input_current_limit: InputCurrentLimit,
    pub charge_current: ChargeCurrent,
    pub end_of_charge: EndOfChargeThreshold,
    pub safety_timer: SafetyTimer,
    pub charger_disabled: bool,
    pub battery_conditioner: bool,
    pub float_voltage: FloatVoltage,
    pub thermal_regulation: ThermalRegulation,
    pub interrupts: IrqMask,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            input_current_limit: InputCurrentLimit::from(command_0::ILIM.default),
            charge_current: ChargeCurrent::from(command_0::ICHARGE.default),
            end_of_charge: EndOfChargeThreshold::from(command_0::COVERX.default),
            safety_timer: SafetyTimer::from(command_1::TIMER.default),
            charger_disabled: command_1::DISABLE_CHARGER.default != 0,
            battery_conditioner: command_1::ENABLE_BATTERY_CONDITIONER.default != 0,
            float_voltage: FloatVoltage::from(command_1::VFLOAT.default),
            thermal_regulation: ThermalRegulation::from(command_1::TREG.default),
            interrupts: IrqMask::empty(),
        }
    }
}

/// Every value here comes from a typed enum or a bool, so it always fits
fn put(raw: u8, field: &Field, value: u8) -> u8 {
    field.insert(raw, value).unwrap_or(raw)
}

impl ChargerConfig {
    /// Encodes the COMMAND_0 byte
    pub fn command_0(&self) -> u8 {
        let raw = put(0, &command_0::ILIM, self.input_current_limit.into());
        let raw = put(raw, &command_0::ICHARGE, self.charge_current.into());
        put(raw, &command_0::COVERX, self.end_of_charge.into())
    }

    /// Encodes the COMMAND_1 byte. The unused bit is left clear
    pub fn command_1(&self) -> u8 {
        let raw = put(0, &command_1::TIMER, self.safety_timer.into());
        let raw = put(raw, &command_1::DISABLE_CHARGER, self.charger_disabled as u8);
        let raw = put(
            raw,
            &command_1::ENABLE_BATTERY_CONDITIONER,
            self.battery_conditioner as u8,
        );
        let raw = put(raw, &command_1::VFLOAT, self.float_voltage.into());
        put(raw, &command_1::TREG, self.thermal_regulation.into())
    }

    pub fn irq_mask(&self) -> u8 {
        self.interrupts.bits()
    }

    /// Decodes settings previously read back from the part
    pub fn from_registers(command_0: u8, command_1: u8, irq_mask: u8) -> Self {
        use crate::registers::{command_0 as c0, command_1 as c1};

        Self {
            input_current_limit: c0::ILIM.extract(command_0).into(),
            charge_current: c0::ICHARGE.extract(command_0).into(),
            end_of_charge: c0::COVERX.extract(command_0).into(),
            safety_timer: c1::TIMER.extract(command_1).into(),
            charger_disabled: c1::DISABLE_CHARGER.extract(command_1) != 0,
            battery_conditioner: c1::ENABLE_BATTERY_CONDITIONER.extract(command_1) != 0,
            float_voltage: c1::VFLOAT.extract(command_1).into(),
            thermal_regulation: c1::TREG.extract(command_1).into(),
            interrupts: IrqMask::from_bits_truncate(irq_mask),
        }
    }
}
