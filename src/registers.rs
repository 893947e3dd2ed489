//! Register catalogue of the LTC4099.
//!
//! Every register is a single byte. Each one is described by a [`Register`]
//! whose [`Field`]s tile all eight bits (reserved bits are kept as `UNUSED`
//! fields). Field defaults and symbolic values are stored unshifted, i.e.
//! the way they appear in the datasheet tables.

use crate::fmt::*;

/// Direction a register may be accessed in, as documented by the datasheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    ReadWrite,
    /// Status registers. Writes are still passed to the bus, the part ignores them
    ReadOnly,
}

/// A named group of bits within a register
#[derive(Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub mask: u8,
    /// Power-up value, unshifted
    pub default: u8,
    /// Symbolic values, unshifted. Empty for plain flags
    pub values: &'static [(&'static str, u8)],
}

impl Field {
    pub const fn shift(&self) -> u32 {
        self.mask.trailing_zeros()
    }

    pub const fn width(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Largest value that fits into the field
    pub const fn max(&self) -> u8 {
        self.mask >> self.shift()
    }

    /// Pulls the field out of a raw register byte
    pub const fn extract(&self, raw: u8) -> u8 {
        (raw & self.mask) >> self.shift()
    }

    /// Replaces the field inside `raw`, leaving all other bits alone.
    /// Returns `None` if `value` does not fit.
    pub const fn insert(&self, raw: u8, value: u8) -> Option<u8> {
        if value > self.max() {
            return None;
        }

        Some((raw & !self.mask) | ((value << self.shift()) & self.mask))
    }

    pub fn label(&self, value: u8) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(label, _)| *label)
    }

    pub fn value_of(&self, label: &str) -> Option<u8> {
        self.values
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, value)| *value)
    }
}

/// A single addressable register
#[derive(Debug, PartialEq, Eq)]
pub struct Register {
    pub name: &'static str,
    pub address: u8,
    /// In bits. Always 8 on this part
    pub width: u8,
    pub access: Access,
    pub fields: &'static [Field],
}

impl Register {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The byte the register holds after a power-on reset
    pub fn default_value(&self) -> u8 {
        self.fields
            .iter()
            .fold(0, |raw, f| raw | ((f.default << f.shift()) & f.mask))
    }
}

const fn flag(name: &'static str, bit: u8) -> Field {
    Field {
        name,
        mask: 1 << bit,
        default: 0,
        values: &[],
    }
}

/// Input current limit, charge current servo level and C/x detection threshold
pub mod command_0 {
    use super::{Access, Field, Register};

    pub const ADDRESS: u8 = 0x00;

    /// Maximum current drawn from VBUS. Anything the load needs above it comes
    /// from the battery. Powers up in the low power 100mA USB setting
    pub const ILIM: Field = Field {
        name: "ILim",
        mask: 0b1110_0000,
        default: 0b000,
        values: &[
            ("USB_100mA", 0b000),
            ("USB_500mA", 0b001),
            ("USB_620mA", 0b010),
            ("USB_790mA", 0b011),
            ("USB_1000mA", 0b100),
            ("USB_1200mA", 0b101),
            ("USB_SUSPEND_LOW", 0b110),
            ("USB_SUSPEND_HIGH", 0b111),
        ],
    };

    /// PROG pin servo voltage. Charge current is VPROG / RPROG * 1030
    pub const ICHARGE: Field = Field {
        name: "ICharge",
        mask: 0b0001_1100,
        default: 0b000,
        values: &[
            ("PROG_500_mV", 0b000),
            ("PROG_600_mV", 0b001),
            ("PROG_700_mV", 0b010),
            ("PROG_800_mV", 0b011),
            ("PROG_900_mV", 0b100),
            ("PROG_1000_mV", 0b101),
            ("PROG_1100_mV", 0b110),
            ("PROG_1200_mV", 0b111),
        ],
    };

    /// PROG pin level below which the charge is reported as complete
    pub const COVERX: Field = Field {
        name: "COVERX",
        mask: 0b0000_0011,
        default: 0b00,
        values: &[
            ("PROG_100mV", 0b00),
            ("PROG_50mV", 0b01),
            ("PROG_200mV", 0b10),
            ("PROG_500mV", 0b11),
        ],
    };

    pub const REGISTER: Register = Register {
        name: "COMMAND_0",
        address: ADDRESS,
        width: 8,
        access: Access::ReadWrite,
        fields: &[ILIM, ICHARGE, COVERX],
    };
}

/// Safety timer, charger enable and the float voltage / thermal regulation switches
pub mod command_1 {
    use super::{flag, Access, Field, Register};

    pub const ADDRESS: u8 = 0x01;

    /// Duration of the safety timer, which starts once the float voltage is reached
    pub const TIMER: Field = Field {
        name: "TIMER",
        mask: 0b1110_0000,
        default: 0b000,
        values: &[
            ("TIMEOUT_4h", 0b000),
            ("TIMEOUT_5h", 0b001),
            ("TIMEOUT_6h", 0b010),
            ("TIMEOUT_7h", 0b011),
            ("TIMEOUT_8h", 0b100),
            ("TIMEOUT_1h", 0b101),
            ("TIMEOUT_2h", 0b110),
            ("TIMEOUT_3h", 0b111),
        ],
    };

    /// Once set, only a low voltage on DVCC brings the port back to its
    /// default state and re-enables charging. Software cannot clear it.
    pub const DISABLE_CHARGER: Field = flag("DISABLE_CHARGER", 4);

    /// Automatic battery load in case of simultaneously high battery voltage and temperature
    pub const ENABLE_BATTERY_CONDITIONER: Field = flag("ENABLE_BATTERY_CONDITIONER", 3);

    /// 0 = 4.100V, 1 = 4.200V
    pub const VFLOAT: Field = Field {
        name: "VFLOAT",
        mask: 0b0000_0100,
        default: 0,
        values: &[("VFLOAT_4100mV", 0), ("VFLOAT_4200mV", 1)],
    };

    /// Junction thermal regulation point. 0 = 105°C, 1 = 85°C
    pub const TREG: Field = Field {
        name: "TREG",
        mask: 0b0000_0010,
        default: 0,
        values: &[("TREG_105C", 0), ("TREG_85C", 1)],
    };

    pub const UNUSED: Field = flag("UNUSED", 0);

    pub const REGISTER: Register = Register {
        name: "COMMAND_1",
        address: ADDRESS,
        width: 8,
        access: Access::ReadWrite,
        fields: &[
            TIMER,
            DISABLE_CHARGER,
            ENABLE_BATTERY_CONDITIONER,
            VFLOAT,
            TREG,
            UNUSED,
        ],
    };
}

/// A 1 allows a status change in that category to raise an interrupt.
/// All zeros after start-up, so nothing fires until requested.
pub mod irq_mask {
    use super::{flag, Access, Field, Register};

    pub const ADDRESS: u8 = 0x02;

    pub const USBGOOD: Field = flag("USBGOOD", 7);
    pub const WALLGOOD: Field = flag("WALLGOOD", 6);
    pub const BADCELL: Field = flag("BADCELL", 5);
    pub const THERMAL_REG: Field = flag("THERMAL_REG", 4);
    pub const THERMISTOR_STATUS: Field = flag("THERMISTOR_STATUS", 3);
    pub const CHARGER_STATUS: Field = flag("CHARGER_STATUS", 2);
    pub const UNUSED: Field = Field {
        name: "UNUSED",
        mask: 0b0000_0011,
        default: 0b00,
        values: &[],
    };

    pub const REGISTER: Register = Register {
        name: "IRQ_MASK",
        address: ADDRESS,
        width: 8,
        access: Access::ReadWrite,
        fields: &[
            USBGOOD,
            WALLGOOD,
            BADCELL,
            THERMAL_REG,
            THERMISTOR_STATUS,
            CHARGER_STATUS,
            UNUSED,
        ],
    };
}

/// The status byte. A 1 in any flag position means the condition is true
pub mod output {
    use super::{flag, Access, Field, Register};

    pub const ADDRESS: u8 = 0x03;

    /// Power present at VBUS (above the VBUS undervoltage lockout)
    pub const USBGOOD: Field = flag("USBGOOD", 7);
    /// Power present at WALL, both absolutely and relative to BAT
    pub const WALLGOOD: Field = flag("WALLGOOD", 6);
    /// Battery stayed below ~2.85V for more than half an hour of charging
    pub const BADCELL: Field = flag("BADCELL", 5);
    /// Charger is limited by junction temperature (at whichever TREG is set)
    pub const THERMAL_REG: Field = flag("THERMAL_REG", 4);

    pub const NTC: Field = Field {
        name: "NTC",
        mask: 0b0000_1100,
        default: 0b00,
        values: &[
            ("NO_NTC_FAULT", 0b00),
            ("BATTERY_TOO_COLD", 0b01),
            ("BATTERY_TOO_HOT", 0b10),
            ("BATTERY_OVERTEMPERATURE", 0b11),
        ],
    };

    pub const CHRGR: Field = Field {
        name: "CHRGR",
        mask: 0b0000_0011,
        default: 0b00,
        values: &[
            ("CHARGER_OFF", 0b00),
            ("CONSTANT_CURRENT", 0b01),
            ("CONSTANT_V_GREATER", 0b10),
            ("CONSTANT_V_LESS", 0b11),
        ],
    };

    pub const REGISTER: Register = Register {
        name: "OUTPUT",
        address: ADDRESS,
        width: 8,
        access: Access::ReadOnly,
        fields: &[USBGOOD, WALLGOOD, BADCELL, THERMAL_REG, NTC, CHRGR],
    };
}

/// All registers of the part, ordered by address
pub static REGISTERS: [&Register; 4] = [
    &command_0::REGISTER,
    &command_1::REGISTER,
    &irq_mask::REGISTER,
    &output::REGISTER,
];

pub fn register_at(address: u8) -> Option<&'static Register> {
    REGISTERS.iter().copied().find(|r| r.address == address)
}

pub fn register_named(name: &str) -> Option<&'static Register> {
    REGISTERS.iter().copied().find(|r| r.name == name)
}

bitflags! {
    /// Interrupt enables, as written to IRQ_MASK
    pub struct IrqMask: u8 {
        const USBGOOD = 1 << 7;
        const WALLGOOD = 1 << 6;
        const BADCELL = 1 << 5;
        const THERMAL_REG = 1 << 4;
        const THERMISTOR_STATUS = 1 << 3;
        const CHARGER_STATUS = 1 << 2;
    }
}

bitflags! {
    /// Single-bit conditions reported by the OUTPUT register
    pub struct StatusFlags: u8 {
        const USBGOOD = 1 << 7;
        const WALLGOOD = 1 << 6;
        const BADCELL = 1 << 5;
        const THERMAL_REG = 1 << 4;
    }
}

impl From<u8> for IrqMask {
    fn from(value: u8) -> Self {
        IrqMask::from_bits_truncate(value)
    }
}

impl From<u8> for StatusFlags {
    fn from(value: u8) -> Self {
        StatusFlags::from_bits_truncate(value)
    }
}
