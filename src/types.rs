//! Typed values for the multi-state fields. Discriminants are the raw,
//! unshifted field values, so `value as u8` is what goes on the wire.

/// Generates a field enum that covers every bit pattern of its field, so the
/// decoding side is infallible
macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $bits:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl From<u8> for $name {
            /// Decodes an unshifted field value. Bits above the field width are ignored
            fn from(raw: u8) -> Self {
                match raw & ((1 << $bits) - 1) {
                    $($value => Self::$variant,)+
                    _ => unreachable!(),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}

field_enum! {
    /// Input current limit on VBUS (COMMAND_0 ILim)
    InputCurrentLimit: 3 {
        Usb100mA = 0b000,
        Usb500mA = 0b001,
        Usb620mA = 0b010,
        Usb790mA = 0b011,
        Usb1000mA = 0b100,
        Usb1200mA = 0b101,
        UsbSuspendLow = 0b110,
        UsbSuspendHigh = 0b111,
    }
}

field_enum! {
    /// PROG pin servo voltage, selecting the charge current (COMMAND_0 ICharge)
    ChargeCurrent: 3 {
        Prog500mV = 0b000,
        Prog600mV = 0b001,
        Prog700mV = 0b010,
        Prog800mV = 0b011,
        Prog900mV = 0b100,
        Prog1000mV = 0b101,
        Prog1100mV = 0b110,
        Prog1200mV = 0b111,
    }
}

field_enum! {
    /// C/x end-of-charge detection threshold on PROG (COMMAND_0 COVERX)
    EndOfChargeThreshold: 2 {
        Prog100mV = 0b00,
        Prog50mV = 0b01,
        Prog200mV = 0b10,
        Prog500mV = 0b11,
    }
}

field_enum! {
    /// Safety timer duration (COMMAND_1 TIMER). Note the encoding wraps after 8h
    SafetyTimer: 3 {
        Hours4 = 0b000,
        Hours5 = 0b001,
        Hours6 = 0b010,
        Hours7 = 0b011,
        Hours8 = 0b100,
        Hours1 = 0b101,
        Hours2 = 0b110,
        Hours3 = 0b111,
    }
}

field_enum! {
    /// Final float voltage (COMMAND_1 VFLOAT)
    FloatVoltage: 1 {
        V4100mV = 0,
        V4200mV = 1,
    }
}

field_enum! {
    /// Junction thermal regulation temperature (COMMAND_1 TREG)
    ThermalRegulation: 1 {
        C105 = 0,
        C85 = 1,
    }
}

field_enum! {
    /// Thermistor measurement result (OUTPUT NTC)
    NtcStatus: 2 {
        NoFault = 0b00,
        TooCold = 0b01,
        TooHot = 0b10,
        Overtemperature = 0b11,
    }
}

field_enum! {
    /// Charger state (OUTPUT CHRGR)
    ChargerState: 2 {
        Off = 0b00,
        /// Charging with all available current, float voltage not yet reached
        ConstantCurrent = 0b01,
        /// In float voltage phase, current still above C/x
        ConstantVoltageAboveCx = 0b10,
        /// Current has dropped below C/x
        ConstantVoltageBelowCx = 0b11,
    }
}

impl SafetyTimer {
    pub fn hours(&self) -> u8 {
        match self {
            Self::Hours1 => 1,
            Self::Hours2 => 2,
            Self::Hours3 => 3,
            Self::Hours4 => 4,
            Self::Hours5 => 5,
            Self::Hours6 => 6,
            Self::Hours7 => 7,
            Self::Hours8 => 8,
        }
    }
}

impl FloatVoltage {
    pub fn millivolts(&self) -> u16 {
        match self {
            Self::V4100mV => 4100,
            Self::V4200mV => 4200,
        }
    }
}

impl ThermalRegulation {
    pub fn celsius(&self) -> u8 {
        match self {
            Self::C105 => 105,
            Self::C85 => 85,
        }
    }
}

impl InputCurrentLimit {
    /// `None` for the two USB suspend settings
    pub fn milliamps(&self) -> Option<u16> {
        match self {
            Self::Usb100mA => Some(100),
            Self::Usb500mA => Some(500),
            Self::Usb620mA => Some(620),
            Self::Usb790mA => Some(790),
            Self::Usb1000mA => Some(1000),
            Self::Usb1200mA => Some(1200),
            Self::UsbSuspendLow | Self::UsbSuspendHigh => None,
        }
    }
}

impl ChargeCurrent {
    pub fn prog_millivolts(&self) -> u16 {
        500 + 100 * (*self as u16)
    }
}
