//! Subdevice function codes.
//!
//! Every subdevice header carries a 16-bit function code identifying what
//! the subdevice does, plus an 8-bit subfunction and an 8-bit interface
//! version. The codes below are the interface-id list shared with the VHDL
//! side and the kernel module.

/// Function implemented by a subdevice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionId {
    /// Info block — carries a textual description of the whole device.
    Info,
    /// Analog input.
    AnalogIn,
    /// Analog output.
    AnalogOut,
    /// Digital in-/output.
    Dio,
    /// Event counter.
    Counter,
    /// Pulse-width modulation output.
    Pwm,
    /// Pulse/period width acquisition.
    Ppwa,
    /// Watchdog.
    Watchdog,
    /// Reflective (optical) sensor with hysteresis bounds.
    ReflectiveSensor,
    /// Stepper motor controller.
    StepperMotor,
    /// Interrupt multiplexer.
    IrqMultiplexer,
    /// Function code not known to this library version.
    Unknown(u16),
}

impl FunctionId {
    /// Decode a wire function code.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0x00 => Self::Info,
            0x01 => Self::AnalogIn,
            0x02 => Self::AnalogOut,
            0x05 => Self::Dio,
            0x06 => Self::Counter,
            0x0C => Self::Pwm,
            0x0D => Self::Ppwa,
            0x10 => Self::Watchdog,
            0x11 => Self::ReflectiveSensor,
            0x12 => Self::StepperMotor,
            0x20 => Self::IrqMultiplexer,
            other => Self::Unknown(other),
        }
    }

    /// The wire function code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Info => 0x00,
            Self::AnalogIn => 0x01,
            Self::AnalogOut => 0x02,
            Self::Dio => 0x05,
            Self::Counter => 0x06,
            Self::Pwm => 0x0C,
            Self::Ppwa => 0x0D,
            Self::Watchdog => 0x10,
            Self::ReflectiveSensor => 0x11,
            Self::StepperMotor => 0x12,
            Self::IrqMultiplexer => 0x20,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable function name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::AnalogIn => "analog input",
            Self::AnalogOut => "analog output",
            Self::Dio => "digital i/o",
            Self::Counter => "counter",
            Self::Pwm => "pwm",
            Self::Ppwa => "ppwa",
            Self::Watchdog => "watchdog",
            Self::ReflectiveSensor => "reflective sensor",
            Self::StepperMotor => "stepper motor",
            Self::IrqMultiplexer => "irq multiplexer",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown (0x{code:04x})"),
            other => f.write_str(other.name()),
        }
    }
}
