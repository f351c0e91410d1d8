//! Register window layout of a flink subdevice.
//!
//! Every subdevice occupies one contiguous memory window within the bus
//! address space. The first 32 bytes of each window are fixed:
//!
//! ```text
//! 0x00 ┌──────────────────────────────┐
//!      │ header (device-wide, 16 B)   │
//! 0x10 ├──────────────────────────────┤
//!      │ subheader (16 B)             │
//!      │   0x10  status register      │
//!      │   0x14  config register      │
//! 0x20 ├──────────────────────────────┤
//!      │ function registers           │
//!      │   +0x0  base clock / mode /  │
//!      │         resolution           │
//!      │   +0x4  first channel bank   │
//! ...  └──────────────────────────────┘
//! ```
//!
//! Channel `i` of bank `b` lives at
//! `HEADER_SIZE + SUBHEADER_SIZE + first + b·REGISTER_WIDTH·nof_channels +
//! i·REGISTER_WIDTH`. All offsets are window-relative bytes.

// ── Window geometry ──────────────────────────────────────────────────────────

/// Transfer granularity for whole-register reads/writes, in bytes.
pub const REGISTER_WIDTH: u32 = 4;

/// Device-wide header at the start of every subdevice window, in bytes.
pub const HEADER_SIZE: u32 = 16;

/// Per-subdevice subheader following the header, in bytes.
pub const SUBHEADER_SIZE: u32 = 16;

/// Status register, window-relative.
pub const STATUS_OFFSET: u32 = 0x10;

/// Config register, window-relative.
pub const CONFIG_OFFSET: u32 = 0x14;

/// Offset of the first function-specific register (end of header+subheader).
pub const FUNCTION_BASE: u32 = HEADER_SIZE + SUBHEADER_SIZE;

// ── Config register bits ─────────────────────────────────────────────────────

/// Config register bit 0 — writing 1 resets the subdevice.
pub const RESET_BIT: u8 = 0;

/// Config register bit 1 — function-specific control bit: arms a watchdog,
/// or performs a global step reset on a stepper motor subdevice.
pub const AUX_CONFIG_BIT: u8 = 1;

// ── Function-specific first-register offsets ─────────────────────────────────
// Measured from FUNCTION_BASE. Offset 0x0 holds the per-subdevice scalar
// (base clock, resolution or mode); per-channel banks begin at 0x4.

/// Base clock register of PWM, PPWA, DIO, watchdog and stepper subdevices.
pub const BASECLK_OFFSET: u32 = 0x0000;

/// Resolution register of analog and reflective-sensor subdevices.
pub const RESOLUTION_OFFSET: u32 = 0x0000;

/// Mode register of counter subdevices.
pub const COUNTER_MODE_OFFSET: u32 = 0x0000;

/// First per-channel PWM register (period bank).
pub const PWM_FIRSTPWM_OFFSET: u32 = 0x0004;

/// First per-channel PPWA register (period bank).
pub const PPWA_FIRSTPPWA_OFFSET: u32 = 0x0004;

/// First per-channel analog input value register.
pub const ANALOG_INPUT_FIRST_VALUE_OFFSET: u32 = 0x0004;

/// First per-channel analog output value register.
pub const ANALOG_OUTPUT_FIRST_VALUE_OFFSET: u32 = 0x0004;

/// First per-channel reflective-sensor value register.
pub const REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET: u32 = 0x0004;

/// First per-channel counter count register.
pub const COUNTER_FIRST_COUNT_OFFSET: u32 = 0x0004;

/// Watchdog counter register (no channel dimension).
pub const WD_FIRST_COUNTER_OFFSET: u32 = 0x0004;

/// First per-channel stepper-motor local config register.
pub const STEPPER_MOTOR_FIRST_CONF_OFFSET: u32 = 0x0004;

/// First DIO bit bank (direction bits).
pub const DIO_FIRST_BANK_OFFSET: u32 = 0x0004;

// ── Info subdevice ───────────────────────────────────────────────────────────

/// Length of the info subdevice description string, and of the subdevice
/// descriptor wire record, in bytes.
pub const INFO_DESC_SIZE: usize = 28;

// ── Stepper motor bank indices ───────────────────────────────────────────────
// Six per-channel banks follow STEPPER_MOTOR_FIRST_CONF_OFFSET, each
// REGISTER_WIDTH · nof_channels bytes long.

/// Stepper motor register banks, in window order.
pub mod stepper_bank {
    /// Local config register bank.
    pub const CONFIG: u32 = 0;
    /// Prescaler start value bank.
    pub const PRESCALER_START: u32 = 1;
    /// Prescaler top value bank.
    pub const PRESCALER_TOP: u32 = 2;
    /// Acceleration bank.
    pub const ACCELERATION: u32 = 3;
    /// Steps-to-do bank.
    pub const STEPS_TO_DO: u32 = 4;
    /// Steps-have-done bank (read-only).
    pub const STEPS_HAVE_DONE: u32 = 5;
}

/// Reflective sensor register banks, in window order.
pub mod reflective_bank {
    /// Digitized value bank.
    pub const VALUE: u32 = 0;
    /// Upper hysteresis bound bank.
    pub const UPPER_HYSTERESIS: u32 = 1;
    /// Lower hysteresis bound bank.
    pub const LOWER_HYSTERESIS: u32 = 2;
}

/// PWM / PPWA register banks, in window order.
pub mod pwm_bank {
    /// Period bank.
    pub const PERIOD: u32 = 0;
    /// High-time bank.
    pub const HIGHTIME: u32 = 1;
}
