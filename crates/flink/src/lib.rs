//! Userspace access library for flink FPGA I/O devices.
//!
//! A flink device is an FPGA design exposing a set of self-describing
//! **subdevices** (PWM, analog I/O, digital I/O, counters, watchdog,
//! stepper motor, reflective sensor, …) behind a single character device.
//! This crate opens the device file, enumerates the subdevices from their
//! binary headers, and performs byte- and bit-granular register
//! transactions against them through the kernel driver.
//!
//! # Transport hierarchy
//!
//! ```text
//! Hardware:
//!   CharDevTransport — /dev/flink* ioctl + positional read/write
//!
//! Development / CI (no hardware required):
//!   SoftBus — in-memory register windows with full layout semantics
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use flink::{AccessMode, FlinkDevice};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dev = FlinkDevice::open("/dev/flink0")?;
//! println!("{} subdevices", dev.nof_subdevices());
//!
//! let sub = dev.subdevice(1)?;
//! sub.select(AccessMode::Exclusive)?;
//!
//! let pwm = sub.as_pwm()?;
//! println!("base clock: {} Hz", pwm.base_clock()?);
//! pwm.set_period(0, 1000)?;
//! pwm.set_hightime(0, 500)?;
//! # Ok(())
//! # }
//! ```
//!
//! All calls are synchronous and blocking; nothing is retried. Concurrency
//! control across processes goes through the driver's exclusive-selection
//! claim ([`Subdevice::select`]), not through in-process locking.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod device;
mod error;
pub mod functions;
mod softbus;
mod subdevice;
pub mod transport;

/// Bus model constants (re-exported from flink-bus).
pub mod bus {
    pub use flink_bus::{cmd, descriptor, func, layout};
}

pub use device::FlinkDevice;
pub use error::{FlinkError, Result};
pub use flink_bus::{FunctionId, RawDescriptor};
pub use functions::{
    AnalogIn, AnalogOut, Counter, Dio, Direction, Info, Ppwa, Pwm, ReflectiveSensor, StepperMotor,
    Watchdog,
};
pub use softbus::{SoftBus, SoftSubdevice};
pub use subdevice::{Subdevice, SubdeviceDescriptor};
pub use transport::{AccessMode, BusTransport, CharDevTransport};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        AccessMode, BusTransport, Direction, FlinkDevice, FlinkError, FunctionId, Result, SoftBus,
        SoftSubdevice, Subdevice,
    };
}
