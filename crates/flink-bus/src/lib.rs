//! Pure model of the flink FPGA I/O bus.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! model of the bus contract shared between the kernel driver and userspace:
//! register window layout, subdevice function codes, ioctl command numbers,
//! and the binary descriptor record each subdevice header carries.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`layout`] | Register window geometry — header/subheader sizes, status/config offsets, per-function bank offsets |
//! | [`func`] | Subdevice function codes (PWM, DIO, watchdog, …) |
//! | [`cmd`] | Ioctl command numbers of the kernel driver |
//! | [`descriptor`] | 28-byte subdevice descriptor wire record |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cmd;
pub mod descriptor;
pub mod func;
pub mod layout;

pub use descriptor::RawDescriptor;
pub use func::FunctionId;
