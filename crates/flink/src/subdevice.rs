//! Subdevice descriptors and handles.
//!
//! A [`SubdeviceDescriptor`] is one immutable entry in a device's table,
//! parsed from the binary header at enumeration time. A [`Subdevice`] is a
//! cheap (device, descriptor) reference pair through which all register
//! operations flow; per-channel offsets are computed in one place here so
//! that channel and window bounds are checked uniformly for every function
//! family.

use flink_bus::layout::{
    CONFIG_OFFSET, FUNCTION_BASE, REGISTER_WIDTH, RESET_BIT, STATUS_OFFSET,
};
use flink_bus::{FunctionId, RawDescriptor};

use crate::device::FlinkDevice;
use crate::error::{FlinkError, Result};
use crate::transport::{AccessMode, BusTransport};

/// One enumerated subdevice: function, geometry and memory window.
///
/// Built at enumeration time and immutable afterwards; the numeric id is
/// the enumeration index, stable for the life of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdeviceDescriptor {
    id: u8,
    function: FunctionId,
    sub_function: u8,
    function_version: u8,
    base_addr: u32,
    mem_size: u32,
    nof_channels: u32,
    unique_id: u32,
}

impl SubdeviceDescriptor {
    /// Build a descriptor from a parsed wire record. Enumeration order is
    /// authoritative for id assignment: the record's embedded id is
    /// discarded in favor of `id`.
    pub(crate) fn from_raw(id: u8, raw: &RawDescriptor) -> Self {
        Self {
            id,
            function: raw.function,
            sub_function: raw.sub_function,
            function_version: raw.function_version,
            base_addr: raw.base_addr,
            mem_size: raw.mem_size,
            nof_channels: raw.nof_channels,
            unique_id: raw.unique_id,
        }
    }

    /// Numeric id (enumeration index).
    pub const fn id(&self) -> u8 {
        self.id
    }

    /// Function implemented by this subdevice.
    pub const fn function(&self) -> FunctionId {
        self.function
    }

    /// Subfunction code.
    pub const fn sub_function(&self) -> u8 {
        self.sub_function
    }

    /// Interface/function version.
    pub const fn function_version(&self) -> u8 {
        self.function_version
    }

    /// Base address of the memory window within the bus address space.
    pub const fn base_addr(&self) -> u32 {
        self.base_addr
    }

    /// Memory window size in bytes.
    pub const fn mem_size(&self) -> u32 {
        self.mem_size
    }

    /// Number of channels.
    pub const fn nof_channels(&self) -> u32 {
        self.nof_channels
    }

    /// Globally-unique id, independent of enumeration order.
    pub const fn unique_id(&self) -> u32 {
        self.unique_id
    }
}

/// Handle to one subdevice of an open device.
///
/// Copyable reference pair; obtain via [`FlinkDevice::subdevice`] or
/// [`FlinkDevice::subdevice_by_unique_id`].
#[derive(Debug, Clone, Copy)]
pub struct Subdevice<'d> {
    device: &'d FlinkDevice,
    desc: &'d SubdeviceDescriptor,
}

impl<'d> Subdevice<'d> {
    pub(crate) fn new(device: &'d FlinkDevice, desc: &'d SubdeviceDescriptor) -> Self {
        Self { device, desc }
    }

    /// The immutable descriptor of this subdevice.
    pub const fn descriptor(&self) -> &SubdeviceDescriptor {
        self.desc
    }

    /// Numeric id (enumeration index).
    pub const fn id(&self) -> u8 {
        self.desc.id()
    }

    /// Function implemented by this subdevice.
    pub const fn function(&self) -> FunctionId {
        self.desc.function()
    }

    /// Number of channels.
    pub const fn nof_channels(&self) -> u32 {
        self.desc.nof_channels()
    }

    /// Globally-unique id.
    pub const fn unique_id(&self) -> u32 {
        self.desc.unique_id()
    }

    pub(crate) fn transport(&self) -> &dyn BusTransport {
        self.device.transport()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Select this subdevice for further operations, optionally with an
    /// exclusive claim. The claim is enforced by the driver, not by this
    /// library.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver refuses the claim or the
    /// transaction fails.
    pub fn select(&self, mode: AccessMode) -> Result<()> {
        self.transport().select(self.id(), mode)
    }

    /// Reset this subdevice by writing the reset bit of its config
    /// register.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn reset(&self) -> Result<()> {
        tracing::debug!("Resetting subdevice {}", self.id());
        self.write_bit(CONFIG_OFFSET, RESET_BIT, true)
    }

    /// Read the status register.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn status(&self) -> Result<u32> {
        self.read_register(STATUS_OFFSET)
    }

    // ── Interrupt multiplexing ───────────────────────────────────────────────

    /// Read the multiplex entry mapping local interrupt `irq` of this
    /// subdevice to a device interrupt line.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn irq_multiplex(&self, irq: u32) -> Result<u32> {
        self.transport().irq_multiplex(self.id(), irq)
    }

    /// Map local interrupt `irq` of this subdevice to device interrupt
    /// line `flink_irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn set_irq_multiplex(&self, irq: u32, flink_irq: u32) -> Result<()> {
        self.transport().set_irq_multiplex(self.id(), irq, flink_irq)
    }

    // ── Offset computation ───────────────────────────────────────────────────
    // The single place where per-channel offsets are derived and bounded.
    // Channel `channel` of bank `bank` behind `first`:
    //   FUNCTION_BASE + first + bank·REGISTER_WIDTH·nof_channels
    //                 + channel·REGISTER_WIDTH

    pub(crate) fn check_channel(&self, channel: u32) -> Result<()> {
        let count = self.desc.nof_channels();
        if channel >= count {
            return Err(FlinkError::InvalidChannel { channel, count });
        }
        Ok(())
    }

    pub(crate) fn check_window(&self, offset: u32, len: u32) -> Result<()> {
        let mem_size = self.desc.mem_size();
        if offset.checked_add(len).is_none_or(|end| end > mem_size) {
            return Err(FlinkError::OutOfWindow {
                offset,
                len,
                mem_size,
            });
        }
        Ok(())
    }

    /// Error for an offset computation that overflowed `u32`. Descriptor
    /// geometry comes off the wire; a garbled channel count must not wrap
    /// a stride into a valid-looking offset.
    pub(crate) fn window_overflow(&self) -> FlinkError {
        FlinkError::OutOfWindow {
            offset: u32::MAX,
            len: REGISTER_WIDTH,
            mem_size: self.desc.mem_size(),
        }
    }

    /// Offset of the per-subdevice scalar register (base clock,
    /// resolution, mode) behind `first`.
    pub(crate) fn scalar_offset(&self, first: u32) -> Result<u32> {
        let offset = FUNCTION_BASE + first;
        self.check_window(offset, REGISTER_WIDTH)?;
        Ok(offset)
    }

    /// Offset of `channel` in bank `bank` of the register group starting
    /// at `first`.
    pub(crate) fn bank_offset(&self, first: u32, bank: u32, channel: u32) -> Result<u32> {
        self.check_channel(channel)?;
        let offset = bank
            .checked_mul(self.desc.nof_channels())
            .and_then(|words| words.checked_add(channel))
            .and_then(|words| words.checked_mul(REGISTER_WIDTH))
            .and_then(|rel| rel.checked_add(FUNCTION_BASE + first))
            .ok_or_else(|| self.window_overflow())?;
        self.check_window(offset, REGISTER_WIDTH)?;
        Ok(offset)
    }

    // ── Register primitives ──────────────────────────────────────────────────

    /// Read the 4-byte register at a window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::OutOfWindow`] if the register does not fit
    /// the window, [`FlinkError::ShortTransfer`] on a short read, or a
    /// transport error.
    pub fn read_register(&self, offset: u32) -> Result<u32> {
        self.check_window(offset, REGISTER_WIDTH)?;
        let mut buf = [0u8; REGISTER_WIDTH as usize];
        let n = self.transport().read(self.id(), offset, &mut buf)?;
        if n != buf.len() {
            return Err(FlinkError::ShortTransfer {
                expected: buf.len(),
                actual: n,
            });
        }
        Ok(u32::from_le_bytes(buf))
    }

    /// Write the 4-byte register at a window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::OutOfWindow`] if the register does not fit
    /// the window, [`FlinkError::ShortTransfer`] on a short write, or a
    /// transport error.
    pub fn write_register(&self, offset: u32, value: u32) -> Result<()> {
        self.check_window(offset, REGISTER_WIDTH)?;
        let buf = value.to_le_bytes();
        let n = self.transport().write(self.id(), offset, &buf)?;
        if n != buf.len() {
            return Err(FlinkError::ShortTransfer {
                expected: buf.len(),
                actual: n,
            });
        }
        Ok(())
    }

    pub(crate) fn read_bit(&self, offset: u32, bit: u8) -> Result<bool> {
        self.check_window(offset, REGISTER_WIDTH)?;
        self.transport().read_bit(self.id(), offset, bit)
    }

    pub(crate) fn write_bit(&self, offset: u32, bit: u8, value: bool) -> Result<()> {
        self.check_window(offset, REGISTER_WIDTH)?;
        self.transport().write_bit(self.id(), offset, bit, value)
    }

    pub(crate) fn read_scalar(&self, first: u32) -> Result<u32> {
        let offset = self.scalar_offset(first)?;
        self.read_register(offset)
    }

    pub(crate) fn write_scalar(&self, first: u32, value: u32) -> Result<()> {
        let offset = self.scalar_offset(first)?;
        self.write_register(offset, value)
    }

    pub(crate) fn read_bank(&self, first: u32, bank: u32, channel: u32) -> Result<u32> {
        let offset = self.bank_offset(first, bank, channel)?;
        self.read_register(offset)
    }

    pub(crate) fn write_bank(&self, first: u32, bank: u32, channel: u32, value: u32) -> Result<()> {
        let offset = self.bank_offset(first, bank, channel)?;
        self.write_register(offset, value)
    }

    pub(crate) fn expect_function(&self, expected: FunctionId) -> Result<()> {
        let found = self.function();
        if found != expected {
            return Err(FlinkError::WrongFunction { expected, found });
        }
        Ok(())
    }

    // ── Typed accessors ──────────────────────────────────────────────────────

    /// View this subdevice as an info block.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_info(&self) -> Result<crate::functions::Info<'d>> {
        crate::functions::Info::new(*self)
    }

    /// View this subdevice as an analog input.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_analog_in(&self) -> Result<crate::functions::AnalogIn<'d>> {
        crate::functions::AnalogIn::new(*self)
    }

    /// View this subdevice as an analog output.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_analog_out(&self) -> Result<crate::functions::AnalogOut<'d>> {
        crate::functions::AnalogOut::new(*self)
    }

    /// View this subdevice as a digital I/O block.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_dio(&self) -> Result<crate::functions::Dio<'d>> {
        crate::functions::Dio::new(*self)
    }

    /// View this subdevice as a counter.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_counter(&self) -> Result<crate::functions::Counter<'d>> {
        crate::functions::Counter::new(*self)
    }

    /// View this subdevice as a PWM output.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_pwm(&self) -> Result<crate::functions::Pwm<'d>> {
        crate::functions::Pwm::new(*self)
    }

    /// View this subdevice as a PPWA block.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_ppwa(&self) -> Result<crate::functions::Ppwa<'d>> {
        crate::functions::Ppwa::new(*self)
    }

    /// View this subdevice as a watchdog.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_watchdog(&self) -> Result<crate::functions::Watchdog<'d>> {
        crate::functions::Watchdog::new(*self)
    }

    /// View this subdevice as a stepper motor controller.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_stepper(&self) -> Result<crate::functions::StepperMotor<'d>> {
        crate::functions::StepperMotor::new(*self)
    }

    /// View this subdevice as a reflective sensor.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`] if the function code differs.
    pub fn as_reflective_sensor(&self) -> Result<crate::functions::ReflectiveSensor<'d>> {
        crate::functions::ReflectiveSensor::new(*self)
    }
}
