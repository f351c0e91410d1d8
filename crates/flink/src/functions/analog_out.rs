//! Analog output subdevices.

use flink_bus::layout::{ANALOG_OUTPUT_FIRST_VALUE_OFFSET, RESOLUTION_OFFSET};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of an analog output subdevice.
#[derive(Debug, Clone, Copy)]
pub struct AnalogOut<'d> {
    sub: Subdevice<'d>,
}

impl<'d> AnalogOut<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not an analog output.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::AnalogOut)?;
        Ok(Self { sub })
    }

    /// Converter resolution in number of resolvable steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn resolution(&self) -> Result<u32> {
        self.sub.read_scalar(RESOLUTION_OFFSET)
    }

    /// Drive `channel` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_value(&self, channel: u32, value: u32) -> Result<()> {
        self.sub
            .write_bank(ANALOG_OUTPUT_FIRST_VALUE_OFFSET, 0, channel, value)
    }
}
