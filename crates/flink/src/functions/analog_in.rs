//! Analog input subdevices.

use flink_bus::layout::{ANALOG_INPUT_FIRST_VALUE_OFFSET, RESOLUTION_OFFSET};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of an analog input subdevice.
#[derive(Debug, Clone, Copy)]
pub struct AnalogIn<'d> {
    sub: Subdevice<'d>,
}

impl<'d> AnalogIn<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not an analog input.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::AnalogIn)?;
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

    /// Digitized value of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn value(&self, channel: u32) -> Result<u32> {
        self.sub.read_bank(ANALOG_INPUT_FIRST_VALUE_OFFSET, 0, channel)
    }
}
