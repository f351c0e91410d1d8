//! Event counter subdevices.

use flink_bus::layout::{COUNTER_FIRST_COUNT_OFFSET, COUNTER_MODE_OFFSET};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a counter subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Counter<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Counter<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a counter.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Counter)?;
        Ok(Self { sub })
    }

    /// Set the counting mode (applies to all channels). The mode register
    /// only carries an 8-bit code; the upper bytes are written as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the register write fails.
    pub fn set_mode(&self, mode: u8) -> Result<()> {
        self.sub.write_scalar(COUNTER_MODE_OFFSET, u32::from(mode))
    }

    /// Current count of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn count(&self, channel: u32) -> Result<u32> {
        self.sub.read_bank(COUNTER_FIRST_COUNT_OFFSET, 0, channel)
    }
}
