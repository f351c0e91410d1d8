//! PPWA (pulse/period width acquisition) subdevices.
//!
//! Same bank layout as PWM, but measured values — read-only.

use flink_bus::layout::{pwm_bank, BASECLK_OFFSET, PPWA_FIRSTPPWA_OFFSET};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a PPWA subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Ppwa<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Ppwa<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a PPWA block.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Ppwa)?;
        Ok(Self { sub })
    }

    /// Base clock of the acquisition block in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn base_clock(&self) -> Result<u32> {
        self.sub.read_scalar(BASECLK_OFFSET)
    }

    /// Measured period on `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn period(&self, channel: u32) -> Result<u32> {
        self.sub
            .read_bank(PPWA_FIRSTPPWA_OFFSET, pwm_bank::PERIOD, channel)
    }

    /// Measured high time on `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn hightime(&self, channel: u32) -> Result<u32> {
        self.sub
            .read_bank(PPWA_FIRSTPPWA_OFFSET, pwm_bank::HIGHTIME, channel)
    }
}
