//! PWM output subdevices.
//!
//! Register layout behind the fixed region: base clock at `+0x0`, then a
//! period bank and a high-time bank of one register per channel.

use flink_bus::layout::{pwm_bank, BASECLK_OFFSET, PWM_FIRSTPWM_OFFSET};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a PWM subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Pwm<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Pwm<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a PWM.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Pwm)?;
        Ok(Self { sub })
    }

    /// Base clock of the PWM block in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn base_clock(&self) -> Result<u32> {
        self.sub.read_scalar(BASECLK_OFFSET)
    }

    /// Period of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn period(&self, channel: u32) -> Result<u32> {
        self.sub
            .read_bank(PWM_FIRSTPWM_OFFSET, pwm_bank::PERIOD, channel)
    }

    /// Set the period of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_period(&self, channel: u32, period: u32) -> Result<()> {
        tracing::debug!(
            "Setting PWM period {period} on channel {channel} of subdevice {}",
            self.sub.id()
        );
        self.sub
            .write_bank(PWM_FIRSTPWM_OFFSET, pwm_bank::PERIOD, channel, period)
    }

    /// High time of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn hightime(&self, channel: u32) -> Result<u32> {
        self.sub
            .read_bank(PWM_FIRSTPWM_OFFSET, pwm_bank::HIGHTIME, channel)
    }

    /// Set the high time of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_hightime(&self, channel: u32, hightime: u32) -> Result<()> {
        tracing::debug!(
            "Setting PWM hightime {hightime} on channel {channel} of subdevice {}",
            self.sub.id()
        );
        self.sub
            .write_bank(PWM_FIRSTPWM_OFFSET, pwm_bank::HIGHTIME, channel, hightime)
    }
}
