//! Stepper motor subdevices.
//!
//! Six per-channel register banks follow the base clock: local config,
//! prescaler start, prescaler top, acceleration, steps-to-do and
//! steps-have-done. Individual config bits can be set or cleared
//! atomically; the read-modify-write happens in the driver, this layer
//! only issues the intent.

use flink_bus::layout::{
    stepper_bank, AUX_CONFIG_BIT, BASECLK_OFFSET, CONFIG_OFFSET, STEPPER_MOTOR_FIRST_CONF_OFFSET,
};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a stepper motor subdevice.
#[derive(Debug, Clone, Copy)]
pub struct StepperMotor<'d> {
    sub: Subdevice<'d>,
}

impl<'d> StepperMotor<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a stepper motor controller.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::StepperMotor)?;
        Ok(Self { sub })
    }

    /// Base clock of the step generator in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn base_clock(&self) -> Result<u32> {
        self.sub.read_scalar(BASECLK_OFFSET)
    }

    fn bank(&self, bank: u32, channel: u32) -> Result<u32> {
        self.sub
            .read_bank(STEPPER_MOTOR_FIRST_CONF_OFFSET, bank, channel)
    }

    fn set_bank(&self, bank: u32, channel: u32, value: u32) -> Result<()> {
        self.sub
            .write_bank(STEPPER_MOTOR_FIRST_CONF_OFFSET, bank, channel, value)
    }

    /// Local config register of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn config(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::CONFIG, channel)
    }

    /// Overwrite the local config register of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_config(&self, channel: u32, config: u32) -> Result<()> {
        self.set_bank(stepper_bank::CONFIG, channel, config)
    }

    /// Atomically set the bits of `mask` in the local config register of
    /// `channel`, leaving all other bits untouched.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_config_bits(&self, channel: u32, mask: u32) -> Result<()> {
        let offset = self
            .sub
            .bank_offset(STEPPER_MOTOR_FIRST_CONF_OFFSET, stepper_bank::CONFIG, channel)?;
        self.sub.transport().set_bits(self.sub.id(), offset, mask)
    }

    /// Atomically clear the bits of `mask` in the local config register
    /// of `channel`, leaving all other bits untouched.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn clear_config_bits(&self, channel: u32, mask: u32) -> Result<()> {
        let offset = self
            .sub
            .bank_offset(STEPPER_MOTOR_FIRST_CONF_OFFSET, stepper_bank::CONFIG, channel)?;
        self.sub.transport().clear_bits(self.sub.id(), offset, mask)
    }

    /// Prescaler start value of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn prescaler_start(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::PRESCALER_START, channel)
    }

    /// Set the prescaler start value of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_prescaler_start(&self, channel: u32, prescaler: u32) -> Result<()> {
        self.set_bank(stepper_bank::PRESCALER_START, channel, prescaler)
    }

    /// Prescaler top value of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn prescaler_top(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::PRESCALER_TOP, channel)
    }

    /// Set the prescaler top value of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_prescaler_top(&self, channel: u32, prescaler: u32) -> Result<()> {
        self.set_bank(stepper_bank::PRESCALER_TOP, channel, prescaler)
    }

    /// Acceleration of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn acceleration(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::ACCELERATION, channel)
    }

    /// Set the acceleration of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_acceleration(&self, channel: u32, acceleration: u32) -> Result<()> {
        self.set_bank(stepper_bank::ACCELERATION, channel, acceleration)
    }

    /// Remaining steps of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn steps_to_do(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::STEPS_TO_DO, channel)
    }

    /// Command `channel` to perform `steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_steps_to_do(&self, channel: u32, steps: u32) -> Result<()> {
        self.set_bank(stepper_bank::STEPS_TO_DO, channel, steps)
    }

    /// Steps `channel` has performed since the last step reset.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn steps_have_done(&self, channel: u32) -> Result<u32> {
        self.bank(stepper_bank::STEPS_HAVE_DONE, channel)
    }

    /// Reset the step counters of all channels via the auxiliary control
    /// bit of the config register.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn global_step_reset(&self) -> Result<()> {
        tracing::debug!("Global step reset on subdevice {}", self.sub.id());
        self.sub.write_bit(CONFIG_OFFSET, AUX_CONFIG_BIT, true)
    }
}
