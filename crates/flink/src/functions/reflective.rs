//! Reflective (optical) sensor subdevices.
//!
//! Three per-channel banks behind the resolution register: digitized
//! value, upper hysteresis bound, lower hysteresis bound.

use flink_bus::layout::{
    reflective_bank, REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET, RESOLUTION_OFFSET,
};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a reflective sensor subdevice.
#[derive(Debug, Clone, Copy)]
pub struct ReflectiveSensor<'d> {
    sub: Subdevice<'d>,
}

impl<'d> ReflectiveSensor<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a reflective sensor.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::ReflectiveSensor)?;
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
        self.sub.read_bank(
            REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET,
            reflective_bank::VALUE,
            channel,
        )
    }

    /// Upper hysteresis bound of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn upper_hysteresis(&self, channel: u32) -> Result<u32> {
        self.sub.read_bank(
            REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET,
            reflective_bank::UPPER_HYSTERESIS,
            channel,
        )
    }

    /// Set the upper hysteresis bound of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_upper_hysteresis(&self, channel: u32, value: u32) -> Result<()> {
        self.sub.write_bank(
            REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET,
            reflective_bank::UPPER_HYSTERESIS,
            channel,
            value,
        )
    }

    /// Lower hysteresis bound of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn lower_hysteresis(&self, channel: u32) -> Result<u32> {
        self.sub.read_bank(
            REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET,
            reflective_bank::LOWER_HYSTERESIS,
            channel,
        )
    }

    /// Set the lower hysteresis bound of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_lower_hysteresis(&self, channel: u32, value: u32) -> Result<()> {
        self.sub.write_bank(
            REFLECTIVE_SENSOR_FIRST_VALUE_OFFSET,
            reflective_bank::LOWER_HYSTERESIS,
            channel,
            value,
        )
    }
}
