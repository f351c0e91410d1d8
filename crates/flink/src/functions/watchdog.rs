//! Watchdog subdevices.
//!
//! All watchdog registers are single scalars; there is no channel
//! dimension. Arming sets the auxiliary control bit of the config
//! register, counter and base clock live behind the fixed region.

use flink_bus::layout::{
    AUX_CONFIG_BIT, BASECLK_OFFSET, CONFIG_OFFSET, WD_FIRST_COUNTER_OFFSET,
};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Typed view of a watchdog subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Watchdog<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Watchdog<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a watchdog.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Watchdog)?;
        Ok(Self { sub })
    }

    /// Base clock of the watchdog counter in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn base_clock(&self) -> Result<u32> {
        self.sub.read_scalar(BASECLK_OFFSET)
    }

    /// Status register of the watchdog.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn status_word(&self) -> Result<u32> {
        self.sub.status()
    }

    /// Load the watchdog counter. The counter decrements at the base
    /// clock once armed; reaching zero fires the watchdog.
    ///
    /// # Errors
    ///
    /// Returns an error if the register write fails.
    pub fn set_counter(&self, value: u32) -> Result<()> {
        self.sub.write_scalar(WD_FIRST_COUNTER_OFFSET, value)
    }

    /// Arm the watchdog.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn arm(&self) -> Result<()> {
        tracing::debug!("Arming watchdog subdevice {}", self.sub.id());
        self.sub.write_bit(CONFIG_OFFSET, AUX_CONFIG_BIT, true)
    }
}
