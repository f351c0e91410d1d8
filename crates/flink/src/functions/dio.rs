//! Digital in-/output subdevices.
//!
//! Unlike the register-bank families, DIO packs direction and value as
//! one bit per channel: channel `c` is bit `c % 32` of word `c / 32`
//! within its bit bank. Two bit banks (direction, value) follow the base
//! clock register; per-channel debounce registers follow the bit banks.

use flink_bus::layout::{BASECLK_OFFSET, DIO_FIRST_BANK_OFFSET, FUNCTION_BASE, REGISTER_WIDTH};
use flink_bus::FunctionId;

use crate::error::Result;
use crate::subdevice::Subdevice;

/// Direction of a digital I/O channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Channel reads an external signal.
    Input,
    /// Channel drives its pin.
    Output,
}

/// Typed view of a digital I/O subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Dio<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Dio<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not a digital I/O block.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Dio)?;
        Ok(Self { sub })
    }

    /// Base clock of the debounce logic in Hz.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn base_clock(&self) -> Result<u32> {
        self.sub.read_scalar(BASECLK_OFFSET)
    }

    /// Width of one bit bank in bytes.
    fn bit_bank_bytes(&self) -> u32 {
        self.sub.nof_channels().div_ceil(32) * REGISTER_WIDTH
    }

    /// Word offset and bit position of `channel` within bit bank `bank`.
    fn bit_position(&self, bank: u32, channel: u32) -> Result<(u32, u8)> {
        self.sub.check_channel(channel)?;
        let offset = bank
            .checked_mul(self.bit_bank_bytes())
            .and_then(|rel| rel.checked_add((channel / 32) * REGISTER_WIDTH))
            .and_then(|rel| rel.checked_add(FUNCTION_BASE + DIO_FIRST_BANK_OFFSET))
            .ok_or_else(|| self.sub.window_overflow())?;
        self.sub.check_window(offset, REGISTER_WIDTH)?;
        #[allow(clippy::cast_possible_truncation)]
        Ok((offset, (channel % 32) as u8))
    }

    const DIRECTION_BANK: u32 = 0;
    const VALUE_BANK: u32 = 1;

    /// Configure `channel` as input or output.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_direction(&self, channel: u32, direction: Direction) -> Result<()> {
        let (offset, bit) = self.bit_position(Self::DIRECTION_BANK, channel)?;
        self.sub.write_bit(offset, bit, direction == Direction::Output)
    }

    /// Drive output `channel` high or low.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_value(&self, channel: u32, high: bool) -> Result<()> {
        let (offset, bit) = self.bit_position(Self::VALUE_BANK, channel)?;
        self.sub.write_bit(offset, bit, high)
    }

    /// Read the level of `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn value(&self, channel: u32) -> Result<bool> {
        let (offset, bit) = self.bit_position(Self::VALUE_BANK, channel)?;
        self.sub.read_bit(offset, bit)
    }

    /// Offset of the per-channel debounce register, past both bit banks.
    fn debounce_offset(&self, channel: u32) -> Result<u32> {
        self.sub.check_channel(channel)?;
        let offset = channel
            .checked_mul(REGISTER_WIDTH)
            .and_then(|rel| rel.checked_add(2 * self.bit_bank_bytes()))
            .and_then(|rel| rel.checked_add(FUNCTION_BASE + DIO_FIRST_BANK_OFFSET))
            .ok_or_else(|| self.sub.window_overflow())?;
        self.sub.check_window(offset, REGISTER_WIDTH)?;
        Ok(offset)
    }

    /// Set the debounce time of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn set_debounce(&self, channel: u32, debounce: u32) -> Result<()> {
        let offset = self.debounce_offset(channel)?;
        self.sub.write_register(offset, debounce)
    }

    /// Debounce time of `channel` in base clock ticks.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidChannel`](crate::FlinkError::InvalidChannel)
    /// for an out-of-range channel, or a transport error.
    pub fn debounce(&self, channel: u32) -> Result<u32> {
        let offset = self.debounce_offset(channel)?;
        self.sub.read_register(offset)
    }
}
