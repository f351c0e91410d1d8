//! Info subdevices.
//!
//! An info subdevice carries a NUL-padded description of the whole FPGA
//! design directly behind the fixed region.

use flink_bus::layout::{FUNCTION_BASE, INFO_DESC_SIZE};
use flink_bus::FunctionId;

use crate::error::{FlinkError, Result};
use crate::subdevice::Subdevice;

/// Typed view of an info subdevice.
#[derive(Debug, Clone, Copy)]
pub struct Info<'d> {
    sub: Subdevice<'d>,
}

impl<'d> Info<'d> {
    /// Wrap a subdevice, verifying its function code.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::WrongFunction`](crate::FlinkError::WrongFunction)
    /// if the subdevice is not an info block.
    pub fn new(sub: Subdevice<'d>) -> Result<Self> {
        sub.expect_function(FunctionId::Info)?;
        Ok(Self { sub })
    }

    /// The textual description of the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or is short.
    #[allow(clippy::cast_possible_truncation)]
    pub fn description(&self) -> Result<String> {
        self.sub.check_window(FUNCTION_BASE, INFO_DESC_SIZE as u32)?;
        let mut buf = [0u8; INFO_DESC_SIZE];
        let n = self
            .sub
            .transport()
            .read(self.sub.id(), FUNCTION_BASE, &mut buf)?;
        if n != buf.len() {
            return Err(FlinkError::ShortTransfer {
                expected: buf.len(),
                actual: n,
            });
        }
        let text = buf.split(|&b| b == 0).next().unwrap_or(&[]);
        Ok(String::from_utf8_lossy(text).into_owned())
    }
}
