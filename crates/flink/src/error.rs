//! Error types for flink operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flink operations
pub type Result<T> = std::result::Result<T, FlinkError>;

/// Errors that can occur during flink operations
#[derive(Debug, Error)]
pub enum FlinkError {
    /// Device file not found at the expected path
    #[error("Device not found: {path}")]
    DeviceNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Subdevice id out of range
    #[error("Subdevice id {id} out of range (device has {count} subdevices)")]
    InvalidSubdevice {
        /// Requested subdevice id
        id: u8,
        /// Number of enumerated subdevices
        count: u8,
    },

    /// Channel index out of range for the subdevice
    #[error("Channel {channel} out of range (subdevice has {count} channels)")]
    InvalidChannel {
        /// Requested channel
        channel: u32,
        /// Number of channels
        count: u32,
    },

    /// Register offset outside the subdevice's memory window
    #[error("Offset {offset:#x}+{len} outside memory window of {mem_size:#x} bytes")]
    OutOfWindow {
        /// Window-relative byte offset
        offset: u32,
        /// Transfer length in bytes
        len: u32,
        /// Memory window size
        mem_size: u32,
    },

    /// No subdevice carries the requested unique id
    #[error("No subdevice with unique id {unique_id:#x}")]
    NotFound {
        /// Requested unique id
        unique_id: u32,
    },

    /// Subdevice implements a different function than the accessor expects
    #[error("Subdevice is {found}, expected {expected}")]
    WrongFunction {
        /// Function the accessor requires
        expected: flink_bus::FunctionId,
        /// Function the subdevice implements
        found: flink_bus::FunctionId,
    },

    /// Transfer moved fewer bytes than requested
    #[error("Short transfer: {actual} of {expected} bytes")]
    ShortTransfer {
        /// Requested byte count
        expected: usize,
        /// Transferred byte count
        actual: usize,
    },

    /// The underlying driver call failed
    #[error("Transport error: {source}")]
    Transport {
        /// Underlying OS error
        #[from]
        source: std::io::Error,
    },

    /// Subdevice enumeration failed during open
    #[error("Enumeration failed: {reason}")]
    Enumeration {
        /// Reason for failure
        reason: String,
    },
}

impl FlinkError {
    /// Create a device not found error
    pub fn device_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DeviceNotFound { path: path.into() }
    }

    /// Create a transport error from a message (software bus, driver refusals)
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            source: std::io::Error::other(reason.into()),
        }
    }

    /// Create an enumeration error
    pub fn enumeration(reason: impl Into<String>) -> Self {
        Self::Enumeration {
            reason: reason.into(),
        }
    }
}
