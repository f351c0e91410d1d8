//! Bus transport: the seam between the library and the kernel driver.
//!
//! [`BusTransport`] is the contract every backend fulfils — the real
//! character-device transport below, or the in-memory
//! [`SoftBus`](crate::SoftBus) for development and CI. All operations are
//! synchronous blocking calls; a failed transaction surfaces immediately,
//! retry policy (if any) belongs to the driver or the caller.
//!
//! Offsets passed to the data-transfer primitives are always relative to
//! the addressed subdevice's own memory window, never absolute bus
//! addresses.

use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use rustix::fs::OFlags;
use rustix::io::{pread, pwrite};

use flink_bus::cmd;
use flink_bus::layout::INFO_DESC_SIZE;

use crate::error::{FlinkError, Result};

/// Access mode of a subdevice selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Shared access; other callers may select the subdevice concurrently.
    Shared,
    /// Exclusive claim, honored cooperatively by the driver. Other callers'
    /// selections fail until the claim is released.
    Exclusive,
}

/// Transport contract against one open flink device.
///
/// Implementations route the operations to the kernel driver (hardware) or
/// to a simulation. The registry and function accessors never talk to the
/// driver except through this trait.
pub trait BusTransport: Debug + Send + Sync {
    /// Read the number of subdevices.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn nof_subdevices(&self) -> Result<u8>;

    /// Read the raw descriptor record of subdevice `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn read_descriptor(&self, id: u8) -> Result<[u8; INFO_DESC_SIZE]>;

    /// Select subdevice `id` for access, shared or exclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver refuses the claim (already
    /// exclusively held elsewhere) or the transaction fails.
    fn select(&self, id: u8, mode: AccessMode) -> Result<()>;

    /// Read bytes from subdevice `id` at a window-relative offset.
    /// Returns the number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn read(&self, id: u8, offset: u32, buf: &mut [u8]) -> Result<usize>;

    /// Write bytes to subdevice `id` at a window-relative offset.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn write(&self, id: u8, offset: u32, data: &[u8]) -> Result<usize>;

    /// Read one bit of the register at a window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn read_bit(&self, id: u8, offset: u32, bit: u8) -> Result<bool>;

    /// Write one bit of the register at a window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn write_bit(&self, id: u8, offset: u32, bit: u8, value: bool) -> Result<()>;

    /// Atomically OR `mask` into the register at `offset`. The
    /// read-modify-write is performed by the driver; this layer only
    /// issues the intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn set_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()>;

    /// Atomically clear the bits of `mask` in the register at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn clear_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()>;

    /// Register the calling process for interrupt line `irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn register_irq(&self, irq: u32) -> Result<()>;

    /// Unregister the calling process from interrupt line `irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn unregister_irq(&self, irq: u32) -> Result<()>;

    /// Read the signal number offset used for interrupt delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn signal_offset(&self) -> Result<u32>;

    /// Read the multiplex table entry mapping local `irq` of subdevice
    /// `id` to a device interrupt line.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn irq_multiplex(&self, id: u8, irq: u32) -> Result<u32>;

    /// Write the multiplex table entry mapping local `irq` of subdevice
    /// `id` to device interrupt line `flink_irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    fn set_irq_multiplex(&self, id: u8, irq: u32, flink_irq: u32) -> Result<()>;
}

// ── Ioctl argument containers ────────────────────────────────────────────────
// Layouts match the kernel module's dispatch structures.

/// Argument of `READ_SINGLE_BIT` / `WRITE_SINGLE_BIT`.
#[repr(C)]
#[derive(Debug, Default)]
struct BitContainer {
    subdevice: u8,
    bit: u8,
    value: u8,
    _pad: u8,
    offset: u32,
}

/// Argument of `SET_REGISTER_BITS` / `CLEAR_REGISTER_BITS`.
#[repr(C)]
#[derive(Debug, Default)]
struct MaskContainer {
    subdevice: u8,
    _pad: [u8; 3],
    offset: u32,
    mask: u32,
}

/// Argument of `READ_IRQ_MULTIPLEX` / `WRITE_IRQ_MULTIPLEX`.
#[repr(C)]
#[derive(Debug, Default)]
struct IrqContainer {
    subdevice: u8,
    _pad: [u8; 3],
    irq: u32,
    flink_irq: u32,
}

/// Character-device transport over `/dev/flink*`.
///
/// Control operations go through the driver's single ioctl multiplexer;
/// byte transfers select the subdevice and then use positional
/// read/write at the window-relative offset.
#[derive(Debug)]
pub struct CharDevTransport {
    file: File,
    path: PathBuf,
}

impl CharDevTransport {
    /// Open a flink device file.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::DeviceNotFound`] if the path does not exist,
    /// or [`FlinkError::Transport`] if the open fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FlinkError::device_not_found(path));
        }

        // Flag bits are small positive values, the wrap cannot happen.
        #[allow(clippy::cast_possible_wrap)]
        let nonblock_flag = OFlags::NONBLOCK.bits() as i32;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(nonblock_flag)
            .open(path)?;

        tracing::debug!("Opened flink device file {}", path.display());

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying device file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Issue one command through the driver's ioctl multiplexer.
    ///
    /// The argument must be a `#[repr(C)]` container matching the kernel's
    /// layout for `cmd`.
    fn transact<T>(&self, cmd: u32, arg: &mut T) -> Result<()> {
        // SAFETY: ioctl is the driver's command multiplexer. Invariants:
        // (1) the fd is valid for the lifetime of self; (2) arg is a live
        // #[repr(C)] container whose layout matches what the kernel reads
        // and writes for this command; (3) the call blocks until the driver
        // completes the transaction.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                libc::c_ulong::from(cmd),
                std::ptr::from_mut(arg),
            )
        };
        if ret < 0 {
            return Err(FlinkError::Transport {
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    /// Point the driver's transfer path at subdevice `id`.
    fn select_for_transfer(&self, id: u8) -> Result<()> {
        let mut arg = id;
        self.transact(cmd::SELECT_SUBDEVICE, &mut arg)
    }
}

impl BusTransport for CharDevTransport {
    fn nof_subdevices(&self) -> Result<u8> {
        let mut n: u8 = 0;
        self.transact(cmd::READ_NOF_SUBDEVICES, &mut n)?;
        tracing::debug!("{}: {n} subdevices", self.path.display());
        Ok(n)
    }

    fn read_descriptor(&self, id: u8) -> Result<[u8; INFO_DESC_SIZE]> {
        let mut record = [0u8; INFO_DESC_SIZE];
        record[0] = id; // driver reads the id field on entry
        self.transact(cmd::READ_SUBDEVICE_INFO, &mut record)?;
        Ok(record)
    }

    fn select(&self, id: u8, mode: AccessMode) -> Result<()> {
        let command = match mode {
            AccessMode::Shared => cmd::SELECT_SUBDEVICE,
            AccessMode::Exclusive => cmd::SELECT_SUBDEVICE_EXCL,
        };
        let mut arg = id;
        self.transact(command, &mut arg)?;
        tracing::debug!("Selected subdevice {id} ({mode:?})");
        Ok(())
    }

    fn read(&self, id: u8, offset: u32, buf: &mut [u8]) -> Result<usize> {
        self.select_for_transfer(id)?;
        let n = pread(&self.file, buf, u64::from(offset)).map_err(std::io::Error::from)?;
        Ok(n)
    }

    fn write(&self, id: u8, offset: u32, data: &[u8]) -> Result<usize> {
        self.select_for_transfer(id)?;
        let n = pwrite(&self.file, data, u64::from(offset)).map_err(std::io::Error::from)?;
        Ok(n)
    }

    fn read_bit(&self, id: u8, offset: u32, bit: u8) -> Result<bool> {
        let mut container = BitContainer {
            subdevice: id,
            bit,
            offset,
            ..Default::default()
        };
        self.transact(cmd::READ_SINGLE_BIT, &mut container)?;
        Ok(container.value != 0)
    }

    fn write_bit(&self, id: u8, offset: u32, bit: u8, value: bool) -> Result<()> {
        let mut container = BitContainer {
            subdevice: id,
            bit,
            value: u8::from(value),
            offset,
            ..Default::default()
        };
        self.transact(cmd::WRITE_SINGLE_BIT, &mut container)
    }

    fn set_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()> {
        let mut container = MaskContainer {
            subdevice: id,
            offset,
            mask,
            ..Default::default()
        };
        self.transact(cmd::SET_REGISTER_BITS, &mut container)
    }

    fn clear_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()> {
        let mut container = MaskContainer {
            subdevice: id,
            offset,
            mask,
            ..Default::default()
        };
        self.transact(cmd::CLEAR_REGISTER_BITS, &mut container)
    }

    fn register_irq(&self, irq: u32) -> Result<()> {
        let mut arg = irq;
        self.transact(cmd::REGISTER_IRQ, &mut arg)
    }

    fn unregister_irq(&self, irq: u32) -> Result<()> {
        let mut arg = irq;
        self.transact(cmd::UNREGISTER_IRQ, &mut arg)
    }

    fn signal_offset(&self) -> Result<u32> {
        let mut offset: u32 = 0;
        self.transact(cmd::READ_SIGNAL_OFFSET, &mut offset)?;
        Ok(offset)
    }

    fn irq_multiplex(&self, id: u8, irq: u32) -> Result<u32> {
        let mut container = IrqContainer {
            subdevice: id,
            irq,
            ..Default::default()
        };
        self.transact(cmd::READ_IRQ_MULTIPLEX, &mut container)?;
        Ok(container.flink_irq)
    }

    fn set_irq_multiplex(&self, id: u8, irq: u32, flink_irq: u32) -> Result<()> {
        let mut container = IrqContainer {
            subdevice: id,
            irq,
            flink_irq,
            ..Default::default()
        };
        self.transact(cmd::WRITE_IRQ_MULTIPLEX, &mut container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_layouts_match_the_kernel() {
        assert_eq!(std::mem::size_of::<BitContainer>(), 8);
        assert_eq!(std::mem::size_of::<MaskContainer>(), 12);
        assert_eq!(std::mem::size_of::<IrqContainer>(), 12);
    }

    #[test]
    fn missing_device_file_is_reported_as_not_found() {
        let err = CharDevTransport::open("/dev/flink-does-not-exist").unwrap_err();
        assert!(matches!(err, FlinkError::DeviceNotFound { .. }));
    }

    #[test]
    #[ignore] // Requires hardware
    fn open_first_device() {
        let transport = CharDevTransport::open("/dev/flink0").expect("open /dev/flink0");
        let n = transport.nof_subdevices().expect("read subdevice count");
        println!("/dev/flink0: {n} subdevices");
    }
}
