//! Ioctl command numbers of the flink kernel driver.
//!
//! The driver multiplexes every control operation through a single ioctl
//! entry point; these are the command ids it dispatches on. Data transfers
//! (byte-range read/write) go through the file's read/write path after a
//! subdevice has been selected, or through the combined
//! select-and-transfer commands.

/// Select a subdevice for subsequent read/write calls (shared access).
/// Argument: `u8` subdevice id.
pub const SELECT_SUBDEVICE: u32 = 0x10;

/// Select a subdevice with an exclusive claim. Argument: `u8` subdevice id.
pub const SELECT_SUBDEVICE_EXCL: u32 = 0x11;

/// Read the number of subdevices. Argument: `u8` out.
pub const READ_NOF_SUBDEVICES: u32 = 0x20;

/// Read one subdevice descriptor record. Argument: 28-byte record, id field
/// set by the caller on entry.
pub const READ_SUBDEVICE_INFO: u32 = 0x21;

/// Read a single bit of a register. Argument: bit container.
pub const READ_SINGLE_BIT: u32 = 0x30;

/// Write a single bit of a register. Argument: bit container.
pub const WRITE_SINGLE_BIT: u32 = 0x31;

/// Select a subdevice and read a byte range in one ioctl. The driver's
/// combined transfer path; equivalent to a select followed by a
/// positional read.
pub const SELECT_AND_READ: u32 = 0x42;

/// Select a subdevice and write a byte range in one ioctl. Counterpart
/// of [`SELECT_AND_READ`].
pub const SELECT_AND_WRITE: u32 = 0x43;

/// Atomically OR a mask into a register. Argument: mask container.
pub const SET_REGISTER_BITS: u32 = 0x44;

/// Atomically AND-NOT a mask out of a register. Argument: mask container.
pub const CLEAR_REGISTER_BITS: u32 = 0x45;

/// Register the calling process for an interrupt line. Argument: `u32` irq.
pub const REGISTER_IRQ: u32 = 0x50;

/// Unregister the calling process from an interrupt line. Argument: `u32` irq.
pub const UNREGISTER_IRQ: u32 = 0x51;

/// Read the signal number offset used for irq delivery. Argument: `u32` out.
pub const READ_SIGNAL_OFFSET: u32 = 0x52;

/// Read an irq multiplex table entry. Argument: irq container.
pub const READ_IRQ_MULTIPLEX: u32 = 0x53;

/// Write an irq multiplex table entry. Argument: irq container.
pub const WRITE_IRQ_MULTIPLEX: u32 = 0x54;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_are_distinct() {
        let ids = [
            SELECT_SUBDEVICE,
            SELECT_SUBDEVICE_EXCL,
            READ_NOF_SUBDEVICES,
            READ_SUBDEVICE_INFO,
            READ_SINGLE_BIT,
            WRITE_SINGLE_BIT,
            SELECT_AND_READ,
            SELECT_AND_WRITE,
            SET_REGISTER_BITS,
            CLEAR_REGISTER_BITS,
            REGISTER_IRQ,
            UNREGISTER_IRQ,
            READ_SIGNAL_OFFSET,
            READ_IRQ_MULTIPLEX,
            WRITE_IRQ_MULTIPLEX,
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
