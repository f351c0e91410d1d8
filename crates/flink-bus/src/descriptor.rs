//! Subdevice descriptor wire record.
//!
//! The `READ_SUBDEVICE_INFO` ioctl fills a 28-byte record describing one
//! subdevice. All fields are little-endian:
//!
//! ```text
//! 0x00  u32  subdevice id (enumeration order; authoritative id is the
//!            caller's loop index, this field is informational)
//! 0x04  u16  function code
//! 0x06  u8   subfunction code
//! 0x07  u8   interface/function version
//! 0x08  u32  base address of the memory window within the bus address space
//! 0x0C  u32  memory window size in bytes
//! 0x10  u32  number of channels
//! 0x14  u32  globally-unique id
//! 0x18  u32  reserved
//! ```

use crate::func::FunctionId;
use crate::layout::INFO_DESC_SIZE;

/// One parsed subdevice descriptor record.
///
/// `Raw` because the id carried in the record is not yet authoritative;
/// the enumerator overwrites it with the enumeration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDescriptor {
    /// Subdevice id as reported by the driver.
    pub id: u8,
    /// Function implemented by the subdevice.
    pub function: FunctionId,
    /// Subfunction code, qualifying the function.
    pub sub_function: u8,
    /// Interface/function version.
    pub function_version: u8,
    /// Base address of the memory window within the bus address space.
    pub base_addr: u32,
    /// Memory window size in bytes.
    pub mem_size: u32,
    /// Number of channels.
    pub nof_channels: u32,
    /// Globally-unique id, stable across enumeration order and reboots.
    pub unique_id: u32,
}

impl RawDescriptor {
    /// Parse a 28-byte wire record.
    #[must_use]
    pub fn parse(record: &[u8; INFO_DESC_SIZE]) -> Self {
        let word = |i: usize| {
            u32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]])
        };
        Self {
            #[allow(clippy::cast_possible_truncation)]
            id: word(0x00) as u8,
            function: FunctionId::from_code(u16::from_le_bytes([record[0x04], record[0x05]])),
            sub_function: record[0x06],
            function_version: record[0x07],
            base_addr: word(0x08),
            mem_size: word(0x0C),
            nof_channels: word(0x10),
            unique_id: word(0x14),
        }
    }

    /// Encode into the 28-byte wire record. Used by the software bus and by
    /// tests; the kernel driver produces these records on real hardware.
    #[must_use]
    pub fn encode(&self) -> [u8; INFO_DESC_SIZE] {
        let mut record = [0u8; INFO_DESC_SIZE];
        record[0x00..0x04].copy_from_slice(&u32::from(self.id).to_le_bytes());
        record[0x04..0x06].copy_from_slice(&self.function.code().to_le_bytes());
        record[0x06] = self.sub_function;
        record[0x07] = self.function_version;
        record[0x08..0x0C].copy_from_slice(&self.base_addr.to_le_bytes());
        record[0x0C..0x10].copy_from_slice(&self.mem_size.to_le_bytes());
        record[0x10..0x14].copy_from_slice(&self.nof_channels.to_le_bytes());
        record[0x14..0x18].copy_from_slice(&self.unique_id.to_le_bytes());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_record() {
        let desc = RawDescriptor {
            id: 3,
            function: FunctionId::Pwm,
            sub_function: 1,
            function_version: 2,
            base_addr: 0x0000_1000,
            mem_size: 0x100,
            nof_channels: 8,
            unique_id: 0xDEAD_BEEF,
        };
        let parsed = RawDescriptor::parse(&desc.encode());
        assert_eq!(parsed, desc);
    }

    #[test]
    fn unknown_function_code_is_preserved() {
        let desc = RawDescriptor {
            id: 0,
            function: FunctionId::Unknown(0x3F),
            sub_function: 0,
            function_version: 0,
            base_addr: 0,
            mem_size: 64,
            nof_channels: 0,
            unique_id: 1,
        };
        let parsed = RawDescriptor::parse(&desc.encode());
        assert_eq!(parsed.function, FunctionId::Unknown(0x3F));
    }

    #[test]
    fn field_positions() {
        let mut record = [0u8; INFO_DESC_SIZE];
        record[0x04] = 0x0C; // pwm
        record[0x10] = 4; // 4 channels
        record[0x14] = 0x2A; // unique id 42
        let parsed = RawDescriptor::parse(&record);
        assert_eq!(parsed.function, FunctionId::Pwm);
        assert_eq!(parsed.nof_channels, 4);
        assert_eq!(parsed.unique_id, 42);
    }
}
