//! `flink` — command-line interface for flink FPGA I/O devices.
//!
//! ```text
//! USAGE:
//!   flink enumerate <device>             List all subdevices
//!   flink info <device> <id>             Detailed info for one subdevice
//!   flink reset <device> <id>            Reset a subdevice
//!   flink select <device> <id> [--exclusive]
//!                                        Probe (exclusive) selection
//!   flink read <device> <id> <offset>    Read one register
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flink::{AccessMode, FlinkDevice};

#[derive(Parser)]
#[command(name = "flink", about = "flink FPGA I/O bus CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List all subdevices of a device.
    Enumerate {
        /// Device file (e.g. /dev/flink0).
        device: String,
    },
    /// Print detailed information for one subdevice.
    Info {
        /// Device file (e.g. /dev/flink0).
        device: String,
        /// Subdevice id.
        id: u8,
    },
    /// Reset a subdevice.
    Reset {
        /// Device file (e.g. /dev/flink0).
        device: String,
        /// Subdevice id.
        id: u8,
    },
    /// Select a subdevice, optionally with an exclusive claim.
    Select {
        /// Device file (e.g. /dev/flink0).
        device: String,
        /// Subdevice id.
        id: u8,
        /// Claim exclusive access.
        #[arg(long)]
        exclusive: bool,
    },
    /// Read one 4-byte register at a window-relative offset.
    Read {
        /// Device file (e.g. /dev/flink0).
        device: String,
        /// Subdevice id.
        id: u8,
        /// Window-relative byte offset (hex with 0x prefix or decimal).
        offset: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Enumerate { device } => cmd_enumerate(&device)?,
        Cmd::Info { device, id } => cmd_info(&device, id)?,
        Cmd::Reset { device, id } => cmd_reset(&device, id)?,
        Cmd::Select {
            device,
            id,
            exclusive,
        } => cmd_select(&device, id, exclusive)?,
        Cmd::Read { device, id, offset } => cmd_read(&device, id, &offset)?,
    }

    Ok(())
}

fn cmd_enumerate(device: &str) -> Result<()> {
    let dev = FlinkDevice::open(device)?;

    println!("{device}: {} subdevices", dev.nof_subdevices());
    println!();
    for sub in dev.subdevices() {
        println!(
            "  {:>3}  {:<18} v{}  {} channels  window {:#010x}+{:#x}  uid {:#010x}",
            sub.id(),
            sub.function().to_string(),
            sub.descriptor().function_version(),
            sub.nof_channels(),
            sub.descriptor().base_addr(),
            sub.descriptor().mem_size(),
            sub.unique_id(),
        );
    }

    Ok(())
}

fn cmd_info(device: &str, id: u8) -> Result<()> {
    let dev = FlinkDevice::open(device)?;
    let sub = dev.subdevice(id)?;
    let desc = sub.descriptor();

    println!("Subdevice {id} of {device}");
    println!("  function:     {} (0x{:04x})", desc.function(), desc.function().code());
    println!("  subfunction:  {}", desc.sub_function());
    println!("  version:      {}", desc.function_version());
    println!("  base address: {:#010x}", desc.base_addr());
    println!("  window size:  {:#x} bytes", desc.mem_size());
    println!("  channels:     {}", desc.nof_channels());
    println!("  unique id:    {:#010x}", desc.unique_id());
    println!("  status:       {:#010x}", sub.status()?);

    Ok(())
}

fn cmd_reset(device: &str, id: u8) -> Result<()> {
    let dev = FlinkDevice::open(device)?;
    dev.subdevice(id)?.reset()?;
    println!("Subdevice {id} reset");
    Ok(())
}

fn cmd_select(device: &str, id: u8, exclusive: bool) -> Result<()> {
    let dev = FlinkDevice::open(device)?;
    let mode = if exclusive {
        AccessMode::Exclusive
    } else {
        AccessMode::Shared
    };
    dev.subdevice(id)?.select(mode)?;
    println!("Subdevice {id} selected ({mode:?})");
    Ok(())
}

fn cmd_read(device: &str, id: u8, offset: &str) -> Result<()> {
    let offset = parse_offset(offset)?;
    let dev = FlinkDevice::open(device)?;
    let value = dev.subdevice(id)?.read_register(offset)?;
    println!("{offset:#06x}: {value:#010x} ({value})");
    Ok(())
}

fn parse_offset(text: &str) -> Result<u32> {
    let value = if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)?
    } else {
        text.parse()?
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_parse_in_both_bases() {
        assert_eq!(parse_offset("0x24").unwrap(), 0x24);
        assert_eq!(parse_offset("36").unwrap(), 36);
        assert!(parse_offset("zz").is_err());
    }
}
