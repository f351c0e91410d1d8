//! Software bus: an in-memory flink device.
//!
//! [`SoftBus`] implements [`BusTransport`] over simulated register
//! windows with the real layout semantics — header/subheader geometry,
//! descriptor records, exclusive-claim bookkeeping, driver-atomic bit
//! operations and the irq multiplex table. It exists for the same reason
//! the software backend exists in other driver stacks: everything above
//! the transport seam can be exercised in CI without an FPGA.
//!
//! Clones share state, so several [`FlinkDevice`](crate::FlinkDevice)s
//! over clones of one `SoftBus` behave like several processes on one
//! piece of hardware (useful for exclusive-access tests).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use flink_bus::layout::{FUNCTION_BASE, INFO_DESC_SIZE, REGISTER_WIDTH};
use flink_bus::{FunctionId, RawDescriptor};

use crate::error::{FlinkError, Result};
use crate::transport::{AccessMode, BusTransport};

/// Specification of one simulated subdevice.
#[derive(Debug, Clone)]
pub struct SoftSubdevice {
    /// Function implemented by the subdevice.
    pub function: FunctionId,
    /// Subfunction code.
    pub sub_function: u8,
    /// Interface/function version.
    pub function_version: u8,
    /// Number of channels.
    pub nof_channels: u32,
    /// Memory window size in bytes (at least header + subheader).
    pub mem_size: u32,
    /// Globally-unique id.
    pub unique_id: u32,
}

impl SoftSubdevice {
    /// Spec with default subfunction 0 and version 1.
    #[must_use]
    pub const fn new(function: FunctionId, nof_channels: u32, mem_size: u32, unique_id: u32) -> Self {
        Self {
            function,
            sub_function: 0,
            function_version: 1,
            nof_channels,
            mem_size,
            unique_id,
        }
    }
}

#[derive(Debug)]
struct Window {
    desc: RawDescriptor,
    mem: Vec<u8>,
    exclusive: bool,
    descriptor_fault: bool,
    irq_mux: HashMap<u32, u32>,
}

#[derive(Debug)]
struct State {
    windows: Vec<Window>,
    registered_irqs: HashSet<u32>,
    signal_offset: u32,
}

/// In-memory [`BusTransport`] implementation.
#[derive(Debug, Clone)]
pub struct SoftBus {
    state: Arc<Mutex<State>>,
}

impl SoftBus {
    /// Build a bus from subdevice specs. Windows are laid out
    /// back-to-back in the simulated address space; ids follow spec
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if a spec's `mem_size` is smaller than header + subheader —
    /// such a window cannot hold its own fixed region and would be a bug
    /// in the test setup, not a runtime condition.
    #[must_use]
    pub fn with_subdevices(specs: Vec<SoftSubdevice>) -> Self {
        let mut windows = Vec::with_capacity(specs.len());
        let mut base_addr = 0u32;
        for (id, spec) in specs.into_iter().enumerate() {
            assert!(
                spec.mem_size >= FUNCTION_BASE,
                "window of {} bytes cannot hold the {} byte fixed region",
                spec.mem_size,
                FUNCTION_BASE
            );
            #[allow(clippy::cast_possible_truncation)]
            let desc = RawDescriptor {
                id: id as u8,
                function: spec.function,
                sub_function: spec.sub_function,
                function_version: spec.function_version,
                base_addr,
                mem_size: spec.mem_size,
                nof_channels: spec.nof_channels,
                unique_id: spec.unique_id,
            };
            windows.push(Window {
                desc,
                mem: vec![0u8; spec.mem_size as usize],
                exclusive: false,
                descriptor_fault: false,
                irq_mux: HashMap::new(),
            });
            base_addr += spec.mem_size;
        }
        Self {
            state: Arc::new(Mutex::new(State {
                windows,
                registered_irqs: HashSet::new(),
                signal_offset: 32, // SIGRTMIN-style offset reported by the driver
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned mutex means a panic mid-transaction in another test
        // thread; the register state is plain bytes and stays usable.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Write a register from the "hardware side", bypassing the transport
    /// contract. For seeding base clocks, sensor values and the like.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `offset` is outside the simulated bus.
    pub fn poke_register(&self, id: u8, offset: u32, value: u32) {
        let mut state = self.lock();
        let window = &mut state.windows[usize::from(id)];
        let start = offset as usize;
        window.mem[start..start + REGISTER_WIDTH as usize].copy_from_slice(&value.to_le_bytes());
    }

    /// Read a register from the "hardware side".
    ///
    /// # Panics
    ///
    /// Panics if `id` or `offset` is outside the simulated bus.
    #[must_use]
    pub fn peek_register(&self, id: u8, offset: u32) -> u32 {
        let state = self.lock();
        let window = &state.windows[usize::from(id)];
        let start = offset as usize;
        let mut buf = [0u8; REGISTER_WIDTH as usize];
        buf.copy_from_slice(&window.mem[start..start + REGISTER_WIDTH as usize]);
        u32::from_le_bytes(buf)
    }

    /// Make the descriptor of subdevice `id` unreadable, as a garbled
    /// header or a driver fault would. Enumeration over this transport
    /// then fails at that id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the simulated bus.
    pub fn fail_descriptor(&self, id: u8) {
        self.lock().windows[usize::from(id)].descriptor_fault = true;
    }

    /// Release an exclusive claim (what the driver does when the claiming
    /// process closes its file).
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the simulated bus.
    pub fn release(&self, id: u8) {
        self.lock().windows[usize::from(id)].exclusive = false;
    }
}

impl State {
    fn window(&mut self, id: u8) -> Result<&mut Window> {
        let count = self.windows.len();
        self.windows
            .get_mut(usize::from(id))
            .ok_or_else(|| FlinkError::transport(format!("no subdevice {id} (have {count})")))
    }

    fn register(&mut self, id: u8, offset: u32) -> Result<u32> {
        let window = self.window(id)?;
        let start = offset as usize;
        let end = start + REGISTER_WIDTH as usize;
        if end > window.mem.len() {
            return Err(FlinkError::transport(format!(
                "offset {offset:#x} beyond window of subdevice {id}"
            )));
        }
        let mut buf = [0u8; REGISTER_WIDTH as usize];
        buf.copy_from_slice(&window.mem[start..end]);
        Ok(u32::from_le_bytes(buf))
    }

    fn set_register(&mut self, id: u8, offset: u32, value: u32) -> Result<()> {
        let window = self.window(id)?;
        let start = offset as usize;
        let end = start + REGISTER_WIDTH as usize;
        if end > window.mem.len() {
            return Err(FlinkError::transport(format!(
                "offset {offset:#x} beyond window of subdevice {id}"
            )));
        }
        window.mem[start..end].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}

impl BusTransport for SoftBus {
    #[allow(clippy::cast_possible_truncation)]
    fn nof_subdevices(&self) -> Result<u8> {
        Ok(self.lock().windows.len() as u8)
    }

    fn read_descriptor(&self, id: u8) -> Result<[u8; INFO_DESC_SIZE]> {
        let mut state = self.lock();
        let window = state.window(id)?;
        if window.descriptor_fault {
            return Err(FlinkError::transport(format!(
                "descriptor read of subdevice {id} failed"
            )));
        }
        Ok(window.desc.encode())
    }

    fn select(&self, id: u8, mode: AccessMode) -> Result<()> {
        let mut state = self.lock();
        let window = state.window(id)?;
        if window.exclusive {
            return Err(FlinkError::transport(format!(
                "subdevice {id} is exclusively claimed"
            )));
        }
        if mode == AccessMode::Exclusive {
            window.exclusive = true;
        }
        Ok(())
    }

    fn read(&self, id: u8, offset: u32, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        let window = state.window(id)?;
        let start = offset as usize;
        let end = start + buf.len();
        if end > window.mem.len() {
            return Err(FlinkError::transport(format!(
                "read of {} bytes at {offset:#x} beyond window of subdevice {id}",
                buf.len()
            )));
        }
        buf.copy_from_slice(&window.mem[start..end]);
        Ok(buf.len())
    }

    fn write(&self, id: u8, offset: u32, data: &[u8]) -> Result<usize> {
        let mut state = self.lock();
        let window = state.window(id)?;
        let start = offset as usize;
        let end = start + data.len();
        if end > window.mem.len() {
            return Err(FlinkError::transport(format!(
                "write of {} bytes at {offset:#x} beyond window of subdevice {id}",
                data.len()
            )));
        }
        window.mem[start..end].copy_from_slice(data);
        Ok(data.len())
    }

    fn read_bit(&self, id: u8, offset: u32, bit: u8) -> Result<bool> {
        if u32::from(bit) >= REGISTER_WIDTH * 8 {
            return Err(FlinkError::transport(format!("bit {bit} beyond register")));
        }
        let value = self.lock().register(id, offset)?;
        Ok(value & (1 << bit) != 0)
    }

    fn write_bit(&self, id: u8, offset: u32, bit: u8, value: bool) -> Result<()> {
        if u32::from(bit) >= REGISTER_WIDTH * 8 {
            return Err(FlinkError::transport(format!("bit {bit} beyond register")));
        }
        let mut state = self.lock();
        let mut word = state.register(id, offset)?;
        if value {
            word |= 1 << bit;
        } else {
            word &= !(1 << bit);
        }
        state.set_register(id, offset, word)
    }

    fn set_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()> {
        let mut state = self.lock();
        let word = state.register(id, offset)?;
        state.set_register(id, offset, word | mask)
    }

    fn clear_bits(&self, id: u8, offset: u32, mask: u32) -> Result<()> {
        let mut state = self.lock();
        let word = state.register(id, offset)?;
        state.set_register(id, offset, word & !mask)
    }

    fn register_irq(&self, irq: u32) -> Result<()> {
        self.lock().registered_irqs.insert(irq);
        Ok(())
    }

    fn unregister_irq(&self, irq: u32) -> Result<()> {
        if !self.lock().registered_irqs.remove(&irq) {
            return Err(FlinkError::transport(format!("irq {irq} not registered")));
        }
        Ok(())
    }

    fn signal_offset(&self) -> Result<u32> {
        Ok(self.lock().signal_offset)
    }

    fn irq_multiplex(&self, id: u8, irq: u32) -> Result<u32> {
        let mut state = self.lock();
        Ok(state.window(id)?.irq_mux.get(&irq).copied().unwrap_or(0))
    }

    fn set_irq_multiplex(&self, id: u8, irq: u32, flink_irq: u32) -> Result<()> {
        let mut state = self.lock();
        state.window(id)?.irq_mux.insert(irq, flink_irq);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus() -> SoftBus {
        SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Pwm, 2, 0x40, 1)])
    }

    #[test]
    fn windows_are_laid_out_back_to_back() {
        let bus = SoftBus::with_subdevices(vec![
            SoftSubdevice::new(FunctionId::Dio, 8, 0x80, 1),
            SoftSubdevice::new(FunctionId::Pwm, 2, 0x40, 2),
        ]);
        let d0 = RawDescriptor::parse(&bus.read_descriptor(0).unwrap());
        let d1 = RawDescriptor::parse(&bus.read_descriptor(1).unwrap());
        assert_eq!(d0.base_addr, 0);
        assert_eq!(d1.base_addr, 0x80);
    }

    #[test]
    fn out_of_window_transfer_is_refused() {
        let bus = bus();
        let mut buf = [0u8; 4];
        assert!(bus.read(0, 0x40, &mut buf).is_err());
        assert!(bus.write(0, 0x3E, &buf).is_err());
    }

    #[test]
    fn exclusive_claim_blocks_other_selects() {
        let bus = bus();
        bus.select(0, AccessMode::Exclusive).unwrap();
        assert!(bus.select(0, AccessMode::Shared).is_err());
        assert!(bus.select(0, AccessMode::Exclusive).is_err());
        bus.release(0);
        bus.select(0, AccessMode::Shared).unwrap();
    }

    #[test]
    fn bit_writes_are_idempotent() {
        let bus = bus();
        bus.write_bit(0, 0x14, 0, true).unwrap();
        let after_first = bus.peek_register(0, 0x14);
        bus.write_bit(0, 0x14, 0, true).unwrap();
        assert_eq!(bus.peek_register(0, 0x14), after_first);
        assert_eq!(after_first, 1);
    }

    #[test]
    fn atomic_masks_touch_only_their_bits() {
        let bus = bus();
        bus.poke_register(0, 0x20, 0b1010);
        bus.set_bits(0, 0x20, 0b0101).unwrap();
        assert_eq!(bus.peek_register(0, 0x20), 0b1111);
        bus.clear_bits(0, 0x20, 0b0110).unwrap();
        assert_eq!(bus.peek_register(0, 0x20), 0b1001);
    }

    #[test]
    fn irq_registration_round_trip() {
        let bus = bus();
        bus.register_irq(5).unwrap();
        bus.unregister_irq(5).unwrap();
        assert!(bus.unregister_irq(5).is_err());
    }
}
