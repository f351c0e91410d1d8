//! Device handle: open, enumeration, subdevice registry.

use std::path::Path;

use flink_bus::RawDescriptor;

use crate::error::{FlinkError, Result};
use crate::subdevice::{Subdevice, SubdeviceDescriptor};
use crate::transport::{BusTransport, CharDevTransport};

/// One open connection to a flink device.
///
/// Owns the transport and the enumerated subdevice table. The table is
/// built once during open and read-only afterwards, so handing out
/// [`Subdevice`] references across threads is safe; mutual exclusion on
/// the bus itself goes through the driver's exclusive-selection claim.
#[derive(Debug)]
pub struct FlinkDevice {
    transport: Box<dyn BusTransport>,
    subdevices: Vec<SubdeviceDescriptor>,
}

impl FlinkDevice {
    /// Open a flink device file and enumerate its subdevices.
    ///
    /// Construction is all-or-nothing: if any subdevice descriptor cannot
    /// be read, the error propagates and no partially-enumerated device
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::DeviceNotFound`] if the path does not exist,
    /// or a transport error from the open or the enumeration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening flink device {}", path.display());

        let transport = CharDevTransport::open(path)?;
        let dev = Self::with_transport(Box::new(transport))?;

        tracing::info!(
            "Opened {} with {} subdevices",
            path.display(),
            dev.nof_subdevices()
        );
        Ok(dev)
    }

    /// Build a device over any transport and enumerate its subdevices.
    ///
    /// This is how a [`SoftBus`](crate::SoftBus) becomes a device; the
    /// enumeration path is identical to the hardware one.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the subdevice count or any descriptor
    /// cannot be read.
    pub fn with_transport(transport: Box<dyn BusTransport>) -> Result<Self> {
        let count = transport.nof_subdevices()?;
        tracing::debug!("Enumerating {count} subdevices");

        let mut subdevices = Vec::with_capacity(usize::from(count));
        for id in 0..count {
            let record = transport.read_descriptor(id).map_err(|e| {
                FlinkError::enumeration(format!("descriptor {id} of {count}: {e}"))
            })?;
            let raw = RawDescriptor::parse(&record);
            let desc = SubdeviceDescriptor::from_raw(id, &raw);
            tracing::debug!(
                "Subdevice {id}: {} v{}, {} channels, window {:#x}+{:#x}, uid {:#x}",
                desc.function(),
                desc.function_version(),
                desc.nof_channels(),
                desc.base_addr(),
                desc.mem_size(),
                desc.unique_id()
            );
            subdevices.push(desc);
        }

        Ok(Self {
            transport,
            subdevices,
        })
    }

    /// Number of subdevices. Fixed for the life of the device.
    #[allow(clippy::cast_possible_truncation)]
    pub fn nof_subdevices(&self) -> u8 {
        self.subdevices.len() as u8
    }

    /// Look up a subdevice by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::InvalidSubdevice`] if `id` is not below the
    /// enumerated count.
    pub fn subdevice(&self, id: u8) -> Result<Subdevice<'_>> {
        let desc = self
            .subdevices
            .get(usize::from(id))
            .ok_or(FlinkError::InvalidSubdevice {
                id,
                count: self.nof_subdevices(),
            })?;
        Ok(Subdevice::new(self, desc))
    }

    /// Look up a subdevice by its globally-unique id (linear scan).
    ///
    /// # Errors
    ///
    /// Returns [`FlinkError::NotFound`] if no descriptor carries
    /// `unique_id`.
    pub fn subdevice_by_unique_id(&self, unique_id: u32) -> Result<Subdevice<'_>> {
        self.subdevices
            .iter()
            .find(|d| d.unique_id() == unique_id)
            .map(|d| Subdevice::new(self, d))
            .ok_or(FlinkError::NotFound { unique_id })
    }

    /// Iterate over all subdevices in id order.
    pub fn subdevices(&self) -> impl Iterator<Item = Subdevice<'_>> {
        self.subdevices.iter().map(|d| Subdevice::new(self, d))
    }

    /// The transport this device transacts through.
    pub(crate) fn transport(&self) -> &dyn BusTransport {
        self.transport.as_ref()
    }

    // ── Interrupt plumbing ───────────────────────────────────────────────────

    /// Register the calling process for device interrupt line `irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn register_irq(&self, irq: u32) -> Result<()> {
        self.transport.register_irq(irq)
    }

    /// Unregister the calling process from device interrupt line `irq`.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn unregister_irq(&self, irq: u32) -> Result<()> {
        self.transport.unregister_irq(irq)
    }

    /// Read the signal number offset used for interrupt delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver transaction fails.
    pub fn signal_offset(&self) -> Result<u32> {
        self.transport.signal_offset()
    }
}

impl Drop for FlinkDevice {
    fn drop(&mut self) {
        tracing::debug!("Closing flink device ({} subdevices)", self.subdevices.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::softbus::{SoftBus, SoftSubdevice};
    use flink_bus::FunctionId;

    fn three_subdevice_bus() -> SoftBus {
        SoftBus::with_subdevices(vec![
            SoftSubdevice::new(FunctionId::Dio, 16, 0x80, 0x100),
            SoftSubdevice::new(FunctionId::Pwm, 4, 0x60, 0x200),
            SoftSubdevice::new(FunctionId::Watchdog, 0, 0x40, 0x300),
        ])
    }

    #[test]
    fn enumeration_assigns_sequential_ids() {
        let dev = FlinkDevice::with_transport(Box::new(three_subdevice_bus())).unwrap();
        assert_eq!(dev.nof_subdevices(), 3);
        for (i, sub) in dev.subdevices().enumerate() {
            assert_eq!(usize::from(sub.id()), i);
        }
    }

    #[test]
    fn every_valid_id_is_reachable() {
        let dev = FlinkDevice::with_transport(Box::new(three_subdevice_bus())).unwrap();
        for id in 0..dev.nof_subdevices() {
            assert!(dev.subdevice(id).is_ok());
        }
    }

    #[test]
    fn id_equal_to_count_is_out_of_range() {
        let dev = FlinkDevice::with_transport(Box::new(three_subdevice_bus())).unwrap();
        let err = dev.subdevice(3).unwrap_err();
        assert!(matches!(
            err,
            FlinkError::InvalidSubdevice { id: 3, count: 3 }
        ));
    }

    #[test]
    fn unique_id_lookup_ignores_numeric_id() {
        let dev = FlinkDevice::with_transport(Box::new(three_subdevice_bus())).unwrap();
        let sub = dev.subdevice_by_unique_id(0x300).unwrap();
        assert_eq!(sub.id(), 2);
        assert_eq!(sub.function(), FunctionId::Watchdog);
    }

    #[test]
    fn unknown_unique_id_is_not_found() {
        let dev = FlinkDevice::with_transport(Box::new(three_subdevice_bus())).unwrap();
        let err = dev.subdevice_by_unique_id(0xBAD).unwrap_err();
        assert!(matches!(err, FlinkError::NotFound { unique_id: 0xBAD }));
    }
}
