//! USB access to the Sol-R sticks.

use std::time::Duration;

use rusb::{Device, DeviceHandle, GlobalContext, UsbContext};
use tracing::{debug, warn};

use crate::controller::LedController;
use crate::error::{Error, Result};
use crate::Side;

/// Thrustmaster USB vendor ID.
pub const VENDOR_ID: u16 = 0x044f;

/// Interface accepting LED packets.
pub const INTERFACE: u8 = 1;

/// Bulk OUT endpoint for LED packets.
pub const ENDPOINT_OUT: u8 = 0x02;

/// Timeout for a single bulk write.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Operations required on an opened USB device.
pub trait UsbInterface {
    fn kernel_driver_active(&self, iface: u8) -> rusb::Result<bool>;
    fn detach_kernel_driver(&mut self, iface: u8) -> rusb::Result<()>;
    fn attach_kernel_driver(&mut self, iface: u8) -> rusb::Result<()>;
    fn claim_interface(&mut self, iface: u8) -> rusb::Result<()>;
    fn release_interface(&mut self, iface: u8) -> rusb::Result<()>;
    fn write_bulk(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize>;
}

impl<T: UsbContext> UsbInterface for DeviceHandle<T> {
    fn kernel_driver_active(&self, iface: u8) -> rusb::Result<bool> {
        DeviceHandle::kernel_driver_active(self, iface)
    }

    fn detach_kernel_driver(&mut self, iface: u8) -> rusb::Result<()> {
        DeviceHandle::detach_kernel_driver(self, iface)
    }

    fn attach_kernel_driver(&mut self, iface: u8) -> rusb::Result<()> {
        DeviceHandle::attach_kernel_driver(self, iface)
    }

    fn claim_interface(&mut self, iface: u8) -> rusb::Result<()> {
        DeviceHandle::claim_interface(self, iface)
    }

    fn release_interface(&mut self, iface: u8) -> rusb::Result<()> {
        DeviceHandle::release_interface(self, iface)
    }

    fn write_bulk(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::write_bulk(self, endpoint, buf, timeout)
    }
}

/// Claimed LED interface.
///
/// The interface is released and the kernel driver reattached when the session is dropped.
pub struct UsbSession<H: UsbInterface> {
    handle: H,
    reattach: bool,
}

impl<H: UsbInterface> UsbSession<H> {
    /// Detach the kernel driver if necessary and claim the LED interface.
    pub fn claim(mut handle: H) -> Result<Self> {
        let reattach = match handle.kernel_driver_active(INTERFACE) {
            Ok(true) => {
                handle.detach_kernel_driver(INTERFACE).map_err(|source| {
                    Error::ResourceAcquisition { step: "detach kernel driver from", source }
                })?;
                true
            },
            Ok(false) | Err(rusb::Error::NotSupported) => false,
            Err(source) => {
                return Err(Error::ResourceAcquisition { step: "query kernel driver on", source })
            },
        };

        if let Err(source) = handle.claim_interface(INTERFACE) {
            if reattach {
                if let Err(err) = handle.attach_kernel_driver(INTERFACE) {
                    debug!("Unable to reattach kernel driver: {}", err);
                }
            }
            return Err(Error::ResourceAcquisition { step: "claim", source });
        }

        debug!("Claimed interface {} (kernel driver detached: {})", INTERFACE, reattach);

        Ok(Self { handle, reattach })
    }
}

impl<H: UsbInterface> LedController for UsbSession<H> {
    fn write_packet(&mut self, packet: &[u8]) -> Result<()> {
        match self.handle.write_bulk(ENDPOINT_OUT, packet, WRITE_TIMEOUT) {
            Ok(written) if written == packet.len() => Ok(()),
            Ok(written) => {
                warn!("Short LED packet write: {} of {} bytes", written, packet.len());
                Err(Error::Transport(rusb::Error::Io))
            },
            Err(err) => Err(Error::Transport(err)),
        }
    }
}

impl<H: UsbInterface> Drop for UsbSession<H> {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(INTERFACE) {
            warn!("Unable to release interface {}: {}", INTERFACE, err);
        }

        // Failure is expected when no driver was bound to the interface.
        if self.reattach {
            if let Err(err) = self.handle.attach_kernel_driver(INTERFACE) {
                debug!("Unable to reattach kernel driver: {}", err);
            }
        }

        debug!("Released interface {}", INTERFACE);
    }
}

/// Find all connected sticks.
pub fn find_devices() -> Result<Vec<(Side, Device<GlobalContext>)>> {
    let mut found = Vec::new();

    for device in rusb::devices()?.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(descriptor) => descriptor,
            Err(_) => continue,
        };

        if descriptor.vendor_id() != VENDOR_ID {
            continue;
        }

        if let Some(side) = Side::from_product_id(descriptor.product_id()) {
            let (bus, address) = (device.bus_number(), device.address());
            debug!("Found {} stick on bus {} address {}", side, bus, address);
            found.push((side, device));
        }
    }

    Ok(found)
}

/// Open and claim a stick.
pub fn open(device: &Device<GlobalContext>) -> Result<UsbSession<DeviceHandle<GlobalContext>>> {
    UsbSession::claim(device.open()?)
}

/// Open and claim the first stick of one side.
pub fn open_side(side: Side) -> Result<UsbSession<DeviceHandle<GlobalContext>>> {
    let devices = find_devices()?;
    match devices.iter().find(|(found, _)| *found == side) {
        Some((_, device)) => open(device),
        None => Err(Error::DeviceNotFound(side)),
    }
}
