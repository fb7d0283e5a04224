//! LED controller abstraction.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::packet::{self, LedColorMap};

/// Delay after every packet written to the stick.
pub const PACKET_DELAY: Duration = Duration::from_millis(10);

/// Device accepting raw LED packets.
pub trait LedController {
    /// Write a single encoded packet.
    fn write_packet(&mut self, packet: &[u8]) -> Result<()>;

    /// Encode LED colors and write all resulting packets.
    ///
    /// Stops at the first failed write.
    fn apply(&mut self, colors: &LedColorMap) -> Result<()> {
        let packets = packet::encode(colors);
        debug!("Applying {} LED colors in {} packets", colors.len(), packets.len());

        for packet in packets {
            self.write_packet(&packet)?;
            thread::sleep(PACKET_DELAY);
        }

        Ok(())
    }
}
