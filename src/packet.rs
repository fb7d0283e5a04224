//! Sol-R LED packet encoding.
//!
//! Every packet starts with a 4 byte header followed by `[led, r, g, b]` entries. The
//! thumbstick LED is always sent on its own, all other LEDs are sent two per packet.

use bytes::{BufMut, Bytes, BytesMut};
use indexmap::IndexMap;
use tracing::trace;

use crate::color::Rgb;
use crate::registry::LedId;

/// Header for the thumbstick LED.
pub const THUMBSTICK_HEADER: [u8; 4] = [0x01, 0x88, 0x81, 0xff];

/// Header for all other LEDs.
pub const BATCH_HEADER: [u8; 4] = [0x01, 0x08, 0x85, 0xff];

/// Maximum number of LEDs in a batch packet.
///
/// The firmware's limit is unknown, larger batches are untested.
pub const BATCH_SIZE: usize = 2;

/// Size of one LED entry.
const ENTRY_LEN: usize = 4;

/// LED colors in send order.
pub type LedColorMap = IndexMap<LedId, Rgb>;

/// Build a color map assigning one color to all LEDs.
pub fn uniform(leds: &[LedId], color: Rgb) -> LedColorMap {
    leds.iter().map(|&led| (led, color)).collect()
}

/// Convert LED colors to the packets required to apply them.
///
/// The thumbstick packet is always sent first, followed by the remaining LEDs in map order.
pub fn encode(colors: &LedColorMap) -> Vec<Bytes> {
    let mut packets = Vec::new();

    if let Some(color) = colors.get(&LedId::THUMBSTICK) {
        packets.push(packet(THUMBSTICK_HEADER, &[(LedId::THUMBSTICK, *color)]));
    }

    let others: Vec<(LedId, Rgb)> = colors
        .iter()
        .filter(|(led, _)| !led.is_thumbstick())
        .map(|(led, color)| (*led, *color))
        .collect();
    for batch in others.chunks(BATCH_SIZE) {
        packets.push(packet(BATCH_HEADER, batch));
    }

    for packet in &packets {
        trace!("Encoded LED packet {:02X?}", packet.as_ref());
    }

    packets
}

/// Frame LED entries with a header.
fn packet(header: [u8; 4], entries: &[(LedId, Rgb)]) -> Bytes {
    let mut buf = BytesMut::with_capacity(header.len() + entries.len() * ENTRY_LEN);
    buf.put_slice(&header);

    for (led, color) in entries {
        buf.put_u8(led.0);
        buf.put_slice(&color.to_bytes());
    }

    buf.freeze()
}
