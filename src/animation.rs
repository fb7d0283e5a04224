//! Breathing and rainbow LED animations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::color::{self, Rgb};
use crate::controller::LedController;
use crate::error::Result;
use crate::packet;
use crate::registry::LedId;

/// Delay between two animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Brightness levels per unit, one level is a 0.05 brightness step.
const LEVELS: u8 = 20;

/// Dimmest brightness level (0.1).
const MIN_LEVEL: u8 = 2;

/// Hue steps per revolution, one step is 0.01.
const HUE_STEPS: u8 = 100;

/// Triangular brightness wave between 0.1 and 1.0.
///
/// Levels are tracked as integers, so both endpoints are hit exactly.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Envelope {
    level: u8,
    rising: bool,
}

impl Default for Envelope {
    fn default() -> Self {
        Self { level: MIN_LEVEL, rising: true }
    }
}

impl Envelope {
    /// Current brightness in twentieths.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn advance(&mut self) {
        if self.rising {
            self.level += 1;
            self.rising = self.level < LEVELS;
        } else {
            self.level -= 1;
            self.rising = self.level <= MIN_LEVEL;
        }
    }
}

/// Hue rotating by 0.01 per frame.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Hue(u8);

impl Hue {
    /// Current hue in hundredths of a revolution.
    pub fn step(&self) -> u8 {
        self.0
    }

    /// Rotate the hue, returning `true` when it wrapped back to zero.
    pub fn advance(&mut self) -> bool {
        self.0 = (self.0 + 1) % HUE_STEPS;
        self.0 == 0
    }
}

/// Fixed color fading in and out.
pub struct Breathing {
    base: Rgb,
    envelope: Envelope,
}

impl Breathing {
    pub fn new(base: Rgb) -> Self {
        Self { base, envelope: Envelope::default() }
    }
}

impl Iterator for Breathing {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        let color = self.base.scaled(self.envelope.level(), LEVELS);
        self.envelope.advance();
        Some(color)
    }
}

/// Rotating hue fading in and out.
///
/// Hue and brightness advance independently and are never reset.
#[derive(Default)]
pub struct Rainbow {
    envelope: Envelope,
    hue: Hue,
}

impl Iterator for Rainbow {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        let color = color::hsv_to_rgb(self.hue.step(), HUE_STEPS, self.envelope.level(), LEVELS);
        self.envelope.advance();
        self.hue.advance();
        Some(color)
    }
}

/// Send animation frames to all LEDs until `running` is cleared.
///
/// The flag is only checked between frames, so a frame is never sent partially. Returns the
/// number of frames sent.
pub fn animate<C, F>(
    controller: &mut C,
    leds: &[LedId],
    frames: F,
    running: &AtomicBool,
    interval: Duration,
) -> Result<usize>
where
    C: LedController,
    F: IntoIterator<Item = Rgb>,
{
    let mut sent = 0;

    for color in frames {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        controller.apply(&packet::uniform(leds, color))?;
        sent += 1;

        thread::sleep(interval);
    }

    debug!("Animation stopped after {} frames", sent);

    Ok(sent)
}
