//! Static LED, group and button tables of the Sol-R sticks.

use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::Side;

/// LED identifier.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Copy, Clone)]
pub struct LedId(pub u8);

impl LedId {
    /// The thumbstick LED, which uses its own packet framing.
    pub const THUMBSTICK: LedId = LedId(0x00);

    pub const fn is_thumbstick(self) -> bool {
        self.0 == Self::THUMBSTICK.0
    }
}

impl Display for LedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Human readable labels, indexed by LED ID.
const LED_LABELS: [&str; 20] = [
    "Thumbstick LED",
    "TM Logo Bottom",
    "TM Logo Right",
    "TM Logo Left",
    "Upper Circle",
    "Upper Right Circle",
    "Right Middle Circle",
    "Button 17",
    "Button 16",
    "Button 18",
    "Button 19",
    "Bottom Right Circle",
    "Bottom Circle",
    "Bottom Left Circle",
    "Left Center Circle",
    "Upper Left Circle",
    "Button 6",
    "Button 5",
    "Button 7",
    "Button 8",
];

/// Physical button number to LED.
const BUTTON_TO_LED: [(u32, LedId); 9] = [
    (0, LedId(0x00)),
    (5, LedId(0x11)),
    (6, LedId(0x10)),
    (7, LedId(0x12)),
    (8, LedId(0x13)),
    (16, LedId(0x08)),
    (17, LedId(0x07)),
    (18, LedId(0x09)),
    (19, LedId(0x0A)),
];

/// Named LED groups.
#[derive(ValueEnum, PartialEq, Eq, Debug, Copy, Clone)]
#[value(rename_all = "snake_case")]
pub enum Group {
    TmLogo,
    #[value(alias = "circle_group")]
    UpperCircles,
    LeftButtons,
    RightButtons,
}

impl Group {
    pub fn name(self) -> &'static str {
        match self {
            Self::TmLogo => "tm_logo",
            Self::UpperCircles => "upper_circles",
            Self::LeftButtons => "left_buttons",
            Self::RightButtons => "right_buttons",
        }
    }

    /// LEDs of this group, in send order.
    pub fn leds(self) -> &'static [LedId] {
        match self {
            Self::TmLogo => &[LedId(0x01), LedId(0x02), LedId(0x03)],
            Self::UpperCircles => &[
                LedId(0x04),
                LedId(0x05),
                LedId(0x06),
                LedId(0x0B),
                LedId(0x0C),
                LedId(0x0D),
                LedId(0x0E),
                LedId(0x0F),
            ],
            // Buttons 5, 6, 7, 8.
            Self::LeftButtons => &[LedId(0x11), LedId(0x10), LedId(0x12), LedId(0x13)],
            // Buttons 17, 16, 19, 18.
            Self::RightButtons => &[LedId(0x07), LedId(0x08), LedId(0x0A), LedId(0x09)],
        }
    }
}

/// Look up the LEDs of a group by name.
pub fn resolve_group(name: &str) -> Result<&'static [LedId]> {
    Group::from_str(name, true)
        .map(Group::leds)
        .map_err(|_| Error::UnknownGroup(name.into()))
}

/// Map button numbers to their LEDs.
///
/// Fails on the first unknown button without returning the LEDs resolved so far.
pub fn resolve_buttons(numbers: &[u32]) -> Result<Vec<LedId>> {
    numbers
        .iter()
        .map(|&number| {
            BUTTON_TO_LED
                .iter()
                .find(|(button, _)| *button == number)
                .map(|&(_, led)| led)
                .ok_or(Error::UnknownButton(number))
        })
        .collect()
}

/// Parse a comma-separated button list such as `5,6, 7`.
pub fn parse_buttons(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(|button| button.trim().parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidButtons(list.into()))
}

pub fn is_valid_led_id(id: u8) -> bool {
    (id as usize) < LED_LABELS.len()
}

/// Label of a LED.
pub fn label(led: LedId) -> Option<&'static str> {
    LED_LABELS.get(led.0 as usize).copied()
}

/// Parse a hex LED ID like `0a`, `11` or `0x11`.
pub fn resolve_led(text: &str) -> Result<LedId> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);

    let valid_format =
        !digits.is_empty() && digits.len() <= 2 && digits.bytes().all(|c| c.is_ascii_hexdigit());
    match u8::from_str_radix(digits, 16) {
        Ok(id) if valid_format && is_valid_led_id(id) => Ok(LedId(id)),
        _ => Err(Error::UnknownLedId(text.into())),
    }
}

/// Parse a comma-separated LED ID list.
pub fn resolve_leds(list: &str) -> Result<Vec<LedId>> {
    list.split(',').map(|led| resolve_led(led.trim())).collect()
}

/// Resolve interactive input, which is either a group name or a single LED ID.
pub fn resolve_selection(input: &str) -> Result<Vec<LedId>> {
    let input = input.trim();
    match resolve_group(input) {
        Ok(leds) => Ok(leds.to_vec()),
        Err(_) => match resolve_led(input) {
            Ok(led) => Ok(vec![led]),
            Err(_) => Err(Error::UnknownLedId(input.into())),
        },
    }
}

/// Print all devices, groups, buttons and LEDs.
pub fn write_listing<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Available devices:")?;
    for side in Side::value_variants() {
        writeln!(out, "  {:<5} - PID {:04X}", side, side.product_id())?;
    }

    writeln!(out, "\nAvailable groups:")?;
    for group in Group::value_variants() {
        let leds: Vec<String> = group.leds().iter().map(LedId::to_string).collect();
        writeln!(out, "  {} - LEDs: {}", group.name(), leds.join(", "))?;
    }

    writeln!(out, "\nAvailable buttons:")?;
    for (button, led) in BUTTON_TO_LED {
        writeln!(out, "  Button {button} -> LED {led}")?;
    }

    writeln!(out, "\nAvailable LEDs:")?;
    for (id, label) in LED_LABELS.iter().enumerate() {
        writeln!(out, "  {:02X}: {}", id, label)?;
    }

    Ok(())
}
