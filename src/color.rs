//! RGB color model.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// RGB color.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `level / max`, truncating towards zero.
    pub fn scaled(self, level: u8, max: u8) -> Self {
        let scale = |channel: u8| (channel as u16 * level as u16 / max as u16) as u8;
        Self { r: scale(self.r), g: scale(self.g), b: scale(self.b) }
    }

    /// Color bytes in wire order.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Rgb, Error> {
        if s.len() != 6 || !s.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidFormat(s.into()));
        }

        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb { r, g, b }),
            _ => Err(Error::InvalidFormat(s.into())),
        }
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert a fully saturated HSV color to RGB.
///
/// The hue is `hue / hue_steps` of a full revolution and the value is `level / levels`. Channels
/// are computed with integers, so exact results are never truncated down by a step.
pub fn hsv_to_rgb(hue: u8, hue_steps: u8, level: u8, levels: u8) -> Rgb {
    let (hue_steps, levels) = (hue_steps as u32, levels as u32);
    let sextant = hue as u32 * 6;
    let fraction = sextant % hue_steps;

    let channel = |numerator: u32| (255 * level as u32 * numerator / (levels * hue_steps)) as u8;
    let full = channel(hue_steps);
    let rising = channel(fraction);
    let falling = channel(hue_steps - fraction);

    match (sextant / hue_steps) % 6 {
        0 => Rgb::new(full, rising, 0),
        1 => Rgb::new(falling, full, 0),
        2 => Rgb::new(0, full, rising),
        3 => Rgb::new(0, falling, full),
        4 => Rgb::new(rising, 0, full),
        _ => Rgb::new(full, 0, falling),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parse_hex_color() {
        assert_eq!("FF0000".parse::<Rgb>().unwrap(), Rgb::new(0xff, 0x00, 0x00));
        assert_eq!("00ff7f".parse::<Rgb>().unwrap(), Rgb::new(0x00, 0xff, 0x7f));
        assert_eq!("0a0B0c".parse::<Rgb>().unwrap(), Rgb::new(0x0a, 0x0b, 0x0c));
    }

    #[test]
    fn reject_malformed_colors() {
        for input in ["", "FF00", "FF00000", "0xFF0000", "GG0000", "FF 000", "+F0000", "ÿÿÿ"] {
            assert!(
                matches!(input.parse::<Rgb>(), Err(Error::InvalidFormat(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        let color = Rgb::new(0x12, 0xab, 0x00);
        assert_eq!(color.to_string(), "12AB00");
        assert_eq!(color.to_string().parse::<Rgb>().unwrap(), color);
    }

    #[test]
    fn scaling_truncates() {
        let color = Rgb::new(0xff, 0x80, 0x01);
        assert_eq!(color.scaled(2, 20), Rgb::new(25, 12, 0));
        assert_eq!(color.scaled(20, 20), color);
        assert_eq!(color.scaled(0, 20), Rgb::default());
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0, 6, 1, 1), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(2, 6, 1, 1), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(4, 6, 1, 1), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(1, 6, 1, 1), Rgb::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(0, 6, 0, 1), Rgb::new(0, 0, 0));
        assert_eq!(hsv_to_rgb(0, 6, 1, 2), Rgb::new(127, 0, 0));
    }

    #[test]
    fn hsv_whole_channels_are_not_truncated() {
        assert_eq!(hsv_to_rgb(30, 100, 20, 20), Rgb::new(51, 255, 0));
        assert_eq!(hsv_to_rgb(60, 100, 10, 20), Rgb::new(0, 51, 127));
        assert_eq!(hsv_to_rgb(20, 100, 20, 20), Rgb::new(204, 255, 0));
        assert_eq!(hsv_to_rgb(90, 100, 20, 20), Rgb::new(255, 0, 153));
    }

    /// Full brightness colors for every hundredth of a hue revolution.
    #[rustfmt::skip]
    const HUE_REVOLUTION: [(u8, u8, u8); 100] = [
        (255, 0, 0), (255, 15, 0), (255, 30, 0), (255, 45, 0), (255, 61, 0),
        (255, 76, 0), (255, 91, 0), (255, 107, 0), (255, 122, 0), (255, 137, 0),
        (255, 153, 0), (255, 168, 0), (255, 183, 0), (255, 198, 0), (255, 214, 0),
        (255, 229, 0), (255, 244, 0), (249, 255, 0), (234, 255, 0), (219, 255, 0),
        (204, 255, 0), (188, 255, 0), (173, 255, 0), (158, 255, 0), (142, 255, 0),
        (127, 255, 0), (112, 255, 0), (96, 255, 0), (81, 255, 0), (66, 255, 0),
        (51, 255, 0), (35, 255, 0), (20, 255, 0), (5, 255, 0), (0, 255, 10),
        (0, 255, 25), (0, 255, 40), (0, 255, 56), (0, 255, 71), (0, 255, 86),
        (0, 255, 102), (0, 255, 117), (0, 255, 132), (0, 255, 147), (0, 255, 163),
        (0, 255, 178), (0, 255, 193), (0, 255, 209), (0, 255, 224), (0, 255, 239),
        (0, 255, 255), (0, 239, 255), (0, 224, 255), (0, 209, 255), (0, 193, 255),
        (0, 178, 255), (0, 163, 255), (0, 147, 255), (0, 132, 255), (0, 117, 255),
        (0, 102, 255), (0, 86, 255), (0, 71, 255), (0, 56, 255), (0, 40, 255),
        (0, 25, 255), (0, 10, 255), (5, 0, 255), (20, 0, 255), (35, 0, 255),
        (51, 0, 255), (66, 0, 255), (81, 0, 255), (96, 0, 255), (112, 0, 255),
        (127, 0, 255), (142, 0, 255), (158, 0, 255), (173, 0, 255), (188, 0, 255),
        (204, 0, 255), (219, 0, 255), (234, 0, 255), (249, 0, 255), (255, 0, 244),
        (255, 0, 229), (255, 0, 214), (255, 0, 198), (255, 0, 183), (255, 0, 168),
        (255, 0, 153), (255, 0, 137), (255, 0, 122), (255, 0, 107), (255, 0, 91),
        (255, 0, 76), (255, 0, 61), (255, 0, 45), (255, 0, 30), (255, 0, 15),
    ];

    #[test]
    fn hsv_hue_revolution() {
        for (hue, &(r, g, b)) in HUE_REVOLUTION.iter().enumerate() {
            assert_eq!(hsv_to_rgb(hue as u8, 100, 20, 20), Rgb::new(r, g, b), "hue {hue}");
        }
    }

    proptest! {
        #[test]
        fn valid_hex_decodes_pairs(r: u8, g: u8, b: u8, upper: bool) {
            let text = if upper {
                format!("{r:02X}{g:02X}{b:02X}")
            } else {
                format!("{r:02x}{g:02x}{b:02x}")
            };
            prop_assert_eq!(text.parse::<Rgb>().unwrap().to_bytes(), [r, g, b]);
        }

        #[test]
        fn wrong_length_is_rejected(text in "[0-9a-fA-F]{0,12}") {
            prop_assume!(text.len() != 6);
            prop_assert!(matches!(text.parse::<Rgb>(), Err(Error::InvalidFormat(_))));
        }

        #[test]
        fn non_hex_is_rejected(prefix in "[0-9a-f]{0,5}", bad in "[g-zG-Z#_ -]") {
            let mut text = prefix.clone();
            text.push_str(&bad);
            while text.len() < 6 {
                text.push('0');
            }
            prop_assert!(matches!(text.parse::<Rgb>(), Err(Error::InvalidFormat(_))));
        }
    }
}
