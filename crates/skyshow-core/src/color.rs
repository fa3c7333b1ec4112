//! Color encodings used by waypoints and LED cues.
//!
//! A waypoint carries its color twice: as a `#rrggbb` string and as an
//! `{r, g, b}` triple. Both are part of the exported JSON, so every place that
//! needs one from the other goes through [`hex_to_rgb`] / [`rgb_to_hex`].

use crate::error::ColorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }

    /// Each channel scaled by brightness and rounded (LED PWM duty, 0-255).
    pub fn pwm(self, brightness: f64) -> Rgb {
        Rgb {
            r: scale_channel(self.r, brightness),
            g: scale_channel(self.g, brightness),
            b: scale_channel(self.b, brightness),
        }
    }

    /// Each channel as a brightness-scaled percentage of full output (0-100).
    pub fn percentage(self, brightness: f64) -> Rgb {
        Rgb {
            r: channel_percentage(self.r, brightness),
            g: channel_percentage(self.g, brightness),
            b: channel_percentage(self.b, brightness),
        }
    }

    /// Per-channel linear blend towards `other`, rounded.
    pub fn lerp(self, other: Rgb, progress: f64) -> Rgb {
        Rgb {
            r: lerp_channel(self.r, other.r, progress),
            g: lerp_channel(self.g, other.g, progress),
            b: lerp_channel(self.b, other.b, progress),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

/// Color block shared by lighting cues and interpolation samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedColor {
    pub hex: String,
    pub rgb: Rgb,
    pub brightness: f64,
}

impl LedColor {
    pub fn new(rgb: Rgb, brightness: f64) -> Self {
        Self {
            hex: rgb_to_hex(rgb),
            rgb,
            brightness,
        }
    }
}

/// Parse `#RRGGBB` (either case).
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let invalid = || ColorError::InvalidHex(hex.to_string());

    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };

    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Format as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_string()
}

/// HSL to RGB using the six-sector piecewise formula.
///
/// `hue` is in degrees and wrapped into `[0, 360)`. `saturation` and
/// `lightness` are percentages and clamped into `[0, 100]`.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 };
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb {
        r: unit_to_channel(r + m),
        g: unit_to_channel(g + m),
        b: unit_to_channel(b + m),
    }
}

/// `round(channel * brightness)`, a direct float multiply (not a shift).
pub fn scale_channel(channel: u8, brightness: f64) -> u8 {
    clamp_to_u8((f64::from(channel) * brightness).round(), 255.0)
}

/// `round((channel / 255) * brightness * 100)`.
pub fn channel_percentage(channel: u8, brightness: f64) -> u8 {
    clamp_to_u8((f64::from(channel) / 255.0 * brightness * 100.0).round(), 100.0)
}

/// `round(a + (b - a) * progress)`.
pub fn lerp_channel(a: u8, b: u8, progress: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    clamp_to_u8((a + (b - a) * progress).round(), 255.0)
}

fn unit_to_channel(value: f64) -> u8 {
    clamp_to_u8((value * 255.0).round(), 255.0)
}

fn clamp_to_u8(value: f64, max: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, max) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_lowercases() {
        for hex in ["#FF8800", "#00ff7f", "#AbCdEf", "#000000", "#FFFFFF"] {
            let rgb = hex_to_rgb(hex).unwrap();
            assert_eq!(rgb_to_hex(rgb), hex.to_lowercase());
        }
    }

    #[test]
    fn hex_parse_rejects_malformed_input() {
        for bad in ["ff0000", "#ff000", "#ff00000", "#gg0000", "#+f0000", "", "#"] {
            assert!(hex_to_rgb(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn hsl_primaries_are_exact() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn hsl_secondaries_are_exact() {
        assert_eq!(hsl_to_rgb(60.0, 100.0, 50.0), Rgb::new(255, 255, 0));
        assert_eq!(hsl_to_rgb(180.0, 100.0, 50.0), Rgb::new(0, 255, 255));
        assert_eq!(hsl_to_rgb(300.0, 100.0, 50.0), Rgb::new(255, 0, 255));
    }

    #[test]
    fn hsl_wraps_hue_and_handles_greys() {
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(-120.0, 100.0, 50.0), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(200.0, 0.0, 100.0), Rgb::WHITE);
        assert_eq!(hsl_to_rgb(200.0, 0.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn pwm_and_percentage_scale_by_brightness() {
        let rgb = Rgb::new(255, 128, 0);
        assert_eq!(rgb.pwm(0.5), Rgb::new(128, 64, 0));
        assert_eq!(rgb.percentage(0.5), Rgb::new(50, 25, 0));
        assert_eq!(rgb.pwm(1.0), rgb);
        assert_eq!(rgb.percentage(1.0), Rgb::new(100, 50, 0));
    }

    #[test]
    fn lerp_channel_rounds() {
        assert_eq!(lerp_channel(0, 255, 0.5), 128);
        assert_eq!(lerp_channel(255, 0, 0.1), 230);
        assert_eq!(lerp_channel(10, 10, 0.7), 10);
    }
}
