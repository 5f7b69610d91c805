//! Color helpers for map styling.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#').filter(|h| h.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear blend toward `other`, `t` in [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Sequential ramp over a value range, light for low values, dark for high.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRamp {
    low: Rgb,
    high: Rgb,
    min: f64,
    max: f64,
}

impl ColorRamp {
    /// Light (#deebf7) to dark (#08519c) blue.
    pub const LOW: Rgb = Rgb::new(0xde, 0xeb, 0xf7);
    pub const HIGH: Rgb = Rgb::new(0x08, 0x51, 0x9c);

    /// Ramp spanning the finite values, or `None` if there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values.into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self { low: Self::LOW, high: Self::HIGH, min, max })
    }

    pub fn color(&self, value: f64) -> Rgb {
        let range = if self.max > self.min { self.max - self.min } else { 1.0 };
        self.low.lerp(self.high, (value - self.min) / range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Rgb::from_hex("#1976d2").unwrap();
        assert_eq!(c, Rgb::new(0x19, 0x76, 0xd2));
        assert_eq!(c.to_hex(), "#1976d2");
        assert_eq!(c.to_string(), "rgb(25,118,210)");
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(Rgb::from_hex("#fa0"), Some(Rgb::new(0xff, 0xaa, 0x00)));
    }

    #[test]
    fn bad_hex_is_none() {
        assert_eq!(Rgb::from_hex("1976d2"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn ramp_endpoints() {
        let ramp = ColorRamp::spanning([10.0, 20.0, 30.0]).unwrap();
        assert_eq!(ramp.color(10.0), ColorRamp::LOW);
        assert_eq!(ramp.color(30.0), ColorRamp::HIGH);
        assert_eq!(ramp.color(100.0), ColorRamp::HIGH); // clamped
    }

    #[test]
    fn flat_ramp_uses_low_color() {
        let ramp = ColorRamp::spanning([5.0, 5.0]).unwrap();
        assert_eq!(ramp.color(5.0), ColorRamp::LOW);
    }

    #[test]
    fn empty_ramp_is_none() {
        assert!(ColorRamp::spanning(std::iter::empty()).is_none());
        assert!(ColorRamp::spanning([f64::NAN]).is_none());
    }
}
