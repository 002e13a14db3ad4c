//! Floating point RGB colors and the color spaces animations blend in

use crate::error::{LedError, Result};
use rand::prelude::*;

/// An sRGB color with channels nominally in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// A color in the Oklab perceptual space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Rgb {
    /// Default (unset) pixel color
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a 6 digit hex color, with or without the leading '#'
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(LedError::Color(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| LedError::Color(hex.to_string()))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// 6 digit lowercase hex without the leading '#'
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Byte channels, rounding to nearest after clamping into [0, 1]
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let c = self.clamped();
        let byte = |v: f64| (v * 255.0 + 0.5) as u8;
        (byte(c.r), byte(c.g), byte(c.b))
    }

    /// Hue in degrees, saturation and value in [0, 1]
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::new(r + m, g + m, b + m)
    }

    pub fn to_hsv(&self) -> (f64, f64, f64) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    pub fn clamped(&self) -> Self {
        let c = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    /// Multiply every channel by `k` (brightness scaling)
    pub fn scaled(&self, k: f64) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn to_oklab(&self) -> Oklab {
        let r = srgb_to_linear(self.r);
        let g = srgb_to_linear(self.g);
        let b = srgb_to_linear(self.b);

        let l = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
        let m = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
        let s = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

        Oklab {
            l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
            a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
            b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
        }
    }

    pub fn from_oklab(lab: Oklab) -> Self {
        let l = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
        let m = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
        let s = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;
        let (l, m, s) = (l * l * l, m * m * m, s * s * s);

        Self::new(
            linear_to_srgb(4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s),
            linear_to_srgb(-1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s),
            linear_to_srgb(-0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s),
        )
    }

    /// Interpolate in Oklab. `t` outside (0, 1) returns the nearest endpoint unchanged.
    pub fn blend_oklab(&self, other: Rgb, t: f64) -> Self {
        if t.is_nan() || t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return other;
        }
        let a = self.to_oklab();
        let b = other.to_oklab();
        Self::from_oklab(Oklab {
            l: a.l + (b.l - a.l) * t,
            a: a.a + (b.a - a.a) * t,
            b: a.b + (b.b - a.b) * t,
        })
        .clamped()
    }

    /// Straight per-channel interpolation
    pub fn blend_rgb(&self, other: Rgb, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Random muted color for slow moving regions
    pub fn warm<R: Rng>(rng: &mut R) -> Self {
        from_oklch(rng.gen_range(0.45..0.75), rng.gen_range(0.04..0.10), rng.gen_range(0.0..360.0))
    }

    /// Random saturated, light color
    pub fn happy<R: Rng>(rng: &mut R) -> Self {
        from_oklch(rng.gen_range(0.65..0.85), rng.gen_range(0.12..0.20), rng.gen_range(0.0..360.0))
    }
}

fn from_oklch(l: f64, chroma: f64, hue_deg: f64) -> Rgb {
    let h = hue_deg.to_radians();
    Rgb::from_oklab(Oklab { l, a: chroma * h.cos(), b: chroma * h.sin() }).clamped()
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn hex_parsing_accepts_optional_hash() {
        assert_eq!(Rgb::from_hex("ff0000").unwrap(), Rgb::RED);
        assert_eq!(Rgb::from_hex("#00ff00").unwrap(), Rgb::GREEN);
        assert_eq!(Rgb::from_hex("5c0d5c").unwrap().to_hex(), "5c0d5c");
    }

    #[test]
    fn hex_parsing_rejects_garbage() {
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("ff00").is_err());
        assert!(Rgb::from_hex("zz0000").is_err());
        assert!(Rgb::from_hex("ff00ff00").is_err());
    }

    #[test]
    fn hsv_primaries() {
        assert!(close(Rgb::from_hsv(0.0, 1.0, 1.0), Rgb::RED));
        assert!(close(Rgb::from_hsv(120.0, 1.0, 1.0), Rgb::GREEN));
        assert!(close(Rgb::from_hsv(240.0, 1.0, 1.0), Rgb::BLUE));
        assert!(close(Rgb::from_hsv(360.0, 1.0, 1.0), Rgb::RED));
        assert!(close(Rgb::from_hsv(234.0, 0.0, 0.0), Rgb::BLACK));
    }

    #[test]
    fn hsv_round_trip() {
        let c = Rgb::from_hsv(234.0, 1.0, 0.3);
        let (h, s, v) = c.to_hsv();
        assert!((h - 234.0).abs() < 1e-9);
        assert!((s - 1.0).abs() < 1e-9);
        assert!((v - 0.3).abs() < 1e-9);
    }

    #[test]
    fn oklab_round_trip_is_close() {
        for c in [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::new(0.3, 0.6, 0.9)] {
            assert!(close(Rgb::from_oklab(c.to_oklab()), c));
        }
        let white = Rgb::new(1.0, 1.0, 1.0).to_oklab();
        assert!((white.l - 1.0).abs() < 1e-6);
        assert!(white.a.abs() < 1e-6 && white.b.abs() < 1e-6);
    }

    #[test]
    fn blending_clamps_round_trip_drift() {
        let raw = Rgb::from_oklab(Rgb::GREEN.to_oklab());
        assert!(close(raw, Rgb::GREEN));
        let mid = Rgb::GREEN.blend_oklab(Rgb::GREEN, 0.5);
        for channel in [mid.r, mid.g, mid.b] {
            assert!((0.0..=1.0).contains(&channel), "channel {} escaped [0, 1]", channel);
        }
        assert!(close(mid, Rgb::GREEN));
    }

    #[test]
    fn blend_endpoints_are_exact() {
        let purple = Rgb::from_hsv(270.0, 1.0, 1.0);
        assert_eq!(Rgb::RED.blend_oklab(purple, 0.0), Rgb::RED);
        assert_eq!(Rgb::RED.blend_oklab(purple, 1.0), purple);
        assert_eq!(Rgb::RED.blend_oklab(purple, -3.0), Rgb::RED);
    }

    #[test]
    fn perceptual_midpoint_differs_from_rgb_average() {
        let purple = Rgb::from_hsv(270.0, 1.0, 1.0);
        let perceptual = Rgb::RED.blend_oklab(purple, 0.5);
        let naive = Rgb::RED.blend_rgb(purple, 0.5);
        assert!(!close(perceptual, naive));
    }

    #[test]
    fn rgb8_rounds_and_clamps() {
        assert_eq!(Rgb::new(1.5, -0.2, 0.5).to_rgb8(), (255, 0, 128));
        assert_eq!(Rgb::new(f64::NAN, 0.0, 0.0).to_rgb8(), (0, 0, 0));
    }

    #[test]
    fn random_palettes_stay_in_gamut() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            for c in [Rgb::warm(&mut rng), Rgb::happy(&mut rng)] {
                assert_eq!(c, c.clamped());
            }
        }
    }
}
