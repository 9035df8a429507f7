//! Color space math - hex, RGB and HSV conversions
//!
//! Hue is in degrees `[0, 360)`, saturation and value are percentages
//! `[0, 100]`. HSV values are kept unrounded so that a full
//! hex -> RGB -> HSV -> RGB -> hex cycle lands back on the same channels;
//! use [`Hsv::rounded`] for display.
//!
//! # Example
//!
//! ```rust
//! use theme_workbench::color::space::{hex_to_rgb, rgb_to_hsv, hsv_to_hex};
//!
//! let rgb = hex_to_rgb("#3b82f6").unwrap();
//! let hsv = rgb_to_hsv(rgb.r, rgb.g, rgb.b);
//! assert_eq!(hsv.rounded(), (217, 76, 96));
//! assert_eq!(hsv_to_hex(hsv.h, hsv.s, hsv.v), "#3b82f6");
//! ```

use crate::core::error::{ColorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Rgb
// =============================================================================

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Relative luminance (0.0-1.0), unlinearized Rec. 709 weights
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Check if this color is considered "light"
    pub fn is_light(&self) -> bool {
        self.luminance() > 0.5
    }

    /// Quick text color for this background: stone-900 on light, white on dark
    pub fn contrasting_text(&self) -> Rgb {
        if self.is_light() {
            Rgb::new(0x1c, 0x19, 0x17)
        } else {
            Rgb::WHITE
        }
    }

    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.r as f64, self.g as f64, self.b as f64)
    }

    pub fn to_hsv(&self) -> Hsv {
        rgb_to_hsv(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        hex_to_rgb(s)
    }
}

// =============================================================================
// Hsv
// =============================================================================

/// HSV color: hue in degrees, saturation/value in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Integer form used for display (`h` in degrees, `s`/`v` in percent)
    pub fn rounded(&self) -> (u16, u8, u8) {
        let h = self.h.round() as u16 % 360;
        (h, self.s.round() as u8, self.v.round() as u8)
    }

    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, s, v) = self.rounded();
        write!(f, "hsv({}, {}%, {}%)", h, s, v)
    }
}

/// Difference between two colors in HSV space
///
/// The hue component is the signed shortest angular distance in `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HsvOffset {
    pub h_offset: f64,
    pub s_offset: f64,
    pub v_offset: f64,
}

impl HsvOffset {
    pub fn new(h_offset: f64, s_offset: f64, v_offset: f64) -> Self {
        Self {
            h_offset,
            s_offset,
            v_offset,
        }
    }
}

impl fmt::Display for HsvOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h {:+.1}°, s {:+.1}%, v {:+.1}%",
            self.h_offset, self.s_offset, self.v_offset
        )
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Parse a 3- or 6-digit hex color, with or without a leading `#`
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::invalid_format(hex, "contains non-hex characters"));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        n => {
            return Err(ColorError::invalid_format(
                hex,
                format!("expected 3 or 6 hex digits, found {}", n),
            ))
        }
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|e| ColorError::invalid_format(hex, e.to_string()))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Encode channels as `#rrggbb`; each channel is clamped to `[0, 255]` and rounded
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let encode = |v: f64| {
        let v = if v.is_nan() { 0.0 } else { v };
        v.round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", encode(r), encode(g), encode(b))
}

/// Max/min channel decomposition into HSV
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        let sector = (g - b) / delta;
        if g < b {
            sector + 6.0
        } else {
            sector
        }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsv::new(h * 60.0, s * 100.0, max * 100.0)
}

/// Six-sector HSV to RGB; hue wraps into `[0, 360)`, s/v are clamped to `[0, 100]`
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 100.0) / 100.0;
    let v = v.clamp(0.0, 100.0) / 100.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let to_channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_channel(r1), to_channel(g1), to_channel(b1))
}

pub fn hex_to_hsv(hex: &str) -> Result<Hsv> {
    let rgb = hex_to_rgb(hex)?;
    Ok(rgb_to_hsv(rgb.r, rgb.g, rgb.b))
}

pub fn hsv_to_hex(h: f64, s: f64, v: f64) -> String {
    hsv_to_rgb(h, s, v).to_hex()
}

/// Offset that takes `from_hex` to `to_hex` in HSV space
pub fn get_hsv_offset(from_hex: &str, to_hex: &str) -> Result<HsvOffset> {
    let from = hex_to_hsv(from_hex)?;
    let to = hex_to_hsv(to_hex)?;

    let mut dh = to.h - from.h;
    if dh > 180.0 {
        dh -= 360.0;
    }
    if dh <= -180.0 {
        dh += 360.0;
    }

    Ok(HsvOffset::new(dh, to.s - from.s, to.v - from.v))
}

/// Shift a color by an HSV offset; hue wraps, saturation and value clamp
pub fn apply_hsv_offset(hex: &str, offset: &HsvOffset) -> Result<String> {
    let hsv = hex_to_hsv(hex)?;
    let h = (hsv.h + offset.h_offset).rem_euclid(360.0);
    let s = (hsv.s + offset.s_offset).clamp(0.0, 100.0);
    let v = (hsv.v + offset.v_offset).clamp(0.0, 100.0);
    Ok(hsv_to_hex(h, s, v))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_close(a: Rgb, b: Rgb) {
        let within = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        assert!(
            within(a.r, b.r) && within(a.g, b.g) && within(a.b, b.b),
            "{} vs {}",
            a,
            b
        );
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#3b82f6").unwrap(), Rgb::new(59, 130, 246));
        assert_eq!(hex_to_rgb("3B82F6").unwrap(), Rgb::new(59, 130, 246));
    }

    #[test]
    fn test_hex_to_rgb_short() {
        assert_eq!(hex_to_rgb("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(hex_to_rgb("a1c").unwrap(), Rgb::new(0xaa, 0x11, 0xcc));
    }

    #[test]
    fn test_hex_to_rgb_rejects_bad_input() {
        for bad in ["", "#", "#12", "#1234", "#12345678", "#ggg", "#12345z", "blue"] {
            match hex_to_rgb(bad) {
                Err(ColorError::InvalidColorFormat { input, .. }) => assert_eq!(input, bad),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_rgb_to_hex_clamps_and_rounds() {
        assert_eq!(rgb_to_hex(255.0, 128.0, 0.0), "#ff8000");
        assert_eq!(rgb_to_hex(300.0, -5.0, 127.6), "#ff0080");
        assert_eq!(rgb_to_hex(0.4, 0.5, 254.5), "#0001ff");
    }

    #[test]
    fn test_rgb_to_hsv_known_value() {
        let hsv = rgb_to_hsv(59, 130, 246);
        assert_eq!(hsv.rounded(), (217, 76, 96));
        assert_eq!(hsv.to_string(), "hsv(217, 76%, 96%)");
    }

    #[test]
    fn test_rgb_to_hsv_achromatic() {
        let black = rgb_to_hsv(0, 0, 0);
        assert_eq!((black.h, black.s, black.v), (0.0, 0.0, 0.0));

        let gray = rgb_to_hsv(128, 128, 128);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
    }

    #[test]
    fn test_hsv_to_rgb_sectors() {
        assert_eq!(hsv_to_rgb(0.0, 100.0, 100.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(60.0, 100.0, 100.0), Rgb::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(180.0, 100.0, 100.0), Rgb::new(0, 255, 255));
        assert_eq!(hsv_to_rgb(240.0, 100.0, 100.0), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(300.0, 100.0, 100.0), Rgb::new(255, 0, 255));
    }

    #[test]
    fn test_hsv_to_rgb_wraps_hue() {
        assert_eq!(hsv_to_rgb(360.0, 100.0, 100.0), hsv_to_rgb(0.0, 100.0, 100.0));
        assert_eq!(hsv_to_rgb(-120.0, 100.0, 100.0), hsv_to_rgb(240.0, 100.0, 100.0));
        assert_eq!(hsv_to_rgb(725.0, 50.0, 50.0), hsv_to_rgb(5.0, 50.0, 50.0));
    }

    #[test]
    fn test_hex_roundtrip_sampled() {
        let mut rng = StdRng::seed_from_u64(0x3b82f6);
        for _ in 0..2000 {
            let rgb = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            let hex = rgb.to_hex();
            assert_eq!(hex_to_rgb(&hex).unwrap().to_hex(), hex);

            let hsv = rgb_to_hsv(rgb.r, rgb.g, rgb.b);
            assert_close(hsv_to_rgb(hsv.h, hsv.s, hsv.v), rgb);
        }
    }

    #[test]
    fn test_hsv_hex_composition() {
        let hsv = hex_to_hsv("#3b82f6").unwrap();
        assert_eq!(hsv_to_hex(hsv.h, hsv.s, hsv.v), "#3b82f6");
    }

    #[test]
    fn test_hsv_offset_shortest_hue() {
        // red (0°) to magenta-ish (300°) should go backwards by 60°
        let offset = get_hsv_offset("#ff0000", "#ff00ff").unwrap();
        assert!((offset.h_offset + 60.0).abs() < 1e-9);

        let offset = get_hsv_offset("#ff00ff", "#ff0000").unwrap();
        assert!((offset.h_offset - 60.0).abs() < 1e-9);

        // exactly opposite hues land on +180, never -180
        let offset = get_hsv_offset("#ff0000", "#00ffff").unwrap();
        assert!((offset.h_offset - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_offset_reproduces_target_sampled() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let a = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            let b = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            let offset = get_hsv_offset(&a.to_hex(), &b.to_hex()).unwrap();
            let shifted = apply_hsv_offset(&a.to_hex(), &offset).unwrap();
            assert_close(hex_to_rgb(&shifted).unwrap(), b);
        }
    }

    #[test]
    fn test_apply_offset_clamps_saturation_and_value() {
        let offset = HsvOffset::new(0.0, 80.0, 80.0);
        let shifted = apply_hsv_offset("#3b82f6", &offset).unwrap();
        let hsv = hex_to_hsv(&shifted).unwrap();
        assert!((hsv.s - 100.0).abs() < 0.5);
        assert!((hsv.v - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_apply_offset_rejects_bad_hex() {
        assert!(apply_hsv_offset("nope", &HsvOffset::default()).is_err());
        assert!(get_hsv_offset("#fff", "#12").is_err());
    }

    #[test]
    fn test_distance_and_contrasting_text() {
        assert_eq!(Rgb::BLACK.distance(&Rgb::BLACK), 0.0);
        assert!((Rgb::new(3, 4, 0).distance(&Rgb::BLACK) - 5.0).abs() < 1e-9);
        assert_eq!(Rgb::WHITE.contrasting_text().to_hex(), "#1c1917");
        assert_eq!(Rgb::BLACK.contrasting_text(), Rgb::WHITE);
    }

    #[test]
    fn test_rgb_from_str() {
        let rgb: Rgb = "#2563eb".parse().unwrap();
        assert_eq!(rgb, Rgb::new(37, 99, 235));
        assert!("#25".parse::<Rgb>().is_err());
    }
}
