//! Color wheel surface - an HSV disc picker
//!
//! Each pixel's polar coordinates around the disc center encode a color:
//! the angle is the hue and the normalized radius is the saturation, with
//! value held at 100%. Pixels outside the disc are fully transparent.
//!
//! Angle convention: `atan2(dy, dx)` in screen coordinates (y grows
//! downward), wrapped into `[0, 360)`. Hue 0° points right and hue increases
//! clockwise on screen. Rendering and pointer sampling share this mapping.
//!
//! # Example
//!
//! ```rust
//! use theme_workbench::color::wheel::{ColorWheel, WheelInteraction};
//!
//! let wheel = ColorWheel::new(260);
//! assert_eq!(wheel.color_at(130.0, 130.0), "#ffffff");
//!
//! let mut interaction = WheelInteraction::new(wheel, |hex: &str| {
//!     println!("picked {}", hex);
//! });
//! interaction.press(250.0, 130.0);
//! interaction.drag(400.0, 130.0); // outside the canvas, still tracked
//! interaction.release();
//! assert_eq!(interaction.last_color(), Some("#ff0000"));
//! ```

use crate::color::space::{hsv_to_rgb, Rgb};
use log::debug;
use std::path::Path;

/// Default CSS-pixel diameter
pub const DEFAULT_WHEEL_SIZE: u32 = 220;

/// Largest accepted CSS-pixel diameter
pub const MAX_WHEEL_SIZE: u32 = 4096;

/// Largest backing raster side, in device pixels
pub const MAX_DEVICE_SIZE: u32 = 8192;

// =============================================================================
// Samples and pixel buffers
// =============================================================================

/// Pointer-derived hue/saturation pair; never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueSaturationSample {
    /// Hue in degrees `[0, 360)`
    pub hue: f64,
    /// Normalized distance from center, clamped to `[0, 1]`
    pub radius: f64,
}

impl HueSaturationSample {
    /// Saturation in percent
    pub fn saturation(&self) -> f64 {
        self.radius * 100.0
    }

    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(self.hue, self.saturation(), 100.0)
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }
}

/// RGBA8 raster, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Zeroed raster; an unaddressable size yields an empty 0x0 buffer
    fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        match len {
            Some(len) => Self {
                width,
                height,
                data: vec![0; len],
            },
            None => Self {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        }
    }

    /// RGBA of one pixel, `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Write the buffer as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }
}

// =============================================================================
// Color wheel
// =============================================================================

/// Fixed-size polar color picker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorWheel {
    /// Diameter in CSS pixels
    size: u32,
    /// Device pixels per CSS pixel
    pixel_ratio: f64,
}

impl ColorWheel {
    /// Wheel of `size` CSS pixels, clamped into `1..=MAX_WHEEL_SIZE`
    pub fn new(size: u32) -> Self {
        Self {
            size: size.clamp(1, MAX_WHEEL_SIZE),
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Side of the backing raster in device pixels
    ///
    /// Capped at `MAX_DEVICE_SIZE`; a capped wheel renders at a lower density.
    pub fn device_size(&self) -> u32 {
        (self.size as f64 * self.pixel_ratio)
            .round()
            .clamp(1.0, MAX_DEVICE_SIZE as f64) as u32
    }

    /// Device pixels per CSS pixel actually used by the raster
    fn render_scale(&self) -> f64 {
        self.pixel_ratio
            .min(MAX_DEVICE_SIZE as f64 / self.size as f64)
    }

    /// Disc radius in CSS pixels, one pixel inside the canvas edge
    pub fn radius(&self) -> f64 {
        (self.size as f64 / 2.0 - 1.0).max(1.0)
    }

    fn hue_of(dx: f64, dy: f64) -> f64 {
        let hue = dy.atan2(dx).to_degrees().rem_euclid(360.0);
        // rem_euclid can return exactly 360.0 for tiny negative inputs
        if hue >= 360.0 {
            0.0
        } else {
            hue
        }
    }

    /// Render the disc into a fresh raster
    ///
    /// Runs once per size change, never per pointer event.
    pub fn render(&self) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(self.device_size(), self.device_size());
        let side = buffer.width;

        let center = side as f64 / 2.0;
        let radius = self.radius() * self.render_scale();

        for y in 0..buffer.height {
            for x in 0..buffer.width {
                let dx = x as f64 - center;
                let dy = y as f64 - center;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist <= radius {
                    let sample = HueSaturationSample {
                        hue: Self::hue_of(dx, dy),
                        radius: dist / radius,
                    };
                    let rgb = sample.to_rgb();
                    buffer.put(x, y, [rgb.r, rgb.g, rgb.b, 255]);
                }
            }
        }

        debug!(
            "Rendered {}x{} color wheel ({} opaque pixels)",
            side,
            side,
            buffer.opaque_pixels()
        );
        buffer
    }

    /// Map a pointer position (CSS pixels, canvas-relative) to hue/saturation
    ///
    /// Positions beyond the disc, including outside the canvas, clamp to the rim.
    pub fn sample(&self, x: f64, y: f64) -> HueSaturationSample {
        let center = self.size as f64 / 2.0;
        let dx = x - center;
        let dy = y - center;
        let dist = (dx * dx + dy * dy).sqrt();

        HueSaturationSample {
            hue: Self::hue_of(dx, dy),
            radius: (dist / self.radius()).clamp(0.0, 1.0),
        }
    }

    /// Hex color under a pointer position
    pub fn color_at(&self, x: f64, y: f64) -> String {
        self.sample(x, y).to_hex()
    }
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_SIZE)
    }
}

// =============================================================================
// Pointer interaction
// =============================================================================

/// Pointer input, mouse and touch alike
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

/// Press/drag/release gesture over a [`ColorWheel`]
///
/// While pressed, every move is captured even outside the canvas bounds.
/// Each emission is a latest-wins signal; nothing is queued.
pub struct WheelInteraction {
    wheel: ColorWheel,
    listener: Box<dyn FnMut(&str)>,
    pressed: bool,
    last_color: Option<String>,
}

impl WheelInteraction {
    pub fn new<F>(wheel: ColorWheel, listener: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        Self {
            wheel,
            listener: Box::new(listener),
            pressed: false,
            last_color: None,
        }
    }

    pub fn wheel(&self) -> &ColorWheel {
        &self.wheel
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last color emitted, if any
    pub fn last_color(&self) -> Option<&str> {
        self.last_color.as_deref()
    }

    fn emit(&mut self, x: f64, y: f64) -> String {
        let sample = self.wheel.sample(x, y);
        let hex = sample.to_hex();
        debug!(
            "Wheel sample at ({:.1}, {:.1}): hue {:.1}, radius {:.3} -> {}",
            x, y, sample.hue, sample.radius, hex
        );
        (self.listener)(&hex);
        self.last_color = Some(hex.clone());
        hex
    }

    /// Start a gesture and emit the color under the pointer
    pub fn press(&mut self, x: f64, y: f64) -> String {
        self.pressed = true;
        self.emit(x, y)
    }

    /// Continue a gesture; ignored unless pressed
    pub fn drag(&mut self, x: f64, y: f64) -> Option<String> {
        if !self.pressed {
            return None;
        }
        Some(self.emit(x, y))
    }

    /// End the gesture
    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Dispatch a raw pointer event
    pub fn handle(&mut self, event: PointerEvent) -> Option<String> {
        match event {
            PointerEvent::Down { x, y } => Some(self.press(x, y)),
            PointerEvent::Move { x, y } => self.drag(x, y),
            PointerEvent::Up => {
                self.release();
                None
            }
        }
    }
}

impl std::fmt::Debug for WheelInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelInteraction")
            .field("wheel", &self.wheel)
            .field("pressed", &self.pressed)
            .field("last_color", &self.last_color)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
