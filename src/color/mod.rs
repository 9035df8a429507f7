//! Color engine
//!
//! Pure color math, the design-token palette and the color wheel surface.
//! Nothing here performs I/O apart from [`wheel::PixelBuffer::save_png`].
//!
//! # Submodules
//!
//! - `space` - hex/RGB/HSV conversions and reversible HSV offsets
//! - `palette` - the 22 × 11 token palette and nearest-token search
//! - `wheel` - HSV disc rendering and pointer sampling

pub mod palette;
pub mod space;
pub mod wheel;

pub use palette::{NearestToken, PaletteFamily, PaletteIndex, PaletteToken, Shade, UtilityUsage};
pub use space::{Hsv, HsvOffset, Rgb};
pub use wheel::{ColorWheel, HueSaturationSample, PixelBuffer, PointerEvent, WheelInteraction};
