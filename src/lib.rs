//! Theme Workbench Library
//!
//! A color engine for design-token driven themes: hex/RGB/HSV conversion,
//! nearest palette token search, an HSV color wheel, and live theme sessions
//! that publish semantic colors as style variables.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration, error types and the persisted preference store
//! - [`color`] - Color math, the token palette and the color wheel
//! - [`theme`] - Theme catalog, session state, projection and the theme context
//! - [`workbench`] - Pick colors and apply them to a preview theme
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use theme_workbench::core::store::MemoryStore;
//! use theme_workbench::theme::{
//!     DocumentRoot, ModeSignal, SessionDefaults, StyleTarget, ThemeContext, ThemeMode,
//!     ThemeRegistry, ThemeSessionState,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(ThemeRegistry::builtin());
//!     let session = ThemeSessionState::load(registry, MemoryStore::new(), SessionDefaults::default());
//!
//!     let mut signal = ModeSignal::new(ThemeMode::Light);
//!     let mut ctx = ThemeContext::new(session, DocumentRoot::new());
//!     ctx.observe(&mut signal);
//!     ctx.mount(signal.get())?;
//!
//!     // The page flips to dark mode
//!     signal.set(ThemeMode::Dark);
//!     ctx.pump_mode_events()?;
//!
//!     assert_eq!(ctx.current_theme(), "dark");
//!     assert!(ctx.target().get_property("--theme-background").is_some());
//!     Ok(())
//! }
//! ```
//!
//! # Color Math
//!
//! ```rust
//! use theme_workbench::color::palette::PaletteIndex;
//! use theme_workbench::color::space::{apply_hsv_offset, get_hsv_offset, hex_to_rgb};
//!
//! let rgb = hex_to_rgb("#2563eb").unwrap();
//! let nearest = PaletteIndex::global().nearest_token(rgb).unwrap();
//! assert_eq!(nearest.token.to_string(), "blue-600");
//!
//! let offset = get_hsv_offset("#3b82f6", "#22c55e").unwrap();
//! let shifted = apply_hsv_offset("#3b82f6", &offset).unwrap();
//! assert_eq!(shifted, "#22c55e");
//! ```

pub mod cli;
pub mod color;
pub mod core;
pub mod theme;
pub mod workbench;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
