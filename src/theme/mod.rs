//! Theme layer
//!
//! Named themes, the session that tracks the active one, and projection of
//! the active theme onto style variables.
//!
//! # Submodules
//!
//! - `registry` - theme catalog, semantic roles and light/dark tags
//! - `fonts` - the enumerated font set
//! - `session` - persisted active theme/font and mode reconciliation
//! - `projector` - role resolution and `--theme-*` variable publishing
//! - `context` - session and projector wired together for consumers

pub mod context;
pub mod fonts;
pub mod projector;
pub mod registry;
pub mod session;

pub use context::ThemeContext;
pub use fonts::FontId;
pub use projector::{DocumentRoot, ResolvedTheme, StyleTarget, ThemeCssProjector};
pub use registry::{RoleValue, SemanticRole, ThemeColors, ThemeDefinition, ThemeMode, ThemeRegistry};
pub use session::{ModeSignal, SessionDefaults, ThemeSessionState};
