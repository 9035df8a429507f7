//! Theme projection - semantic roles to published style variables
//!
//! [`ThemeCssProjector`] resolves the eight roles of a theme to concrete hex
//! colors and writes them to a [`StyleTarget`] as `--theme-*` variables.
//! Resolution happens before any write, so a theme with one bad role leaves
//! the target untouched.
//!
//! # Example
//!
//! ```rust
//! use theme_workbench::theme::projector::{DocumentRoot, StyleTarget, ThemeCssProjector};
//! use theme_workbench::theme::registry::ThemeRegistry;
//!
//! let registry = ThemeRegistry::builtin();
//! let mut root = DocumentRoot::new();
//! ThemeCssProjector::new()
//!     .project(registry.get("maritime").unwrap(), &mut root)
//!     .unwrap();
//! assert_eq!(root.get_property("--theme-primary").as_deref(), Some("#2563eb"));
//! ```

use crate::color::palette::PaletteIndex;
use crate::color::space::hex_to_rgb;
use crate::core::error::{ColorError, Result};
use crate::theme::registry::{RoleValue, SemanticRole, ThemeDefinition};
use log::debug;
use std::collections::BTreeMap;
use std::fmt::Write as _;

// =============================================================================
// Style targets
// =============================================================================

/// Something that holds named style variables
pub trait StyleTarget {
    fn set_property(&mut self, name: &str, value: &str);
    fn get_property(&self, name: &str) -> Option<String>;
}

/// In-memory document root variable set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    properties: BTreeMap<String, String>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render the variables as a `:root` rule
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.properties {
            let _ = writeln!(css, "  {}: {};", name, value);
        }
        css.push('}');
        css
    }
}

impl StyleTarget for DocumentRoot {
    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

// =============================================================================
// Resolved themes
// =============================================================================

/// The eight roles of one theme as concrete `#rrggbb` colors, in role order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub theme_id: String,
    colors: [String; 8],
}

impl ResolvedTheme {
    /// Resolve every role or fail on the first one that cannot be resolved
    pub fn resolve(theme: &ThemeDefinition, palette: &PaletteIndex) -> Result<Self> {
        let mut colors: [String; 8] = Default::default();

        for (slot, (role, value)) in colors.iter_mut().zip(theme.colors.iter()) {
            *slot = resolve_role(&theme.id, role, value, palette)?;
        }

        Ok(Self {
            theme_id: theme.id.clone(),
            colors,
        })
    }

    pub fn get(&self, role: SemanticRole) -> &str {
        // ALL and the array share role order
        let index = SemanticRole::ALL
            .iter()
            .position(|r| *r == role)
            .unwrap_or_default();
        &self.colors[index]
    }

    /// `(variable, hex)` pairs in role order
    pub fn variables(&self) -> impl Iterator<Item = (&'static str, &str)> {
        SemanticRole::ALL
            .iter()
            .zip(self.colors.iter())
            .map(|(role, hex)| (role.css_variable(), hex.as_str()))
    }
}

fn resolve_role(
    theme_id: &str,
    role: SemanticRole,
    value: &RoleValue,
    palette: &PaletteIndex,
) -> Result<String> {
    match value {
        RoleValue::Token(token) => Ok(palette.resolve(token).to_string()),
        RoleValue::Literal(text) => hex_to_rgb(text)
            .map(|rgb| rgb.to_hex())
            .map_err(|_| ColorError::ThemeRoleUnresolved {
                theme_id: theme_id.to_string(),
                role: role.key().to_string(),
                value: text.clone(),
            }),
    }
}

// =============================================================================
// Projector
// =============================================================================

/// Publishes theme colors as style variables
#[derive(Debug, Clone, Copy)]
pub struct ThemeCssProjector {
    palette: &'static PaletteIndex,
}

impl ThemeCssProjector {
    /// Projector over the process-wide palette
    pub fn new() -> Self {
        Self {
            palette: PaletteIndex::global(),
        }
    }

    pub fn palette(&self) -> &'static PaletteIndex {
        self.palette
    }

    pub fn resolve(&self, theme: &ThemeDefinition) -> Result<ResolvedTheme> {
        ResolvedTheme::resolve(theme, self.palette)
    }

    /// Resolve `theme` and overwrite all eight variables on `target`
    ///
    /// On error nothing is written.
    pub fn project<T: StyleTarget + ?Sized>(
        &self,
        theme: &ThemeDefinition,
        target: &mut T,
    ) -> Result<ResolvedTheme> {
        let resolved = self.resolve(theme)?;
        for (name, hex) in resolved.variables() {
            target.set_property(name, hex);
        }
        debug!("Projected theme '{}'", theme.id);
        Ok(resolved)
    }
}

impl Default for ThemeCssProjector {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
