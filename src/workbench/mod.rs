//! Palette workbench - pick a color, find its token, apply it to a preview
//!
//! The workbench holds a private copy of a theme (the preview). An operator
//! chooses a target role, picks a color from the wheel, the token grid or the
//! quick text buttons, inspects the nearest palette token, and applies the
//! pick to the preview. Applying returns the utility class for the pick so it
//! can be copied into markup.
//!
//! # Example
//!
//! ```rust
//! use theme_workbench::theme::registry::{SemanticRole, ThemeRegistry};
//! use theme_workbench::workbench::PaletteWorkbench;
//!
//! let base = ThemeRegistry::builtin().get("maritime").cloned().unwrap();
//! let mut bench = PaletteWorkbench::new(base);
//! bench.select_target(SemanticRole::Primary);
//! bench.pick_hex("#2563eb").unwrap();
//! assert_eq!(bench.apply().as_deref(), Some("bg-blue-600"));
//! ```

use crate::color::palette::{NearestToken, PaletteIndex, PaletteToken, UtilityUsage};
use crate::color::space::{apply_hsv_offset, get_hsv_offset, hex_to_rgb, Rgb};
use crate::core::error::Result;
use crate::theme::projector::{DocumentRoot, ThemeCssProjector};
use crate::theme::registry::{RoleValue, SemanticRole, ThemeDefinition};
use log::{debug, info};
use std::fmt;

/// Quick text color buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickText {
    White,
    /// stone-900
    Dark,
}

/// Which utility prefix suits a role
pub fn usage_for(role: SemanticRole) -> UtilityUsage {
    match role {
        SemanticRole::Text | SemanticRole::TextMuted => UtilityUsage::Text,
        SemanticRole::Border => UtilityUsage::Border,
        _ => UtilityUsage::Background,
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The current pick
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Canonical `#rrggbb`
    pub hex: String,
    pub rgb: Rgb,
    /// Set when the pick came from the token grid
    pub token: Option<PaletteToken>,
    pub nearest: Option<NearestToken>,
}

impl Selection {
    fn new(rgb: Rgb, token: Option<PaletteToken>, palette: &PaletteIndex) -> Self {
        Self {
            hex: rgb.to_hex(),
            rgb,
            token,
            nearest: palette.nearest_token(rgb),
        }
    }

    /// Token matching the pick exactly, if any
    pub fn exact_token(&self) -> Option<PaletteToken> {
        self.token.or_else(|| {
            self.nearest
                .as_ref()
                .filter(|nearest| nearest.distance == 0.0)
                .map(|nearest| nearest.token)
        })
    }

    /// Utility class for the pick
    ///
    /// Exact tokens and pure white/black get their own class; anything else
    /// falls back to the nearest token.
    pub fn utility_class(&self, usage: UtilityUsage) -> Option<String> {
        if let Some(token) = self.exact_token() {
            return Some(token.utility_class(usage));
        }
        match self.rgb {
            Rgb::WHITE => Some(format!("{}-white", usage.prefix())),
            Rgb::BLACK => Some(format!("{}-black", usage.prefix())),
            _ => self
                .nearest
                .as_ref()
                .map(|nearest| nearest.token.utility_class(usage)),
        }
    }

    fn role_value(&self) -> RoleValue {
        match self.exact_token() {
            Some(token) => RoleValue::Token(token),
            None => RoleValue::Literal(self.hex.clone()),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)?;
        if let Some(nearest) = &self.nearest {
            write!(f, " (nearest {}, distance {:.2})", nearest.token, nearest.distance)?;
        }
        Ok(())
    }
}

// =============================================================================
// Workbench
// =============================================================================

#[derive(Debug, Clone)]
pub struct PaletteWorkbench {
    projector: ThemeCssProjector,
    preview: ThemeDefinition,
    target: SemanticRole,
    selection: Option<Selection>,
}

impl PaletteWorkbench {
    /// Workbench previewing a copy of `base`, targeting the background role
    pub fn new(base: ThemeDefinition) -> Self {
        Self {
            projector: ThemeCssProjector::new(),
            preview: base,
            target: SemanticRole::Background,
            selection: None,
        }
    }

    pub fn target(&self) -> SemanticRole {
        self.target
    }

    pub fn select_target(&mut self, role: SemanticRole) {
        debug!("Workbench target: {}", role);
        self.target = role;
    }

    /// Pick an arbitrary color, e.g. a wheel emission
    pub fn pick_hex(&mut self, hex: &str) -> Result<&Selection> {
        let rgb = hex_to_rgb(hex)?;
        Ok(self.select(Selection::new(rgb, None, self.projector.palette())))
    }

    /// Pick a cell of the token grid
    pub fn pick_token(&mut self, token: PaletteToken) -> &Selection {
        let palette = self.projector.palette();
        // table values are valid hex
        let rgb = hex_to_rgb(palette.resolve(&token)).unwrap_or_default();
        self.select(Selection::new(rgb, Some(token), palette))
    }

    /// Quick text color; also targets the text role
    pub fn pick_quick_text(&mut self, choice: QuickText) -> &Selection {
        self.target = SemanticRole::Text;
        let rgb = match choice {
            QuickText::White => Rgb::WHITE,
            QuickText::Dark => Rgb::new(0x1c, 0x19, 0x17),
        };
        self.select(Selection::new(rgb, None, self.projector.palette()))
    }

    fn select(&mut self, selection: Selection) -> &Selection {
        debug!("Workbench selection: {}", selection);
        self.selection.insert(selection)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    /// Write the selection into the preview's target role
    ///
    /// Returns the utility class to copy, or `None` without a selection.
    pub fn apply(&mut self) -> Option<String> {
        let selection = self.selection.as_ref()?;
        let value = selection.role_value();
        let class = selection.utility_class(usage_for(self.target));

        info!("Applied {} to {} of '{}'", value, self.target, self.preview.id);
        self.preview.colors.set(self.target, value);
        class
    }

    pub fn preview(&self) -> &ThemeDefinition {
        &self.preview
    }

    /// Replace the preview theme; the selection is kept
    pub fn set_preview(&mut self, theme: ThemeDefinition) {
        self.preview = theme;
    }

    /// `:root` block for the preview theme
    pub fn preview_css(&self) -> Result<String> {
        let mut root = DocumentRoot::new();
        self.projector.project(&self.preview, &mut root)?;
        Ok(root.to_css())
    }

    /// A copy of the preview with the `from -> to` HSV shift applied to every role
    ///
    /// All roles of the result are literal hex colors.
    pub fn retint(&self, from_hex: &str, to_hex: &str) -> Result<ThemeDefinition> {
        let offset = get_hsv_offset(from_hex, to_hex)?;
        let resolved = self.projector.resolve(&self.preview)?;

        let mut variant = self.preview.clone();
        variant.id = format!("{}-retint", self.preview.id);
        variant.name = format!("{} (retinted)", self.preview.name);
        for role in SemanticRole::ALL {
            let shifted = apply_hsv_offset(resolved.get(role), &offset)?;
            variant.colors.set(role, RoleValue::Literal(shifted));
        }

        info!("Retinted '{}' by {}", self.preview.id, offset);
        Ok(variant)
    }

    pub fn export_json(&self) -> String {
        self.preview.to_json_pretty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::{PaletteFamily, Shade};
    use crate::theme::registry::ThemeRegistry;

    fn bench() -> PaletteWorkbench {
        PaletteWorkbench::new(ThemeRegistry::builtin().get("maritime").cloned().unwrap())
    }

    #[test]
    fn test_pick_hex_finds_nearest() {
        let mut bench = bench();
        let selection = bench.pick_hex("#2664ea").unwrap().clone();
        let nearest = selection.nearest.as_ref().unwrap();
        assert_eq!(nearest.token.to_string(), "blue-600");
        assert!(nearest.distance > 0.0);
        assert_eq!(selection.exact_token(), None);
    }

    #[test]
    fn test_pick_hex_rejects_bad_input() {
        let mut bench = bench();
        assert!(bench.pick_hex("#12").is_err());
        assert!(bench.selection().is_none());
    }

    #[test]
    fn test_apply_exact_pick_stores_token() {
        let mut bench = bench();
        bench.select_target(SemanticRole::Accent);
        bench.pick_token(PaletteToken::new(PaletteFamily::Rose, Shade::S500));

        assert_eq!(bench.apply().as_deref(), Some("bg-rose-500"));
        assert_eq!(
            bench.preview().colors.accent,
            RoleValue::Token(PaletteToken::new(PaletteFamily::Rose, Shade::S500))
        );
    }

    #[test]
    fn test_apply_inexact_pick_stores_literal() {
        let mut bench = bench();
        bench.select_target(SemanticRole::Border);
        bench.pick_hex("#2664ea").unwrap();

        assert_eq!(bench.apply().as_deref(), Some("border-blue-600"));
        assert_eq!(bench.preview().colors.border, RoleValue::hex("#2664ea"));
    }

    #[test]
    fn test_quick_text() {
        let mut bench = bench();
        bench.pick_quick_text(QuickText::White);
        assert_eq!(bench.target(), SemanticRole::Text);
        assert_eq!(bench.apply().as_deref(), Some("text-white"));

        bench.pick_quick_text(QuickText::Dark);
        assert_eq!(bench.apply().as_deref(), Some("text-stone-900"));
        assert_eq!(bench.preview().colors.text.to_string(), "stone-900");
    }

    #[test]
    fn test_clear_and_apply_without_selection() {
        let mut bench = bench();
        bench.pick_hex("#ffffff").unwrap();
        bench.clear();
        let before = bench.preview().clone();
        assert_eq!(bench.apply(), None);
        assert_eq!(bench.preview(), &before);
    }

    #[test]
    fn test_preview_css_reflects_apply() {
        let mut bench = bench();
        bench.select_target(SemanticRole::Primary);
        bench.pick_hex("#123456").unwrap();
        bench.apply();

        let css = bench.preview_css().unwrap();
        assert!(css.contains("--theme-primary: #123456;"));
        assert!(css.starts_with(":root {"));
    }

    #[test]
    fn test_retint_moves_every_role() {
        let bench = bench();
        let variant = bench.retint("#2563eb", "#2563eb").unwrap();
        assert_eq!(variant.id, "maritime-retint");

        // identity shift keeps colors
        let resolved = ThemeCssProjector::new().resolve(bench.preview()).unwrap();
        for (role, value) in variant.colors.iter() {
            assert_eq!(value.to_string(), resolved.get(role));
        }

        let shifted = bench.retint("#ff0000", "#00ff00").unwrap();
        assert_ne!(shifted.colors.primary, variant.colors.primary);
        assert!(shifted.colors.iter().all(|(_, v)| v.as_token().is_none()));
    }

    #[test]
    fn test_export_json() {
        let bench = bench();
        let json = bench.export_json();
        assert_eq!(ThemeDefinition::from_json(&json).unwrap(), *bench.preview());
    }
}
