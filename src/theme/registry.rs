//! Theme registry - the static catalog of named themes
//!
//! Every theme has the same shape: an id, display text, a light/dark tag and
//! exactly eight semantic color roles. Role values are palette token
//! references (`"blue-600"`) or literal hex colors (`"#ffffff"`).

use crate::color::palette::{PaletteIndex, PaletteToken};
use crate::core::error::Result;
use crate::theme::projector::ResolvedTheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Theme Mode
// =============================================================================

/// Theme mode - dark or light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light mode (site default)
    #[default]
    Light,
    /// Dark mode
    Dark,
}

impl ThemeMode {
    /// Toggle between dark and light mode
    pub fn toggle(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown mode '{}', expected light or dark", other)),
        }
    }
}

// =============================================================================
// Semantic roles
// =============================================================================

/// Abstract color slot whose concrete color depends on the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticRole {
    Primary,
    Secondary,
    Accent,
    Background,
    Surface,
    Text,
    TextMuted,
    Border,
}

impl SemanticRole {
    pub const ALL: [SemanticRole; 8] = [
        SemanticRole::Primary,
        SemanticRole::Secondary,
        SemanticRole::Accent,
        SemanticRole::Background,
        SemanticRole::Surface,
        SemanticRole::Text,
        SemanticRole::TextMuted,
        SemanticRole::Border,
    ];

    /// Name as used in theme files
    pub fn key(&self) -> &'static str {
        match self {
            SemanticRole::Primary => "primary",
            SemanticRole::Secondary => "secondary",
            SemanticRole::Accent => "accent",
            SemanticRole::Background => "background",
            SemanticRole::Surface => "surface",
            SemanticRole::Text => "text",
            SemanticRole::TextMuted => "textMuted",
            SemanticRole::Border => "border",
        }
    }

    /// Style variable published for this role
    pub fn css_variable(&self) -> &'static str {
        match self {
            SemanticRole::Primary => "--theme-primary",
            SemanticRole::Secondary => "--theme-secondary",
            SemanticRole::Accent => "--theme-accent",
            SemanticRole::Background => "--theme-background",
            SemanticRole::Surface => "--theme-surface",
            SemanticRole::Text => "--theme-text",
            SemanticRole::TextMuted => "--theme-text-muted",
            SemanticRole::Border => "--theme-border",
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SemanticRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], "").to_lowercase();
        SemanticRole::ALL
            .iter()
            .copied()
            .find(|role| role.key().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

// =============================================================================
// Role values
// =============================================================================

/// Value assigned to a role: a palette token or a literal color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleValue {
    Token(PaletteToken),
    /// Literal color text, expected to be hex; checked when resolved
    Literal(String),
}

impl RoleValue {
    pub fn hex(hex: impl Into<String>) -> Self {
        RoleValue::Literal(hex.into())
    }

    pub fn as_token(&self) -> Option<&PaletteToken> {
        match self {
            RoleValue::Token(token) => Some(token),
            RoleValue::Literal(_) => None,
        }
    }
}

impl fmt::Display for RoleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleValue::Token(token) => write!(f, "{}", token),
            RoleValue::Literal(text) => f.write_str(text),
        }
    }
}

impl From<&str> for RoleValue {
    fn from(value: &str) -> Self {
        match value.parse::<PaletteToken>() {
            Ok(token) => RoleValue::Token(token),
            Err(_) => RoleValue::Literal(value.trim().to_string()),
        }
    }
}

impl From<String> for RoleValue {
    fn from(value: String) -> Self {
        RoleValue::from(value.as_str())
    }
}

impl From<RoleValue> for String {
    fn from(value: RoleValue) -> String {
        value.to_string()
    }
}

impl From<PaletteToken> for RoleValue {
    fn from(token: PaletteToken) -> Self {
        RoleValue::Token(token)
    }
}

// =============================================================================
// Theme definitions
// =============================================================================

/// The eight role assignments of a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: RoleValue,
    pub secondary: RoleValue,
    pub accent: RoleValue,
    pub background: RoleValue,
    pub surface: RoleValue,
    pub text: RoleValue,
    pub text_muted: RoleValue,
    pub border: RoleValue,
}

impl ThemeColors {
    /// Build from role values in [`SemanticRole::ALL`] order
    pub fn from_values<V: Into<RoleValue>>(values: [V; 8]) -> Self {
        let [primary, secondary, accent, background, surface, text, text_muted, border]: [RoleValue;
            8] = values.map(Into::into);
        Self {
            primary,
            secondary,
            accent,
            background,
            surface,
            text,
            text_muted,
            border,
        }
    }

    pub fn get(&self, role: SemanticRole) -> &RoleValue {
        match role {
            SemanticRole::Primary => &self.primary,
            SemanticRole::Secondary => &self.secondary,
            SemanticRole::Accent => &self.accent,
            SemanticRole::Background => &self.background,
            SemanticRole::Surface => &self.surface,
            SemanticRole::Text => &self.text,
            SemanticRole::TextMuted => &self.text_muted,
            SemanticRole::Border => &self.border,
        }
    }

    pub fn set(&mut self, role: SemanticRole, value: RoleValue) {
        let slot = match role {
            SemanticRole::Primary => &mut self.primary,
            SemanticRole::Secondary => &mut self.secondary,
            SemanticRole::Accent => &mut self.accent,
            SemanticRole::Background => &mut self.background,
            SemanticRole::Surface => &mut self.surface,
            SemanticRole::Text => &mut self.text,
            SemanticRole::TextMuted => &mut self.text_muted,
            SemanticRole::Border => &mut self.border,
        };
        *slot = value;
    }

    /// Role/value pairs in role order
    pub fn iter(&self) -> impl Iterator<Item = (SemanticRole, &RoleValue)> {
        SemanticRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// A named theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub mode: ThemeMode,
    pub colors: ThemeColors,
}

impl ThemeDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        mode: ThemeMode,
        colors: ThemeColors,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            mode,
            colors,
        }
    }

    /// Pretty JSON export
    pub fn to_json_pretty(&self) -> String {
        // Plain strings and enums only; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Ordered, immutable catalog of themes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRegistry {
    themes: Vec<ThemeDefinition>,
}

/// Built-in light theme used when nothing valid is persisted
pub const DEFAULT_LIGHT_THEME: &str = "maritime";
/// Built-in dark theme used when nothing valid is persisted
pub const DEFAULT_DARK_THEME: &str = "dark";

impl ThemeRegistry {
    /// Catalog from explicit definitions; later duplicates of an id are dropped
    pub fn from_themes(themes: Vec<ThemeDefinition>) -> Self {
        let mut unique: Vec<ThemeDefinition> = Vec::with_capacity(themes.len());
        for theme in themes {
            if unique.iter().any(|t| t.id == theme.id) {
                log::warn!("Duplicate theme id '{}' ignored", theme.id);
                continue;
            }
            unique.push(theme);
        }
        Self { themes: unique }
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        use ThemeMode::{Dark, Light};

        Self::from_themes(vec![
            ThemeDefinition::new(
                "maritime",
                "Maritime",
                "Crisp harbor blues on a bright slate canvas",
                Light,
                ThemeColors::from_values([
                    "blue-600", "sky-500", "amber-500", "slate-50", "#ffffff", "slate-900",
                    "slate-600", "slate-200",
                ]),
            ),
            ThemeDefinition::new(
                "forest",
                "Forest",
                "Deep greens and warm stone neutrals",
                Light,
                ThemeColors::from_values([
                    "emerald-700", "lime-600", "amber-600", "stone-50", "#ffffff", "stone-900",
                    "stone-600", "stone-200",
                ]),
            ),
            ThemeDefinition::new(
                "sunset",
                "Sunset",
                "Orange and rose highlights over a soft peach background",
                Light,
                ThemeColors::from_values([
                    "orange-600", "rose-500", "violet-600", "orange-50", "#ffffff", "stone-900",
                    "stone-600", "orange-200",
                ]),
            ),
            ThemeDefinition::new(
                "dark",
                "Dark",
                "Low-glare slate with bright blue accents",
                Dark,
                ThemeColors::from_values([
                    "blue-500", "indigo-400", "cyan-400", "slate-950", "slate-900", "slate-100",
                    "slate-400", "slate-800",
                ]),
            ),
            ThemeDefinition::new(
                "midnight",
                "Midnight",
                "Violet and fuchsia on near-black zinc",
                Dark,
                ThemeColors::from_values([
                    "violet-500", "fuchsia-500", "sky-400", "zinc-950", "zinc-900", "zinc-100",
                    "zinc-400", "zinc-800",
                ]),
            ),
            ThemeDefinition::new(
                "ember",
                "Ember",
                "Glowing orange and red over charred stone",
                Dark,
                ThemeColors::from_values([
                    "orange-500", "red-500", "yellow-400", "stone-950", "stone-900", "stone-100",
                    "stone-400", "stone-800",
                ]),
            ),
        ])
    }

    /// Catalog extended with one more theme (replacing an existing id)
    pub fn with_theme(mut self, theme: ThemeDefinition) -> Self {
        match self.themes.iter_mut().find(|t| t.id == theme.id) {
            Some(existing) => *existing = theme,
            None => self.themes.push(theme),
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDefinition> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Check that `id` exists and carries the given light/dark tag
    pub fn has_mode(&self, id: &str, mode: ThemeMode) -> bool {
        self.get(id).is_some_and(|theme| theme.mode == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|theme| theme.id.as_str())
    }

    /// Themes tagged with one mode
    pub fn for_mode(&self, mode: ThemeMode) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.iter().filter(move |theme| theme.mode == mode)
    }

    /// Built-in fallback theme id for a mode
    pub fn default_for(mode: ThemeMode) -> &'static str {
        match mode {
            ThemeMode::Light => DEFAULT_LIGHT_THEME,
            ThemeMode::Dark => DEFAULT_DARK_THEME,
        }
    }

    /// Resolve every role of every theme against the palette
    pub fn validate(&self, palette: &PaletteIndex) -> Result<()> {
        for theme in &self.themes {
            ResolvedTheme::resolve(theme, palette)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::{PaletteFamily, Shade};

    #[test]
    fn test_builtin_defaults_exist_with_matching_tags() {
        let registry = ThemeRegistry::builtin();
        assert!(registry.has_mode(DEFAULT_LIGHT_THEME, ThemeMode::Light));
        assert!(registry.has_mode(DEFAULT_DARK_THEME, ThemeMode::Dark));
        assert!(registry.for_mode(ThemeMode::Light).count() >= 2);
        assert!(registry.for_mode(ThemeMode::Dark).count() >= 2);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = ThemeRegistry::builtin();
        let mut ids: Vec<&str> = registry.ids().collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_role_value_parsing() {
        assert_eq!(
            RoleValue::from("blue-600"),
            RoleValue::Token(PaletteToken::new(PaletteFamily::Blue, Shade::S600))
        );
        assert_eq!(RoleValue::from("#ffffff"), RoleValue::hex("#ffffff"));
        // unknown shades stay literal and fail later, at resolution
        assert_eq!(RoleValue::from("blue-650"), RoleValue::hex("blue-650"));
    }

    #[test]
    fn test_theme_colors_roles_in_order() {
        let theme = ThemeRegistry::builtin().get("maritime").cloned().unwrap();
        let roles: Vec<SemanticRole> = theme.colors.iter().map(|(role, _)| role).collect();
        assert_eq!(roles, SemanticRole::ALL.to_vec());
        assert_eq!(theme.colors.get(SemanticRole::TextMuted).to_string(), "slate-600");
    }

    #[test]
    fn test_theme_colors_set() {
        let mut colors = ThemeRegistry::builtin().get("dark").unwrap().colors.clone();
        colors.set(SemanticRole::Accent, RoleValue::hex("#123456"));
        assert_eq!(colors.accent, RoleValue::hex("#123456"));
    }

    #[test]
    fn test_theme_json_shape() {
        let theme = ThemeRegistry::builtin().get("maritime").cloned().unwrap();
        let json = theme.to_json_pretty();
        assert!(json.contains(r#""type": "light""#));
        assert!(json.contains(r#""textMuted": "slate-600""#));
        assert!(json.contains(r##""surface": "#ffffff""##));

        let back = ThemeDefinition::from_json(&json).unwrap();
        assert_eq!(back, theme);
    }

    #[test]
    fn test_theme_json_requires_all_roles() {
        let json = r##"{
            "id": "partial", "name": "Partial", "description": "", "type": "dark",
            "colors": { "primary": "blue-500", "secondary": "blue-400" }
        }"##;
        assert!(ThemeDefinition::from_json(json).is_err());
    }

    #[test]
    fn test_registry_with_theme_replaces() {
        let mut custom = ThemeRegistry::builtin().get("dark").cloned().unwrap();
        custom.name = "Custom Dark".to_string();
        let registry = ThemeRegistry::builtin().with_theme(custom);
        assert_eq!(registry.len(), ThemeRegistry::builtin().len());
        assert_eq!(registry.get("dark").unwrap().name, "Custom Dark");
    }

    #[test]
    fn test_builtin_catalog_resolves() {
        let registry = ThemeRegistry::builtin();
        assert!(registry.validate(PaletteIndex::global()).is_ok());
        assert_eq!(ThemeRegistry::default_for(ThemeMode::Dark), DEFAULT_DARK_THEME);
    }

    #[test]
    fn test_validate_reports_bad_literal() {
        let mut theme = ThemeRegistry::builtin().get("forest").cloned().unwrap();
        theme.colors.set(SemanticRole::Primary, RoleValue::hex("green"));
        let registry = ThemeRegistry::builtin().with_theme(theme);
        assert!(registry.validate(PaletteIndex::global()).is_err());
    }

    #[test]
    fn test_registry_drops_duplicate_ids() {
        let theme = ThemeRegistry::builtin().get("dark").cloned().unwrap();
        let registry = ThemeRegistry::from_themes(vec![theme.clone(), theme]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mode_and_role_parsing() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert!("dim".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);

        assert_eq!("text-muted".parse::<SemanticRole>().unwrap(), SemanticRole::TextMuted);
        assert_eq!("textMuted".parse::<SemanticRole>().unwrap(), SemanticRole::TextMuted);
        assert_eq!(SemanticRole::TextMuted.css_variable(), "--theme-text-muted");
        assert!("shadow".parse::<SemanticRole>().is_err());
    }
}
