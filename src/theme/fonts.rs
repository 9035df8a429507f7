//! Font set - the enumerated preview fonts
//!
//! Fonts are identified by the short ids used in utility classes
//! (`font-inter`, `font-jetbrains`, ...). Only ids in [`FontId::ALL`] can
//! become the active font.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Font used when nothing valid is persisted
pub const DEFAULT_FONT: FontId = FontId::Inter;

/// Enumerated preview font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontId {
    #[default]
    Inter,
    Playfair,
    Lexend,
    Jetbrains,
    Montserrat,
    Oswald,
    Public,
    Space,
    Fira,
    Roboto,
}

impl FontId {
    pub const ALL: [FontId; 10] = [
        FontId::Inter,
        FontId::Playfair,
        FontId::Lexend,
        FontId::Jetbrains,
        FontId::Montserrat,
        FontId::Oswald,
        FontId::Public,
        FontId::Space,
        FontId::Fira,
        FontId::Roboto,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FontId::Inter => "inter",
            FontId::Playfair => "playfair",
            FontId::Lexend => "lexend",
            FontId::Jetbrains => "jetbrains",
            FontId::Montserrat => "montserrat",
            FontId::Oswald => "oswald",
            FontId::Public => "public",
            FontId::Space => "space",
            FontId::Fira => "fira",
            FontId::Roboto => "roboto",
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            FontId::Inter => "Inter (Sans)",
            FontId::Playfair => "Playfair (Serif)",
            FontId::Lexend => "Lexend (Soft)",
            FontId::Jetbrains => "JetBrains (Mono)",
            FontId::Montserrat => "Montserrat (Bold)",
            FontId::Oswald => "Oswald (Narrow)",
            FontId::Public => "Public Sans",
            FontId::Space => "Space Grotesk",
            FontId::Fira => "Fira Code",
            FontId::Roboto => "Roboto Condensed",
        }
    }

    /// CSS font-family stack
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontId::Inter => r#""Inter", sans-serif"#,
            FontId::Playfair => r#""Playfair Display", serif"#,
            FontId::Lexend => r#""Lexend", sans-serif"#,
            FontId::Jetbrains => r#""JetBrains Mono", monospace"#,
            FontId::Montserrat => r#""Montserrat", sans-serif"#,
            FontId::Oswald => r#""Oswald", sans-serif"#,
            FontId::Public => r#""Public Sans", sans-serif"#,
            FontId::Space => r#""Space Grotesk", sans-serif"#,
            FontId::Fira => r#""Fira Code", monospace"#,
            FontId::Roboto => r#""Roboto Condensed", sans-serif"#,
        }
    }

    /// Utility class selecting this font
    pub fn class_name(&self) -> String {
        format!("font-{}", self.id())
    }

    pub fn is_monospace(&self) -> bool {
        matches!(self, FontId::Jetbrains | FontId::Fira)
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FontId {
    type Err = String;

    /// Accepts the bare id or the `font-` class form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let wanted = wanted.strip_prefix("font-").unwrap_or(wanted);
        FontId::ALL
            .iter()
            .copied()
            .find(|font| font.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown font '{}'", s))
    }
}
