//! Palette Index - the fixed design-token palette
//!
//! 22 color families × 11 shade steps, each resolving to one canonical hex
//! value. The table is built once per process and never mutated.
//!
//! # Example
//!
//! ```rust
//! use theme_workbench::color::palette::{PaletteFamily, PaletteIndex, Shade};
//! use theme_workbench::color::space::Rgb;
//!
//! let index = PaletteIndex::global();
//! assert_eq!(index.resolve_token(PaletteFamily::Blue, Shade::S600), "#2563eb");
//!
//! let hit = index.nearest_token(Rgb::new(37, 99, 235)).unwrap();
//! assert_eq!(hit.token.to_string(), "blue-600");
//! assert_eq!(hit.distance, 0.0);
//! ```

use crate::color::space::{hex_to_rgb, Rgb};
use crate::core::error::{ColorError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// =============================================================================
// Families and shades
// =============================================================================

/// Color family, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteFamily {
    Slate,
    Gray,
    Zinc,
    Neutral,
    Stone,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl PaletteFamily {
    pub const ALL: [PaletteFamily; 22] = [
        PaletteFamily::Slate,
        PaletteFamily::Gray,
        PaletteFamily::Zinc,
        PaletteFamily::Neutral,
        PaletteFamily::Stone,
        PaletteFamily::Red,
        PaletteFamily::Orange,
        PaletteFamily::Amber,
        PaletteFamily::Yellow,
        PaletteFamily::Lime,
        PaletteFamily::Green,
        PaletteFamily::Emerald,
        PaletteFamily::Teal,
        PaletteFamily::Cyan,
        PaletteFamily::Sky,
        PaletteFamily::Blue,
        PaletteFamily::Indigo,
        PaletteFamily::Violet,
        PaletteFamily::Purple,
        PaletteFamily::Fuchsia,
        PaletteFamily::Pink,
        PaletteFamily::Rose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaletteFamily::Slate => "slate",
            PaletteFamily::Gray => "gray",
            PaletteFamily::Zinc => "zinc",
            PaletteFamily::Neutral => "neutral",
            PaletteFamily::Stone => "stone",
            PaletteFamily::Red => "red",
            PaletteFamily::Orange => "orange",
            PaletteFamily::Amber => "amber",
            PaletteFamily::Yellow => "yellow",
            PaletteFamily::Lime => "lime",
            PaletteFamily::Green => "green",
            PaletteFamily::Emerald => "emerald",
            PaletteFamily::Teal => "teal",
            PaletteFamily::Cyan => "cyan",
            PaletteFamily::Sky => "sky",
            PaletteFamily::Blue => "blue",
            PaletteFamily::Indigo => "indigo",
            PaletteFamily::Violet => "violet",
            PaletteFamily::Purple => "purple",
            PaletteFamily::Fuchsia => "fuchsia",
            PaletteFamily::Pink => "pink",
            PaletteFamily::Rose => "rose",
        }
    }

    /// Position in declaration order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PaletteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaletteFamily {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        PaletteFamily::ALL
            .iter()
            .copied()
            .find(|family| family.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColorError::UnknownPaletteToken {
                family: s.to_string(),
                shade: "*".to_string(),
            })
    }
}

/// Shade step, ascending from lightest to darkest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Shade {
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
    S950,
}

impl Shade {
    pub const ALL: [Shade; 11] = [
        Shade::S50,
        Shade::S100,
        Shade::S200,
        Shade::S300,
        Shade::S400,
        Shade::S500,
        Shade::S600,
        Shade::S700,
        Shade::S800,
        Shade::S900,
        Shade::S950,
    ];

    /// Numeric step (50, 100, ..., 950)
    pub fn value(&self) -> u16 {
        match self {
            Shade::S50 => 50,
            Shade::S100 => 100,
            Shade::S200 => 200,
            Shade::S300 => 300,
            Shade::S400 => 400,
            Shade::S500 => 500,
            Shade::S600 => 600,
            Shade::S700 => 700,
            Shade::S800 => 800,
            Shade::S900 => 900,
            Shade::S950 => 950,
        }
    }

    pub fn from_value(value: u16) -> Option<Self> {
        Shade::ALL.iter().copied().find(|shade| shade.value() == value)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<u16> for Shade {
    type Error = ColorError;

    fn try_from(value: u16) -> Result<Self> {
        Shade::from_value(value).ok_or_else(|| ColorError::UnknownPaletteToken {
            family: "*".to_string(),
            shade: value.to_string(),
        })
    }
}

impl From<Shade> for u16 {
    fn from(shade: Shade) -> u16 {
        shade.value()
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// A `family-shade` design token such as `blue-600`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaletteToken {
    pub family: PaletteFamily,
    pub shade: Shade,
}

impl PaletteToken {
    pub const fn new(family: PaletteFamily, shade: Shade) -> Self {
        Self { family, shade }
    }

    /// Utility class for this token, e.g. `bg-blue-600`
    pub fn utility_class(&self, usage: UtilityUsage) -> String {
        format!("{}-{}", usage.prefix(), self)
    }
}

impl fmt::Display for PaletteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family, self.shade)
    }
}

impl FromStr for PaletteToken {
    type Err = ColorError;

    /// Parse `family-shade`; both halves must be in the enumerated sets
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || ColorError::UnknownPaletteToken {
            family: s.split('-').next().unwrap_or_default().to_string(),
            shade: s.rsplit('-').next().unwrap_or_default().to_string(),
        };

        let (family, shade) = s.trim().rsplit_once('-').ok_or_else(unknown)?;
        let family = family.parse::<PaletteFamily>().map_err(|_| unknown())?;
        let shade = shade
            .parse::<u16>()
            .ok()
            .and_then(Shade::from_value)
            .ok_or_else(unknown)?;

        Ok(PaletteToken::new(family, shade))
    }
}

/// Which utility-class prefix a token is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityUsage {
    Background,
    Text,
    Border,
}

impl UtilityUsage {
    pub fn prefix(&self) -> &'static str {
        match self {
            UtilityUsage::Background => "bg",
            UtilityUsage::Text => "text",
            UtilityUsage::Border => "border",
        }
    }
}

/// Result of a nearest-token search
#[derive(Debug, Clone, PartialEq)]
pub struct NearestToken {
    pub token: PaletteToken,
    pub hex: &'static str,
    /// Euclidean distance in RGB space
    pub distance: f64,
}

// =============================================================================
// Palette table
// =============================================================================

/// Canonical hex values, rows in family order, columns in shade order
const PALETTE_HEX: [[&str; 11]; 22] = [
    // slate
    ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a", "#020617"],
    // gray
    ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827", "#030712"],
    // zinc
    ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b", "#09090b"],
    // neutral
    ["#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040", "#262626", "#171717", "#0a0a0a"],
    // stone
    ["#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c", "#292524", "#1c1917", "#0c0a09"],
    // red
    ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#450a0a"],
    // orange
    ["#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c", "#9a3412", "#7c2d12", "#431407"],
    // amber
    ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f", "#451a03"],
    // yellow
    ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#422006"],
    // lime
    ["#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f", "#3f6212", "#365314", "#1a2e05"],
    // green
    ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d", "#052e16"],
    // emerald
    ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b", "#022c22"],
    // teal
    ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a", "#042f2e"],
    // cyan
    ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63", "#083344"],
    // sky
    ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e", "#082f49"],
    // blue
    ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"],
    // indigo
    ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81", "#1e1b4b"],
    // violet
    ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"],
    // purple
    ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87", "#3b0764"],
    // fuchsia
    ["#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf", "#86198f", "#701a75", "#4a044e"],
    // pink
    ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843", "#500724"],
    // rose
    ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337", "#4c0519"],
];

/// One resolved palette entry
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub token: PaletteToken,
    pub hex: &'static str,
    pub rgb: Rgb,
}

/// Read-only index over the full family × shade cross-product
#[derive(Debug, Clone)]
pub struct PaletteIndex {
    /// Entries in enumeration order: families as declared, shades ascending
    entries: Vec<PaletteEntry>,
}

static GLOBAL_PALETTE: OnceLock<PaletteIndex> = OnceLock::new();

impl PaletteIndex {
    /// Build the index from the built-in table
    pub fn builtin() -> Self {
        let mut entries = Vec::with_capacity(PaletteFamily::ALL.len() * Shade::ALL.len());
        for family in PaletteFamily::ALL {
            for shade in Shade::ALL {
                let hex = PALETTE_HEX[family.index()][shade.index()];
                // The table is a compile-time constant; a malformed literal is a bug.
                let rgb = hex_to_rgb(hex).unwrap_or(Rgb::BLACK);
                debug_assert_eq!(rgb.to_hex(), hex, "bad palette literal for {}-{}", family, shade);
                entries.push(PaletteEntry {
                    token: PaletteToken::new(family, shade),
                    hex,
                    rgb,
                });
            }
        }
        Self { entries }
    }

    /// Process-wide palette, initialized on first use
    pub fn global() -> &'static PaletteIndex {
        GLOBAL_PALETTE.get_or_init(PaletteIndex::builtin)
    }

    /// Index over a subset of the builtin entries, for the empty-palette guard
    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in deterministic enumeration order
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Entries grouped by family, for rendering the token grid
    pub fn rows(&self) -> impl Iterator<Item = (PaletteFamily, &[PaletteEntry])> + '_ {
        self.entries
            .chunks(Shade::ALL.len())
            .filter_map(|row| row.first().map(|first| (first.token.family, row)))
    }

    /// Direct lookup of an enumerated family/shade pair
    pub fn resolve_token(&self, family: PaletteFamily, shade: Shade) -> &'static str {
        PALETTE_HEX[family.index()][shade.index()]
    }

    pub fn resolve(&self, token: &PaletteToken) -> &'static str {
        self.resolve_token(token.family, token.shade)
    }

    /// Lookup by string keys, e.g. `("blue", 600)`
    pub fn resolve_keys(&self, family: &str, shade: u16) -> Result<&'static str> {
        let unknown = || ColorError::UnknownPaletteToken {
            family: family.to_string(),
            shade: shade.to_string(),
        };
        let family = family.parse::<PaletteFamily>().map_err(|_| unknown())?;
        let shade = Shade::from_value(shade).ok_or_else(unknown)?;
        Ok(self.resolve_token(family, shade))
    }

    /// Lookup by `family-shade` string
    pub fn resolve_str(&self, token: &str) -> Result<&'static str> {
        let token: PaletteToken = token.parse()?;
        Ok(self.resolve(&token))
    }

    /// Exhaustive nearest-neighbor search in RGB space
    ///
    /// Ties keep the first entry in enumeration order. Returns `None` only for
    /// an empty palette.
    pub fn nearest_token(&self, rgb: Rgb) -> Option<NearestToken> {
        let mut best: Option<(&PaletteEntry, f64)> = None;

        for entry in &self.entries {
            let distance = rgb.distance(&entry.rgb);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((entry, distance)),
            }
        }

        let (entry, distance) = best?;
        debug!("Nearest token for {}: {} (distance {:.2})", rgb, entry.token, distance);

        Some(NearestToken {
            token: entry.token,
            hex: entry.hex,
            distance,
        })
    }
}

impl Default for PaletteIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Tests
// =============================================================================
