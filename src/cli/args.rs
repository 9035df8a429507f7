//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use crate::color::wheel::MAX_WHEEL_SIZE;
use crate::theme::registry::{SemanticRole, ThemeMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Color and theme workbench: conversions, palette lookups, theme sessions
#[derive(Parser, Debug)]
#[command(name = "theme-workbench")]
#[command(version)]
#[command(about = "Explore colors, palette tokens and site themes from the terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Preference store file (overrides config)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Light/dark mode in effect for this run (overrides config)
    #[arg(short, long, global = true)]
    pub mode: Option<ThemeMode>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a color as hex, RGB and HSV
    Convert {
        /// Hex color (#3b82f6, 3b82f6, #fff) or palette token (blue-500)
        color: String,
    },

    /// Find the palette token closest to a color
    Nearest {
        /// Hex color or palette token
        color: String,
    },

    /// Compute the HSV offset that turns one color into another
    Offset {
        /// Source color
        from: String,
        /// Target color
        to: String,
    },

    /// Shift a color by an HSV offset
    ApplyOffset {
        /// Color to shift
        color: String,

        /// Hue offset in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_finite)]
        hue: f64,

        /// Saturation offset in percent
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_finite)]
        sat: f64,

        /// Value offset in percent
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_finite)]
        val: f64,
    },

    /// Print the token palette grid
    Palette,

    /// List the theme catalog
    Themes,

    /// Show the active theme, font and published colors
    Status,

    /// Make a theme active (unknown ids are ignored)
    SwitchTheme {
        /// Theme id, e.g. maritime
        id: String,
    },

    /// Make a font active (unknown ids are ignored)
    SwitchFont {
        /// Font id, e.g. inter
        id: String,
    },

    /// Change the light/dark mode and show the reconciled theme
    Mode {
        /// light or dark
        #[arg(value_name = "MODE")]
        target: ThemeMode,
    },

    /// Print the style variables of a theme as a :root block
    Css {
        /// Theme id (defaults to the active theme)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Render the color wheel or sample a point on it
    Wheel {
        /// Diameter in CSS pixels, 1 to 4096 (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WHEEL_SIZE as i64))]
        size: Option<u32>,

        /// Write the rendered wheel to a PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sample the wheel at X,Y (CSS pixels from the top-left corner)
        #[arg(long, value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
        at: Option<(f64, f64)>,
    },

    /// Pick a color for one role of a theme and show the result
    Pick {
        /// Role to change: primary, secondary, accent, background, surface, text, text-muted, border
        role: SemanticRole,

        /// Hex color or palette token
        color: String,

        /// Theme to start from (defaults to the active theme)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Shift every color of a theme by the HSV offset between two colors
    Retint {
        /// Source color
        from: String,

        /// Target color
        to: String,

        /// Theme to retint (defaults to the active theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Write the retinted theme as JSON instead of printing CSS
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a theme definition as JSON
    Export {
        /// Theme id (defaults to the active theme)
        #[arg(short, long)]
        theme: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or reset the configuration file
    Config {
        /// Show the config file path only
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a finite number; NaN and infinities are rejected
pub fn parse_finite(value: &str) -> Result<f64, String> {
    let number = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid number '{}': {}", value.trim(), e))?;
    if !number.is_finite() {
        return Err(format!("'{}' is not a finite number", value.trim()));
    }
    Ok(number)
}

/// Parse an `X,Y` coordinate pair
pub fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", value))?;
    Ok((parse_finite(x)?, parse_finite(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("130,65.5").unwrap(), (130.0, 65.5));
        assert_eq!(parse_point(" -10 , 4 ").unwrap(), (-10.0, 4.0));
        assert!(parse_point("130").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("-30").unwrap(), -30.0);
        assert_eq!(parse_finite(" 12.5 ").unwrap(), 12.5);
        assert!(parse_finite("NaN").is_err());
        assert!(parse_finite("inf").is_err());
        assert!(parse_finite("-infinity").is_err());
        assert!(parse_point("NaN,4").is_err());
    }

    #[test]
    fn test_rejects_non_finite_offsets_and_bad_sizes() {
        let rejected: [&[&str]; 4] = [
            &["theme-workbench", "apply-offset", "#ff0000", "--hue", "NaN"],
            &["theme-workbench", "apply-offset", "#ff0000", "--sat", "inf"],
            &["theme-workbench", "wheel", "--size", "4294967295"],
            &["theme-workbench", "wheel", "--size", "0"],
        ];
        for argv in rejected {
            assert!(Args::try_parse_from(argv.iter().copied()).is_err(), "{:?} should be rejected", argv);
        }

        let args = Args::parse_from(["theme-workbench", "wheel", "--size", "4096"]);
        assert!(matches!(args.command, Some(Commands::Wheel { size: Some(4096), .. })));
    }

    #[test]
    fn test_parse_commands() {
        let args = Args::parse_from(["theme-workbench", "--mode", "dark", "status"]);
        assert_eq!(args.mode, Some(ThemeMode::Dark));
        assert!(matches!(args.command, Some(Commands::Status)));

        let args = Args::parse_from(["theme-workbench", "apply-offset", "#ff0000", "--hue", "-30"]);
        match args.command {
            Some(Commands::ApplyOffset { hue, sat, .. }) => {
                assert_eq!(hue, -30.0);
                assert_eq!(sat, 0.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args = Args::parse_from(["theme-workbench", "pick", "text-muted", "slate-500"]);
        assert!(matches!(
            args.command,
            Some(Commands::Pick { role: SemanticRole::TextMuted, .. })
        ));

        let args = Args::parse_from(["theme-workbench", "wheel", "--at", "10,20"]);
        assert!(matches!(
            args.command,
            Some(Commands::Wheel { at: Some((x, y)), .. }) if x == 10.0 && y == 20.0
        ));
    }
}
