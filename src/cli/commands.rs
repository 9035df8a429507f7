//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::output::{
    labelled_swatch, print_divider, print_field, print_header, print_info, print_success,
    print_swatch_row, print_warning,
};
use crate::cli::{Args, Commands};
use crate::color::palette::{PaletteIndex, PaletteToken, Shade, UtilityUsage};
use crate::color::space::{apply_hsv_offset, get_hsv_offset, hex_to_rgb, HsvOffset, Rgb};
use crate::color::wheel::{ColorWheel, WheelInteraction, MAX_WHEEL_SIZE};
use crate::core::config::{get_config_path, init_config, Config};
use crate::core::store::JsonFileStore;
use crate::theme::projector::{DocumentRoot, ThemeCssProjector};
use crate::theme::registry::{SemanticRole, ThemeDefinition, ThemeMode, ThemeRegistry};
use crate::theme::session::{ModeSignal, ThemeSessionState};
use crate::theme::{FontId, ThemeContext};
use crate::workbench::PaletteWorkbench;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

type CliContext = ThemeContext<JsonFileStore, DocumentRoot>;

/// Dispatch the parsed command
///
/// Only commands that read the session or the wheel settings require a valid
/// configuration, so `config --reset` and `generate-config` can repair a bad file.
pub fn run_command(args: &Args, config: &Config, registry: Arc<ThemeRegistry>) -> Result<()> {
    if requires_valid_config(args.command.as_ref()) {
        config.validate(&registry)?;
    }

    match &args.command {
        Some(Commands::Convert { color }) => convert(color)?,
        Some(Commands::Nearest { color }) => nearest(color)?,
        Some(Commands::Offset { from, to }) => offset(from, to)?,
        Some(Commands::ApplyOffset {
            color,
            hue,
            sat,
            val,
        }) => shift(color, HsvOffset::new(*hue, *sat, *val))?,
        Some(Commands::Palette) => palette(),
        Some(Commands::Themes) => {
            let ctx = open_context(args, config, registry)?;
            list_themes(&ctx);
        }
        Some(Commands::Status) | None => {
            let ctx = open_context(args, config, registry)?;
            show_status(&ctx);
        }
        Some(Commands::SwitchTheme { id }) => {
            let mut ctx = open_context(args, config, registry)?;
            switch_theme(&mut ctx, id)?;
        }
        Some(Commands::SwitchFont { id }) => {
            let mut ctx = open_context(args, config, registry)?;
            switch_font(&mut ctx, id);
        }
        Some(Commands::Mode { target }) => {
            let ctx = open_context(args, config, registry)?;
            change_mode(ctx, effective_mode(args, config), *target)?;
        }
        Some(Commands::Css { theme }) => {
            let ctx = open_context(args, config, registry)?;
            print_css(&ctx, theme.as_deref())?;
        }
        Some(Commands::Wheel { size, output, at }) => {
            wheel(config, *size, output.as_ref(), *at)?;
        }
        Some(Commands::Pick { role, color, theme }) => {
            let ctx = open_context(args, config, registry)?;
            pick(&ctx, *role, color, theme.as_deref())?;
        }
        Some(Commands::Retint {
            from,
            to,
            theme,
            output,
        }) => {
            let ctx = open_context(args, config, registry)?;
            retint(&ctx, from, to, theme.as_deref(), output.as_ref())?;
        }
        Some(Commands::Export { theme, output }) => {
            let ctx = open_context(args, config, registry)?;
            export(&ctx, theme.as_deref(), output.as_ref())?;
        }
        Some(Commands::Config { path, reset }) => handle_config_command(config, *path, *reset)?,
        Some(Commands::GenerateConfig { output }) => generate_config_file(output.clone())?,
    }

    Ok(())
}

// ============================================================================
// Shared helpers
// ============================================================================

fn requires_valid_config(command: Option<&Commands>) -> bool {
    !matches!(
        command,
        Some(
            Commands::Convert { .. }
                | Commands::Nearest { .. }
                | Commands::Offset { .. }
                | Commands::ApplyOffset { .. }
                | Commands::Palette
                | Commands::Config { .. }
                | Commands::GenerateConfig { .. }
        )
    )
}

/// Accept a hex color or a palette token
pub fn parse_color(input: &str) -> Result<Rgb> {
    if let Ok(token) = input.parse::<PaletteToken>() {
        let hex = PaletteIndex::global().resolve(&token);
        return Ok(hex_to_rgb(hex)?);
    }
    Ok(hex_to_rgb(input)?)
}

fn effective_mode(args: &Args, config: &Config) -> ThemeMode {
    args.mode.unwrap_or(config.session.initial_mode)
}

/// Load the persisted session and publish its first projection
fn open_context(args: &Args, config: &Config, registry: Arc<ThemeRegistry>) -> Result<CliContext> {
    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());
    debug!("Using preference store {}", store_path.display());

    let store = JsonFileStore::open(&store_path);
    let session = ThemeSessionState::load(registry, store, config.session_defaults());
    let mut ctx = ThemeContext::new(session, DocumentRoot::new());
    ctx.mount(effective_mode(args, config))
        .context("Failed to publish the active theme")?;
    Ok(ctx)
}

/// The named theme, or the active one
fn theme_or_active(ctx: &CliContext, id: Option<&str>) -> Result<ThemeDefinition> {
    let theme = match id {
        Some(id) => ctx.themes().get(id),
        None => ctx.theme(),
    };
    match theme {
        Some(theme) => Ok(theme.clone()),
        None => bail!("Unknown theme '{}'", id.unwrap_or_default()),
    }
}

fn print_resolved_roles(theme: &ThemeDefinition) -> Result<()> {
    let resolved = ThemeCssProjector::new().resolve(theme)?;
    for role in SemanticRole::ALL {
        let rgb = hex_to_rgb(resolved.get(role))?;
        println!(
            "  {:<12} {}  {}",
            role.key(),
            labelled_swatch(rgb),
            theme.colors.get(role)
        );
    }
    Ok(())
}

// ============================================================================
// Color commands
// ============================================================================

fn convert(input: &str) -> Result<()> {
    let rgb = parse_color(input)?;
    let (h, s, v) = rgb.to_hsv().rounded();

    print_field("Hex", &labelled_swatch(rgb));
    print_field("RGB", &format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b));
    print_field("HSV", &format!("hsv({}, {}%, {}%)", h, s, v));
    if let Some(nearest) = PaletteIndex::global().nearest_token(rgb) {
        print_field(
            "Nearest",
            &format!("{} (distance {:.2})", nearest.token, nearest.distance),
        );
    }
    Ok(())
}

fn nearest(input: &str) -> Result<()> {
    let rgb = parse_color(input)?;
    let Some(nearest) = PaletteIndex::global().nearest_token(rgb) else {
        bail!("The palette is empty");
    };

    print_field("Color", &labelled_swatch(rgb));
    print_field("Token", &nearest.token.to_string());
    print_field("Token hex", &labelled_swatch(hex_to_rgb(nearest.hex)?));
    print_field("Distance", &format!("{:.2}", nearest.distance));
    let classes: Vec<String> = [UtilityUsage::Background, UtilityUsage::Text, UtilityUsage::Border]
        .iter()
        .map(|usage| nearest.token.utility_class(*usage))
        .collect();
    print_field("Classes", &classes.join(" "));
    Ok(())
}

fn offset(from: &str, to: &str) -> Result<()> {
    let from = parse_color(from)?.to_hex();
    let to = parse_color(to)?.to_hex();
    let offset = get_hsv_offset(&from, &to)?;

    println!("{}", offset);
    println!(
        "  apply with: --hue {:.2} --sat {:.2} --val {:.2}",
        offset.h_offset, offset.s_offset, offset.v_offset
    );
    Ok(())
}

fn shift(input: &str, offset: HsvOffset) -> Result<()> {
    let hex = parse_color(input)?.to_hex();
    let shifted = apply_hsv_offset(&hex, &offset)?;
    println!(
        "{} -> {}",
        labelled_swatch(hex_to_rgb(&hex)?),
        labelled_swatch(hex_to_rgb(&shifted)?)
    );
    Ok(())
}

fn palette() {
    let index = PaletteIndex::global();
    for (family, row) in index.rows() {
        let colors: Vec<Rgb> = row.iter().map(|entry| entry.rgb).collect();
        print_swatch_row(family.name(), &colors);
    }

    let shades: Vec<String> = Shade::ALL.iter().map(|shade| shade.to_string()).collect();
    println!();
    print_info(&format!("Columns: {}", shades.join(" ")));
}

fn wheel(
    config: &Config,
    size: Option<u32>,
    output: Option<&PathBuf>,
    at: Option<(f64, f64)>,
) -> Result<()> {
    let wheel = match size {
        Some(size) if !(1..=MAX_WHEEL_SIZE).contains(&size) => {
            bail!("Wheel size must be between 1 and {}", MAX_WHEEL_SIZE)
        }
        Some(size) => ColorWheel::new(size).with_pixel_ratio(config.wheel.pixel_ratio),
        None => config.wheel(),
    };

    print_field("Size", &format!("{} px", wheel.size()));
    print_field(
        "Canvas",
        &format!("{0}x{0} device px (ratio {1})", wheel.device_size(), wheel.pixel_ratio()),
    );

    if let Some((x, y)) = at {
        let sample = wheel.sample(x, y);
        let mut interaction = WheelInteraction::new(wheel, |_: &str| {});
        let hex = interaction.press(x, y);
        interaction.release();

        print_field(
            "Sample",
            &format!("hue {:.1}°, saturation {:.1}%", sample.hue, sample.saturation()),
        );
        print_field("Color", &labelled_swatch(hex_to_rgb(&hex)?));
        if let Some(nearest) = PaletteIndex::global().nearest_token(hex_to_rgb(&hex)?) {
            print_field(
                "Nearest",
                &format!("{} (distance {:.2})", nearest.token, nearest.distance),
            );
        }
        return match output {
            Some(path) => save_wheel(interaction.wheel(), path),
            None => Ok(()),
        };
    }

    if let Some(path) = output {
        save_wheel(&wheel, path)?;
    }
    Ok(())
}

fn save_wheel(wheel: &ColorWheel, path: &PathBuf) -> Result<()> {
    let buffer = wheel.render();
    buffer
        .save_png(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    print_success(&format!(
        "Wrote {}x{} wheel to {}",
        buffer.width,
        buffer.height,
        path.display()
    ));
    Ok(())
}

// ============================================================================
// Theme commands
// ============================================================================

fn list_themes(ctx: &CliContext) {
    print_header("Themes");
    let projector = ThemeCssProjector::new();

    for theme in ctx.themes().iter() {
        let marker = if theme.id == ctx.current_theme() { "*" } else { " " };
        let colors: Vec<Rgb> = match projector.resolve(theme) {
            Ok(resolved) => SemanticRole::ALL
                .iter()
                .filter_map(|role| hex_to_rgb(resolved.get(*role)).ok())
                .collect(),
            Err(e) => {
                print_warning(&e.to_string());
                Vec::new()
            }
        };
        print_swatch_row(&format!("{} {}", marker, theme.id), &colors);
        println!("  {:<10} {} ({}): {}", "", theme.name, theme.mode, theme.description);
    }
}

fn show_status(ctx: &CliContext) {
    print_header("Theme Session");
    print_field("Theme", ctx.current_theme());
    if let Some(theme) = ctx.theme() {
        print_field("Name", &theme.name);
        print_field("Mode", theme.mode.as_str());
    }
    let font = ctx.current_font();
    print_field("Font", &format!("{} ({})", font.display_name(), font.class_name()));
    print_field("Font stack", font.css_stack());

    print_divider();
    if let Some(resolved) = ctx.resolved() {
        for (name, hex) in resolved.variables() {
            match hex_to_rgb(hex) {
                Ok(rgb) => println!("  {:<20} {}", name, labelled_swatch(rgb)),
                Err(_) => println!("  {:<20} {}", name, hex),
            }
        }
    }
}

fn switch_theme(ctx: &mut CliContext, id: &str) -> Result<()> {
    if !ctx.themes().contains(id) {
        print_warning(&format!("Unknown theme '{}' ignored", id));
        return Ok(());
    }
    if ctx.switch_theme(id)? {
        print_success(&format!("Active theme: {}", ctx.current_theme()));
    } else {
        print_info(&format!("'{}' is already active", id));
    }
    Ok(())
}

fn switch_font(ctx: &mut CliContext, id: &str) {
    if ctx.switch_font(id) {
        print_success(&format!("Active font: {}", ctx.current_font().display_name()));
    } else if id.parse::<FontId>().is_err() {
        print_warning(&format!("Unknown font '{}' ignored", id));
    } else {
        print_info(&format!("'{}' is already active", id));
    }
}

fn change_mode(mut ctx: CliContext, from: ThemeMode, to: ThemeMode) -> Result<()> {
    let mut signal = ModeSignal::new(from);
    ctx.observe(&mut signal);
    signal.set(to);

    let before = ctx.current_theme().to_string();
    if ctx.pump_mode_events()? {
        print_success(&format!(
            "Mode {} -> {}: theme '{}' -> '{}'",
            from,
            to,
            before,
            ctx.current_theme()
        ));
    } else {
        print_info(&format!("Mode {}: theme '{}' unchanged", to, before));
    }
    Ok(())
}

fn print_css(ctx: &CliContext, theme: Option<&str>) -> Result<()> {
    match theme {
        None => println!("{}", ctx.target().to_css()),
        Some(_) => {
            let theme = theme_or_active(ctx, theme)?;
            let mut root = DocumentRoot::new();
            ThemeCssProjector::new().project(&theme, &mut root)?;
            println!("{}", root.to_css());
        }
    }
    Ok(())
}

fn pick(ctx: &CliContext, role: SemanticRole, color: &str, theme: Option<&str>) -> Result<()> {
    let mut bench = PaletteWorkbench::new(theme_or_active(ctx, theme)?);
    bench.select_target(role);

    match color.parse::<PaletteToken>() {
        Ok(token) => {
            bench.pick_token(token);
        }
        Err(_) => {
            bench.pick_hex(color)?;
        }
    }
    if let Some(selection) = bench.selection() {
        print_field("Picked", &selection.to_string());
    }

    let Some(class) = bench.apply() else {
        bail!("Nothing was picked");
    };
    print_field("Class", &class);
    print_divider();
    print_resolved_roles(bench.preview())?;
    print_divider();
    println!("{}", bench.preview_css()?);
    Ok(())
}

fn retint(
    ctx: &CliContext,
    from: &str,
    to: &str,
    theme: Option<&str>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let from = parse_color(from)?.to_hex();
    let to = parse_color(to)?.to_hex();
    let bench = PaletteWorkbench::new(theme_or_active(ctx, theme)?);
    let variant = bench.retint(&from, &to)?;

    match output {
        Some(path) => {
            fs::write(path, variant.to_json_pretty())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Wrote '{}' to {}", variant.id, path.display()));
        }
        None => {
            print_resolved_roles(&variant)?;
            print_divider();
            let mut root = DocumentRoot::new();
            ThemeCssProjector::new().project(&variant, &mut root)?;
            println!("{}", root.to_css());
        }
    }
    Ok(())
}

fn export(ctx: &CliContext, theme: Option<&str>, output: Option<&PathBuf>) -> Result<()> {
    let theme = theme_or_active(ctx, theme)?;
    let json = theme.to_json_pretty();

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Exported '{}' to {}", theme.id, path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ============================================================================
// Configuration commands
// ============================================================================

/// Show, locate or reset the configuration file
pub fn handle_config_command(config: &Config, show_path: bool, reset: bool) -> Result<()> {
    if reset {
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                fs::remove_file(&config_path)?;
                info!("Removed existing config file");
            }
        }
        let path = init_config()?;
        print_success(&format!("Created fresh config file at: {}", path.display()));
        return Ok(());
    }

    let path = Config::get_active_config_path();
    if show_path {
        println!("{}", path.display());
        return Ok(());
    }

    print_field("Config file", &path.display().to_string());
    if !path.exists() {
        print_info("Using default settings - no config file found");
    }
    print_field("Store file", &config.store_path().display().to_string());
    print_divider();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write the commented default configuration
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            fs::write(&path, Config::generate_default_config())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => init_config()?,
    };

    print_success(&format!("Configuration file: {}", output_path.display()));
    print_info("Edit this file to change session defaults, wheel size and logging.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{KeyValueStore, THEME_KEY};
    use clap::Parser;
    use tempfile::TempDir;

    fn args_for(store: &std::path::Path, extra: &[&str]) -> Args {
        let mut argv = vec!["theme-workbench", "--store"];
        let store = store.to_str().unwrap();
        argv.push(store);
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_parse_color_accepts_tokens_and_hex() {
        assert_eq!(parse_color("blue-500").unwrap(), Rgb::new(59, 130, 246));
        assert_eq!(parse_color("#3b82f6").unwrap(), Rgb::new(59, 130, 246));
        assert_eq!(parse_color("fff").unwrap(), Rgb::WHITE);
        assert!(parse_color("blue-650").is_err());
    }

    #[test]
    fn test_switch_theme_command_persists() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("prefs.json");
        let registry = Arc::new(ThemeRegistry::builtin());
        let config = Config::default();

        let args = args_for(&store, &["switch-theme", "sunset"]);
        run_command(&args, &config, registry.clone()).unwrap();
        assert_eq!(
            JsonFileStore::open(&store).get(THEME_KEY).as_deref(),
            Some("sunset")
        );

        // unknown ids leave the store alone
        let args = args_for(&store, &["switch-theme", "nope"]);
        run_command(&args, &config, registry).unwrap();
        assert_eq!(
            JsonFileStore::open(&store).get(THEME_KEY).as_deref(),
            Some("sunset")
        );
    }

    #[test]
    fn test_mode_command_reconciles() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("prefs.json");
        let registry = Arc::new(ThemeRegistry::builtin());

        let args = args_for(&store, &["mode", "dark"]);
        run_command(&args, &Config::default(), registry).unwrap();
        assert_eq!(
            JsonFileStore::open(&store).get(THEME_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_export_and_wheel_outputs() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("prefs.json");
        let registry = Arc::new(ThemeRegistry::builtin());
        let config = Config::default();

        let json = dir.path().join("theme.json");
        let args = args_for(&store, &["export", "--theme", "forest", "--output", json.to_str().unwrap()]);
        run_command(&args, &config, registry.clone()).unwrap();
        let exported = ThemeDefinition::from_json(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(exported.id, "forest");

        let png = dir.path().join("wheel.png");
        let args = args_for(&store, &["wheel", "--size", "32", "--output", png.to_str().unwrap()]);
        run_command(&args, &config, registry).unwrap();
        assert!(png.exists());
    }

    #[test]
    fn test_invalid_config_still_allows_repair_commands() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("prefs.json");
        let registry = Arc::new(ThemeRegistry::builtin());

        let mut config = Config::default();
        config.session.default_dark_theme = "maritime".to_string();

        let fresh = dir.path().join("fresh.toml");
        let args = args_for(&store, &["generate-config", "--output", fresh.to_str().unwrap()]);
        run_command(&args, &config, registry.clone()).unwrap();
        assert!(Config::load(&fresh).unwrap().validate(&registry).is_ok());

        let args = args_for(&store, &["convert", "#3b82f6"]);
        run_command(&args, &config, registry.clone()).unwrap();

        // session commands refuse to run on it
        let args = args_for(&store, &["status"]);
        let err = run_command(&args, &config, registry).unwrap_err();
        assert!(err.to_string().contains("default_dark_theme"));
        assert!(!store.exists());
    }

    #[test]
    fn test_wheel_size_out_of_range_fails() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("prefs.json");
        let registry = Arc::new(ThemeRegistry::builtin());

        let png = dir.path().join("wheel.png");
        let mut args = args_for(&store, &["wheel", "--output", png.to_str().unwrap()]);
        if let Some(Commands::Wheel { size, .. }) = args.command.as_mut() {
            *size = Some(u32::MAX);
        }
        assert!(run_command(&args, &Config::default(), registry).is_err());
        assert!(!png.exists());
    }

    #[test]
    fn test_unknown_theme_for_export_fails() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir.path().join("prefs.json"), &["export", "--theme", "nope"]);
        assert!(run_command(&args, &Config::default(), Arc::new(ThemeRegistry::builtin())).is_err());
    }
}
