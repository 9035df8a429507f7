//! Console output helpers for CLI commands
//!
//! Headers, status lines, color swatches and the dual console/file log writer.

use crate::color::space::Rgb;
use std::io::Write;

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a section divider
pub fn print_divider() {
    println!();
    println!("{}", "─".repeat(60));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print a labelled value, aligned
pub fn print_field(label: &str, value: &str) {
    println!("  {:<14} {}", label, value);
}

// ============================================================================
// Swatches
// ============================================================================

/// Two-cell truecolor block showing `rgb`
pub fn swatch(rgb: Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m  \x1b[0m", rgb.r, rgb.g, rgb.b)
}

/// Swatch followed by the hex text
pub fn labelled_swatch(rgb: Rgb) -> String {
    format!("{} {}", swatch(rgb), rgb.to_hex())
}

/// Print a labelled row of swatches
pub fn print_swatch_row(label: &str, colors: &[Rgb]) {
    let cells: String = colors.iter().map(|rgb| swatch(*rgb)).collect();
    println!("  {:<10} {}", label, cells);
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_escape() {
        let block = swatch(Rgb::new(59, 130, 246));
        assert_eq!(block, "\x1b[48;2;59;130;246m  \x1b[0m");
        assert!(labelled_swatch(Rgb::new(59, 130, 246)).ends_with(" #3b82f6"));
    }

    #[test]
    fn test_dual_writer_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        let mut writer = DualWriter {
            console: std::io::stderr(),
            file: std::fs::File::create(&path).unwrap(),
        };
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
