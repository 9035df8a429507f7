//! Error types for the color engine
//!
//! Only malformed input and unresolvable theme data are errors. Unknown theme
//! or font identifiers handed to the session are ignored instead, so stale
//! persisted values never surface here.

use thiserror::Error;

/// Main error type for the color engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// A hex string that is not 3 or 6 hex digits (with optional `#`)
    #[error("Invalid color format '{input}': {reason}")]
    InvalidColorFormat { input: String, reason: String },

    /// Lookup miss on the palette's family/shade keys
    #[error("Unknown palette token '{family}-{shade}'")]
    UnknownPaletteToken { family: String, shade: String },

    /// A theme role references a token or hex that cannot be resolved
    #[error("Theme '{theme_id}' has an unresolvable {role} color '{value}'")]
    ThemeRoleUnresolved {
        theme_id: String,
        role: String,
        value: String,
    },
}

impl ColorError {
    pub(crate) fn invalid_format(input: &str, reason: impl Into<String>) -> Self {
        ColorError::InvalidColorFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ColorError>;
