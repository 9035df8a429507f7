//! Core functionality module
//!
//! Ambient pieces shared by the color engine, the theme layer and the CLI.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and validation
//! - `error` - Error types and result aliases
//! - `store` - Persisted key-value preferences

pub mod config;
pub mod error;
pub mod store;
