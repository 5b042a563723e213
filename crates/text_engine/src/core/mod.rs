//! # Core Engine Module
//!
//! Shared configuration and the error type used by every text subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for logging, atlas pages and layout
//! - **Error**: The [`TextError`] enum and [`TextResult`] alias

pub mod config;
pub mod error;

// Re-export foundation modules for convenience
pub use crate::foundation;

pub use config::{
    AtlasConfig,
    Config,
    ConfigError,
    ConfigFormat,
    EngineConfig,
    LayoutConfig,
    TextEngineConfig,
};
pub use error::{TextError, TextResult};
