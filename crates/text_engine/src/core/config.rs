//! # Unified Configuration System
//!
//! Configuration structures for the text subsystem. Every section has
//! defaults matching the behavior the engine ships with, so an empty
//! document is a valid configuration.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug features
//! - **Atlas Config**: glyph atlas page geometry
//! - **Layout Config**: span flow layout spacing and debug outlines

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// Default width of a glyph atlas page in pixels
pub const DEFAULT_PAGE_WIDTH: u32 = 512;

/// Largest page width accepted; keeps a page within common texture limits
pub const MAX_PAGE_WIDTH: u32 = 8192;

/// # Engine Configuration
///
/// Core behavior configuration: logging and debug features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Atlas Configuration
///
/// Geometry of the glyph atlas pages a font packs its glyphs into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Width of every atlas page in pixels
    pub page_width: u32,
}

impl AtlasConfig {
    /// Create a new atlas configuration
    pub fn new() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
        }
    }

    /// Set page width
    pub fn with_page_width(mut self, width: u32) -> Self {
        self.page_width = width;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_width == 0 {
            return Err(ConfigError::Invalid("page width must be at least 1".to_string()));
        }
        if self.page_width > MAX_PAGE_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "page width {} exceeds {}",
                self.page_width, MAX_PAGE_WIDTH
            )));
        }
        Ok(())
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Layout Configuration
///
/// Flow layout parameters for text containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between neighbouring spans and past exclusion rectangles
    pub span_gap: i32,
    /// Outline every span when drawing container contents
    pub debug_outlines: bool,
}

impl LayoutConfig {
    /// Create a new layout configuration
    pub fn new() -> Self {
        Self {
            span_gap: 1,
            debug_outlines: false,
        }
    }

    /// Set the gap between spans
    pub fn with_span_gap(mut self, gap: i32) -> Self {
        self.span_gap = gap;
        self
    }

    /// Enable debug outlines
    pub fn with_debug_outlines(mut self, enabled: bool) -> Self {
        self.debug_outlines = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.span_gap < 0 {
            return Err(ConfigError::Invalid("span gap cannot be negative".to_string()));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Text Engine Configuration
///
/// Top-level configuration that encompasses all text subsystems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEngineConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Glyph atlas configuration
    pub atlas: AtlasConfig,
    /// Container layout configuration
    pub layout: LayoutConfig,
}

impl TextEngineConfig {
    /// Parse and validate a configuration document
    pub fn load(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config = Self::parse(contents, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.atlas.validate()?;
        self.layout.validate()?;
        Ok(())
    }
}

impl Config for TextEngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TextEngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.atlas.page_width, DEFAULT_PAGE_WIDTH);
        assert_eq!(config.layout.span_gap, 1);
        assert!(!config.layout.debug_outlines);
    }

    #[test]
    fn test_partial_toml() {
        let config = TextEngineConfig::from_toml_str(
            "[atlas]\npage_width = 256\n\n[layout]\ndebug_outlines = true\n",
        )
        .unwrap();
        assert_eq!(config.atlas.page_width, 256);
        assert!(config.layout.debug_outlines);
        assert_eq!(config.layout.span_gap, 1);
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn test_toml_and_ron_round_trip() {
        let config = TextEngineConfig {
            engine: EngineConfig::new().with_log_level("debug"),
            atlas: AtlasConfig::new().with_page_width(1024),
            layout: LayoutConfig::new().with_span_gap(2),
        };

        let toml = config.to_toml_string().unwrap();
        assert_eq!(TextEngineConfig::from_toml_str(&toml).unwrap(), config);

        let ron = config.render(ConfigFormat::Ron).unwrap();
        assert_eq!(TextEngineConfig::parse(&ron, ConfigFormat::Ron).unwrap(), config);
    }

    #[test]
    fn test_validation() {
        assert!(TextEngineConfig::default().validate().is_ok());

        let mut config = TextEngineConfig::default();
        config.atlas.page_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TextEngineConfig::default();
        config.layout.span_gap = -1;
        assert!(config.validate().is_err());

        assert!(TextEngineConfig::load("[atlas]\npage_width = 9000\n", ConfigFormat::Toml).is_err());
        assert!(TextEngineConfig::load("(layout: (span_gap: 3))", ConfigFormat::Ron).is_ok());
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(ConfigFormat::from_name("text.toml").unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_name("ron").unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_name("text.ini"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
