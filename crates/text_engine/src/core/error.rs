//! Error types for the text subsystem

use crate::config::ConfigError;

/// Result type for text operations
pub type TextResult<T> = Result<T, TextError>;

/// Errors that can occur while building glyph atlases, printing or laying out text
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// Requested character was not registered in the font atlas
    #[error("Character {0:?} not found in atlas")]
    GlyphNotFound(char),

    /// Glyph can never fit on an empty atlas page
    #[error("Glyph {chr:?} is {width}px wide but atlas pages are {page_width}px wide")]
    GlyphTooWide {
        /// Character code of the glyph
        chr: char,
        /// Glyph width in pixels
        width: i32,
        /// Atlas page width in pixels
        page_width: u32,
    },

    /// Glyph is taller than the font's line height
    #[error("Glyph {chr:?} is {height}px tall but the font max height is {max_height}px")]
    GlyphTooTall {
        /// Character code of the glyph
        chr: char,
        /// Glyph height in pixels
        height: i32,
        /// Font max height in pixels
        max_height: i32,
    },

    /// Source bitmap does not describe its pixel buffer
    #[error("Invalid glyph bitmap: {0}")]
    InvalidBitmap(String),

    /// Requested layout mode is not implemented
    #[error("Unsupported layout: {0}")]
    Unsupported(String),

    /// Span key does not belong to the container
    #[error("Span not found in container")]
    SpanNotFound,

    /// Exclusion rectangles must cover at least one pixel
    #[error("Exclusion rectangle {0:?} is empty")]
    EmptyExclusion(crate::foundation::math::Region),

    /// Drawing backend rejected an operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Region;

    #[test]
    fn test_error_display() {
        let err = TextError::GlyphTooWide { chr: 'W', width: 600, page_width: 512 };
        let msg = err.to_string();
        assert!(msg.contains("600px"));
        assert!(msg.contains("512px"));

        let err = TextError::EmptyExclusion(Region::new(0, 0, 0, 10));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: TextError = ConfigError::Invalid("page width must be at least 1".into()).into();
        assert!(matches!(err, TextError::Config(_)));
        assert!(err.to_string().contains("page width"));
    }
}
