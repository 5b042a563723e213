//! # Text Engine
//!
//! Variable-width bitmap text for real-time 2D rendering.
//!
//! ## Features
//!
//! - **Glyph Atlas**: glyphs packed on demand into fixed-size pages
//! - **Fonts**: print into a screen region or render a standalone sprite
//! - **Text Containers**: incremental flow layout around exclusion rectangles
//! - **Backend Agnostic**: drawing goes through the [`render::VideoBackend`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use text_engine::prelude::*;
//!
//! struct Blocks;
//!
//! impl GlyphSource for Blocks {
//!     fn glyph_bitmap(&self, _chr: char) -> Option<GlyphBitmap> {
//!         GlyphBitmap::solid(Size::new(8, 16), 0, 255).ok()
//!     }
//! }
//!
//! fn main() -> Result<(), TextError> {
//!     let palette = SharedPalette::default();
//!     let font = Rc::new(Font::new(palette.acquire(), 16, 0).with_source(Blocks));
//!
//!     let mut container = TextContainer::new(Size::new(320, 200), font, palette);
//!     container.add_exclusion_rect(Region::new(0, 16, 64, 64))?;
//!     container.append_text("Hello")?;
//!
//!     let mut backend = SoftwareBackend::new(320, 200, PixelOwnership::ZeroCopy);
//!     container.draw_contents(0, 0, &mut backend)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod render;
pub mod ui;

#[cfg(test)]
mod tests;

pub use crate::core::{TextEngineConfig, TextError, TextResult};

/// Common imports for text engine users
pub mod prelude {
    pub use crate::{
        core::{AtlasConfig, Config, ConfigFormat, EngineConfig, LayoutConfig, TextEngineConfig, TextError, TextResult},
        foundation::{
            collections::{SpanKey, SpriteKey},
            math::{Offset, Point, Region, Size},
        },
        render::{
            Alignment, Color, Font, FontStyle, Glyph, GlyphBitmap, GlyphSource, Palette,
            PixelOwnership, SharedPalette, SoftwareBackend, Sprite, VideoBackend,
        },
        ui::{TextContainer, TextSpan},
    };
}
