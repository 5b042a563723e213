//! # Rendering
//!
//! Everything between a string and pixels on screen: palettes, the video
//! backend seam, a software implementation of it, and the text system.

pub mod backend;
pub mod palette;
pub mod software;
pub mod text;

pub use backend::{PixelOwnership, Sprite, SpriteLease, SpriteWatch, VideoBackend};
pub use palette::{Color, Palette, SharedPalette, PALETTE_SIZE};
pub use software::{BackendStats, SoftwareBackend};
pub use text::{Alignment, Font, FontStyle, Glyph, GlyphAtlas, GlyphAtlasPage, GlyphBitmap, GlyphSource};
