//! Text rendering system
//!
//! Glyph atlas management, fonts and text layout.

pub mod atlas_page;
pub mod font;
pub mod font_atlas;
pub mod glyph;
pub mod text_layout;

pub use atlas_page::*;
pub use font::*;
pub use font_atlas::*;
pub use glyph::*;
pub use text_layout::*;
