//! Bitmap fonts
//!
//! A [`Font`] owns a [`GlyphAtlas`] and a default palette. Glyphs come either
//! from a [`GlyphSource`], which is asked on demand the first time a
//! character is printed or measured, or are registered up front with
//! [`Font::create_glyph`].
//!
//! Fonts are shared between spans and containers through `Rc<Font>`, so
//! printing and measuring take `&self` and the atlas lives in a `RefCell`.

use std::cell::{Ref, RefCell};
use std::fmt;

use bitflags::bitflags;
use image::GrayImage;

use crate::core::{AtlasConfig, TextResult};
use crate::foundation::math::{Region, Size};
use crate::render::backend::{Sprite, VideoBackend};
use crate::render::palette::{Palette, SharedPalette};

use super::font_atlas::GlyphAtlas;
use super::glyph::{Glyph, GlyphBitmap};
use super::text_layout::TextLayout;

/// Longest font name kept, in characters
pub const MAX_FONT_NAME: usize = 19;

/// Length of a resource reference name, in characters
pub const RES_REF_LEN: usize = 8;

bitflags! {
    /// Text alignment within a print region
    ///
    /// Horizontal and vertical flags combine; `LEFT` and `TOP` are the
    /// defaults when no flag of their axis is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Alignment: u8 {
        /// Lines start at the left edge
        const LEFT = 0x00;
        /// Lines are centered horizontally
        const CENTER = 0x01;
        /// Lines end at the right edge
        const RIGHT = 0x02;
        /// Text block sits at the bottom
        const BOTTOM = 0x04;
        /// Text block starts at the top
        const TOP = 0x10;
        /// Text block is centered vertically
        const MIDDLE = 0x20;
        /// Never wrap; drop newlines and cut the line at the region width
        const SINGLE_LINE = 0x40;
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::LEFT | Self::TOP
    }
}

bitflags! {
    /// Style a font source was rendered with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        /// Regular glyphs
        const NORMAL = 0x00;
        /// Bold
        const BOLD = 0x01;
        /// Italic
        const ITALIC = 0x02;
        /// Underlined
        const UNDERLINE = 0x04;
    }
}

/// Supplier of glyph bitmaps for a font
///
/// Decoders for outline or bitmap font formats implement this trait. The
/// font asks for each character once; the first bitmap returned is kept for
/// the font's lifetime.
pub trait GlyphSource {
    /// Bitmap for a character, or `None` if the source does not cover it
    fn glyph_bitmap(&self, chr: char) -> Option<GlyphBitmap>;

    /// Nominal point size, 0 when unknown
    fn point_size(&self) -> u16 {
        0
    }

    /// Style the glyphs were rendered with
    fn style(&self) -> FontStyle {
        FontStyle::NORMAL
    }

    /// Horizontal adjustment between an ordered pair of characters
    fn kerning_offset(&self, _left: char, _right: char) -> i32 {
        0
    }
}

/// Bitmap font backed by a glyph atlas
pub struct Font {
    name: String,
    res_refs: Vec<String>,
    palette: RefCell<SharedPalette>,
    max_height: i32,
    descent: i32,
    atlas: RefCell<GlyphAtlas>,
    source: Option<Box<dyn GlyphSource>>,
}

impl Font {
    /// Create a font with default atlas pages
    ///
    /// `max_height` is the line height and the height of every atlas page;
    /// `descent` is how far the baseline sits above the bottom of a line.
    pub fn new(palette: SharedPalette, max_height: i32, descent: i32) -> Self {
        Self::build(palette, max_height, descent, AtlasConfig::default().page_width)
    }

    /// Create a font whose atlas pages follow `config`
    pub fn with_config(
        palette: SharedPalette,
        max_height: i32,
        descent: i32,
        config: &AtlasConfig,
    ) -> TextResult<Self> {
        config.validate()?;
        Ok(Self::build(palette, max_height, descent, config.page_width))
    }

    fn build(palette: SharedPalette, max_height: i32, descent: i32, page_width: u32) -> Self {
        let atlas = GlyphAtlas::new(page_width, max_height, palette.acquire());
        Self {
            name: String::new(),
            res_refs: Vec::new(),
            palette: RefCell::new(palette),
            max_height,
            descent,
            atlas: RefCell::new(atlas),
            source: None,
        }
    }

    /// Attach the source glyphs are requested from
    pub fn with_source(mut self, source: impl GlyphSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Font name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the font name, keeping at most [`MAX_FONT_NAME`] characters
    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(MAX_FONT_NAME).collect();
    }

    /// Associate a resource name with this font
    ///
    /// Names are compared case-insensitively on their first
    /// [`RES_REF_LEN`] characters. Returns `false` for empty or already
    /// known names.
    pub fn add_res_ref(&mut self, name: &str) -> bool {
        let name = normalize_res_ref(name);
        if name.is_empty() || self.res_refs.contains(&name) {
            return false;
        }
        self.res_refs.push(name);
        true
    }

    /// Check whether a resource name refers to this font
    pub fn matches_res_ref(&self, name: &str) -> bool {
        let name = normalize_res_ref(name);
        self.res_refs.iter().any(|res_ref| *res_ref == name)
    }

    /// Resource names associated with this font
    pub fn res_refs(&self) -> &[String] {
        &self.res_refs
    }

    /// Default palette, as a new reference
    pub fn palette(&self) -> SharedPalette {
        self.palette.borrow().acquire()
    }

    /// Replace the default palette
    ///
    /// Works on a font already shared with spans and containers. Later
    /// prints and renders without an explicit palette use the new one.
    /// Atlas pages created afterwards use it too; existing pages keep their
    /// own reference to the old one.
    pub fn set_palette(&self, palette: SharedPalette) {
        self.atlas.borrow_mut().set_palette(palette.acquire());
        *self.palette.borrow_mut() = palette;
    }

    /// Line height in pixels
    pub fn max_height(&self) -> i32 {
        self.max_height
    }

    /// Distance from the baseline to the bottom of a line
    pub fn descent(&self) -> i32 {
        self.descent
    }

    /// Nominal point size reported by the glyph source
    pub fn point_size(&self) -> u16 {
        self.source.as_ref().map_or(0, |source| source.point_size())
    }

    /// Style reported by the glyph source
    pub fn style(&self) -> FontStyle {
        self.source.as_ref().map_or(FontStyle::NORMAL, |source| source.style())
    }

    /// Kerning between an ordered pair of characters
    pub fn kerning_offset(&self, left: char, right: char) -> i32 {
        self.source
            .as_ref()
            .map_or(0, |source| source.kerning_offset(left, right))
    }

    /// Read access to the glyph atlas
    pub fn atlas(&self) -> Ref<'_, GlyphAtlas> {
        self.atlas.borrow()
    }

    /// Register a glyph bitmap for a character
    ///
    /// Characters that already have a glyph keep it.
    pub fn create_glyph(&self, chr: char, bitmap: &GlyphBitmap) -> TextResult<Glyph> {
        self.atlas.borrow_mut().ensure_glyph(chr, bitmap)
    }

    /// Metrics of a registered glyph
    pub fn get_glyph(&self, chr: char) -> TextResult<Glyph> {
        self.atlas.borrow().glyph(chr)
    }

    /// Copy of the pixels stored for a registered glyph
    pub fn glyph_bitmap(&self, chr: char) -> TextResult<GlyphBitmap> {
        self.atlas.borrow().glyph_bitmap(chr)
    }

    fn ensure_glyphs(&self, text: &[char]) {
        let Some(source) = &self.source else {
            return;
        };
        let mut atlas = self.atlas.borrow_mut();
        for &chr in text {
            if chr == '\n' || atlas.contains(chr) {
                continue;
            }
            match source.glyph_bitmap(chr) {
                Some(bitmap) => {
                    if let Err(err) = atlas.ensure_glyph(chr, &bitmap) {
                        log::warn!("Skipping glyph {:?}: {}", chr, err);
                    }
                }
                None => log::trace!("Source has no glyph for {:?}", chr),
            }
        }
    }

    fn layout(&self, text: &[char], area: Size, alignment: Alignment) -> TextLayout {
        let atlas = self.atlas.borrow();
        TextLayout::new(text, self.max_height, area, alignment, |prev, chr| {
            let glyph = atlas.glyph(chr).ok()?;
            let kerning = prev.map_or(0, |prev| self.kerning_offset(prev, chr));
            Some((kerning, glyph.width()))
        })
    }

    /// Offset from the top of a line to the top of a glyph
    fn glyph_top(&self, glyph: &Glyph) -> i32 {
        self.max_height - self.descent - glyph.height() + glyph.descent
    }

    /// Draw text into a screen region
    ///
    /// Glyphs missing from the font are skipped. Lines that do not fit the
    /// region height are not printed, and glyphs are clipped to the region.
    /// Returns the number of characters consumed, which is the full length
    /// of `text` when everything fit.
    pub fn print(
        &self,
        region: Region,
        text: &str,
        palette: Option<&Palette>,
        alignment: Alignment,
        backend: &mut dyn VideoBackend,
    ) -> TextResult<usize> {
        let chars: Vec<char> = text.chars().collect();
        self.print_chars(region, &chars, palette, alignment, backend)
    }

    /// [`Font::print`] for narrow strings, one character per byte
    pub fn print_narrow(
        &self,
        region: Region,
        text: &[u8],
        palette: Option<&Palette>,
        alignment: Alignment,
        backend: &mut dyn VideoBackend,
    ) -> TextResult<usize> {
        let chars: Vec<char> = text.iter().copied().map(char::from).collect();
        self.print_chars(region, &chars, palette, alignment, backend)
    }

    fn print_chars(
        &self,
        region: Region,
        text: &[char],
        palette: Option<&Palette>,
        alignment: Alignment,
        backend: &mut dyn VideoBackend,
    ) -> TextResult<usize> {
        if region.is_empty() {
            return Ok(0);
        }
        self.ensure_glyphs(text);
        let layout = self.layout(text, region.dimensions(), alignment);
        let fallback = self.palette();
        let palette = palette.unwrap_or(&*fallback);

        let mut atlas = self.atlas.borrow_mut();
        for (row, line) in layout.lines().iter().enumerate() {
            let origin = layout.line_origin(row, region.dimensions());
            for placed in &line.glyphs {
                let Ok(glyph) = atlas.glyph(placed.chr) else {
                    continue;
                };
                let dest = Region::new(
                    region.x + origin.x + placed.x,
                    region.y + origin.y + self.glyph_top(&glyph),
                    glyph.width(),
                    glyph.height(),
                );
                atlas.draw_glyph(placed.chr, dest, region, backend, palette)?;
            }
        }
        Ok(layout.consumed())
    }

    /// Size of the block `text` occupies
    ///
    /// Positive dimensions of `constraint` limit the width lines may take
    /// and the height of lines that are kept. The result matches the sprite
    /// [`Font::render_text_as_sprite`] produces when asked to size itself.
    pub fn string_size(&self, text: &str, constraint: Option<Size>) -> Size {
        let chars: Vec<char> = text.chars().collect();
        self.ensure_glyphs(&chars);
        self.layout(&chars, constraint.unwrap_or_default(), Alignment::default())
            .bounds()
            .size()
    }

    /// Render text into a standalone sprite
    ///
    /// A non-positive dimension of `size` is replaced by the measured extent
    /// of the text. Pixels are copied out of the atlas pages, so no backend
    /// is involved and the pages are not finalized. Returns the sprite and
    /// the number of characters consumed.
    pub fn render_text_as_sprite(
        &self,
        text: &str,
        size: Size,
        alignment: Alignment,
        palette: Option<&SharedPalette>,
    ) -> TextResult<(Sprite, usize)> {
        let chars: Vec<char> = text.chars().collect();
        self.ensure_glyphs(&chars);

        let mut size = Size::new(size.w.max(0), size.h.max(0));
        if size.w == 0 || size.h == 0 {
            let measured = self.layout(&chars, size, alignment).bounds();
            if size.w == 0 {
                size.w = measured.width();
            }
            if size.h == 0 {
                size.h = measured.height();
            }
        }

        let layout = self.layout(&chars, size, alignment);
        let mut canvas = GrayImage::new(
            u32::try_from(size.w).unwrap_or(0),
            u32::try_from(size.h).unwrap_or(0),
        );
        let atlas = self.atlas.borrow();
        for (row, line) in layout.lines().iter().enumerate() {
            let origin = layout.line_origin(row, size);
            for placed in &line.glyphs {
                let Ok(glyph) = atlas.glyph(placed.chr) else {
                    continue;
                };
                atlas.copy_glyph(
                    placed.chr,
                    &mut canvas,
                    origin.x + placed.x,
                    origin.y + self.glyph_top(&glyph),
                );
            }
        }

        let palette = palette.map_or_else(|| self.palette(), SharedPalette::acquire);
        log::trace!("Rendered {}x{} text sprite", size.w, size.h);
        Ok((Sprite::new(canvas, palette), layout.consumed()))
    }

    /// Release the backend sprites of every atlas page
    pub fn release_sprites(&self, backend: &mut dyn VideoBackend) {
        self.atlas.borrow_mut().release_sprites(backend);
    }
}

fn normalize_res_ref(name: &str) -> String {
    name.chars().take(RES_REF_LEN).collect::<String>().to_lowercase()
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atlas = self.atlas.borrow();
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("max_height", &self.max_height)
            .field("descent", &self.descent)
            .field("glyphs", &atlas.glyph_count())
            .field("pages", &atlas.pages().len())
            .finish_non_exhaustive()
    }
}
