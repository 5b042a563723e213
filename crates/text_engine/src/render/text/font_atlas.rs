//! Glyph atlas
//!
//! Ordered pages plus an index from character to the page that holds it.
//! Pages are created on demand: a new page is started only when the current
//! one is full or already finalized, so at most one page (the last) is ever
//! building.

use std::collections::HashMap;

use image::GrayImage;

use crate::core::{TextError, TextResult};
use crate::foundation::math::Region;
use crate::render::backend::VideoBackend;
use crate::render::palette::{Palette, SharedPalette};

use super::atlas_page::GlyphAtlasPage;
use super::glyph::{Glyph, GlyphBitmap};

/// Collection of atlas pages owned by a font
pub struct GlyphAtlas {
    pages: Vec<GlyphAtlasPage>,
    index: HashMap<char, usize>,
    page_width: u32,
    max_height: i32,
    palette: SharedPalette,
}

impl GlyphAtlas {
    /// Create an atlas with no pages
    pub fn new(page_width: u32, max_height: i32, palette: SharedPalette) -> Self {
        Self {
            pages: Vec::new(),
            index: HashMap::new(),
            page_width,
            max_height,
            palette,
        }
    }

    /// Width of every page
    pub fn page_width(&self) -> u32 {
        self.page_width
    }

    /// Height of every page (the font's max glyph height)
    pub fn max_height(&self) -> i32 {
        self.max_height
    }

    /// Palette given to pages created from now on
    pub fn set_palette(&mut self, palette: SharedPalette) {
        self.palette = palette;
    }

    /// Pages, oldest first
    pub fn pages(&self) -> &[GlyphAtlasPage] {
        &self.pages
    }

    /// The page accepting glyphs, if any
    pub fn current_page(&self) -> Option<&GlyphAtlasPage> {
        self.pages.last().filter(|page| page.is_building())
    }

    /// Number of indexed characters
    pub fn glyph_count(&self) -> usize {
        self.index.len()
    }

    /// Check whether a character has been indexed
    pub fn contains(&self, chr: char) -> bool {
        self.index.contains_key(&chr)
    }

    /// Index of the page holding a character
    pub fn page_index(&self, chr: char) -> Option<usize> {
        self.index.get(&chr).copied()
    }

    /// Look up an indexed glyph
    pub fn glyph(&self, chr: char) -> TextResult<Glyph> {
        self.index
            .get(&chr)
            .and_then(|&page| self.pages[page].glyph_for_chr(chr))
            .ok_or(TextError::GlyphNotFound(chr))
    }

    /// Make sure a character is packed into a page
    ///
    /// Already indexed characters are left untouched, so the first bitmap
    /// registered for a character is the one kept. Otherwise the glyph goes
    /// into the current page, or into a fresh page if the current one is
    /// full or finalized.
    pub fn ensure_glyph(&mut self, chr: char, bitmap: &GlyphBitmap) -> TextResult<Glyph> {
        if let Ok(glyph) = self.glyph(chr) {
            return Ok(glyph);
        }

        let size = bitmap.size();
        if size.h > self.max_height {
            return Err(TextError::GlyphTooTall {
                chr,
                height: size.h,
                max_height: self.max_height,
            });
        }
        if i64::from(size.w) > i64::from(self.page_width) {
            return Err(TextError::GlyphTooWide {
                chr,
                width: size.w,
                page_width: self.page_width,
            });
        }

        let fits = self
            .pages
            .last_mut()
            .is_some_and(|page| page.add_glyph(chr, bitmap));
        if !fits {
            self.start_page();
            let page = self.pages.last_mut().ok_or(TextError::GlyphNotFound(chr))?;
            if !page.add_glyph(chr, bitmap) {
                return Err(TextError::GlyphTooWide {
                    chr,
                    width: size.w,
                    page_width: self.page_width,
                });
            }
        }

        self.index.insert(chr, self.pages.len() - 1);
        self.glyph(chr)
    }

    fn start_page(&mut self) {
        if let Some(page) = self.pages.last_mut() {
            page.finalize();
        }
        let height = u32::try_from(self.max_height.max(0)).unwrap_or(0);
        self.pages
            .push(GlyphAtlasPage::new(self.page_width, height, self.palette.acquire()));
        log::debug!(
            "Started atlas page {} ({}x{})",
            self.pages.len(),
            self.page_width,
            height
        );
    }

    /// Draw an indexed glyph with its top-left corner at `dest`, clipped to `clip`
    ///
    /// Returns `Ok(false)` for characters that are not indexed.
    pub fn draw_glyph(
        &mut self,
        chr: char,
        dest: Region,
        clip: Region,
        backend: &mut dyn VideoBackend,
        palette: &Palette,
    ) -> TextResult<bool> {
        match self.page_index(chr) {
            Some(page) => self.pages[page].draw(chr, dest, clip, backend, palette),
            None => Ok(false),
        }
    }

    /// Copy an indexed glyph into a sprite canvas
    pub fn copy_glyph(&self, chr: char, canvas: &mut GrayImage, x: i32, y: i32) -> bool {
        self.page_index(chr)
            .is_some_and(|page| self.pages[page].copy_glyph(chr, canvas, x, y))
    }

    /// Copy of the pixels stored for a glyph
    pub fn glyph_bitmap(&self, chr: char) -> TextResult<GlyphBitmap> {
        self.page_index(chr)
            .and_then(|page| self.pages[page].glyph_pixels(chr))
            .ok_or(TextError::GlyphNotFound(chr))?
            .to_bitmap()
    }

    /// Release every page sprite held by `backend`
    pub fn release_sprites(&mut self, backend: &mut dyn VideoBackend) {
        for page in &mut self.pages {
            page.release_sprite(backend);
        }
    }
}
