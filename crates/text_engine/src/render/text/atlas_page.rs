//! Glyph atlas pages
//!
//! A page is a `page_width x max_height` canvas that packs glyphs in a
//! single row, left to right. It starts out building, accepting glyphs, and
//! is finalized exactly once: on its first draw, or when the atlas retires
//! it for a fresh page. Finalized pages never accept glyphs again.

use std::collections::HashMap;
use std::rc::Rc;

use image::GrayImage;

use crate::core::{TextError, TextResult};
use crate::foundation::collections::SpriteKey;
use crate::foundation::math::Region;
use crate::render::backend::{PixelOwnership, SpriteLease, VideoBackend};
use crate::render::palette::{Palette, SharedPalette};

use super::glyph::{Glyph, GlyphBitmap, GlyphPixels};

enum PageState {
    /// Page owns its canvas and accepts glyphs
    Building { canvas: GrayImage },
    /// Canvas is frozen; the sprite is created on first draw
    Finalized {
        pixels: Rc<GrayImage>,
        sprite: Option<PageSprite>,
    },
}

/// Backend sprite of a page; dropping the lease lets the backend free it
struct PageSprite {
    key: SpriteKey,
    _lease: SpriteLease,
}

/// Single-row strip packer for glyph bitmaps
pub struct GlyphAtlasPage {
    state: PageState,
    cursor: i32,
    glyphs: HashMap<char, Glyph>,
    palette: SharedPalette,
}

impl GlyphAtlasPage {
    /// Create an empty building page
    pub fn new(width: u32, height: u32, palette: SharedPalette) -> Self {
        Self {
            state: PageState::Building { canvas: GrayImage::new(width, height) },
            cursor: 0,
            glyphs: HashMap::new(),
            palette,
        }
    }

    /// Page width in pixels
    pub fn width(&self) -> u32 {
        self.canvas().width()
    }

    /// Page height in pixels
    pub fn height(&self) -> u32 {
        self.canvas().height()
    }

    /// Next free column
    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    /// Palette the page sprite is created with
    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    /// Whether the page still accepts glyphs
    pub fn is_building(&self) -> bool {
        matches!(self.state, PageState::Building { .. })
    }

    /// Backend sprite created for this page, if it has been drawn
    pub fn sprite(&self) -> Option<SpriteKey> {
        match &self.state {
            PageState::Finalized { sprite, .. } => sprite.as_ref().map(|sprite| sprite.key),
            PageState::Building { .. } => None,
        }
    }

    /// Number of glyphs packed into the page
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The page canvas, whichever state the page is in
    pub fn canvas(&self) -> &GrayImage {
        match &self.state {
            PageState::Building { canvas } => canvas,
            PageState::Finalized { pixels, .. } => pixels,
        }
    }

    /// Pack a glyph at the cursor
    ///
    /// Returns `false` without touching the page when the glyph does not
    /// fit in the remaining width or the page is finalized. Rows beyond the
    /// page height are dropped.
    pub fn add_glyph(&mut self, chr: char, bitmap: &GlyphBitmap) -> bool {
        let PageState::Building { canvas } = &mut self.state else {
            return false;
        };
        let size = bitmap.size();
        let page_width = i32::try_from(canvas.width()).unwrap_or(i32::MAX);
        if self.cursor + size.w > page_width {
            return false;
        }

        let rows = size.h.min(i32::try_from(canvas.height()).unwrap_or(i32::MAX));
        let stride = canvas.width() as usize;
        let raw: &mut [u8] = canvas;
        for y in 0..rows {
            if let Some(row) = bitmap.row(y) {
                let start = y as usize * stride + self.cursor as usize;
                raw[start..start + row.len()].copy_from_slice(row);
            }
        }

        let glyph = Glyph {
            dimensions: size,
            descent: bitmap.descent(),
            pitch: u16::try_from(stride).unwrap_or(u16::MAX),
            page_x: self.cursor,
        };
        log::trace!("Packed {:?} ({}x{}) at column {}", chr, size.w, size.h, self.cursor);
        self.glyphs.insert(chr, glyph);
        self.cursor += size.w;
        true
    }

    /// Glyph handle for a character packed into this page
    pub fn glyph_for_chr(&self, chr: char) -> Option<Glyph> {
        self.glyphs.get(&chr).copied()
    }

    /// Borrow the pixels of a packed glyph
    pub fn glyph_pixels(&self, chr: char) -> Option<GlyphPixels<'_>> {
        self.glyph_for_chr(chr).map(|glyph| glyph.pixels(self.canvas()))
    }

    /// Freeze the canvas; no further glyphs can be added
    ///
    /// Does nothing on a page that is already finalized.
    pub fn finalize(&mut self) {
        if let PageState::Building { canvas } = &mut self.state {
            let canvas = std::mem::replace(canvas, GrayImage::new(0, 0));
            log::debug!(
                "Finalized atlas page ({} glyphs, {}px used)",
                self.glyphs.len(),
                self.cursor
            );
            self.state = PageState::Finalized { pixels: Rc::new(canvas), sprite: None };
        }
    }

    /// Blit a glyph with its top-left corner at `dest`, clipped to `clip`
    ///
    /// Finalizes the page first if it is still building, and creates the
    /// page sprite on the first draw. Zero-copy backends share the page
    /// buffer; copying backends receive their own copy while the page keeps
    /// its pixels for sprite rendering.
    pub fn draw(
        &mut self,
        chr: char,
        dest: Region,
        clip: Region,
        backend: &mut dyn VideoBackend,
        palette: &Palette,
    ) -> TextResult<bool> {
        let Some(glyph) = self.glyph_for_chr(chr) else {
            return Ok(false);
        };
        let sprite = self.ensure_sprite(backend)?;

        let Some(visible) = dest.intersection(&clip) else {
            return Ok(true);
        };
        let src = Region::new(
            glyph.page_x + visible.x - dest.x,
            visible.y - dest.y,
            visible.w,
            visible.h,
        );
        backend.blit_sprite(sprite, src, visible, palette)?;
        Ok(true)
    }

    fn ensure_sprite(&mut self, backend: &mut dyn VideoBackend) -> TextResult<SpriteKey> {
        self.finalize();
        if let PageState::Finalized { pixels, sprite } = &mut self.state {
            if sprite.is_none() {
                let lease = SpriteLease::new();
                let key = match backend.pixel_ownership() {
                    PixelOwnership::ZeroCopy => {
                        backend.adopt_sprite(Rc::clone(pixels), &self.palette, lease.watch())?
                    }
                    PixelOwnership::Copy => {
                        backend.create_sprite(pixels, &self.palette, lease.watch())?
                    }
                };
                *sprite = Some(PageSprite { key, _lease: lease });
            }
        }
        self.sprite()
            .ok_or_else(|| TextError::Backend("atlas page has no sprite".to_string()))
    }

    /// Copy a glyph's non-transparent pixels into a canvas at `(x, y)`
    ///
    /// Pixels falling outside the canvas are dropped. Returns `false` if the
    /// glyph is not on this page.
    pub fn copy_glyph(&self, chr: char, canvas: &mut GrayImage, x: i32, y: i32) -> bool {
        let Some(glyph) = self.glyph_for_chr(chr) else {
            return false;
        };
        let pixels = glyph.pixels(self.canvas());
        for gy in 0..glyph.height() {
            let Ok(cy) = u32::try_from(y + gy) else { continue };
            if cy >= canvas.height() {
                break;
            }
            for gx in 0..glyph.width() {
                let Ok(cx) = u32::try_from(x + gx) else { continue };
                if cx >= canvas.width() {
                    break;
                }
                match pixels.get(gx, gy) {
                    Some(0) | None => {}
                    Some(index) => canvas.put_pixel(cx, cy, image::Luma([index])),
                }
            }
        }
        true
    }

    /// Release the page sprite; the next draw creates a new one
    ///
    /// Dropping the page without calling this still lets the backend free
    /// the sprite, since the page holds the sprite's lease.
    pub fn release_sprite(&mut self, backend: &mut dyn VideoBackend) {
        if let PageState::Finalized { sprite, .. } = &mut self.state {
            if let Some(sprite) = sprite.take() {
                backend.release_sprite(sprite.key);
            }
        }
    }
}
