//! Software video backend
//!
//! CPU framebuffer implementation of [`VideoBackend`]. Sprites are either
//! shared with their creator or copied, depending on the ownership mode
//! chosen at construction, so both atlas finalization paths can run
//! without a GPU. Sprites whose owner dropped its lease are freed on the
//! next sprite creation or atlas blit.

use std::rc::Rc;

use image::{GrayImage, Rgba, RgbaImage};
use slotmap::SlotMap;

use crate::core::{TextError, TextResult};
use crate::foundation::collections::SpriteKey;
use crate::foundation::math::Region;
use crate::render::backend::{PixelOwnership, Sprite, SpriteWatch, VideoBackend};
use crate::render::palette::{Color, Palette};

enum SpritePixels {
    Shared(Rc<GrayImage>),
    Owned(GrayImage),
}

struct SpriteEntry {
    pixels: SpritePixels,
    owner: SpriteWatch,
}

impl SpritePixels {
    fn image(&self) -> &GrayImage {
        match self {
            Self::Shared(pixels) => pixels,
            Self::Owned(pixels) => pixels,
        }
    }
}

/// Counters describing backend activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStats {
    /// Sprites created from a copied buffer
    pub sprites_copied: usize,
    /// Sprites sharing their creator's buffer
    pub sprites_adopted: usize,
    /// Sprite blits (atlas and detached)
    pub blits: usize,
    /// Debug rectangles drawn
    pub rects: usize,
}

/// CPU framebuffer backend
pub struct SoftwareBackend {
    framebuffer: RgbaImage,
    sprites: SlotMap<SpriteKey, SpriteEntry>,
    ownership: PixelOwnership,
    stats: BackendStats,
}

impl SoftwareBackend {
    /// Create a backend with a transparent framebuffer
    pub fn new(width: u32, height: u32, ownership: PixelOwnership) -> Self {
        Self {
            framebuffer: RgbaImage::new(width, height),
            sprites: SlotMap::with_key(),
            ownership,
            stats: BackendStats::default(),
        }
    }

    /// The framebuffer drawn into so far
    pub fn framebuffer(&self) -> &RgbaImage {
        &self.framebuffer
    }

    /// Color at a framebuffer pixel, or `None` outside it
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.framebuffer.width() || y >= self.framebuffer.height() {
            return None;
        }
        let [r, g, b, a] = self.framebuffer.get_pixel(x, y).0;
        Some(Color::new(r, g, b, a))
    }

    /// Reset every framebuffer pixel to transparent
    pub fn clear(&mut self) {
        for pixel in self.framebuffer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Number of live sprites
    ///
    /// Sprites whose owner has gone away are not counted, even before they
    /// are pruned.
    pub fn sprite_count(&self) -> usize {
        self.sprites.values().filter(|entry| entry.owner.is_alive()).count()
    }

    /// Number of sprites still stored, including orphaned ones not yet pruned
    pub fn stored_sprites(&self) -> usize {
        self.sprites.len()
    }

    /// Free every sprite whose owner dropped its lease
    ///
    /// Returns the number of sprites freed.
    pub fn prune(&mut self) -> usize {
        let before = self.sprites.len();
        self.sprites.retain(|_, entry| entry.owner.is_alive());
        let freed = before - self.sprites.len();
        if freed > 0 {
            log::debug!("Pruned {} orphaned sprites", freed);
        }
        freed
    }

    /// Activity counters
    pub fn stats(&self) -> BackendStats {
        self.stats
    }

    /// Check whether a live sprite shares its buffer with its creator
    pub fn is_shared(&self, sprite: SpriteKey) -> Option<bool> {
        self.sprites
            .get(sprite)
            .map(|entry| matches!(entry.pixels, SpritePixels::Shared(_)))
    }
}

fn put(framebuffer: &mut RgbaImage, x: i32, y: i32, color: Color) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x < framebuffer.width() && y < framebuffer.height() {
        framebuffer.put_pixel(x, y, Rgba(color.to_array()));
    }
}

/// Copy non-transparent pixels of `src` from `pixels` to `dest`, clipped to `dest`
fn blit_indexed(
    framebuffer: &mut RgbaImage,
    pixels: &GrayImage,
    src: Region,
    dest: Region,
    palette: &Palette,
) {
    let width = i32::try_from(pixels.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(pixels.height()).unwrap_or(i32::MAX);
    let Some(src) = src.intersection(&Region::new(0, 0, width, height)) else {
        return;
    };
    for dy in 0..src.h.min(dest.h) {
        for dx in 0..src.w.min(dest.w) {
            // src was clipped to the image, so the coordinates are non-negative
            let index = pixels.get_pixel((src.x + dx) as u32, (src.y + dy) as u32).0[0];
            if index != 0 {
                put(framebuffer, dest.x + dx, dest.y + dy, palette.color(index));
            }
        }
    }
}

impl VideoBackend for SoftwareBackend {
    fn pixel_ownership(&self) -> PixelOwnership {
        self.ownership
    }

    fn create_sprite(
        &mut self,
        pixels: &GrayImage,
        _palette: &Palette,
        owner: SpriteWatch,
    ) -> TextResult<SpriteKey> {
        self.prune();
        self.stats.sprites_copied += 1;
        Ok(self.sprites.insert(SpriteEntry { pixels: SpritePixels::Owned(pixels.clone()), owner }))
    }

    fn adopt_sprite(
        &mut self,
        pixels: Rc<GrayImage>,
        _palette: &Palette,
        owner: SpriteWatch,
    ) -> TextResult<SpriteKey> {
        if self.ownership != PixelOwnership::ZeroCopy {
            return Err(TextError::Backend(
                "backend copies sprite pixels and cannot adopt buffers".to_string(),
            ));
        }
        self.prune();
        self.stats.sprites_adopted += 1;
        Ok(self.sprites.insert(SpriteEntry { pixels: SpritePixels::Shared(pixels), owner }))
    }

    fn blit_sprite(
        &mut self,
        sprite: SpriteKey,
        src: Region,
        dest: Region,
        palette: &Palette,
    ) -> TextResult<()> {
        self.prune();
        let entry = self
            .sprites
            .get(sprite)
            .ok_or_else(|| TextError::Backend(format!("unknown sprite {sprite:?}")))?;
        self.stats.blits += 1;
        blit_indexed(&mut self.framebuffer, entry.pixels.image(), src, dest, palette);
        Ok(())
    }

    fn blit_pixels(&mut self, sprite: &Sprite, dest: Region) -> TextResult<()> {
        self.stats.blits += 1;
        let src = Region::new(0, 0, sprite.width(), sprite.height());
        blit_indexed(&mut self.framebuffer, sprite.pixels(), src, dest, sprite.palette());
        Ok(())
    }

    fn draw_rect(&mut self, region: Region, color: Color) -> TextResult<()> {
        self.stats.rects += 1;
        if region.is_empty() {
            return Ok(());
        }
        for x in region.x..region.right() {
            put(&mut self.framebuffer, x, region.y, color);
            put(&mut self.framebuffer, x, region.bottom() - 1, color);
        }
        for y in region.y..region.bottom() {
            put(&mut self.framebuffer, region.x, y, color);
            put(&mut self.framebuffer, region.right() - 1, y, color);
        }
        Ok(())
    }

    fn release_sprite(&mut self, sprite: SpriteKey) {
        self.sprites.remove(sprite);
    }
}
