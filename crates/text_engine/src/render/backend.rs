//! Video Backend Trait
//!
//! Defines the interface between the text system and the drawing backend.
//! Keeps fonts and containers independent of the blitter or GPU API that
//! finally puts pixels on screen.

use std::rc::{Rc, Weak};

use image::GrayImage;

use crate::core::TextResult;
use crate::foundation::collections::SpriteKey;
use crate::foundation::math::{Region, Size};
use crate::render::palette::{Color, Palette, SharedPalette};

/// Who owns a pixel buffer after it has been turned into a backend sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOwnership {
    /// The backend keeps a reference to the caller's buffer (software blitters)
    ZeroCopy,
    /// The backend uploads a private copy (texture-backed renderers)
    Copy,
}

/// Keeps a backend sprite alive
///
/// Whoever asks a backend for a sprite holds the lease; the backend gets a
/// [`SpriteWatch`] on it. Once the lease is dropped the backend may free the
/// sprite without being told.
#[derive(Debug, Default)]
pub struct SpriteLease(Rc<()>);

impl SpriteLease {
    /// Create a fresh lease
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend-side view of this lease
    pub fn watch(&self) -> SpriteWatch {
        SpriteWatch(Rc::downgrade(&self.0))
    }
}

/// Backend-side view of a [`SpriteLease`]
#[derive(Debug, Clone)]
pub struct SpriteWatch(Weak<()>);

impl SpriteWatch {
    /// Whether the lease is still held
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Indexed-color image detached from any atlas page
///
/// Produced by [`Font::render_text_as_sprite`](crate::render::text::Font::render_text_as_sprite)
/// and cached by text spans. Pixel value 0 is transparent.
#[derive(Debug, Clone)]
pub struct Sprite {
    pixels: GrayImage,
    palette: SharedPalette,
}

impl Sprite {
    /// Create a sprite from indexed pixels and the palette used to draw them
    pub fn new(pixels: GrayImage, palette: SharedPalette) -> Self {
        Self { pixels, palette }
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        i32::try_from(self.pixels.width()).unwrap_or(i32::MAX)
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        i32::try_from(self.pixels.height()).unwrap_or(i32::MAX)
    }

    /// Dimensions of the sprite
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Indexed pixel data
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Palette the sprite is drawn with
    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    /// Palette index at a pixel, or `None` outside the sprite
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.pixels.width() && y < self.pixels.height()).then(|| self.pixels.get_pixel(x, y).0[0])
    }
}

/// Backend-agnostic drawing interface
///
/// All calls happen on the thread that owns the drawing context.
pub trait VideoBackend {
    /// Report whether sprites share the caller's pixels or copy them
    ///
    /// Atlas pages query this once, when they are finalized, to decide
    /// whether to hand their buffer over or let the backend copy it.
    fn pixel_ownership(&self) -> PixelOwnership;

    /// Create a sprite from a private copy of `pixels`
    ///
    /// The sprite lives until [`release_sprite`](Self::release_sprite) is
    /// called or the lease behind `owner` is dropped.
    fn create_sprite(
        &mut self,
        pixels: &GrayImage,
        palette: &Palette,
        owner: SpriteWatch,
    ) -> TextResult<SpriteKey>;

    /// Create a sprite that shares `pixels` with the caller
    ///
    /// Lifetime follows `owner` as for [`create_sprite`](Self::create_sprite).
    fn adopt_sprite(
        &mut self,
        pixels: Rc<GrayImage>,
        palette: &Palette,
        owner: SpriteWatch,
    ) -> TextResult<SpriteKey>;

    /// Blit the `src` rectangle of a backend sprite into `dest`
    ///
    /// `dest` also acts as the clip rectangle.
    fn blit_sprite(
        &mut self,
        sprite: SpriteKey,
        src: Region,
        dest: Region,
        palette: &Palette,
    ) -> TextResult<()>;

    /// Blit a detached sprite with its top-left corner at `dest`, clipped to `dest`
    fn blit_pixels(&mut self, sprite: &Sprite, dest: Region) -> TextResult<()>;

    /// Outline a rectangle (debug drawing)
    fn draw_rect(&mut self, region: Region, color: Color) -> TextResult<()>;

    /// Release a sprite created by this backend
    fn release_sprite(&mut self, sprite: SpriteKey);
}
