//! Glyph bitmaps and atlas glyph handles
//!
//! A [`GlyphBitmap`] is what a font source hands over: an owned buffer of
//! palette indices for one character. Once packed into an atlas page the
//! glyph is represented by a [`Glyph`], a small copyable handle that records
//! where its pixels live inside the page canvas.

use image::GrayImage;

use crate::core::{TextError, TextResult};
use crate::foundation::math::Size;

/// Decoded bitmap for a single character
///
/// Rows are `pitch` bytes apart; only the first `size.w` bytes of each row
/// belong to the glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    size: Size,
    descent: i32,
    pitch: u16,
    pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// Create a bitmap, checking that `pixels` covers every row
    pub fn new(size: Size, descent: i32, pitch: u16, pixels: Vec<u8>) -> TextResult<Self> {
        if size.w < 0 || size.h < 0 {
            return Err(TextError::InvalidBitmap(format!(
                "negative glyph size {}x{}",
                size.w, size.h
            )));
        }
        if i32::from(pitch) < size.w {
            return Err(TextError::InvalidBitmap(format!(
                "pitch {} is narrower than glyph width {}",
                pitch, size.w
            )));
        }
        if size.h > i32::from(u16::MAX) {
            return Err(TextError::InvalidBitmap(format!(
                "glyph height {} exceeds {}",
                size.h,
                u16::MAX
            )));
        }
        let required = required_len(size, usize::from(pitch)).ok_or_else(|| {
            TextError::InvalidBitmap(format!("{}x{} glyph is too large", size.w, size.h))
        })?;
        if pixels.len() < required {
            return Err(TextError::InvalidBitmap(format!(
                "{} bytes given, {} needed for a {}x{} glyph",
                pixels.len(),
                required,
                size.w,
                size.h
            )));
        }
        Ok(Self { size, descent, pitch, pixels })
    }

    /// Create a bitmap from tightly packed rows (`pitch == width`)
    pub fn from_rows(size: Size, descent: i32, pixels: Vec<u8>) -> TextResult<Self> {
        let pitch = u16::try_from(size.w.max(0)).map_err(|_| {
            TextError::InvalidBitmap(format!("glyph width {} does not fit a row pitch", size.w))
        })?;
        Self::new(size, descent, pitch, pixels)
    }

    /// Create a bitmap filled with a single palette index
    ///
    /// Sizes that [`GlyphBitmap::new`] would reject fail before any pixels
    /// are allocated.
    pub fn solid(size: Size, descent: i32, index: u8) -> TextResult<Self> {
        let pitch = u16::try_from(size.w.max(0)).map_err(|_| {
            TextError::InvalidBitmap(format!("glyph width {} does not fit a row pitch", size.w))
        })?;
        if size.h > i32::from(u16::MAX) {
            return Err(TextError::InvalidBitmap(format!(
                "glyph height {} exceeds {}",
                size.h,
                u16::MAX
            )));
        }
        let len = usize::try_from(size.h.max(0))
            .ok()
            .and_then(|h| h.checked_mul(usize::from(pitch)))
            .ok_or_else(|| {
                TextError::InvalidBitmap(format!("{}x{} glyph is too large", size.w, size.h))
            })?;
        Self::new(size, descent, pitch, vec![index; len])
    }

    /// Glyph dimensions
    pub fn size(&self) -> Size {
        self.size
    }

    /// Pixels below the baseline
    pub fn descent(&self) -> i32 {
        self.descent
    }

    /// Distance between rows in bytes
    pub fn pitch(&self) -> u16 {
        self.pitch
    }

    /// Raw pixel buffer including row padding
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The `size.w` pixels of row `y`
    pub fn row(&self, y: i32) -> Option<&[u8]> {
        if y < 0 || y >= self.size.h || self.size.w <= 0 {
            return None;
        }
        let start = usize::try_from(y).ok()?.checked_mul(usize::from(self.pitch))?;
        let width = usize::try_from(self.size.w).ok()?;
        self.pixels.get(start..start.checked_add(width)?)
    }
}

/// Bytes needed to hold `size` with rows `pitch` apart: `pitch * (h - 1) + w`
fn required_len(size: Size, pitch: usize) -> Option<usize> {
    if size.is_empty() {
        return Some(0);
    }
    let w = usize::try_from(size.w).ok()?;
    let h = usize::try_from(size.h).ok()?;
    pitch.checked_mul(h - 1)?.checked_add(w)
}

/// Handle to a glyph packed into an atlas page
///
/// Holds metrics and the glyph's column inside its page; the pixels stay
/// owned by the page and are reached through [`Glyph::pixels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Glyph width and height in pixels
    pub dimensions: Size,
    /// Pixels below the baseline
    pub descent: i32,
    /// Row pitch of the page canvas holding the pixels
    pub pitch: u16,
    /// First column of the glyph inside its page
    pub page_x: i32,
}

impl Glyph {
    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.dimensions.w
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.dimensions.h
    }

    /// Borrow the glyph's pixels from the page canvas that stores them
    pub fn pixels<'a>(&self, canvas: &'a GrayImage) -> GlyphPixels<'a> {
        GlyphPixels { glyph: *self, canvas }
    }
}

/// Borrowed view of a glyph's pixels, valid while its page is alive
#[derive(Debug, Clone, Copy)]
pub struct GlyphPixels<'a> {
    glyph: Glyph,
    canvas: &'a GrayImage,
}

impl<'a> GlyphPixels<'a> {
    /// Palette index at a glyph-relative pixel
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.glyph.width() || y >= self.glyph.height() {
            return None;
        }
        let px = u32::try_from(self.glyph.page_x + x).ok()?;
        let py = u32::try_from(y).ok()?;
        (px < self.canvas.width() && py < self.canvas.height())
            .then(|| self.canvas.get_pixel(px, py).0[0])
    }

    /// Row `y` of the glyph as a slice of the page canvas
    pub fn row(&self, y: i32) -> Option<&'a [u8]> {
        if y < 0 || y >= self.glyph.height() {
            return None;
        }
        let stride = self.canvas.width() as usize;
        let start = y as usize * stride + usize::try_from(self.glyph.page_x).ok()?;
        let raw: &'a [u8] = self.canvas.as_raw();
        raw.get(start..start + self.glyph.width().max(0) as usize)
    }

    /// Copy the pixels into a standalone tightly packed bitmap
    pub fn to_bitmap(&self) -> TextResult<GlyphBitmap> {
        let area = self.glyph.width().saturating_mul(self.glyph.height());
        let mut pixels = Vec::with_capacity(usize::try_from(area).unwrap_or(0));
        for y in 0..self.glyph.height() {
            pixels.extend_from_slice(self.row(y).unwrap_or_default());
        }
        GlyphBitmap::from_rows(self.glyph.dimensions, self.glyph.descent, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_bitmap_validation() {
        assert!(GlyphBitmap::new(Size::new(4, 2), 0, 3, vec![0; 8]).is_err());
        assert!(GlyphBitmap::new(Size::new(4, 2), 0, 6, vec![0; 9]).is_err());
        assert!(GlyphBitmap::new(Size::new(4, 2), 0, 6, vec![0; 10]).is_ok());
        assert!(GlyphBitmap::new(Size::new(-1, 2), 0, 6, Vec::new()).is_err());
        assert!(GlyphBitmap::from_rows(Size::new(0, 10), 0, Vec::new()).is_ok());
    }

    #[test]
    fn test_oversized_bitmaps_rejected() {
        assert!(matches!(
            GlyphBitmap::new(Size::new(10, 40_000), 0, 65_535, vec![0; 16]),
            Err(TextError::InvalidBitmap(_))
        ));
        assert!(matches!(
            GlyphBitmap::new(Size::new(10, i32::MAX), 0, 65_535, vec![0; 16]),
            Err(TextError::InvalidBitmap(_))
        ));
        assert!(matches!(
            GlyphBitmap::solid(Size::new(100_000, 100_000), 0, 1),
            Err(TextError::InvalidBitmap(_))
        ));
        assert!(matches!(
            GlyphBitmap::solid(Size::new(10, i32::MAX), 0, 1),
            Err(TextError::InvalidBitmap(_))
        ));
        let solid = GlyphBitmap::solid(Size::new(3, 2), 0, 7).unwrap();
        assert_eq!(solid.pixels(), &[7; 6]);
        assert_eq!(GlyphBitmap::solid(Size::new(0, 5), 0, 7).unwrap().pixels().len(), 0);
    }

    #[test]
    fn test_bitmap_rows_skip_padding() {
        let bitmap = GlyphBitmap::new(Size::new(2, 2), 1, 3, vec![1, 2, 9, 3, 4]).unwrap();
        assert_eq!(bitmap.row(0), Some(&[1, 2][..]));
        assert_eq!(bitmap.row(1), Some(&[3, 4][..]));
        assert_eq!(bitmap.row(2), None);
        assert_eq!(bitmap.descent(), 1);
    }

    #[test]
    fn test_glyph_pixels_view() {
        let mut canvas = GrayImage::new(8, 2);
        canvas.put_pixel(5, 1, Luma([42]));
        let glyph = Glyph { dimensions: Size::new(3, 2), descent: 0, pitch: 8, page_x: 4 };

        let view = glyph.pixels(&canvas);
        assert_eq!(view.get(1, 1), Some(42));
        assert_eq!(view.get(3, 0), None);
        assert_eq!(view.row(1), Some(&[0, 42, 0][..]));

        let bitmap = view.to_bitmap().unwrap();
        assert_eq!(bitmap.size(), Size::new(3, 2));
        assert_eq!(bitmap.pixels(), &[0, 0, 0, 0, 42, 0]);
    }
}
