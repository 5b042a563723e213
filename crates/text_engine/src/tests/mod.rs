//! Scenario tests spanning fonts, atlases and containers

mod atlas_scenarios;
mod measurement;

use std::rc::Rc;

use crate::foundation::math::Size;
use crate::render::palette::SharedPalette;
use crate::render::text::{Font, GlyphBitmap, GlyphSource};

/// Solid glyphs of one size for every character but `'~'`
pub(crate) struct FixedWidth {
    pub size: Size,
}

impl GlyphSource for FixedWidth {
    fn glyph_bitmap(&self, chr: char) -> Option<GlyphBitmap> {
        if chr == '~' {
            return None;
        }
        // encode the character in the pixels so glyphs can be told apart
        let index = (u32::from(chr) % 254 + 1) as u8;
        GlyphBitmap::solid(self.size, 0, index).ok()
    }
}

/// Font whose glyphs are all `w x h`, with line height `h`
pub(crate) fn fixed_font(w: i32, h: i32) -> Rc<Font> {
    Rc::new(Font::new(SharedPalette::default(), h, 0).with_source(FixedWidth { size: Size::new(w, h) }))
}

/// Text of `n` characters
pub(crate) fn text_of(n: usize) -> String {
    "abcdefghijklmnopqrstuvwxyz".chars().cycle().take(n).collect()
}

/// Small deterministic generator for property-style tests
pub(crate) struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Value in `low..high`
    pub fn range(&mut self, low: i32, high: i32) -> i32 {
        let span = u64::try_from(high - low).unwrap_or(1).max(1);
        low + i32::try_from(self.next_u64() % span).unwrap_or(0)
    }
}
