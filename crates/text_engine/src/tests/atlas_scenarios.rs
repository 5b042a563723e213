//! Atlas packing and glyph index scenarios

use crate::foundation::math::{Region, Size};
use crate::render::backend::PixelOwnership;
use crate::render::palette::SharedPalette;
use crate::render::software::SoftwareBackend;
use crate::render::text::{Alignment, Font, GlyphBitmap};

use super::{fixed_font, XorShift};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixth_wide_glyph_starts_new_page() {
        let font = Font::new(SharedPalette::default(), 20, 0);
        let bitmap = GlyphBitmap::solid(Size::new(100, 20), 0, 255).unwrap();
        for chr in ['1', '2', '3', '4', '5', '6'] {
            font.create_glyph(chr, &bitmap).unwrap();
        }

        let atlas = font.atlas();
        assert_eq!(atlas.page_width(), 512);
        assert_eq!(atlas.glyph('5').unwrap().page_x, 400);
        assert_eq!(atlas.page_index('5'), Some(0));
        assert_eq!(atlas.glyph('6').unwrap().page_x, 0);
        assert_eq!(atlas.page_index('6'), Some(1));
        assert_eq!(atlas.pages()[0].glyph_count(), 5);
    }

    #[test]
    fn test_pages_never_overflow() {
        let mut rng = XorShift::new(7);
        let font = Font::new(SharedPalette::default(), 16, 0);
        let mut bitmaps = Vec::new();
        for (i, chr) in ('!'..='~').enumerate() {
            let width = rng.range(1, 200);
            let index = u8::try_from(i % 250 + 1).unwrap();
            let bitmap = GlyphBitmap::solid(Size::new(width, 16), 0, index).unwrap();
            font.create_glyph(chr, &bitmap).unwrap();
            bitmaps.push((chr, bitmap));
        }

        let atlas = font.atlas();
        for page in atlas.pages() {
            assert!(page.cursor() <= 512);
        }
        // only the last page may still be building
        let building: Vec<bool> = atlas.pages().iter().map(|p| p.is_building()).collect();
        assert!(building[..building.len() - 1].iter().all(|b| !b));

        // every glyph kept its pixels and sits within its page
        for (chr, bitmap) in &bitmaps {
            let glyph = atlas.glyph(*chr).unwrap();
            assert!(glyph.page_x + glyph.width() <= 512);
            assert_eq!(&font.glyph_bitmap(*chr).unwrap(), bitmap);
        }
    }

    #[test]
    fn test_glyphs_stable_across_prints() {
        let font = fixed_font(10, 20);
        let mut backend = SoftwareBackend::new(200, 100, PixelOwnership::ZeroCopy);
        let region = Region::new(0, 0, 200, 100);

        font.print(region, "hello", None, Alignment::default(), &mut backend).unwrap();
        let glyph = font.get_glyph('h').unwrap();
        let pixels = font.glyph_bitmap('h').unwrap();

        // more glyphs arrive after the first page was finalized by drawing
        font.print(region, "world HELLO", None, Alignment::default(), &mut backend).unwrap();
        font.string_size("0123456789", None);

        assert!(font.atlas().pages().len() > 1);
        assert_eq!(font.get_glyph('h').unwrap(), glyph);
        assert_eq!(font.glyph_bitmap('h').unwrap(), pixels);
    }

    #[test]
    fn test_copy_and_zero_copy_draw_the_same() {
        let text = "The quick brown fox";
        let region = Region::new(4, 4, 120, 60);

        let shared_font = fixed_font(6, 10);
        let mut shared = SoftwareBackend::new(128, 64, PixelOwnership::ZeroCopy);
        let printed = shared_font
            .print(region, text, None, Alignment::CENTER, &mut shared)
            .unwrap();

        let copied_font = fixed_font(6, 10);
        let mut copied = SoftwareBackend::new(128, 64, PixelOwnership::Copy);
        copied_font
            .print(region, text, None, Alignment::CENTER, &mut copied)
            .unwrap();

        assert_eq!(printed, text.chars().count());
        assert_eq!(shared.framebuffer(), copied.framebuffer());
        assert!(shared.stats().sprites_adopted > 0);
        assert_eq!(shared.stats().sprites_copied, 0);
        assert!(copied.stats().sprites_copied > 0);
        assert_eq!(copied.stats().sprites_adopted, 0);
    }

    #[test]
    fn test_release_sprites_then_redraw() {
        let font = fixed_font(8, 8);
        let mut backend = SoftwareBackend::new(64, 16, PixelOwnership::Copy);
        let region = Region::new(0, 0, 64, 16);

        font.print(region, "abc", None, Alignment::default(), &mut backend).unwrap();
        assert_eq!(backend.sprite_count(), 1);

        font.release_sprites(&mut backend);
        assert_eq!(backend.sprite_count(), 0);

        backend.clear();
        font.print(region, "abc", None, Alignment::default(), &mut backend).unwrap();
        assert_eq!(backend.sprite_count(), 1);
        assert!(backend.pixel(0, 0).is_some_and(|c| c.a == 255));
    }

    #[test]
    fn test_dropped_fonts_leave_no_sprites() {
        let mut backend = SoftwareBackend::new(64, 16, PixelOwnership::ZeroCopy);
        let region = Region::new(0, 0, 64, 16);
        for _ in 0..5 {
            let font = fixed_font(8, 8);
            font.print(region, "ab", None, Alignment::default(), &mut backend).unwrap();
            assert_eq!(backend.sprite_count(), 1);
        }
        assert_eq!(backend.sprite_count(), 0);

        // orphans are freed once the backend is next asked for a sprite
        let font = fixed_font(8, 8);
        font.print(region, "ab", None, Alignment::default(), &mut backend).unwrap();
        assert_eq!(backend.stored_sprites(), 1);

        drop(font);
        backend.prune();
        assert_eq!(backend.stored_sprites(), 0);
    }
}
