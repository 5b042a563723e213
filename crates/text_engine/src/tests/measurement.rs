//! Measurement agrees with rendering and printing

use crate::foundation::math::{Region, Size};
use crate::render::backend::PixelOwnership;
use crate::render::software::SoftwareBackend;
use crate::render::text::Alignment;

use super::fixed_font;

const SAMPLES: [&str; 6] = [
    "",
    "a",
    "hello world",
    "two\nlines",
    "a fairly long sentence that has to wrap somewhere",
    "unbrokenwordthatiswiderthanmostconstraints",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_size_matches_auto_sized_sprite() {
        let font = fixed_font(7, 12);
        for text in SAMPLES {
            let measured = font.string_size(text, None);
            let (sprite, printed) = font
                .render_text_as_sprite(text, Size::default(), Alignment::default(), None)
                .unwrap();
            assert_eq!(Size::new(sprite.width(), sprite.height()), measured, "{text:?}");
            assert_eq!(printed, text.chars().count(), "{text:?}");
        }
    }

    #[test]
    fn test_constrained_height_matches_sprite() {
        let font = fixed_font(7, 12);
        for text in SAMPLES {
            for width in [20, 50, 90, 200] {
                let measured = font.string_size(text, Some(Size::new(width, 0)));
                assert!(measured.w <= width.max(7), "{text:?} at {width}: {measured:?}");

                let (sprite, _) = font
                    .render_text_as_sprite(text, Size::new(width, 0), Alignment::default(), None)
                    .unwrap();
                assert_eq!(sprite.width(), width);
                assert_eq!(sprite.height(), measured.h, "{text:?} at {width}");
            }
        }
    }

    #[test]
    fn test_single_line_measurement() {
        let font = fixed_font(10, 20);
        assert_eq!(font.string_size("abc", None), Size::new(30, 20));
        assert_eq!(font.string_size("abc\ndef", None), Size::new(30, 40));
        assert_eq!(font.string_size("", None), Size::new(0, 0));
    }

    #[test]
    fn test_narrow_and_wide_print_agree() {
        let text = "Narrow text, 7 bit only";
        let region = Region::new(2, 2, 100, 60);

        let wide_font = fixed_font(6, 10);
        let mut wide = SoftwareBackend::new(104, 64, PixelOwnership::Copy);
        let wide_printed = wide_font
            .print(region, text, None, Alignment::default(), &mut wide)
            .unwrap();

        let narrow_font = fixed_font(6, 10);
        let mut narrow = SoftwareBackend::new(104, 64, PixelOwnership::Copy);
        let narrow_printed = narrow_font
            .print_narrow(region, text.as_bytes(), None, Alignment::default(), &mut narrow)
            .unwrap();

        assert_eq!(wide_printed, narrow_printed);
        assert_eq!(wide.framebuffer(), narrow.framebuffer());
    }

    #[test]
    fn test_missing_glyphs_are_skipped() {
        let font = fixed_font(10, 20);
        assert_eq!(font.string_size("a~b", None), font.string_size("ab", None));

        let mut backend = SoftwareBackend::new(100, 20, PixelOwnership::ZeroCopy);
        let printed = font
            .print(Region::new(0, 0, 100, 20), "a~b", None, Alignment::default(), &mut backend)
            .unwrap();
        assert_eq!(printed, 3);
        assert!(font.get_glyph('~').is_err());
        // 'b' follows 'a' directly
        assert!(backend.pixel(15, 5).is_some_and(|c| c.a == 255));
        assert!(backend.pixel(25, 5).is_some_and(|c| c.a == 0));
    }

    #[test]
    fn test_print_into_empty_region_prints_nothing() {
        let font = fixed_font(10, 20);
        let mut backend = SoftwareBackend::new(100, 20, PixelOwnership::Copy);
        let printed = font
            .print(Region::new(0, 0, 0, 20), "abc", None, Alignment::default(), &mut backend)
            .unwrap();
        assert_eq!(printed, 0);
        assert_eq!(backend.stats().blits, 0);
    }
}
