//! Text spans
//!
//! A span is a run of text bound to a font and palette that renders itself
//! into a cached sprite on demand.

use std::fmt;
use std::rc::Rc;

use crate::core::TextResult;
use crate::foundation::math::{Region, Size};
use crate::render::backend::{Sprite, VideoBackend};
use crate::render::palette::SharedPalette;
use crate::render::text::{Alignment, Font};

/// Independently renderable run of text
pub struct TextSpan {
    text: String,
    font: Rc<Font>,
    palette: SharedPalette,
    frame: Size,
    cache: Option<Rc<Sprite>>,
    printed: usize,
}

impl TextSpan {
    /// Create a span sized to fit its text on a single line
    pub fn new(text: impl Into<String>, font: Rc<Font>, palette: SharedPalette) -> Self {
        let text = text.into();
        let frame = font.string_size(&text, None);
        Self::with_frame(text, font, palette, frame)
    }

    /// Create a span with an explicit frame
    ///
    /// A zero dimension is filled in from the rendered text the first time
    /// the span is rendered.
    pub fn with_frame(
        text: impl Into<String>,
        font: Rc<Font>,
        palette: SharedPalette,
        frame: Size,
    ) -> Self {
        Self {
            text: text.into(),
            font,
            palette,
            frame,
            cache: None,
            printed: 0,
        }
    }

    /// Source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font the span renders with
    pub fn font(&self) -> &Rc<Font> {
        &self.font
    }

    /// Palette the span renders with
    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    /// Frame as currently known, without rendering
    pub fn frame(&self) -> Size {
        self.frame
    }

    /// Whether a rendered sprite is cached
    pub fn is_rendered(&self) -> bool {
        self.cache.is_some()
    }

    /// Characters consumed by the last render
    pub fn printed(&self) -> usize {
        self.printed
    }

    /// The cached sprite, rendering it first if needed
    pub fn rendered_span(&mut self) -> TextResult<Rc<Sprite>> {
        match &self.cache {
            Some(sprite) => Ok(Rc::clone(sprite)),
            None => self.render_span(),
        }
    }

    /// Render the span again, replacing the cached sprite
    ///
    /// Zero frame dimensions are fixed to the size of the rendered sprite.
    pub fn render_span(&mut self) -> TextResult<Rc<Sprite>> {
        self.cache = None;
        let (sprite, printed) = self.font.render_text_as_sprite(
            &self.text,
            self.frame,
            Alignment::default(),
            Some(&self.palette),
        )?;
        if self.frame.w <= 0 {
            self.frame.w = sprite.width();
        }
        if self.frame.h <= 0 {
            self.frame.h = sprite.height();
        }
        if printed < self.text.chars().count() {
            log::debug!("Span truncated after {} characters", printed);
        }
        self.printed = printed;

        let sprite = Rc::new(sprite);
        self.cache = Some(Rc::clone(&sprite));
        Ok(sprite)
    }

    /// The span's frame, rendering first if it is not known yet
    pub fn span_frame(&mut self) -> TextResult<Size> {
        if self.frame.is_empty() && self.cache.is_none() {
            self.render_span()?;
        }
        Ok(self.frame)
    }

    /// Drop the cached sprite; the next request renders again
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Blit the rendered span with its top-left corner at `dest`, clipped to `dest`
    pub fn draw(&mut self, dest: Region, backend: &mut dyn VideoBackend) -> TextResult<()> {
        let sprite = self.rendered_span()?;
        backend.blit_pixels(&sprite, dest)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSpan")
            .field("text", &self.text)
            .field("frame", &self.frame)
            .field("rendered", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::PixelOwnership;
    use crate::render::palette::{Color, Palette};
    use crate::render::software::SoftwareBackend;
    use crate::render::text::{GlyphBitmap, GlyphSource};

    struct Blocks;

    impl GlyphSource for Blocks {
        fn glyph_bitmap(&self, _chr: char) -> Option<GlyphBitmap> {
            GlyphBitmap::solid(Size::new(10, 20), 0, 255).ok()
        }
    }

    fn font() -> Rc<Font> {
        Rc::new(Font::new(SharedPalette::default(), 20, 0).with_source(Blocks))
    }

    #[test]
    fn test_new_measures_text() {
        let span = TextSpan::new("hello", font(), SharedPalette::default());
        assert_eq!(span.frame(), Size::new(50, 20));
        assert!(!span.is_rendered());
    }

    #[test]
    fn test_unset_frame_fixed_by_first_render() {
        let mut span = TextSpan::with_frame("abc", font(), SharedPalette::default(), Size::default());
        assert!(span.frame().is_empty());

        assert_eq!(span.span_frame().unwrap(), Size::new(30, 20));
        assert!(span.is_rendered());
        assert_eq!(span.printed(), 3);

        // frame is kept once known
        span.render_span().unwrap();
        assert_eq!(span.frame(), Size::new(30, 20));
    }

    #[test]
    fn test_partial_frame_fills_height() {
        let mut span =
            TextSpan::with_frame("abc def", font(), SharedPalette::default(), Size::new(35, 0));
        assert_eq!(span.span_frame().unwrap(), Size::new(35, 40));
    }

    #[test]
    fn test_rendered_span_is_memoized() {
        let mut span = TextSpan::new("ab", font(), SharedPalette::default());
        let first = span.rendered_span().unwrap();
        let second = span.rendered_span().unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        span.invalidate();
        let third = span.rendered_span().unwrap();
        assert!(!Rc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_span_holds_palette_reference() {
        let palette = SharedPalette::new(Palette::gradient(Color::RED, Color::BLACK));
        let mut span = TextSpan::new("ab", font(), palette.acquire());
        assert_eq!(palette.ref_count(), 2);

        let sprite = span.rendered_span().unwrap();
        assert!(sprite.palette().ptr_eq(&palette));

        let mut backend = SoftwareBackend::new(40, 40, PixelOwnership::Copy);
        span.draw(Region::new(5, 5, 20, 20), &mut backend).unwrap();
        assert_eq!(backend.pixel(5, 5), Some(Color::RED));

        drop(sprite);
        drop(span);
        assert_eq!(palette.ref_count(), 1);
    }
}
