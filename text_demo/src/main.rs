//! Text container demo
//!
//! Lays a few paragraphs out around a reserved box, draws them with the
//! software backend and dumps the framebuffer to stdout as ASCII art.

use std::rc::Rc;

use text_engine::foundation::logging;
use text_engine::prelude::*;

const CONFIG: &str = r#"
[engine]
log_level = "info"

[atlas]
page_width = 128

[layout]
span_gap = 2
debug_outlines = true
"#;

const FRAME_WIDTH: i32 = 120;
const FRAME_HEIGHT: i32 = 72;
const LINE_HEIGHT: i32 = 7;

/// Hollow box glyphs; narrow for lower case, wide for everything else
struct BoxGlyphs;

impl GlyphSource for BoxGlyphs {
    fn glyph_bitmap(&self, chr: char) -> Option<GlyphBitmap> {
        if chr.is_whitespace() {
            return GlyphBitmap::solid(Size::new(3, LINE_HEIGHT), 0, 0).ok();
        }
        if !chr.is_ascii_graphic() {
            return None;
        }
        let (w, h) = if chr.is_ascii_lowercase() { (4, 5) } else { (5, 6) };
        let mut pixels = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                pixels.push(if edge { 255 } else { 0 });
            }
        }
        GlyphBitmap::from_rows(Size::new(w, h), 0, pixels).ok()
    }

    fn kerning_offset(&self, left: char, right: char) -> i32 {
        if left.is_ascii_uppercase() && right.is_ascii_lowercase() {
            -1
        } else {
            0
        }
    }
}

fn print_framebuffer(backend: &SoftwareBackend, width: i32, height: i32) {
    for y in 0..height {
        let row: String = (0..width)
            .map(|x| match backend.pixel(x, y) {
                Some(color) if color == Color::RED => '+',
                Some(color) if color.a > 0 => '#',
                _ => '.',
            })
            .collect();
        println!("{row}");
    }
}

fn run() -> Result<(), TextError> {
    let config = TextEngineConfig::load(CONFIG, ConfigFormat::Toml)?;
    if !logging::init_with_level(&config.engine.log_level) {
        log::warn!("Logger already installed");
    }
    log::info!("Starting text demo");

    let palette = SharedPalette::default();
    let font = Font::with_config(palette.acquire(), LINE_HEIGHT, 1, &config.atlas)?.with_source(BoxGlyphs);
    let font = Rc::new(font);

    let mut container = TextContainer::with_config(
        Size::new(FRAME_WIDTH, FRAME_HEIGHT),
        Rc::clone(&font),
        palette,
        config.layout.clone(),
    )?;
    container.add_exclusion_rect(Region::new(0, LINE_HEIGHT, 30, 3 * LINE_HEIGHT))?;

    for text in ["Hello", "Bitmap", "text", "flows", "around", "the", "Reserved", "box", "and", "Wraps"] {
        container.append_text(text)?;
    }

    let mut backend = SoftwareBackend::new(
        u32::try_from(FRAME_WIDTH).unwrap_or(0),
        u32::try_from(FRAME_HEIGHT).unwrap_or(0),
        PixelOwnership::ZeroCopy,
    );
    container.draw_contents(0, 0, &mut backend)?;

    let size = font.string_size("Hello Bitmap", None);
    log::info!(
        "{} spans, {} atlas pages, \"Hello Bitmap\" measures {}x{}",
        container.len(),
        font.atlas().pages().len(),
        size.w,
        size.h
    );

    print_framebuffer(&backend, FRAME_WIDTH, FRAME_HEIGHT);
    font.release_sprites(&mut backend);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match run() {
        Ok(()) => {
            log::info!("Text demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Text demo failed: {:?}", e);
            Err(e.into())
        }
    }
}
