//! Text layout engine
//!
//! Greedy line breaking shared by printing, measuring and sprite rendering,
//! so the three always agree on where lines end and how wide they are.
//!
//! # Layout Coordinate System
//!
//! - Origin (0, 0) is the top-left corner of the target area
//! - +X points right, +Y points down
//! - Every line is exactly one line height tall

use std::ops::Range;

use crate::foundation::math::{Point, Size};

use super::font::Alignment;

/// A glyph placed on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedGlyph {
    /// Character drawn
    pub chr: char,
    /// Left edge relative to the start of the line, kerning applied
    pub x: i32,
}

/// One laid out line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutLine {
    /// Glyphs to draw, left to right
    pub glyphs: Vec<PlacedGlyph>,
    /// Width of the line in pixels
    pub width: i32,
    /// Characters consumed by the line, including the newline or break
    /// space that ended it
    pub chars: Range<usize>,
}

/// Bounding box for text layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: i32,
    /// Minimum Y coordinate
    pub min_y: i32,
    /// Maximum X coordinate
    pub max_x: i32,
    /// Maximum Y coordinate
    pub max_y: i32,
}

impl TextBounds {
    /// Calculate width of bounding box
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Calculate height of bounding box
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Width and height as a size
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Break opportunity: the index of the space or tab, the line width and
/// glyph count before it
#[derive(Clone, Copy)]
struct Break {
    index: usize,
    width: i32,
    glyphs: usize,
}

/// Lines of text broken to fit an area
#[derive(Debug, Clone)]
pub struct TextLayout {
    lines: Vec<LayoutLine>,
    line_height: i32,
    alignment: Alignment,
}

impl TextLayout {
    /// Break `text` into lines that fit `area`
    ///
    /// A non-positive dimension of `area` leaves that direction unconstrained.
    /// `metrics` returns the kerning against the previous glyph and the width
    /// of a character, or `None` if the font has no glyph for it; such
    /// characters take no space.
    ///
    /// - `'\n'` ends a line (dropped in single-line mode)
    /// - `' '` and `'\t'` are break opportunities; without one a line breaks
    ///   mid-word
    /// - a line always takes at least one glyph, even if it is too wide
    /// - lines that do not fit the area height are not laid out
    pub fn new<F>(text: &[char], line_height: i32, area: Size, alignment: Alignment, mut metrics: F) -> Self
    where
        F: FnMut(Option<char>, char) -> Option<(i32, i32)>,
    {
        let single_line = alignment.contains(Alignment::SINGLE_LINE);
        let max_width = (area.w > 0).then_some(area.w);
        let mut max_lines = if area.h > 0 && line_height > 0 {
            usize::try_from(area.h / line_height).unwrap_or(0)
        } else {
            usize::MAX
        };
        if single_line {
            max_lines = max_lines.min(1);
        }

        let mut lines: Vec<LayoutLine> = Vec::new();
        let mut glyphs: Vec<PlacedGlyph> = Vec::new();
        let mut start = 0;
        let mut width = 0;
        let mut prev: Option<char> = None;
        let mut brk: Option<Break> = None;
        let mut i = 0;

        while i < text.len() && lines.len() < max_lines {
            let chr = text[i];
            if chr == '\n' {
                i += 1;
                if !single_line {
                    lines.push(LayoutLine {
                        glyphs: std::mem::take(&mut glyphs),
                        width,
                        chars: start..i,
                    });
                    start = i;
                    width = 0;
                    prev = None;
                    brk = None;
                }
                continue;
            }

            let Some((kerning, glyph_width)) = metrics(prev, chr) else {
                log::trace!("No glyph for {:?}, skipped", chr);
                if chr == ' ' || chr == '\t' {
                    brk = Some(Break { index: i, width, glyphs: glyphs.len() });
                }
                i += 1;
                continue;
            };
            let advance = kerning + glyph_width;
            if chr == ' ' || chr == '\t' {
                brk = Some(Break { index: i, width, glyphs: glyphs.len() });
            }

            if max_width.is_some_and(|max| width + advance > max) && i > start {
                if single_line {
                    lines.push(LayoutLine { glyphs, width, chars: start..i });
                    return Self { lines, line_height, alignment };
                }
                let line = match brk {
                    Some(at) => {
                        glyphs.truncate(at.glyphs);
                        i = at.index + 1;
                        LayoutLine { glyphs: std::mem::take(&mut glyphs), width: at.width, chars: start..i }
                    }
                    None => LayoutLine { glyphs: std::mem::take(&mut glyphs), width, chars: start..i },
                };
                lines.push(line);
                start = i;
                width = 0;
                prev = None;
                brk = None;
                continue;
            }

            glyphs.push(PlacedGlyph { chr, x: width + kerning });
            width += advance;
            prev = Some(chr);
            i += 1;
        }

        if start < i && lines.len() < max_lines {
            lines.push(LayoutLine { glyphs, width, chars: start..i });
        }
        Self { lines, line_height, alignment }
    }

    /// Laid out lines, top to bottom
    pub fn lines(&self) -> &[LayoutLine] {
        &self.lines
    }

    /// Number of characters consumed by the laid out lines
    pub fn consumed(&self) -> usize {
        self.lines.last().map_or(0, |line| line.chars.end)
    }

    /// Bounding box of all lines, anchored at the origin
    pub fn bounds(&self) -> TextBounds {
        let lines = i32::try_from(self.lines.len()).unwrap_or(i32::MAX);
        TextBounds {
            min_x: 0,
            min_y: 0,
            max_x: self.lines.iter().map(|line| line.width).max().unwrap_or(0),
            max_y: lines.saturating_mul(self.line_height),
        }
    }

    /// Top-left corner of a line inside an area of the given size
    ///
    /// Applies horizontal (center/right) and vertical (middle/bottom)
    /// alignment. Offsets never go negative, so text that overflows the
    /// area stays anchored at its top-left corner.
    pub fn line_origin(&self, index: usize, area: Size) -> Point {
        let line_width = self.lines.get(index).map_or(0, |line| line.width);
        let x = if self.alignment.contains(Alignment::CENTER) {
            (area.w - line_width) / 2
        } else if self.alignment.contains(Alignment::RIGHT) {
            area.w - line_width
        } else {
            0
        };

        let total = self.bounds().height();
        let y = if self.alignment.contains(Alignment::MIDDLE) {
            (area.h - total) / 2
        } else if self.alignment.contains(Alignment::BOTTOM) {
            area.h - total
        } else {
            0
        };

        let row = i32::try_from(index).unwrap_or(i32::MAX);
        Point::new(x.max(0), y.max(0) + row * self.line_height)
    }
}
