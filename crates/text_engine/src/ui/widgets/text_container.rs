//! Text containers
//!
//! An ordered collection of spans with cached, non-overlapping placement.
//! Spans flow left to right and top to bottom around exclusion rectangles.
//! Edits re-layout only from the edited position onward; spans before it
//! keep their rectangles.

use std::rc::Rc;

use crate::core::{LayoutConfig, TextError, TextResult};
use crate::foundation::collections::{HandleMap, SecondaryMap, SpanKey};
use crate::foundation::math::{Offset, Point, Region, Size};
use crate::render::backend::VideoBackend;
use crate::render::palette::{Color, SharedPalette};
use crate::render::text::{Alignment, Font};

use super::layout::{ExclusionSet, FlowLayout};
use super::text_span::TextSpan;

/// Ordered spans laid out inside a fixed frame
pub struct TextContainer {
    frame: Size,
    font: Rc<Font>,
    palette: SharedPalette,
    alignment: Alignment,
    config: LayoutConfig,
    spans: HandleMap<SpanKey, TextSpan>,
    order: Vec<SpanKey>,
    layout: SecondaryMap<SpanKey, Region>,
    /// Rectangles added by callers
    external: ExclusionSet,
    /// External rectangles plus those of placed spans
    exclusions: ExclusionSet,
}

impl TextContainer {
    /// Create an empty container with default layout settings
    pub fn new(frame: Size, font: Rc<Font>, palette: SharedPalette) -> Self {
        Self {
            frame,
            font,
            palette,
            alignment: Alignment::default(),
            config: LayoutConfig::default(),
            spans: HandleMap::with_key(),
            order: Vec::new(),
            layout: SecondaryMap::new(),
            external: ExclusionSet::new(),
            exclusions: ExclusionSet::new(),
        }
    }

    /// Create an empty container with explicit layout settings
    pub fn with_config(
        frame: Size,
        font: Rc<Font>,
        palette: SharedPalette,
        config: LayoutConfig,
    ) -> TextResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::new(frame, font, palette) })
    }

    /// Container frame
    pub fn frame(&self) -> Size {
        self.frame
    }

    /// Font used for appended text
    pub fn font(&self) -> &Rc<Font> {
        &self.font
    }

    /// Palette used for appended text
    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    /// Layout settings
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Flow alignment
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Set the flow alignment
    ///
    /// Only left, top-down flow is implemented; any other alignment is
    /// rejected and leaves the container unchanged.
    pub fn set_alignment(&mut self, alignment: Alignment) -> TextResult<()> {
        if !Alignment::TOP.contains(alignment) {
            return Err(TextError::Unsupported(format!(
                "container alignment {alignment:?}, only left aligned flow is implemented"
            )));
        }
        self.alignment = alignment;
        Ok(())
    }

    /// Number of spans
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the container holds no spans
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a span
    pub fn span(&self, key: SpanKey) -> Option<&TextSpan> {
        self.spans.get(key)
    }

    /// Look up a span for mutation
    pub fn span_mut(&mut self, key: SpanKey) -> Option<&mut TextSpan> {
        self.spans.get_mut(key)
    }

    /// Spans in document order
    pub fn spans(&self) -> impl Iterator<Item = (SpanKey, &TextSpan)> + '_ {
        self.order
            .iter()
            .filter_map(|&key| self.spans.get(key).map(|span| (key, span)))
    }

    /// Rectangle a span was placed at, in container coordinates
    pub fn span_layout(&self, key: SpanKey) -> Option<Region> {
        self.layout.get(key).copied()
    }

    /// Current exclusion rectangles, including those of placed spans
    pub fn exclusion_rects(&self) -> &[Region] {
        self.exclusions.rects()
    }

    /// Reserve a rectangle spans must flow around
    ///
    /// Spans already placed keep their rectangles; the exclusion applies
    /// to every later layout pass.
    pub fn add_exclusion_rect(&mut self, rect: Region) -> TextResult<()> {
        self.external.add(rect)?;
        self.exclusions.add(rect)
    }

    /// Append text as a new span using the container's font and palette
    pub fn append_text(&mut self, text: &str) -> TextResult<SpanKey> {
        let span = TextSpan::new(text, Rc::clone(&self.font), self.palette.acquire());
        self.append_span(span)
    }

    /// Append a span at the end of the document
    pub fn append_span(&mut self, span: TextSpan) -> TextResult<SpanKey> {
        let key = self.spans.insert(span);
        self.order.push(key);
        self.layout_spans_starting_at(self.order.len() - 1)?;
        Ok(key)
    }

    /// Insert a span after `existing`, or at the front when `existing` is `None`
    pub fn insert_span_after(
        &mut self,
        span: TextSpan,
        existing: Option<SpanKey>,
    ) -> TextResult<SpanKey> {
        let position = match existing {
            Some(existing) => self.position(existing)? + 1,
            None => 0,
        };
        let key = self.spans.insert(span);
        self.order.insert(position, key);
        self.layout_spans_starting_at(position)?;
        Ok(key)
    }

    /// Remove a span and lay out the spans after it again
    pub fn remove_span(&mut self, key: SpanKey) -> TextResult<TextSpan> {
        let position = self.position(key)?;
        self.order.remove(position);
        self.layout.remove(key);
        let span = self.spans.remove(key).ok_or(TextError::SpanNotFound)?;
        self.layout_spans_starting_at(position)?;
        Ok(span)
    }

    /// Span whose rectangle contains `point` (container coordinates)
    pub fn span_at_point(&self, point: Point) -> Option<SpanKey> {
        let bounds = Region::new(0, 0, self.frame.w, self.frame.h);
        if !bounds.contains_point(point) {
            return None;
        }
        self.order.iter().copied().find(|&key| {
            self.layout
                .get(key)
                .is_some_and(|rect| rect.contains_point(point))
        })
    }

    /// Draw every placed span with the container origin at `(x, y)`
    pub fn draw_contents(&mut self, x: i32, y: i32, backend: &mut dyn VideoBackend) -> TextResult<()> {
        let offset = Offset::new(x, y);
        for &key in &self.order {
            let Some(rect) = self.layout.get(key) else {
                continue;
            };
            let rect = rect.translated(offset);
            if self.config.debug_outlines {
                backend.draw_rect(rect, Color::RED)?;
            }
            if let Some(span) = self.spans.get_mut(key) {
                span.draw(rect, backend)?;
            }
        }
        Ok(())
    }

    fn position(&self, key: SpanKey) -> TextResult<usize> {
        self.order
            .iter()
            .position(|&k| k == key)
            .ok_or(TextError::SpanNotFound)
    }

    /// Place the spans from `start` to the end
    ///
    /// The exclusion set is rebuilt from the caller's rectangles and the
    /// spans before `start`, so rectangles of spans being moved do not
    /// block their own placement.
    fn layout_spans_starting_at(&mut self, start: usize) -> TextResult<()> {
        let gap = self.config.span_gap;
        let mut exclusions = self.external.clone();
        for key in &self.order[..start] {
            if let Some(rect) = self.layout.get(*key).filter(|rect| !rect.is_empty()) {
                exclusions.add(*rect)?;
            }
        }

        let mut cursor = start
            .checked_sub(1)
            .and_then(|previous| self.layout.get(self.order[previous]))
            .map(|placed| FlowLayout::next_cursor(placed, gap));

        for &key in &self.order[start..] {
            let span = self.spans.get_mut(key).ok_or(TextError::SpanNotFound)?;
            let size = span.span_frame()?;
            let origin = cursor.unwrap_or_else(|| FlowLayout::first_cursor(size));
            let rect = FlowLayout::place(origin, size, self.frame.w, gap, &exclusions);

            self.layout.insert(key, rect);
            if !rect.is_empty() {
                exclusions.add(rect)?;
            }
            cursor = Some(FlowLayout::next_cursor(&rect, gap));
        }

        log::debug!(
            "Laid out {} of {} spans, {} exclusion rects",
            self.order.len() - start,
            self.order.len(),
            exclusions.len()
        );
        self.exclusions = exclusions;
        Ok(())
    }
}
