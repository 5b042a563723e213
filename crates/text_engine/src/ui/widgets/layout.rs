//! Flow layout calculations
//!
//! Places spans left to right, top to bottom inside a container while
//! routing around exclusion rectangles.

use crate::core::{TextError, TextResult};
use crate::foundation::math::{Point, Region, Size};

/// Rectangles the flow layout must not place spans into
///
/// The set stays minimal: no rectangle is contained in another one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    rects: Vec<Region>,
}

impl ExclusionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rectangle
    ///
    /// A rectangle already covered by a member is discarded; members the
    /// new rectangle covers are replaced by it. Empty rectangles are
    /// rejected.
    pub fn add(&mut self, rect: Region) -> TextResult<()> {
        if rect.is_empty() {
            return Err(TextError::EmptyExclusion(rect));
        }
        if self.rects.iter().any(|existing| existing.contains_region(&rect)) {
            return Ok(());
        }
        self.rects.retain(|existing| !rect.contains_region(existing));
        self.rects.push(rect);
        Ok(())
    }

    /// First member overlapping `rect`
    pub fn first_intersecting(&self, rect: &Region) -> Option<&Region> {
        self.rects.iter().find(|existing| existing.intersects(rect))
    }

    /// Members in insertion order
    pub fn rects(&self) -> &[Region] {
        &self.rects
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Check whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Flow layout calculator for text spans
pub struct FlowLayout;

impl FlowLayout {
    /// Cursor for the first span of a container
    ///
    /// The first line starts one span height down from the top.
    pub fn first_cursor(first_span: Size) -> Point {
        Point::new(0, first_span.h)
    }

    /// Cursor following a placed span on the same row
    pub fn next_cursor(placed: &Region, gap: i32) -> Point {
        Point::new(placed.right() + gap, placed.y)
    }

    /// Find the rectangle for a span of `size`, starting at `cursor`
    ///
    /// Moves past any intersecting exclusion on the current row and wraps
    /// to the next row (one span height down) when the span would cross
    /// the right edge. A span at the start of a row never wraps, so spans
    /// wider than the container still get placed. Empty spans stay at the
    /// cursor.
    pub fn place(
        cursor: Point,
        size: Size,
        container_width: i32,
        gap: i32,
        exclusions: &ExclusionSet,
    ) -> Region {
        let mut rect = Region::from_origin(cursor, size);
        if size.is_empty() {
            return rect;
        }
        loop {
            if rect.x != 0 && rect.right() > container_width {
                rect.x = 0;
                rect.y += size.h;
            }
            match exclusions.first_intersecting(&rect) {
                Some(excluded) => rect.x = excluded.right() + gap,
                None => return rect,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_minimality() {
        let mut set = ExclusionSet::new();
        set.add(Region::new(10, 10, 20, 20)).unwrap();

        // covered, discarded
        set.add(Region::new(12, 12, 5, 5)).unwrap();
        assert_eq!(set.rects(), &[Region::new(10, 10, 20, 20)]);

        // disjoint, appended
        set.add(Region::new(100, 0, 10, 10)).unwrap();
        assert_eq!(set.len(), 2);

        // swallows both
        set.add(Region::new(0, 0, 200, 50)).unwrap();
        assert_eq!(set.rects(), &[Region::new(0, 0, 200, 50)]);

        assert!(matches!(
            set.add(Region::new(5, 5, 0, 3)),
            Err(TextError::EmptyExclusion(_))
        ));
    }

    #[test]
    fn test_place_moves_past_exclusion() {
        let mut set = ExclusionSet::new();
        set.add(Region::from_corners(0, 20, 50, 40)).unwrap();

        let rect = FlowLayout::place(Point::new(0, 20), Size::new(100, 20), 300, 1, &set);
        assert_eq!(rect, Region::from_corners(51, 20, 151, 40));
    }

    #[test]
    fn test_place_wraps_at_right_edge() {
        let set = ExclusionSet::new();
        let rect = FlowLayout::place(Point::new(101, 20), Size::new(250, 20), 300, 1, &set);
        assert_eq!(rect, Region::from_corners(0, 40, 250, 60));

        // too wide for any row, placed at the row start anyway
        let rect = FlowLayout::place(Point::new(0, 20), Size::new(400, 20), 300, 1, &set);
        assert_eq!(rect, Region::new(0, 20, 400, 20));
    }

    #[test]
    fn test_place_wraps_after_exclusion_fills_row() {
        let mut set = ExclusionSet::new();
        set.add(Region::new(0, 0, 250, 20)).unwrap();

        let rect = FlowLayout::place(Point::new(0, 0), Size::new(100, 20), 300, 1, &set);
        assert_eq!(rect, Region::new(0, 20, 100, 20));
    }

    #[test]
    fn test_cursors() {
        assert_eq!(FlowLayout::first_cursor(Size::new(80, 16)), Point::new(0, 16));
        let placed = Region::new(10, 16, 80, 16);
        assert_eq!(FlowLayout::next_cursor(&placed, 1), Point::new(91, 16));
    }
}
