//! Math utilities and types
//!
//! Integer pixel geometry for text layout and blitting. Points and offsets
//! come from nalgebra; sizes and regions are plain pixel rectangles.

pub use nalgebra::{Point2, Vector2};

/// 2D pixel point type
pub type Point = Point2<i32>;

/// 2D pixel offset type
pub type Offset = Vector2<i32>;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Size {
    /// Create a new size
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// A size is empty when either dimension has no extent
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Axis-aligned pixel rectangle
///
/// The right and bottom edges are exclusive: a region at `x` with width `w`
/// covers columns `x..x + w`. Two regions that only share an edge do not
/// intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Region {
    /// Create a new region
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a region from an origin point and a size
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    /// Create a region from its corner coordinates `(x0, y0)-(x1, y1)`
    pub const fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height of the region
    pub const fn dimensions(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Check whether the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.dimensions().is_empty()
    }

    /// Check if a point lies inside the region
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if `other` lies entirely inside this region
    pub const fn contains_region(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if two regions share any pixel
    ///
    /// Empty regions intersect nothing.
    pub const fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlapping part of two regions, if any
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Some(Self::from_corners(x0, y0, x1, y1))
    }

    /// Move the region by an offset
    pub fn translated(&self, offset: Offset) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}
