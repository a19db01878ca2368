//! Canvas-space rectangles as reported by the drawing surface.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYXY;
use super::coord::Coord;
use super::space::Canvas;

/// A rectangle in canvas pixel space, stored the way the drawing surface
/// reports it: top-left corner plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds the rectangle spanned by two opposite corners.
    ///
    /// Width and height are always non-negative; `left`/`top` come from the
    /// lesser corner whichever direction the drag went.
    pub fn from_corners(a: Coord<Canvas>, b: Coord<Canvas>) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// The same rectangle with a non-negative width and height.
    pub fn normalized(&self) -> Self {
        Self::from_corners(
            Coord::new(self.left, self.top),
            Coord::new(self.right(), self.bottom()),
        )
    }

    pub fn from_bbox(bbox: &BBoxXYXY<Canvas>) -> Self {
        let (left, top, width, height) = bbox.to_xywh();
        Self::new(left, top, width, height)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn bbox(&self) -> BBoxXYXY<Canvas> {
        BBoxXYXY::from_xywh(self.left, self.top, self.width, self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Returns true if either side is empty or shorter than `min_size`.
    pub fn is_degenerate(&self, min_size: f64) -> bool {
        !(self.width > 0.0
            && self.height > 0.0
            && self.width >= min_size
            && self.height >= min_size)
    }

    pub fn contains(&self, point: Coord<Canvas>) -> bool {
        self.bbox().contains(point)
    }
}
