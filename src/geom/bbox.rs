//! Bounding box types in XYXY (corner) format.

use super::coord::Coord;
use super::space::Space;

/// An axis-aligned box in XYXY format (xmin, ymin, xmax, ymax).
///
/// The `TSpace` parameter is one of [`Canvas`](super::Canvas),
/// [`Pixel`](super::Pixel) or [`Normalized`](super::Normalized).
///
/// Note: the constructor does NOT enforce min <= max. Callers that build
/// boxes from two arbitrary corners should go through
/// [`Rect::from_corners`](super::Rect::from_corners), which sorts them.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new bounding box from min and max coordinates.
    #[inline]
    pub fn new(min: Coord<TSpace>, max: Coord<TSpace>) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Creates a box from its top-left corner and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Converts to XYWH format (x, y, width, height).
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.xmin(), self.ymin(), self.width(), self.height())
    }

    /// Returns true if the point lies inside the box, edges included.
    #[inline]
    pub fn contains(&self, point: Coord<TSpace>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns true if the boxes share a region of positive area.
    ///
    /// Boxes that merely touch along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Returns true if any edge of the box lies outside `bounds`.
    #[inline]
    pub fn exceeds(&self, bounds: &Self) -> bool {
        self.min.x < bounds.min.x
            || self.min.y < bounds.min.y
            || self.max.x > bounds.max.x
            || self.max.y > bounds.max.y
    }

    /// Clips the box to `bounds`.
    ///
    /// A box entirely outside collapses onto the nearest bounds edge and ends
    /// up with zero width or height, never a negative one.
    pub fn clip_to(&self, bounds: &Self) -> Self {
        let xmin = self.min.x.clamp(bounds.min.x, bounds.max.x);
        let ymin = self.min.y.clamp(bounds.min.y, bounds.max.y);
        let xmax = self.max.x.clamp(bounds.min.x, bounds.max.x);
        let ymax = self.max.y.clamp(bounds.min.y, bounds.max.y);
        Self::from_xyxy(xmin, ymin, xmax.max(xmin), ymax.max(ymin))
    }
}

impl<TSpace: Space> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("space", &TSpace::NAME)
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl<TSpace> Default for BBoxXYXY<TSpace> {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}
