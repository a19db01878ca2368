//! Typed points using PhantomData for compile-time safety.

use std::marker::PhantomData;

use super::bbox::BBoxXYXY;
use super::space::Space;

/// A 2D point with a type-level marker for the coordinate space.
///
/// Pointer positions arrive as `Coord<Canvas>`; nothing converts them to
/// another space implicitly.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new point with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Moves the point onto the nearest position inside `bounds`.
    #[inline]
    pub fn clamp_into(&self, bounds: &BBoxXYXY<TSpace>) -> Self {
        Self::new(
            self.x.clamp(bounds.xmin(), bounds.xmax()),
            self.y.clamp(bounds.ymin(), bounds.ymax()),
        )
    }
}

impl<TSpace: Space> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coord<{}>({}, {})", TSpace::NAME, self.x, self.y)
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Canvas;

    #[test]
    fn test_coord_is_finite() {
        let finite: Coord<Canvas> = Coord::new(10.0, 20.0);
        assert!(finite.is_finite());

        let nan: Coord<Canvas> = Coord::new(f64::NAN, 20.0);
        assert!(!nan.is_finite());

        let inf: Coord<Canvas> = Coord::new(10.0, f64::INFINITY);
        assert!(!inf.is_finite());
    }

    #[test]
    fn test_coord_clamp_into_bounds() {
        let bounds: BBoxXYXY<Canvas> = BBoxXYXY::from_xyxy(0.0, 100.0, 800.0, 500.0);

        let inside = Coord::<Canvas>::new(40.0, 200.0).clamp_into(&bounds);
        assert_eq!((inside.x, inside.y), (40.0, 200.0));

        let outside = Coord::<Canvas>::new(-5.0, 650.0).clamp_into(&bounds);
        assert_eq!((outside.x, outside.y), (0.0, 500.0));
    }

    #[test]
    fn test_coord_debug_names_space() {
        let coord: Coord<Canvas> = Coord::new(1.5, 2.0);
        assert_eq!(format!("{:?}", coord), "Coord<canvas>(1.5, 2)");
    }
}
