//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between the three coordinate systems an annotation passes through on its
//! way to an export document.

use std::fmt;

/// A coordinate space with a human-readable name.
pub trait Space {
    /// Short name used in debug output.
    const NAME: &'static str;
}

/// Marker type for canvas coordinates.
///
/// Canvas coordinates are the pixel positions reported by the drawing
/// surface. The placed image occupies a sub-rectangle of the canvas.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canvas {}

/// Marker type for natural image pixel coordinates.
///
/// (0, 0) is the top-left corner of the unscaled image; the extent is the
/// image's natural width and height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates (0.0 to 1.0).
///
/// Normalized coordinates represent positions as fractions of the image's
/// natural dimensions, making them resolution-independent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl Space for Canvas {
    const NAME: &'static str = "canvas";
}

impl Space for Pixel {
    const NAME: &'static str = "pixel";
}

impl Space for Normalized {
    const NAME: &'static str = "normalized";
}

impl fmt::Debug for Canvas {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
