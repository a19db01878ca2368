//! Geometry for annotation sessions.
//!
//! Boxes are drawn in canvas space, but every export format wants them in
//! terms of the image's natural resolution. This module owns that mapping.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: marker types keep canvas, natural-pixel and
//!    normalized coordinates from being mixed up at compile time.
//!
//! 2. **One Transform**: [`transform::to_normalized`] and
//!    [`transform::to_image_pixels`] are the only ways out of canvas space.
//!
//! 3. **Clamp, Never Drop**: geometry that hangs over the image edge is
//!    clipped to the image rather than rejected.
//!
//! # Example
//!
//! ```
//! use annobox::config::Viewport;
//! use annobox::geom::{transform, ImagePlacement, Rect};
//!
//! let placement = ImagePlacement::fit(1000, 500, Viewport::default()).unwrap();
//! let rect = Rect::new(0.0, 200.0, 80.0, 40.0);
//! let norm = transform::to_normalized(&rect, &placement);
//! assert!((norm.x_center - 0.05).abs() < 1e-9);
//! ```

mod bbox;
mod coord;
mod placement;
mod rect;
mod space;
pub mod transform;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use placement::{ImagePlacement, PlacementSpec};
pub use rect::Rect;
pub use space::{Canvas, Normalized, Pixel, Space};
pub use transform::NormalizedBox;
