//! Where a loaded image sits on the canvas.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYXY;
use super::space::Canvas;
use crate::config::Viewport;
use crate::error::AnnoboxError;

/// How a natural-resolution image is fitted into the canvas.
///
/// The scale is uniform on both axes. A placement is immutable once built;
/// loading another image replaces it wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ImagePlacement {
    natural_width: u32,
    natural_height: u32,
    offset_x: f64,
    offset_y: f64,
    scale: f64,
}

/// Offset and scale supplied explicitly by the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementSpec {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl ImagePlacement {
    /// Creates a placement from explicit offset and scale.
    pub fn new(
        natural_width: u32,
        natural_height: u32,
        offset_x: f64,
        offset_y: f64,
        scale: f64,
    ) -> Result<Self, AnnoboxError> {
        if natural_width == 0 || natural_height == 0 {
            return Err(AnnoboxError::InvalidImageDimensions {
                width: natural_width,
                height: natural_height,
            });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(AnnoboxError::InvalidPlacement(format!(
                "scale must be a positive number, got {scale}"
            )));
        }
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(AnnoboxError::InvalidPlacement(format!(
                "offset ({offset_x}, {offset_y}) is not finite"
            )));
        }

        Ok(Self {
            natural_width,
            natural_height,
            offset_x,
            offset_y,
            scale,
        })
    }

    /// Fits the image into `viewport`, preserving aspect ratio and centering
    /// it on both axes.
    pub fn fit(
        natural_width: u32,
        natural_height: u32,
        viewport: Viewport,
    ) -> Result<Self, AnnoboxError> {
        if natural_width == 0 || natural_height == 0 {
            return Err(AnnoboxError::InvalidImageDimensions {
                width: natural_width,
                height: natural_height,
            });
        }
        if !viewport.is_valid() {
            return Err(AnnoboxError::InvalidPlacement(format!(
                "viewport {viewport} must have positive size"
            )));
        }

        let (w, h) = (natural_width as f64, natural_height as f64);
        let scale = (viewport.width / w).min(viewport.height / h);
        let offset_x = (viewport.width - w * scale) / 2.0;
        let offset_y = (viewport.height - h * scale) / 2.0;

        Self::new(natural_width, natural_height, offset_x, offset_y, scale)
    }

    pub fn from_spec(
        natural_width: u32,
        natural_height: u32,
        spec: PlacementSpec,
    ) -> Result<Self, AnnoboxError> {
        Self::new(
            natural_width,
            natural_height,
            spec.offset_x,
            spec.offset_y,
            spec.scale,
        )
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Width of the image as drawn on the canvas.
    pub fn scaled_width(&self) -> f64 {
        self.natural_width as f64 * self.scale
    }

    /// Height of the image as drawn on the canvas.
    pub fn scaled_height(&self) -> f64 {
        self.natural_height as f64 * self.scale
    }

    /// The placed image rectangle in canvas space.
    pub fn bounds(&self) -> BBoxXYXY<Canvas> {
        BBoxXYXY::from_xywh(
            self.offset_x,
            self.offset_y,
            self.scaled_width(),
            self.scaled_height(),
        )
    }
}
