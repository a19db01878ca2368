//! Canvas-to-image coordinate transform.
//!
//! Every exporter goes through these two functions, so the YOLO, COCO and
//! Pascal VOC documents for one session always describe the same pixels.
//! Both are pure: same inputs, same outputs, no stored state.

use super::bbox::BBoxXYXY;
use super::placement::ImagePlacement;
use super::rect::Rect;
use super::space::{Normalized, Pixel};

/// A box in YOLO's center/size layout, normalized to the natural image size.
///
/// All four fields are clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Corner form of the same box. Not re-clamped.
    pub fn to_bbox(&self) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_xyxy(
            self.x_center - self.width / 2.0,
            self.y_center - self.height / 2.0,
            self.x_center + self.width / 2.0,
            self.y_center + self.height / 2.0,
        )
    }
}

/// Maps a canvas rectangle to normalized center/size coordinates.
///
/// Each output is clamped to `[0, 1]` independently, so the part of a box
/// hanging over the image edge is discarded rather than the whole box.
pub fn to_normalized(rect: &Rect, placement: &ImagePlacement) -> NormalizedBox {
    let scaled_w = placement.scaled_width();
    let scaled_h = placement.scaled_height();

    let rel_x = (rect.left - placement.offset_x()) / scaled_w;
    let rel_y = (rect.top - placement.offset_y()) / scaled_h;
    let rel_w = rect.width / scaled_w;
    let rel_h = rect.height / scaled_h;

    NormalizedBox {
        x_center: clamp_unit(rel_x + rel_w / 2.0),
        y_center: clamp_unit(rel_y + rel_h / 2.0),
        width: clamp_unit(rel_w),
        height: clamp_unit(rel_h),
    }
}

/// Maps a canvas rectangle to corners in natural image pixels, clamped to
/// `[0, natural_width] x [0, natural_height]`.
pub fn to_image_pixels(rect: &Rect, placement: &ImagePlacement) -> BBoxXYXY<Pixel> {
    let scale = placement.scale();
    let w = placement.natural_width() as f64;
    let h = placement.natural_height() as f64;

    let x1 = (rect.left - placement.offset_x()) / scale;
    let y1 = (rect.top - placement.offset_y()) / scale;
    let x2 = (rect.right() - placement.offset_x()) / scale;
    let y2 = (rect.bottom() - placement.offset_y()) / scale;

    BBoxXYXY::from_xyxy(x1, y1, x2, y2).clip_to(&BBoxXYXY::from_xyxy(0.0, 0.0, w, h))
}

/// Returns true if the rectangle extends past the placed image on any side.
pub fn is_truncated(rect: &Rect, placement: &ImagePlacement) -> bool {
    rect.bbox().exceeds(&placement.bounds())
}

/// Returns true if the rectangle overlaps the placed image at all.
pub fn overlaps_image(rect: &Rect, placement: &ImagePlacement) -> bool {
    rect.bbox().intersects(&placement.bounds())
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
