//! COCO JSON writer.
//!
//! COCO bounding boxes use `[x, y, width, height]` where `(x, y)` is the
//! top-left corner in natural image pixels.
//!
//! # Deterministic Output
//!
//! The document always contains exactly one image (`id = 1`). Annotation IDs
//! are assigned sequentially from 1 in store order, and `category_id` is the
//! registry index plus one, so the same session state always serializes to
//! the same bytes.

use serde::Serialize;

use super::ExportInput;
use crate::error::AnnoboxError;
use crate::geom::transform;

const IMAGE_ID: u64 = 1;
const SUPERCATEGORY: &str = "none";

// ============================================================================
// COCO Schema Types (internal to this module)
// ============================================================================

/// Top-level COCO document.
#[derive(Debug, Serialize)]
struct CocoDataset<'a> {
    images: Vec<CocoImage<'a>>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory<'a>>,
}

#[derive(Debug, Serialize)]
struct CocoImage<'a> {
    id: u64,
    width: u32,
    height: u32,
    file_name: &'a str,
}

#[derive(Debug, Serialize)]
struct CocoCategory<'a> {
    id: u64,
    name: &'a str,
    supercategory: &'static str,
}

#[derive(Debug, Serialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u64,

    /// [x, y, width, height] with (x, y) as top-left corner
    bbox: [f64; 4],

    area: f64,
    iscrowd: u8,

    /// Always empty; boxes carry no polygon.
    segmentation: Vec<Vec<f64>>,
}

// ============================================================================
// Public API
// ============================================================================

/// Renders the session as a pretty-printed COCO JSON document.
///
/// # Errors
/// `EmptyExport` if there are no categories or no exportable boxes.
pub fn to_coco_string(input: &ExportInput<'_>) -> Result<String, AnnoboxError> {
    let coco = session_to_coco(input)?;
    serde_json::to_string_pretty(&coco).map_err(AnnoboxError::JsonWrite)
}

// ============================================================================
// Conversion: session -> COCO
// ============================================================================

fn session_to_coco<'a>(input: &ExportInput<'a>) -> Result<CocoDataset<'a>, AnnoboxError> {
    let boxes = input.require_exportable()?;
    let image = input.image;

    let images = vec![CocoImage {
        id: IMAGE_ID,
        width: image.natural_width(),
        height: image.natural_height(),
        file_name: &image.file_name,
    }];

    let categories = input
        .categories
        .iter()
        .enumerate()
        .map(|(index, category)| CocoCategory {
            id: index as u64 + 1,
            name: &category.name,
            supercategory: SUPERCATEGORY,
        })
        .collect();

    let annotations = boxes
        .iter()
        .enumerate()
        .map(|(seq, exportable)| {
            let px = transform::to_image_pixels(&exportable.bbox.rect, &image.placement);
            let (x, y, w, h) = px.to_xywh();

            CocoAnnotation {
                id: seq as u64 + 1,
                image_id: IMAGE_ID,
                category_id: exportable.category_index as u64 + 1,
                bbox: [x, y, w, h],
                area: px.area(),
                iscrowd: 0,
                segmentation: Vec::new(),
            }
        })
        .collect();

    Ok(CocoDataset {
        images,
        annotations,
        categories,
    })
}

// ============================================================================
// Tests
// ============================================================================
