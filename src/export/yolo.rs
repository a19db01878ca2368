//! YOLO label writer.
//!
//! One line per box:
//!
//! ```text
//! <class_index> <x_center> <y_center> <width> <height>
//! ```
//!
//! All four coordinates are normalized to the natural image size, clamped
//! to `[0, 1]` and printed with six decimals. Class indices refer to the
//! line numbers of the sibling `classes.txt`.
//!
//! Boxes that partly overlap the image are clamped, never dropped.

use std::fmt::Write as _;

use super::ExportInput;
use crate::error::AnnoboxError;
use crate::geom::transform;

/// Name of the class list written next to the label file.
pub const CLASSES_FILE_NAME: &str = "classes.txt";

const LABELS_FALLBACK_STEM: &str = "labels";

/// `<stem>.txt`, unless that would collide with the class list.
fn labels_file_name(stem: &str) -> String {
    if format!("{stem}.txt").eq_ignore_ascii_case(CLASSES_FILE_NAME) {
        format!("{LABELS_FALLBACK_STEM}.txt")
    } else {
        format!("{stem}.txt")
    }
}

/// Label file and class list for one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YoloOutput {
    pub labels_file_name: String,
    /// Newline-joined label lines, no trailing newline.
    pub labels: String,
    /// Newline-joined category names in registry order.
    pub classes: String,
}

/// Renders the YOLO label file and class list.
pub fn to_yolo(input: &ExportInput<'_>) -> Result<YoloOutput, AnnoboxError> {
    let boxes = input.require_exportable()?;
    let placement = &input.image.placement;

    let mut labels = String::new();
    for (i, exportable) in boxes.iter().enumerate() {
        if i > 0 {
            labels.push('\n');
        }
        let norm = transform::to_normalized(&exportable.bbox.rect, placement);
        write!(
            labels,
            "{} {:.6} {:.6} {:.6} {:.6}",
            exportable.category_index, norm.x_center, norm.y_center, norm.width, norm.height
        )
        .expect("write to string");
    }

    Ok(YoloOutput {
        labels_file_name: labels_file_name(input.stem_or(LABELS_FALLBACK_STEM)),
        labels,
        classes: input.categories.list().join("\n"),
    })
}
