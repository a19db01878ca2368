//! Pascal VOC XML writer.
//!
//! Produces one `<annotation>` document for the loaded image. Box corners are
//! natural image pixels, rounded to integers and clamped to the image.

use std::fmt::Write as _;

use super::ExportInput;
use crate::error::AnnoboxError;
use crate::geom::{transform, BBoxXYXY, Pixel};

const VOC_FOLDER: &str = "images";
const VOC_DEPTH: u32 = 3;

/// Integer VOC corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VocBndBox {
    xmin: u32,
    ymin: u32,
    xmax: u32,
    ymax: u32,
}

impl VocBndBox {
    fn from_pixels(bbox: &BBoxXYXY<Pixel>, width: u32, height: u32) -> Self {
        let round = |value: f64, limit: u32| value.round().clamp(0.0, limit as f64) as u32;
        Self {
            xmin: round(bbox.xmin(), width),
            ymin: round(bbox.ymin(), height),
            xmax: round(bbox.xmax(), width),
            ymax: round(bbox.ymax(), height),
        }
    }
}

/// Renders the session as a Pascal VOC XML document.
///
/// # Errors
/// `EmptyExport` if there are no categories or no exportable boxes.
pub fn to_voc_string(input: &ExportInput<'_>) -> Result<String, AnnoboxError> {
    let boxes = input.require_exportable()?;
    let image = input.image;
    let (width, height) = (image.natural_width(), image.natural_height());

    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>{}</folder>", VOC_FOLDER).expect("write to string");
    writeln!(
        xml,
        "  <filename>{}</filename>",
        xml_escape(&image.file_name)
    )
    .expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    writeln!(xml, "    <width>{}</width>", width).expect("write to string");
    writeln!(xml, "    <height>{}</height>", height).expect("write to string");
    writeln!(xml, "    <depth>{}</depth>", VOC_DEPTH).expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");
    writeln!(xml, "  <segmented>0</segmented>").expect("write to string");

    for exportable in &boxes {
        let rect = &exportable.bbox.rect;
        let px = transform::to_image_pixels(rect, &image.placement);
        let bnd = VocBndBox::from_pixels(&px, width, height);
        let truncated = u8::from(transform::is_truncated(rect, &image.placement));

        writeln!(xml, "  <object>").expect("write to string");
        writeln!(
            xml,
            "    <name>{}</name>",
            xml_escape(&exportable.bbox.category)
        )
        .expect("write to string");
        writeln!(xml, "    <pose>Unspecified</pose>").expect("write to string");
        writeln!(xml, "    <truncated>{}</truncated>", truncated).expect("write to string");
        writeln!(xml, "    <difficult>0</difficult>").expect("write to string");
        writeln!(xml, "    <bndbox>").expect("write to string");
        writeln!(xml, "      <xmin>{}</xmin>", bnd.xmin).expect("write to string");
        writeln!(xml, "      <ymin>{}</ymin>", bnd.ymin).expect("write to string");
        writeln!(xml, "      <xmax>{}</xmax>", bnd.xmax).expect("write to string");
        writeln!(xml, "      <ymax>{}</ymax>", bnd.ymax).expect("write to string");
        writeln!(xml, "    </bndbox>").expect("write to string");
        writeln!(xml, "  </object>").expect("write to string");
    }

    writeln!(xml, "</annotation>").expect("write to string");

    Ok(xml)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
