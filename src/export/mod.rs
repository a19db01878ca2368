//! Annotation document writers.
//!
//! Each format is a pure function of the session's boxes, categories and
//! image metadata. They share one notion of which boxes are exportable and
//! one coordinate transform, so the YOLO, COCO and Pascal VOC documents for
//! the same session always agree with each other.
//!
//! # Ordering
//!
//! Boxes are written in store insertion order and categories in registry
//! order. Category indices are recomputed from the registry on every
//! export; they are not stable across category deletions.

pub mod coco;
pub mod voc;
pub mod yolo;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AnnoboxError;
use crate::session::{BoundingBox, CategoryRegistry, ImageInfo};

/// Supported export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(try_from = "String")]
pub enum ExportFormat {
    /// Ultralytics-style `.txt` labels plus `classes.txt`.
    Yolo,
    /// A single COCO JSON document.
    Coco,
    /// A Pascal VOC XML document.
    #[value(name = "pascal", aliases = ["voc", "pascal-voc"])]
    PascalVoc,
}

impl ExportFormat {
    /// File extension of the primary document.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Yolo => "txt",
            ExportFormat::Coco => "json",
            ExportFormat::PascalVoc => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Yolo => "yolo",
            ExportFormat::Coco => "coco",
            ExportFormat::PascalVoc => "pascal",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = AnnoboxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yolo" => Ok(ExportFormat::Yolo),
            "coco" | "coco-json" => Ok(ExportFormat::Coco),
            "pascal" | "voc" | "pascal-voc" => Ok(ExportFormat::PascalVoc),
            other => Err(AnnoboxError::UnsupportedFormat(format!(
                "'{}' (supported: yolo, coco, pascal)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = AnnoboxError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// One file produced by an export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub contents: String,
}

impl ExportFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// The files produced by one export, primary document last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportBundle {
    pub format: ExportFormat,
    pub files: Vec<ExportFile>,
}

impl ExportBundle {
    /// The annotation document itself (not `classes.txt`).
    pub fn primary(&self) -> Option<&ExportFile> {
        self.files.last()
    }

    pub fn file(&self, name: &str) -> Option<&ExportFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Writes every file into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, AnnoboxError> {
        fs::create_dir_all(dir).map_err(AnnoboxError::Io)?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.contents).map_err(AnnoboxError::Io)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Read-only view of the session state an export needs.
#[derive(Clone, Copy, Debug)]
pub struct ExportInput<'a> {
    pub boxes: &'a [BoundingBox],
    pub categories: &'a CategoryRegistry,
    pub image: &'a ImageInfo,
}

/// A box that will appear in the export, with its category index resolved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExportableBox<'a> {
    pub bbox: &'a BoundingBox,
    pub category_index: usize,
}

impl<'a> ExportInput<'a> {
    /// Boxes that can be written, in store order.
    ///
    /// A box is skipped if its category is gone from the registry, or its
    /// geometry is non-finite or has no positive width and height.
    pub(crate) fn exportable(&self) -> Vec<ExportableBox<'a>> {
        self.boxes
            .iter()
            .filter(|b| b.rect.is_finite() && b.rect.width > 0.0 && b.rect.height > 0.0)
            .filter_map(|b| {
                self.categories
                    .index_of(&b.category)
                    .map(|category_index| ExportableBox {
                        bbox: b,
                        category_index,
                    })
            })
            .collect()
    }

    /// Like [`exportable`](Self::exportable), but fails with `EmptyExport`
    /// when there is nothing to write.
    pub(crate) fn require_exportable(&self) -> Result<Vec<ExportableBox<'a>>, AnnoboxError> {
        if self.categories.is_empty() {
            return Err(AnnoboxError::EmptyExport);
        }
        let boxes = self.exportable();
        if boxes.is_empty() {
            return Err(AnnoboxError::EmptyExport);
        }
        Ok(boxes)
    }

    /// Base name for output files.
    pub(crate) fn stem_or(&self, fallback: &'a str) -> &'a str {
        self.image.stem().unwrap_or(fallback)
    }
}

/// Serializes `input` in the requested format.
pub fn export(format: ExportFormat, input: &ExportInput<'_>) -> Result<ExportBundle, AnnoboxError> {
    let files = match format {
        ExportFormat::Yolo => {
            let out = yolo::to_yolo(input)?;
            vec![
                ExportFile::new(yolo::CLASSES_FILE_NAME, out.classes),
                ExportFile::new(out.labels_file_name, out.labels),
            ]
        }
        ExportFormat::Coco => vec![ExportFile::new(
            format!("{}.json", input.stem_or("annotations")),
            coco::to_coco_string(input)?,
        )],
        ExportFormat::PascalVoc => vec![ExportFile::new(
            format!("{}.xml", input.stem_or("annotations")),
            voc::to_voc_string(input)?,
        )],
    };

    Ok(ExportBundle { format, files })
}
