use std::path::PathBuf;
use thiserror::Error;

use crate::session::BoxId;
use crate::validation::ValidationReport;

/// The main error type for annobox operations.
#[derive(Debug, Error)]
pub enum AnnoboxError {
    #[error("Unsupported image type '{0}' (use PNG, JPG, JPEG or WEBP)")]
    InvalidImageFormat(String),

    #[error("Invalid image dimensions {width}x{height} (must be positive)")]
    InvalidImageDimensions { width: u32, height: u32 },

    #[error("Invalid image placement: {0}")]
    InvalidPlacement(String),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Category name must not be empty")]
    InvalidName,

    #[error("Invalid color '{0}' (expected #rrggbb, #rrggbbaa, rgb() or rgba())")]
    InvalidColor(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown box {0}")]
    UnknownBox(BoxId),

    #[error("Box of {width:.1}x{height:.1} px is too small to be a label")]
    DegenerateBox { width: f64, height: f64 },

    #[error("Invalid minimum box size '{0}' (expected a non-negative number)")]
    InvalidMinBoxSize(String),

    #[error("Box lies entirely outside the image")]
    BoxOutsideImage,

    #[error("Select a category before labeling")]
    NoCategorySelected,

    #[error("Load an image first")]
    NoImageLoaded,

    #[error("Nothing to export: add at least one category and one box")]
    EmptyExport,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image size from {path}: {message}")]
    ImageProbe { path: PathBuf, message: String },

    #[error("Failed to parse session script {path}: {message}")]
    ScriptParse { path: PathBuf, message: String },

    #[error("Failed to serialize JSON: {0}")]
    JsonWrite(#[source] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

impl AnnoboxError {
    /// Returns true for errors caused by an ordinary user action.
    ///
    /// These are reported back to the user and the session carries on;
    /// everything else (I/O, malformed scripts) aborts the current command.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AnnoboxError::InvalidImageFormat(_)
                | AnnoboxError::InvalidImageDimensions { .. }
                | AnnoboxError::InvalidPlacement(_)
                | AnnoboxError::DuplicateCategory(_)
                | AnnoboxError::InvalidName
                | AnnoboxError::InvalidColor(_)
                | AnnoboxError::UnknownCategory(_)
                | AnnoboxError::UnknownBox(_)
                | AnnoboxError::DegenerateBox { .. }
                | AnnoboxError::BoxOutsideImage
                | AnnoboxError::NoCategorySelected
                | AnnoboxError::NoImageLoaded
                | AnnoboxError::EmptyExport
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_errors_are_classified() {
        assert!(AnnoboxError::NoCategorySelected.is_user_facing());
        assert!(AnnoboxError::EmptyExport.is_user_facing());
        assert!(AnnoboxError::DuplicateCategory("dog".into()).is_user_facing());

        let io = AnnoboxError::Io(std::io::Error::other("disk full"));
        assert!(!io.is_user_facing());
    }
}
