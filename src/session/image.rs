//! Metadata for the image being annotated.
//!
//! Pixels are never decoded here. Only the natural size matters, and for
//! files on disk it is read from the header.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::Viewport;
use crate::error::AnnoboxError;
use crate::geom::ImagePlacement;

/// Image types accepted for annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Maps an upload MIME type. Only PNG, JPEG/JPG and WEBP are accepted.
    pub fn from_mime(mime: &str) -> Result<Self, AnnoboxError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/webp" => Ok(Self::Webp),
            _ => Err(AnnoboxError::InvalidImageFormat(mime.to_string())),
        }
    }

    /// Maps a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, AnnoboxError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            _ => Err(AnnoboxError::InvalidImageFormat(path.display().to_string())),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A loaded image: its name, type and where it sits on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageInfo {
    pub file_name: String,
    pub format: ImageFormat,
    pub placement: ImagePlacement,
}

impl ImageInfo {
    pub fn new(
        file_name: impl Into<String>,
        format: ImageFormat,
        placement: ImagePlacement,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            placement,
        }
    }

    pub fn natural_width(&self) -> u32 {
        self.placement.natural_width()
    }

    pub fn natural_height(&self) -> u32 {
        self.placement.natural_height()
    }

    /// File name without directory or extension, if there is a usable one.
    pub fn stem(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.trim().is_empty())
    }

    /// Reads the natural size of an image file and fits it into `viewport`.
    pub fn probe_file(path: &Path, viewport: Viewport) -> Result<Self, AnnoboxError> {
        let format = ImageFormat::from_path(path)?;
        let size = imagesize::size(path).map_err(|source| AnnoboxError::ImageProbe {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

        let width = u32::try_from(size.width).map_err(|_| AnnoboxError::ImageProbe {
            path: path.to_path_buf(),
            message: format!("width {} exceeds u32", size.width),
        })?;
        let height = u32::try_from(size.height).map_err(|_| AnnoboxError::ImageProbe {
            path: path.to_path_buf(),
            message: format!("height {} exceeds u32", size.height),
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(
            file_name,
            format,
            ImagePlacement::fit(width, height, viewport)?,
        ))
    }
}
