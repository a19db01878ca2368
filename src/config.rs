//! Session configuration.
//!
//! The defaults reproduce the fixed 800x800 drawing surface and the 5 px
//! "too small to be a real label" threshold. The CLI can override both via
//! flags or environment variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnnoboxError;

/// Default canvas width and height in pixels.
pub const DEFAULT_VIEWPORT_SIZE: f64 = 800.0;

/// Boxes narrower or shorter than this (in canvas pixels) are discarded.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Size of the drawing surface the image is fitted into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_SIZE, DEFAULT_VIEWPORT_SIZE)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
impl FromStr for Viewport {
    type Err = AnnoboxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || AnnoboxError::InvalidPlacement(format!("invalid viewport '{raw}'"));

        let (w, h) = raw
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<f64>().map_err(|_| invalid())?;
        let height = h.trim().parse::<f64>().map_err(|_| invalid())?;

        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            return Err(invalid());
        }
        Ok(viewport)
    }
}

/// Parses a minimum box size: a finite, non-negative number of pixels.
pub fn parse_min_box_size(raw: &str) -> Result<f64, AnnoboxError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|size| size.is_finite() && *size >= 0.0)
        .ok_or_else(|| AnnoboxError::InvalidMinBoxSize(raw.to_string()))
}

/// Tunables for an annotation session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Drawing surface the image is fitted into on load.
    pub viewport: Viewport,

    /// Minimum width and height of a committed box, in canvas pixels.
    pub min_box_size: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            min_box_size: MIN_BOX_SIZE,
        }
    }
}

impl SessionConfig {
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_min_box_size(mut self, min_box_size: f64) -> Self {
        self.min_box_size = min_box_size;
        self
    }
}
