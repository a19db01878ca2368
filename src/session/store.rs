//! Committed bounding boxes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryRegistry;
use crate::error::AnnoboxError;
use crate::geom::{Canvas, Coord, Rect};

/// Identity of a committed box within one image's session.
///
/// IDs are handed out in increasing order and never reused while the image
/// stays loaded, so a stale ID cannot silently hit a newer box.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u64);

impl BoxId {
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxId({})", self.0)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BoxId {
    fn from(id: u64) -> Self {
        BoxId::new(id)
    }
}

/// A labeled rectangle in canvas space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub id: BoxId,

    /// Name of the category this box is labeled with.
    pub category: String,

    #[serde(flatten)]
    pub rect: Rect,
}

/// Insertion-ordered collection of committed boxes.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    boxes: Vec<BoundingBox>,
    next_id: u64,
    min_size: f64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(crate::config::MIN_BOX_SIZE)
    }
}

impl AnnotationStore {
    /// Creates an empty store that rejects boxes smaller than `min_size`.
    pub fn new(min_size: f64) -> Self {
        Self {
            boxes: Vec::new(),
            next_id: 1,
            min_size,
        }
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Appends a box labeled `category`.
    ///
    /// The category must exist in `categories` and both sides must be at
    /// least the minimum size; otherwise nothing is stored.
    pub fn add(
        &mut self,
        category: &str,
        rect: Rect,
        categories: &CategoryRegistry,
    ) -> Result<BoxId, AnnoboxError> {
        if !categories.contains(category) {
            return Err(AnnoboxError::UnknownCategory(category.to_string()));
        }
        if !rect.is_finite() || rect.is_degenerate(self.min_size) {
            return Err(AnnoboxError::DegenerateBox {
                width: rect.width,
                height: rect.height,
            });
        }

        let id = BoxId::new(self.next_id);
        self.next_id += 1;
        self.boxes.push(BoundingBox {
            id,
            category: category.to_string(),
            rect,
        });
        Ok(id)
    }

    /// Removes one box and returns it.
    pub fn remove(&mut self, id: BoxId) -> Result<BoundingBox, AnnoboxError> {
        let index = self
            .position(id)
            .ok_or(AnnoboxError::UnknownBox(id))?;
        Ok(self.boxes.remove(index))
    }

    /// Removes every box labeled `category`, returning how many went.
    pub fn remove_by_category(&mut self, category: &str) -> usize {
        let before = self.boxes.len();
        self.boxes.retain(|b| b.category != category);
        before - self.boxes.len()
    }

    /// Replaces the geometry of a box that is being moved or resized.
    ///
    /// Identity, label and position in the store are preserved. A rectangle
    /// with negative sides is flipped; one that is non-finite or smaller
    /// than the minimum size is rejected and the box keeps its old geometry.
    pub fn set_geometry(&mut self, id: BoxId, rect: Rect) -> Result<(), AnnoboxError> {
        let index = self
            .position(id)
            .ok_or(AnnoboxError::UnknownBox(id))?;
        let rect = rect.normalized();
        if !rect.is_finite() || rect.is_degenerate(self.min_size) {
            return Err(AnnoboxError::DegenerateBox {
                width: rect.width,
                height: rect.height,
            });
        }
        self.boxes[index].rect = rect;
        Ok(())
    }

    pub fn get(&self, id: BoxId) -> Option<&BoundingBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Topmost (most recently added) box containing `point`.
    pub fn hit_test(&self, point: Coord<Canvas>) -> Option<BoxId> {
        self.boxes
            .iter()
            .rev()
            .find(|b| b.rect.contains(point))
            .map(|b| b.id)
    }

    /// All boxes in insertion order.
    pub fn all(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Drops every box. IDs keep counting up.
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    fn position(&self, id: BoxId) -> Option<usize> {
        self.boxes.iter().position(|b| b.id == id)
    }
}
