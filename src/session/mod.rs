//! A single-image annotation session.
//!
//! [`Session`] owns every piece of mutable state: the category registry, the
//! box store, the loaded image and the drawing state machine. The UI layer
//! is a dumb dispatcher that calls into it; nothing here is global.
//!
//! Every operation either succeeds completely or fails without touching the
//! session, so a rejected request never leaves it half-updated.

mod category;
mod drawing;
mod image;
mod store;

pub use category::{Category, CategoryRegistry, Color};
pub use drawing::{DrawContext, DrawState, DrawingStateMachine, Event, Transition};
pub use image::{ImageFormat, ImageInfo};
pub use store::{AnnotationStore, BoundingBox, BoxId};

use crate::config::SessionConfig;
use crate::error::AnnoboxError;
use crate::export::{self, ExportBundle, ExportFormat, ExportInput};

/// In-memory state for annotating one image.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    categories: CategoryRegistry,
    store: AnnotationStore,
    image: Option<ImageInfo>,
    selected_category: Option<String>,
    machine: DrawingStateMachine,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            categories: CategoryRegistry::new(),
            store: AnnotationStore::new(config.min_box_size),
            image: None,
            selected_category: None,
            machine: DrawingStateMachine::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn selected_box(&self) -> Option<BoxId> {
        self.machine.selected_box()
    }

    pub fn draw_state(&self) -> DrawState {
        self.machine.state()
    }

    /// Replaces the loaded image.
    ///
    /// Boxes belong to the previous image's placement, so they are dropped
    /// along with any gesture in progress. Categories are kept.
    pub fn load_image(&mut self, image: ImageInfo) {
        log::info!(
            "loaded {} ({}x{}, scale {:.4})",
            image.file_name,
            image.natural_width(),
            image.natural_height(),
            image.placement.scale()
        );
        self.store.clear();
        self.machine.reset();
        self.image = Some(image);
    }

    pub fn add_category(&mut self, name: &str, color: Color) -> Result<(), AnnoboxError> {
        let category = self.categories.add(name, color)?;
        log::debug!("added category '{}' ({})", category.name, category.color);
        Ok(())
    }

    /// Removes a category and every box labeled with it.
    pub fn remove_category(&mut self, name: &str) -> Result<(), AnnoboxError> {
        self.categories.remove(name)?;
        let removed = self.store.remove_by_category(name);
        self.machine.forget_missing(&self.store);
        if self.selected_category.as_deref() == Some(name) {
            self.selected_category = None;
        }
        log::debug!("removed category '{name}' and {removed} box(es)");
        Ok(())
    }

    /// Chooses the category new boxes are labeled with.
    pub fn select_category(&mut self, name: &str) -> Result<(), AnnoboxError> {
        if !self.categories.contains(name) {
            return Err(AnnoboxError::UnknownCategory(name.to_string()));
        }
        self.selected_category = Some(name.to_string());
        Ok(())
    }

    /// Removes a box directly, e.g. from a delete button next to it.
    pub fn remove_box(&mut self, id: BoxId) -> Result<BoundingBox, AnnoboxError> {
        let removed = self.store.remove(id)?;
        self.machine.forget_missing(&self.store);
        Ok(removed)
    }

    /// Feeds one pointer or keyboard event to the drawing state machine.
    pub fn handle(&mut self, event: Event) -> Result<Transition, AnnoboxError> {
        let ctx = DrawContext {
            store: &mut self.store,
            categories: &self.categories,
            placement: self.image.as_ref().map(|image| &image.placement),
            selected_category: self.selected_category.as_deref(),
        };
        self.machine.handle(event, ctx)
    }

    /// Serializes the current boxes in `format`.
    ///
    /// Read-only: exporting twice without changes in between yields
    /// identical bytes.
    pub fn export(&self, format: ExportFormat) -> Result<ExportBundle, AnnoboxError> {
        let image = self.image.as_ref().ok_or(AnnoboxError::NoImageLoaded)?;
        let input = ExportInput {
            boxes: self.store.all(),
            categories: &self.categories,
            image,
        };
        let bundle = export::export(format, &input)?;
        log::info!(
            "exported {} as {} ({} file(s))",
            image.file_name,
            format,
            bundle.files.len()
        );
        Ok(bundle)
    }
}
