//! Pointer-gesture state machine.
//!
//! The drawing surface forwards raw pointer and keyboard events; this module
//! decides what they mean. Only one gesture can be active at a time.
//!
//! ```text
//!            pointer-down (category + image)
//!   Idle ────────────────────────────────▶ Drawing ──┐ pointer-move
//!    ▲  ▲                                     │  ◀───┘ (clamped preview)
//!    │  └───────────── pointer-up ────────────┘   commit or discard
//!    │
//!    │  pointer-down inside the selected box
//!    └──── Modifying ◀──────────────────────── Idle
//!        pointer-up / deselect            modify: geometry updated in place
//! ```
//!
//! A pointer-down on another box selects it. Anywhere else it clears the
//! selection and starts drawing in the same gesture.

use super::category::CategoryRegistry;
use super::store::{AnnotationStore, BoxId};
use crate::error::AnnoboxError;
use crate::geom::{transform, Canvas, Coord, ImagePlacement, Rect};

/// An input event from the drawing surface. Positions are in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },

    /// New geometry for the selected box, reported by the surface's own
    /// move/resize handles.
    Modify(Rect),

    /// Selection cleared by the surface (e.g. Escape or focus loss).
    Deselect,

    /// Delete or Backspace.
    DeleteKey,
}

/// Gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,

    /// Dragging out a new box from `anchor`; `rect` is the clamped preview.
    Drawing { anchor: Coord<Canvas>, rect: Rect },

    /// Moving or resizing a committed box.
    Modifying { id: BoxId },
}

impl DrawState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawState::Drawing { .. })
    }
}

/// What an event did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// The event has no meaning in the current state.
    Ignored,
    DrawingStarted,
    /// The in-progress rectangle changed.
    Preview(Rect),
    /// A new box was stored.
    Committed(BoxId),
    /// The gesture ended with a box too small to keep.
    Discarded,
    Selected(BoxId),
    Deselected,
    ModifyStarted(BoxId),
    Modified(BoxId),
    ModifyEnded(BoxId),
    Deleted(BoxId),
}

/// Everything outside the machine that an event may read or change.
pub struct DrawContext<'a> {
    pub store: &'a mut AnnotationStore,
    pub categories: &'a CategoryRegistry,
    pub placement: Option<&'a ImagePlacement>,
    pub selected_category: Option<&'a str>,
}

/// Owns the gesture state and the box selection.
#[derive(Clone, Debug, Default)]
pub struct DrawingStateMachine {
    state: DrawState,
    selected_box: Option<BoxId>,
}

impl DrawingStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn selected_box(&self) -> Option<BoxId> {
        self.selected_box
    }

    /// Drops any gesture and selection, e.g. when a new image is loaded.
    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
        self.selected_box = None;
    }

    /// Forgets the selected box if it no longer exists in `store`.
    pub(crate) fn forget_missing(&mut self, store: &AnnotationStore) {
        if let Some(id) = self.selected_box {
            if store.get(id).is_none() {
                self.selected_box = None;
                if self.state == (DrawState::Modifying { id }) {
                    self.state = DrawState::Idle;
                }
            }
        }
    }

    /// Applies one event.
    ///
    /// On error the machine and the store are left exactly as they were.
    pub fn handle(
        &mut self,
        event: Event,
        ctx: DrawContext<'_>,
    ) -> Result<Transition, AnnoboxError> {
        let transition = match (self.state, event) {
            (DrawState::Idle, Event::PointerDown { x, y }) => {
                self.pointer_down(Coord::new(x, y), &ctx)?
            }
            (DrawState::Drawing { anchor, .. }, Event::PointerMove { x, y }) => {
                let Some(placement) = ctx.placement else {
                    return Err(AnnoboxError::NoImageLoaded);
                };
                let rect = clamped_rect(anchor, Coord::new(x, y), placement);
                self.state = DrawState::Drawing { anchor, rect };
                Transition::Preview(rect)
            }
            (DrawState::Drawing { anchor, .. }, Event::PointerUp { x, y }) => {
                self.finish_drawing(anchor, Coord::new(x, y), ctx)?
            }
            (DrawState::Modifying { id }, Event::Modify(rect)) => {
                let rect = rect.normalized();
                if let Some(placement) = ctx.placement {
                    if rect.is_finite() && !transform::overlaps_image(&rect, placement) {
                        return Err(AnnoboxError::BoxOutsideImage);
                    }
                }
                ctx.store.set_geometry(id, rect)?;
                Transition::Modified(id)
            }
            (DrawState::Modifying { id }, Event::PointerUp { .. }) => {
                self.state = DrawState::Idle;
                Transition::ModifyEnded(id)
            }
            (DrawState::Drawing { .. }, Event::DeleteKey) => Transition::Ignored,
            (_, Event::DeleteKey) => match self.selected_box {
                Some(id) => {
                    ctx.store.remove(id)?;
                    self.reset();
                    Transition::Deleted(id)
                }
                None => Transition::Ignored,
            },
            (DrawState::Drawing { .. }, Event::Deselect) => Transition::Ignored,
            (_, Event::Deselect) => {
                let had_selection = self.selected_box.is_some();
                self.reset();
                if had_selection {
                    Transition::Deselected
                } else {
                    Transition::Ignored
                }
            }
            _ => Transition::Ignored,
        };

        log::debug!("{:?} -> {:?} ({:?})", event, self.state, transition);
        Ok(transition)
    }

    fn pointer_down(
        &mut self,
        point: Coord<Canvas>,
        ctx: &DrawContext<'_>,
    ) -> Result<Transition, AnnoboxError> {
        if let Some(selected) = self.selected_box {
            let inside = ctx
                .store
                .get(selected)
                .is_some_and(|b| b.rect.contains(point));
            if inside {
                self.state = DrawState::Modifying { id: selected };
                return Ok(Transition::ModifyStarted(selected));
            }
        }

        if let Some(hit) = ctx.store.hit_test(point) {
            self.selected_box = Some(hit);
            return Ok(Transition::Selected(hit));
        }

        if ctx.selected_category.is_none() {
            return Err(AnnoboxError::NoCategorySelected);
        }
        let Some(placement) = ctx.placement else {
            return Err(AnnoboxError::NoImageLoaded);
        };

        let rect = clamped_rect(point, point, placement);
        self.selected_box = None;
        self.state = DrawState::Drawing {
            anchor: point,
            rect,
        };
        Ok(Transition::DrawingStarted)
    }

    fn finish_drawing(
        &mut self,
        anchor: Coord<Canvas>,
        release: Coord<Canvas>,
        ctx: DrawContext<'_>,
    ) -> Result<Transition, AnnoboxError> {
        let (Some(placement), Some(category)) = (ctx.placement, ctx.selected_category) else {
            self.state = DrawState::Idle;
            return Ok(Transition::Discarded);
        };

        let rect = clamped_rect(anchor, release, placement);
        if rect.is_degenerate(ctx.store.min_size()) {
            self.state = DrawState::Idle;
            return Ok(Transition::Discarded);
        }

        let id = ctx.store.add(category, rect, ctx.categories)?;
        self.state = DrawState::Idle;
        Ok(Transition::Committed(id))
    }
}

/// The rectangle spanned by `anchor` and `pointer`, clipped to the image.
fn clamped_rect(anchor: Coord<Canvas>, pointer: Coord<Canvas>, placement: &ImagePlacement) -> Rect {
    let bounds = placement.bounds();
    Rect::from_corners(anchor.clamp_into(&bounds), pointer.clamp_into(&bounds))
}
