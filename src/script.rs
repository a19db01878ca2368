//! Session scripts: a recorded sequence of UI actions.
//!
//! A script is a JSON or YAML document listing the calls a drawing surface
//! would make, one step at a time:
//!
//! ```yaml
//! viewport: { width: 800, height: 800 }
//! steps:
//!   - op: load_image
//!     file_name: street.png
//!     mime: image/png
//!     width: 1000
//!     height: 500
//!   - op: add_category
//!     name: car
//!   - op: select_category
//!     name: car
//!   - op: pointer_down
//!     x: 100
//!     y: 250
//!   - op: pointer_up
//!     x: 200
//!     y: 320
//!   - op: export
//!     format: yolo
//! ```
//!
//! Replaying drives a [`Session`] exactly as the UI would. Rejected actions
//! (duplicate category, drawing without a category, ...) are reported and
//! skipped, the same way the UI shows a message and carries on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{SessionConfig, Viewport};
use crate::error::AnnoboxError;
use crate::export::{ExportBundle, ExportFormat};
use crate::geom::{ImagePlacement, PlacementSpec, Rect};
use crate::session::{Color, Event, ImageFormat, ImageInfo, Session};

/// A parsed session script.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Overrides the configured viewport for this script.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub steps: Vec<Step>,
}

/// One UI action.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Image metadata as reported by the browser; the pixels are not needed.
    LoadImage {
        file_name: String,
        mime: String,
        width: u32,
        height: u32,
        /// Explicit placement; fitted into the viewport when absent.
        #[serde(default)]
        placement: Option<PlacementSpec>,
    },
    /// Reads the natural size from an image file on disk.
    LoadImageFile { path: PathBuf },
    AddCategory {
        name: String,
        #[serde(default)]
        color: Color,
    },
    RemoveCategory { name: String },
    SelectCategory { name: String },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Modify {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    Deselect,
    DeleteKey,
    Export { format: ExportFormat },
}

impl Step {
    /// Applies this step to `session`.
    ///
    /// Relative image paths are resolved against `base_dir`. Returns the
    /// bundle for export steps when `run_exports` is set.
    fn apply(
        &self,
        session: &mut Session,
        base_dir: &Path,
        run_exports: bool,
    ) -> Result<Option<ExportBundle>, AnnoboxError> {
        match self {
            Step::LoadImage {
                file_name,
                mime,
                width,
                height,
                placement,
            } => {
                let format = ImageFormat::from_mime(mime)?;
                let placement = match placement {
                    Some(spec) => ImagePlacement::from_spec(*width, *height, *spec)?,
                    None => ImagePlacement::fit(*width, *height, session.config().viewport)?,
                };
                session.load_image(ImageInfo::new(file_name.clone(), format, placement));
            }
            Step::LoadImageFile { path } => {
                let path = base_dir.join(path);
                let image = ImageInfo::probe_file(&path, session.config().viewport)?;
                session.load_image(image);
            }
            Step::AddCategory { name, color } => session.add_category(name, *color)?,
            Step::RemoveCategory { name } => session.remove_category(name)?,
            Step::SelectCategory { name } => session.select_category(name)?,
            Step::PointerDown { x, y } => {
                session.handle(Event::PointerDown { x: *x, y: *y })?;
            }
            Step::PointerMove { x, y } => {
                session.handle(Event::PointerMove { x: *x, y: *y })?;
            }
            Step::PointerUp { x, y } => {
                session.handle(Event::PointerUp { x: *x, y: *y })?;
            }
            Step::Modify {
                left,
                top,
                width,
                height,
            } => {
                session.handle(Event::Modify(Rect::new(*left, *top, *width, *height)))?;
            }
            Step::Deselect => {
                session.handle(Event::Deselect)?;
            }
            Step::DeleteKey => {
                session.handle(Event::DeleteKey)?;
            }
            Step::Export { format } => {
                if run_exports {
                    return session.export(*format).map(Some);
                }
            }
        }
        Ok(None)
    }
}

impl Script {
    /// Reads a script, choosing the parser from the file extension
    /// (`.json`, `.yaml` or `.yml`).
    pub fn from_path(path: &Path) -> Result<Self, AnnoboxError> {
        let raw = fs::read_to_string(path)?;
        let parse_error = |message: String| AnnoboxError::ScriptParse {
            path: path.to_path_buf(),
            message,
        };

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string())),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&raw).map_err(|e| parse_error(e.to_string()))
            }
            _ => Err(parse_error(
                "unrecognized extension (expected .json, .yaml or .yml)".to_string(),
            )),
        }
    }
}

/// How a replay treats rejected steps and export steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplayOptions {
    /// Abort on the first rejected step instead of skipping it.
    pub strict: bool,
    /// Run export steps. When false they are no-ops.
    pub run_exports: bool,
}

/// A step the session rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedStep {
    /// Zero-based position in the script.
    pub index: usize,
    pub message: String,
}

/// Everything a replay produced.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub session: Session,
    pub exports: Vec<ExportBundle>,
    pub skipped: Vec<SkippedStep>,
}

/// Replays `script` against a fresh session built from `config`.
///
/// Errors a user could cause by clicking are skipped and recorded in
/// [`ReplayOutcome::skipped`] unless `opts.strict` is set. I/O failures
/// always abort.
pub fn replay(
    script: &Script,
    config: SessionConfig,
    base_dir: &Path,
    opts: ReplayOptions,
) -> Result<ReplayOutcome, AnnoboxError> {
    let config = match script.viewport {
        Some(viewport) => config.with_viewport(viewport),
        None => config,
    };
    let mut session = Session::new(config);
    let mut exports = Vec::new();
    let mut skipped = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        match step.apply(&mut session, base_dir, opts.run_exports) {
            Ok(Some(bundle)) => exports.push(bundle),
            Ok(None) => {}
            Err(err) if err.is_user_facing() && !opts.strict => {
                log::warn!("step {} skipped: {}", index + 1, err);
                skipped.push(SkippedStep {
                    index,
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(ReplayOutcome {
        session,
        exports,
        skipped,
    })
}
