//! Session audit.
//!
//! Checks a session for anything that would make an export empty, lossy or
//! surprising:
//! - Missing prerequisites (no image, no categories, no boxes)
//! - Box integrity (known category, finite and large enough geometry)
//! - Placement (boxes off the image, or hanging over its edge)
//! - Categories that hold an export index without any boxes

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashSet;

use crate::geom::transform;
use crate::session::{BoundingBox, CategoryRegistry, ImageInfo, Session};

/// Audits `session` and returns every issue found.
///
/// Strictness is up to the caller: see [`ValidationReport::is_ok_strict`].
pub fn validate_session(session: &Session) -> ValidationReport {
    validate_parts(
        session.categories(),
        session.store().all(),
        session.image(),
        session.store().min_size(),
    )
}

fn validate_parts(
    categories: &CategoryRegistry,
    boxes: &[BoundingBox],
    image: Option<&ImageInfo>,
    min_size: f64,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_prerequisites(categories, boxes, image, &mut report);
    validate_boxes(categories, boxes, image, min_size, &mut report);
    validate_categories(categories, boxes, &mut report);

    report
}

fn validate_prerequisites(
    categories: &CategoryRegistry,
    boxes: &[BoundingBox],
    image: Option<&ImageInfo>,
    report: &mut ValidationReport,
) {
    if image.is_none() {
        report.add(ValidationIssue::error(
            IssueCode::NoImageLoaded,
            "No image loaded; nothing can be exported",
            IssueContext::Session,
        ));
    }
    if categories.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::NoCategories,
            "No categories defined",
            IssueContext::Session,
        ));
    }
    if boxes.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::NoBoxes,
            "No boxes drawn",
            IssueContext::Session,
        ));
    }
}

fn validate_boxes(
    categories: &CategoryRegistry,
    boxes: &[BoundingBox],
    image: Option<&ImageInfo>,
    min_size: f64,
    report: &mut ValidationReport,
) {
    for b in boxes {
        let id = b.id.as_u64();

        if !categories.contains(&b.category) {
            report.add(ValidationIssue::error(
                IssueCode::BoxMissingCategory,
                format!("Category '{}' is not in the registry", b.category),
                IssueContext::Box { id },
            ));
        }

        let rect = &b.rect;
        if !rect.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::BoxNotFinite,
                format!(
                    "Geometry is not finite: left={}, top={}, width={}, height={}",
                    rect.left, rect.top, rect.width, rect.height
                ),
                IssueContext::Box { id },
            ));
            // Placement checks are meaningless on NaN/Inf.
            continue;
        }

        if rect.is_degenerate(min_size) {
            report.add(ValidationIssue::error(
                IssueCode::BoxDegenerate,
                format!(
                    "Box is {:.1}x{:.1} px, below the {:.1} px minimum",
                    rect.width, rect.height, min_size
                ),
                IssueContext::Box { id },
            ));
        }

        let Some(image) = image else {
            continue;
        };
        if !transform::overlaps_image(rect, &image.placement) {
            report.add(ValidationIssue::error(
                IssueCode::BoxOutsideImage,
                "Box lies entirely outside the image",
                IssueContext::Box { id },
            ));
        } else if transform::is_truncated(rect, &image.placement) {
            report.add(ValidationIssue::warning(
                IssueCode::BoxTruncated,
                "Box extends past the image edge and will be clipped on export",
                IssueContext::Box { id },
            ));
        }
    }
}

fn validate_categories(
    categories: &CategoryRegistry,
    boxes: &[BoundingBox],
    report: &mut ValidationReport,
) {
    if boxes.is_empty() {
        return;
    }

    let used: HashSet<&str> = boxes.iter().map(|b| b.category.as_str()).collect();
    for (index, category) in categories.iter().enumerate() {
        if !used.contains(category.name.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::UnusedCategory,
                format!("No boxes, but still occupies class index {}", index),
                IssueContext::Category {
                    name: category.name.clone(),
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use crate::geom::{ImagePlacement, Rect};
    use crate::session::{BoxId, Color, Event, ImageFormat};

    fn valid_session() -> Session {
        let mut session = Session::default();
        let placement = ImagePlacement::fit(400, 400, Viewport::default()).unwrap();
        session.load_image(ImageInfo::new("ok.png", ImageFormat::Png, placement));
        session.add_category("cat", Color::default()).unwrap();
        session.select_category("cat").unwrap();
        session.handle(Event::PointerDown { x: 10.0, y: 10.0 }).unwrap();
        session.handle(Event::PointerUp { x: 60.0, y: 60.0 }).unwrap();
        session
    }

    fn bbox(id: u64, category: &str, rect: Rect) -> BoundingBox {
        BoundingBox {
            id: BoxId(id),
            category: category.to_string(),
            rect,
        }
    }

    #[test]
    fn test_valid_session() {
        let report = validate_session(&valid_session());
        assert!(report.is_ok_strict(), "{report}");
    }

    #[test]
    fn test_empty_session() {
        let report = validate_session(&Session::default());
        assert!(report.has(IssueCode::NoImageLoaded));
        assert!(report.has(IssueCode::NoCategories));
        assert!(report.has(IssueCode::NoBoxes));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn test_box_off_image() {
        let mut categories = CategoryRegistry::new();
        categories.add("cat", Color::default()).unwrap();
        let placement = ImagePlacement::fit(400, 400, Viewport::default()).unwrap();
        let image = ImageInfo::new("ok.png", ImageFormat::Png, placement);
        let boxes = vec![bbox(1, "cat", Rect::new(-100.0, 10.0, 50.0, 50.0))];

        let report = validate_parts(&categories, &boxes, Some(&image), 5.0);
        assert!(report.has(IssueCode::BoxOutsideImage));
        assert!(!report.is_ok());
    }

    #[test]
    fn test_box_hanging_over_edge() {
        let mut session = valid_session();
        session.handle(Event::PointerDown { x: 20.0, y: 20.0 }).unwrap();
        session.handle(Event::PointerDown { x: 20.0, y: 20.0 }).unwrap();
        session
            .handle(Event::Modify(Rect::new(-20.0, 10.0, 50.0, 50.0)))
            .unwrap();

        let report = validate_session(&session);
        assert!(report.has(IssueCode::BoxTruncated));
        assert!(report.is_ok());
        assert!(!report.is_ok_strict());
    }

    #[test]
    fn test_box_integrity_issues() {
        let mut categories = CategoryRegistry::new();
        categories.add("a", Color::default()).unwrap();
        let boxes = vec![
            bbox(1, "a", Rect::new(0.0, 0.0, 2.0, 40.0)),
            bbox(2, "a", Rect::new(f64::NAN, 0.0, 10.0, 10.0)),
            bbox(3, "ghost", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ];

        let report = validate_parts(&categories, &boxes, None, 5.0);
        let codes: Vec<IssueCode> = report.issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::NoImageLoaded,
                IssueCode::BoxDegenerate,
                IssueCode::BoxNotFinite,
                IssueCode::BoxMissingCategory,
            ]
        );
    }

    #[test]
    fn test_unused_category() {
        let mut session = valid_session();
        session.add_category("dog", Color::default()).unwrap();

        let report = validate_session(&session);
        assert_eq!(report.warning_count(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.code, IssueCode::UnusedCategory);
        assert_eq!(issue.context.to_string(), "category 'dog'");
    }

    #[test]
    fn test_report_serializes() {
        let report = validate_session(&Session::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["issues"][0]["severity"], "error");
        assert_eq!(json["issues"][0]["code"], "no_image_loaded");
        assert_eq!(json["issues"][0]["context"]["kind"], "session");
    }
}
