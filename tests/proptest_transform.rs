use annobox::export::ExportFormat;
use annobox::geom::transform;
use annobox::session::{Color, Event, ImageFormat, ImageInfo, Session, Transition};
use proptest::prelude::*;

mod proptest_helpers;

fn session_for(placement: annobox::geom::ImagePlacement) -> Session {
    let mut session = Session::default();
    session.load_image(ImageInfo::new("prop.png", ImageFormat::Png, placement));
    session
        .add_category("thing", Color::default())
        .expect("add category");
    session.select_category("thing").expect("select category");
    session
}

fn drag(session: &mut Session, x0: f64, y0: f64, x1: f64, y1: f64) -> Transition {
    session
        .handle(Event::PointerDown { x: x0, y: y0 })
        .expect("pointer down");
    session
        .handle(Event::PointerMove { x: x1, y: y1 })
        .expect("pointer move");
    session
        .handle(Event::PointerUp { x: x1, y: y1 })
        .expect("pointer up")
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn normalized_outputs_stay_in_unit_range(
        placement in proptest_helpers::arb_placement(),
        rect in proptest_helpers::arb_rect_any(),
    ) {
        let norm = transform::to_normalized(&rect, &placement);
        for value in [norm.x_center, norm.y_center, norm.width, norm.height] {
            prop_assert!((0.0..=1.0).contains(&value), "{:?}", norm);
        }
    }

    #[test]
    fn pixel_outputs_stay_inside_image(
        placement in proptest_helpers::arb_placement(),
        rect in proptest_helpers::arb_rect_any(),
    ) {
        let px = transform::to_image_pixels(&rect, &placement);
        let w = placement.natural_width() as f64;
        let h = placement.natural_height() as f64;

        prop_assert!(px.xmin() >= 0.0 && px.xmax() <= w, "{:?}", px);
        prop_assert!(px.ymin() >= 0.0 && px.ymax() <= h, "{:?}", px);
        prop_assert!(px.width() >= 0.0 && px.height() >= 0.0, "{:?}", px);
    }

    #[test]
    fn normalized_and_pixel_forms_agree_for_boxes_on_the_image(
        (placement, rect) in proptest_helpers::arb_placement_with_inner_rect(),
    ) {
        let norm = transform::to_normalized(&rect, &placement).to_bbox();
        let px = transform::to_image_pixels(&rect, &placement);
        let w = placement.natural_width() as f64;
        let h = placement.natural_height() as f64;
        let eps = proptest_helpers::eps_pixels(&placement);

        let checks = [
            (norm.xmin() * w, px.xmin(), "xmin"),
            (norm.ymin() * h, px.ymin(), "ymin"),
            (norm.xmax() * w, px.xmax(), "xmax"),
            (norm.ymax() * h, px.ymax(), "ymax"),
        ];
        for (actual, expected, what) in checks {
            let res = proptest_helpers::assert_close(actual, expected, eps, what);
            prop_assert!(res.is_ok(), "{}", res.unwrap_err());
        }
    }

    #[test]
    fn export_is_idempotent(
        (placement, rect) in proptest_helpers::arb_placement_with_inner_rect(),
    ) {
        let mut session = session_for(placement);
        drag(&mut session, rect.left, rect.top, rect.right(), rect.bottom());

        for format in [ExportFormat::Yolo, ExportFormat::Coco, ExportFormat::PascalVoc] {
            let first = session.export(format).ok();
            let second = session.export(format).ok();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn small_drags_never_commit(
        placement in proptest_helpers::arb_placement(),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
        dx in -4.9f64..4.9,
        dy in -400.0f64..400.0,
        swap in any::<bool>(),
    ) {
        let mut session = session_for(placement);
        let x0 = placement.offset_x() + fx * placement.scaled_width();
        let y0 = placement.offset_y() + fy * placement.scaled_height();
        let (dx, dy) = if swap { (dy, dx) } else { (dx, dy) };

        let outcome = drag(&mut session, x0, y0, x0 + dx, y0 + dy);

        prop_assert_eq!(outcome, Transition::Discarded);
        prop_assert!(session.store().is_empty());
    }
}
