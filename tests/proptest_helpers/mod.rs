#![allow(dead_code)]

use annobox::geom::{ImagePlacement, Rect};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for comparing pixel coordinates derived along different paths.
pub fn eps_pixels(placement: &ImagePlacement) -> f64 {
    placement
        .natural_width()
        .max(placement.natural_height()) as f64
        * 1e-6
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_placement() -> BoxedStrategy<ImagePlacement> {
    (
        1u32..=4096,
        1u32..=4096,
        -500.0f64..500.0,
        -500.0f64..500.0,
        0.01f64..10.0,
    )
        .prop_map(|(w, h, ox, oy, scale)| {
            ImagePlacement::new(w, h, ox, oy, scale).expect("generated placement is valid")
        })
        .boxed()
}

/// Any finite rectangle near the canvas, possibly hanging off the image.
pub fn arb_rect_any() -> BoxedStrategy<Rect> {
    (
        -2000.0f64..2000.0,
        -2000.0f64..2000.0,
        0.0f64..4000.0,
        0.0f64..4000.0,
    )
        .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
        .boxed()
}

/// A rectangle lying entirely on the placed image.
pub fn arb_rect_within(placement: ImagePlacement) -> BoxedStrategy<Rect> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
        .prop_map(move |(fx0, fx1, fy0, fy1)| {
            let sw = placement.scaled_width();
            let sh = placement.scaled_height();
            Rect::new(
                placement.offset_x() + fx0.min(fx1) * sw,
                placement.offset_y() + fy0.min(fy1) * sh,
                (fx1 - fx0).abs() * sw,
                (fy1 - fy0).abs() * sh,
            )
        })
        .boxed()
}

pub fn arb_placement_with_inner_rect() -> BoxedStrategy<(ImagePlacement, Rect)> {
    arb_placement()
        .prop_flat_map(|placement| (Just(placement), arb_rect_within(placement)))
        .boxed()
}

pub fn assert_close(actual: f64, expected: f64, eps: f64, what: &str) -> Result<(), String> {
    if (actual - expected).abs() <= eps {
        Ok(())
    } else {
        Err(format!(
            "{what}: expected {expected}, got {actual} (eps {eps})"
        ))
    }
}
