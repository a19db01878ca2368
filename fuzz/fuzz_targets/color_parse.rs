//! Fuzz target for category color parsing.

#![no_main]

use annobox::session::Color;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(color) = raw.parse::<Color>() {
            // Display output must parse back to the same color.
            let again: Color = color.to_string().parse().expect("display round-trips");
            assert_eq!(color, again);
        }
    }
});
