//! Fuzz target for replaying arbitrary scripts.
//!
//! Any script that parses must replay without panicking: rejected steps are
//! skipped and exports either succeed or report an error.

#![no_main]

use std::path::Path;

use annobox::config::SessionConfig;
use annobox::script::{self, ReplayOptions, Script, Step};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(mut script) = serde_json::from_slice::<Script>(data) else {
        return;
    };
    // Keep the fuzzer off the filesystem.
    script
        .steps
        .retain(|step| !matches!(step, Step::LoadImageFile { .. }));

    let opts = ReplayOptions {
        strict: false,
        run_exports: true,
    };
    let _ = script::replay(&script, SessionConfig::default(), Path::new("."), opts);
});
