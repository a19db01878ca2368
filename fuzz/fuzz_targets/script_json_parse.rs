//! Fuzz target for session script parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the JSON script parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use annobox::script::Script;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = serde_json::from_slice::<Script>(data);
});
