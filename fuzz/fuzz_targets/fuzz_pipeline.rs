#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::source::{Scheme, SourceUrl};
use rotor_core::Pipeline;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through the full pipeline in small chunks.
    // Errors (bad UTF-8, unterminated literals, grammar rejections) are
    // fine; panics and hangs are not.
    let url = SourceUrl::new(Scheme::File, "/fuzz.js");
    let mut pipeline = Pipeline::new(url);
    for chunk in data.chunks(7) {
        if pipeline.feed(chunk).is_err() {
            return;
        }
    }
    let _ = pipeline.finish();
});
