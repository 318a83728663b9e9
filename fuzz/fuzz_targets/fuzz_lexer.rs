#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::source::{Scheme, SourceUrl};
use rotor_core::TokenStream;

fuzz_target!(|data: &[u8]| {
    // The lexer alone, fed byte-by-byte to stress chunk-boundary handling.
    // On success, verify the coverage invariant: payloads tile the input.
    let url = SourceUrl::new(Scheme::File, "/fuzz.js");
    let mut stream = TokenStream::new(url);
    let mut tokens = Vec::new();
    for byte in data {
        match stream.feed(std::slice::from_ref(byte)) {
            Ok(batch) => tokens.extend(batch),
            Err(_) => return,
        }
    }
    match stream.finish() {
        Ok(batch) => tokens.extend(batch),
        Err(_) => return,
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text, "token payloads must tile the source");
    }
});
