//! Incremental UTF-8 decoding of source byte chunks.

use std::rc::Rc;

use crate::error::{RotorError, RotorResult};
use crate::source::SourceUrl;

/// Decodes a stream of byte chunks into text fragments.
///
/// Chunk boundaries may fall in the middle of a multi-byte sequence; the
/// decoder holds back the incomplete tail (at most 3 bytes) and prepends it
/// to the next chunk, so every fragment it emits is whole code points.
#[derive(Debug)]
pub struct Utf8Decoder {
    url: Rc<SourceUrl>,
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder for the given source.
    pub fn new(url: Rc<SourceUrl>) -> Self {
        Self {
            url,
            pending: Vec::new(),
        }
    }

    /// Decode one chunk, returning the text fragment it completes.
    pub fn push(&mut self, bytes: &[u8]) -> RotorResult<String> {
        self.pending.extend_from_slice(bytes);
        let valid_len = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => return Err(self.invalid()),
        };
        let rest = self.pending.split_off(valid_len);
        let text = std::mem::replace(&mut self.pending, rest);
        // `text` is exactly the prefix verified above.
        Ok(String::from_utf8(text).expect("verified UTF-8 prefix"))
    }

    /// Signal end of input.  Fails if a multi-byte sequence was left open.
    pub fn finish(&mut self) -> RotorResult<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn invalid(&self) -> RotorError {
        RotorError::Decode {
            url: self.url.to_string(),
        }
    }
}
