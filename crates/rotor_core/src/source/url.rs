//! Source URLs.
//!
//! A [`SourceUrl`] names where a program came from.  It is an opaque
//! identifier as far as the parser is concerned; the pipeline carries it
//! through every [`Span`](crate::source::Span) so diagnostics can point
//! back at the right file, network resource, or inline snippet.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;

use crate::error::{RotorError, RotorResult};

/// The scheme of a [`SourceUrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// A local file path.
    File,
    /// An `http://` resource.
    Http,
    /// An `https://` resource.
    Https,
    /// An inline `data:` URL.
    Data,
}

impl Scheme {
    fn name(self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Data => "data",
        }
    }
}

/// An opaque identifier for a source of program text: a [`Scheme`] plus a
/// scheme-specific target.
///
/// Construct one with [`SourceUrl::resolve`] from a user-supplied string,
/// or directly with [`SourceUrl::new`] when the scheme is already known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    scheme: Scheme,
    target: String,
}

impl SourceUrl {
    /// Create a URL from an already-resolved scheme and target.
    ///
    /// For `file` the target is the path; for `http`/`https` it is the
    /// authority-and-path part after `//`; for `data` it is everything
    /// after `data:`.
    pub fn new(scheme: Scheme, target: impl Into<String>) -> Self {
        Self {
            scheme,
            target: target.into(),
        }
    }

    /// Resolve a user-supplied string into a [`SourceUrl`].
    ///
    /// - Strings starting with `/` or `./` resolve as file paths.
    /// - Strings of the form `scheme://…` (or `data:…`) parse as URLs.
    /// - Anything else is treated as program text and wrapped verbatim
    ///   into a base64url-encoded `data:application/javascript` URL.
    pub fn resolve(input: &str) -> RotorResult<Self> {
        if input.starts_with('/') || input.starts_with("./") {
            return Ok(Self::new(Scheme::File, input));
        }
        if let Some(rest) = input.strip_prefix("data:") {
            return Ok(Self::new(Scheme::Data, rest));
        }
        if let Some((scheme, rest)) = input.split_once("://") {
            let scheme = match scheme {
                "file" => Scheme::File,
                "http" => Scheme::Http,
                "https" => Scheme::Https,
                _ => return Err(RotorError::UnresolvableSource(input.to_string())),
            };
            return Ok(Self::new(scheme, rest));
        }
        Ok(Self::inline(input))
    }

    /// Wrap program text into an inline `data:application/javascript` URL.
    pub fn inline(source_text: &str) -> Self {
        let encoded = URL_SAFE_NO_PAD.encode(source_text.as_bytes());
        Self::new(
            Scheme::Data,
            format!("application/javascript;base64,{encoded}"),
        )
    }

    /// The URL's scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The scheme-specific target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decode the payload of a `data:` URL.
    ///
    /// Returns an error for other schemes or for malformed payloads.
    pub fn data_bytes(&self) -> RotorResult<Vec<u8>> {
        if self.scheme != Scheme::Data {
            return Err(RotorError::UnresolvableSource(self.to_string()));
        }
        let payload = match self.target.split_once(',') {
            Some((meta, body)) if meta.ends_with(";base64") => URL_SAFE_NO_PAD
                .decode(body.as_bytes())
                .map_err(|_| RotorError::UnresolvableSource(self.to_string()))?,
            Some((_, body)) => body.as_bytes().to_vec(),
            None => return Err(RotorError::UnresolvableSource(self.to_string())),
        };
        Ok(payload)
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            Scheme::Data => write!(f, "data:{}", self.target),
            Scheme::File => write!(f, "{}", self.target),
            _ => write!(f, "{}://{}", self.scheme.name(), self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_path() {
        let url = SourceUrl::resolve("/tmp/a.js").unwrap();
        assert_eq!(url.scheme(), Scheme::File);
        assert_eq!(url.target(), "/tmp/a.js");
    }

    #[test]
    fn test_resolve_relative_path() {
        let url = SourceUrl::resolve("./a.js").unwrap();
        assert_eq!(url.scheme(), Scheme::File);
    }

    #[test]
    fn test_resolve_https() {
        let url = SourceUrl::resolve("https://example.com/a.js").unwrap();
        assert_eq!(url.scheme(), Scheme::Https);
        assert_eq!(url.target(), "example.com/a.js");
    }

    #[test]
    fn test_resolve_unknown_scheme_is_error() {
        assert!(SourceUrl::resolve("ftp://example.com/a.js").is_err());
    }

    #[test]
    fn test_resolve_bare_text_becomes_data_url() {
        let url = SourceUrl::resolve("console.log(1)").unwrap();
        assert_eq!(url.scheme(), Scheme::Data);
        assert_eq!(url.data_bytes().unwrap(), b"console.log(1)");
    }

    #[test]
    fn test_data_url_roundtrip_display() {
        let url = SourceUrl::inline("x");
        let shown = url.to_string();
        let reparsed = SourceUrl::resolve(&shown).unwrap();
        assert_eq!(reparsed.data_bytes().unwrap(), b"x");
    }
}
