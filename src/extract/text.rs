//! Plain text passthrough.

use super::TextExtractor;
use crate::error::Result;

/// Plain text extractor: UTF-8 decode, nothing else.
///
/// Invalid sequences are replaced with U+FFFD and a leading byte order
/// mark is dropped.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let extractor = PlainTextExtractor::new();
        let text = "Title\n\n  indented\r\nbody  ";
        assert_eq!(extractor.extract(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.extract(b"\xEF\xBB\xBFHi").unwrap(), "Hi");
        assert_eq!(extractor.extract(b"a\xFFb").unwrap(), "a\u{FFFD}b");
    }
}
