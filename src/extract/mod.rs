//! Format extractors with extension-based dispatch.
//!
//! Every extractor turns raw bytes into plain text where paragraph
//! boundaries are blank lines and list items start with a bullet glyph.
//!
//! # Example
//!
//! ```
//! use docpdf::extract::ExtractorRegistry;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry.extract(b"{\\rtf1 Hello\\par World}", "note.rtf").unwrap();
//! assert_eq!(text, "Hello\n\nWorld");
//! ```

mod docx;
mod html;
mod rtf;
mod text;

pub use docx::DocxExtractor;
pub use html::HtmlExtractor;
pub use rtf::RtfExtractor;
pub use text::PlainTextExtractor;

use crate::detect::extension;
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Glyph prefixed to list items.
pub const BULLET: char = '•';

/// Trait for format extractors.
///
/// Implement this trait to add support for a new input format.
pub trait TextExtractor: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this extractor.
    fn name(&self) -> &str;

    /// Extract plain text from raw file bytes.
    fn extract(&self, bytes: &[u8]) -> Result<String>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the DOCX, TXT, RTF and HTML extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry.register(Arc::new(RtfExtractor::new()));
        registry.register(Arc::new(HtmlExtractor::new()));
        registry
    }

    /// Register an extractor for all its supported extensions.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors
                .insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Extract text, picking the extractor from the declared file name.
    pub fn extract(&self, bytes: &[u8], file_name: &str) -> Result<String> {
        let ext = extension(file_name);
        let extractor = self
            .get_by_extension(&ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.clone()))?;

        log::debug!("Extracting {} with the {} extractor", file_name, extractor.name());
        extractor.extract(bytes)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Extract text from `bytes` with the default extractors.
pub fn extract_text(bytes: &[u8], file_name: &str) -> Result<String> {
    ExtractorRegistry::with_defaults().extract(bytes, file_name)
}

/// Collapse runs of three or more newlines to one blank line.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"));
    re.replace_all(text, "\n\n").into_owned()
}
