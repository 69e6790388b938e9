//! Conversion pipeline: extract, classify, synthesize.
//!
//! # Example
//!
//! ```
//! use docpdf::pipeline::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions::default());
//! let result = converter.convert("Quarterly Notes.txt", b"Notes\n\nAll good.")?;
//! assert_eq!(result.file_name, "Quarterly-Notes.pdf");
//! assert!(result.pdf.starts_with(b"%PDF-"));
//! # Ok::<(), docpdf::Error>(())
//! ```

use std::sync::{Arc, OnceLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, ClassifierConfig};
use crate::detect::{extension, pdf_version, InputKind};
use crate::error::{Error, Result};
use crate::extract::ExtractorRegistry;
use crate::model::{CodedDocument, StyleConfig};
use crate::pdf::{self, LayoutConfig, PageAssets};

/// A file as submitted by a client: name, optional MIME type, base64 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64 (standard alphabet) file content
    pub data: String,
}

impl UploadedFile {
    /// Wrap raw bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            data: STANDARD.encode(bytes),
        }
    }

    /// Decode the base64 body.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.trim())?)
    }
}

/// Optional text rewriting step between extraction and classification.
///
/// Failures never abort a conversion; the unrewritten text is used instead.
pub trait TextRewriter: Send + Sync {
    fn rewrite(&self, text: &str, source_name: &str) -> Result<String>;
}

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Typography
    pub style: StyleConfig,

    /// Page geometry
    pub layout: LayoutConfig,

    /// House-style classification rules
    pub classifier: ClassifierConfig,

    /// Logo, footer, notice and document info
    pub assets: PageAssets,

    /// Output base name overriding the one derived from the input
    pub output_name: Option<String>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set typography.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Set page geometry.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set classification rules.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set page decorations.
    pub fn with_assets(mut self, assets: PageAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Set the output base name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Sanitized output file name, ending in `.pdf`
    pub file_name: String,

    /// PDF bytes
    pub pdf: Vec<u8>,

    /// Classified blocks; `None` for PDF pass-through
    pub document: Option<CodedDocument>,
}

/// Document converter.
pub struct Converter {
    registry: ExtractorRegistry,
    classifier: Classifier,
    options: ConvertOptions,
    rewriter: Option<Arc<dyn TextRewriter>>,
}

impl Converter {
    /// Create a converter with the default extractors.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(),
            classifier: Classifier::new(options.classifier.clone()),
            options,
            rewriter: None,
        }
    }

    /// Replace the extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a rewriting step.
    pub fn with_rewriter(mut self, rewriter: Arc<dyn TextRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Active options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Extract plain text, rewritten when a rewriter is configured.
    pub fn extract_text(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let text = self.registry.extract(bytes, name)?;
        let Some(rewriter) = &self.rewriter else {
            return Ok(text);
        };
        match rewriter.rewrite(&text, name) {
            Ok(rewritten) => Ok(rewritten),
            Err(e) => {
                log::warn!("Rewriting {} failed, keeping extracted text: {}", name, e);
                Ok(text)
            }
        }
    }

    /// Extract and classify without producing a PDF.
    ///
    /// PDF input has no text to classify and is rejected as unsupported.
    pub fn preview(&self, name: &str, bytes: &[u8]) -> Result<CodedDocument> {
        let ext = extension(name);
        if InputKind::from_extension(&ext).is_some_and(|kind| !kind.is_extractable()) {
            return Err(Error::UnsupportedFormat(ext));
        }
        let text = self.extract_text(name, bytes)?;
        Ok(CodedDocument::new(self.classifier.classify(&text)))
    }

    /// Synthesize a PDF from an already classified document.
    pub fn render(&self, document: &CodedDocument) -> Vec<u8> {
        pdf::build(
            &document.blocks,
            &self.options.style,
            &self.options.layout,
            &self.options.assets,
        )
    }

    /// Convert a named document to PDF. PDF input is validated and passed through.
    pub fn convert(&self, name: &str, bytes: &[u8]) -> Result<ConvertResult> {
        let file_name = output_file_name(self.options.output_name.as_deref().unwrap_or(name));

        if InputKind::from_extension(&extension(name)) == Some(InputKind::Pdf) {
            let version = pdf_version(bytes)?;
            log::debug!("Passing through {} (PDF {})", name, version);
            return Ok(ConvertResult {
                file_name,
                pdf: bytes.to_vec(),
                document: None,
            });
        }

        let document = self.preview(name, bytes)?;
        let pdf = self.render(&document);
        log::debug!("Converted {} into {} bytes of PDF", name, pdf.len());
        Ok(ConvertResult {
            file_name,
            pdf,
            document: Some(document),
        })
    }

    /// Convert an uploaded file.
    pub fn convert_upload(&self, file: &UploadedFile) -> Result<ConvertResult> {
        let bytes = file.decode()?;
        self.convert(&file.name, &bytes)
    }

    /// Convert several uploads in parallel, one result per file in input order.
    ///
    /// The output name override applies to single-file batches only.
    pub fn convert_batch(&self, files: &[UploadedFile]) -> Vec<Result<ConvertResult>> {
        if files.len() > 1 && self.options.output_name.is_some() {
            let options = ConvertOptions {
                output_name: None,
                ..self.options.clone()
            };
            let converter = Converter {
                registry: self.registry.clone(),
                classifier: self.classifier.clone(),
                options,
                rewriter: self.rewriter.clone(),
            };
            return converter.convert_batch(files);
        }
        files.par_iter().map(|file| self.convert_upload(file)).collect()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// File-system-safe base name: extension removed, characters outside
/// `[A-Za-z0-9-_ ]` dropped, whitespace runs replaced by `-`.
///
/// Falls back to `document`.
pub fn safe_output_name(name: &str) -> String {
    static EXT: OnceLock<Regex> = OnceLock::new();
    static WS: OnceLock<Regex> = OnceLock::new();
    let ext = EXT.get_or_init(|| Regex::new(r"\.[^/.]+$").expect("valid regex"));
    let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let stem = ext.replace(name, "");
    let kept: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let safe = ws.replace_all(kept.trim(), "-").into_owned();
    if safe.is_empty() {
        "document".to_string()
    } else {
        safe
    }
}

/// Output PDF file name for an input or override name.
pub fn output_file_name(name: &str) -> String {
    format!("{}.pdf", safe_output_name(name))
}

/// Convert bytes with default options.
pub fn convert(name: &str, bytes: &[u8]) -> Result<ConvertResult> {
    Converter::default().convert(name, bytes)
}

/// Convert several uploads with default options.
pub fn convert_batch(files: &[UploadedFile]) -> Vec<Result<ConvertResult>> {
    Converter::default().convert_batch(files)
}

/// Preview bytes with default options.
pub fn preview(name: &str, bytes: &[u8]) -> Result<CodedDocument> {
    Converter::default().preview(name, bytes)
}
