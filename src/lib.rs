//! # docpdf
//!
//! Convert office-style documents into branded PDF files.
//!
//! Uploaded DOCX, TXT, RTF and HTML documents are reduced to plain text,
//! split into paragraphs classified as title, heading or body, and laid out
//! as a paginated PDF with fixed page decorations. PDF uploads pass through
//! untouched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docpdf::convert_file;
//!
//! fn main() -> docpdf::Result<()> {
//!     let result = convert_file("Quarterly Report.docx")?;
//!     std::fs::write(&result.file_name, &result.pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple input formats**: DOCX, plain text, RTF, HTML
//! - **Dependency-light container reader**: DOCX bodies are read straight from the ZIP
//! - **Role classification**: Title, heading and body blocks from paragraph shape
//! - **House rules**: Configurable masthead merge and centered notices
//! - **Self-contained PDF writer**: Base-14 fonts, wrapping, pagination, logo and footer
//! - **Block exchange**: Classified documents round-trip through JSON
//! - **Parallel batches**: Uses Rayon for multi-file uploads

pub mod archive;
pub mod assets;
pub mod classify;
pub mod detect;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod model;
pub mod pdf;
pub mod pipeline;

// Re-export commonly used types
pub use assets::{list_font_files, load_logo, AssetFetcher, FileFetcher, FontFile};
pub use classify::{Classifier, ClassifierConfig, CleanupOptions, HouseRule};
pub use detect::{pdf_version, InputKind};
pub use error::{ArchiveError, Error, Result};
pub use extract::{ExtractorRegistry, TextExtractor};
pub use model::{BlockRole, CodedDocument, FontWeight, JsonFormat, StyleConfig, TextBlock};
pub use pdf::{DocumentInfo, LayoutConfig, LogoImage, PageAssets};
pub use pipeline::{
    safe_output_name, ConvertOptions, ConvertResult, Converter, TextRewriter, UploadedFile,
};

use std::path::Path;
use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert a document held in memory.
///
/// # Arguments
///
/// * `name` - Declared file name; its extension selects the extractor
/// * `data` - File content
///
/// # Example
///
/// ```
/// use docpdf::convert_bytes;
///
/// let result = convert_bytes("notes.txt", b"Notes\n\nNothing to report.").unwrap();
/// assert_eq!(result.file_name, "notes.pdf");
/// ```
pub fn convert_bytes(name: &str, data: &[u8]) -> Result<ConvertResult> {
    pipeline::convert(name, data)
}

/// Convert a file on disk, named after its file name.
///
/// # Example
///
/// ```no_run
/// use docpdf::convert_file;
///
/// let result = convert_file("brief.rtf").unwrap();
/// println!("{} ({} bytes)", result.file_name, result.pdf.len());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    let (name, data) = read_named(path.as_ref())?;
    convert_bytes(&name, &data)
}

/// Convert a file with custom options.
///
/// # Example
///
/// ```no_run
/// use docpdf::{convert_file_with_options, ConvertOptions, PageAssets};
///
/// let options = ConvertOptions::new().with_assets(PageAssets::house());
/// let result = convert_file_with_options("brief.docx", options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let (name, data) = read_named(path.as_ref())?;
    Converter::new(options).convert(&name, &data)
}

/// Extract and classify a document held in memory.
///
/// # Example
///
/// ```
/// use docpdf::{preview_bytes, BlockRole};
///
/// let doc = preview_bytes("page.html", b"<h1>Welcome</h1><p>Hello there.</p>").unwrap();
/// assert_eq!(doc.blocks[0].role, BlockRole::Title);
/// ```
pub fn preview_bytes(name: &str, data: &[u8]) -> Result<CodedDocument> {
    pipeline::preview(name, data)
}

/// Extract and classify a file on disk.
pub fn preview_file<P: AsRef<Path>>(path: P) -> Result<CodedDocument> {
    let (name, data) = read_named(path.as_ref())?;
    preview_bytes(&name, &data)
}

/// Extract plain text from a file on disk.
///
/// # Example
///
/// ```no_run
/// use docpdf::extract_text;
///
/// let text = extract_text("letter.docx").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let (name, data) = read_named(path.as_ref())?;
    extract::extract_text(&data, &name)
}

/// Render classified blocks with default options.
///
/// # Example
///
/// ```
/// use docpdf::{render_blocks, TextBlock};
///
/// let pdf = render_blocks(&[TextBlock::title("Hello")]);
/// assert!(pdf.starts_with(b"%PDF-1.4"));
/// ```
pub fn render_blocks(blocks: &[TextBlock]) -> Vec<u8> {
    Converter::default().render(&CodedDocument::new(blocks.to_vec()))
}

/// Render a block exchange JSON document.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    let document = CodedDocument::from_json(json)?;
    Ok(Converter::default().render(&document))
}

fn read_named(path: &Path) -> Result<(String, Vec<u8>)> {
    let data = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((name, data))
}

/// Builder for converting documents.
///
/// # Example
///
/// ```no_run
/// use docpdf::{DocPdf, StyleConfig};
///
/// let result = DocPdf::new()
///     .with_house_template()
///     .with_logo_file("assets/logo.png")
///     .with_style(StyleConfig::new().with_scale(80.0))
///     .with_output_name("Client Brief")
///     .convert_file("brief.docx")?;
/// # Ok::<(), docpdf::Error>(())
/// ```
pub struct DocPdf {
    options: ConvertOptions,
    rewriter: Option<Arc<dyn TextRewriter>>,
}

impl DocPdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            rewriter: None,
        }
    }

    /// Set typography.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.options = self.options.with_style(style);
        self
    }

    /// Set page geometry.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set classification rules.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.options = self.options.with_classifier(config);
        self
    }

    /// Disable house rules; paragraphs keep their inferred roles.
    pub fn generic(mut self) -> Self {
        self.options = self.options.with_classifier(ClassifierConfig::generic());
        self
    }

    /// Use the house footer and first-page notice.
    pub fn with_house_template(mut self) -> Self {
        let logo = self.options.assets.logo.take();
        let info = std::mem::take(&mut self.options.assets.info);
        self.options.assets = PageAssets::house().with_logo(logo).with_info(info);
        self
    }

    /// Set page decorations.
    pub fn with_assets(mut self, assets: PageAssets) -> Self {
        self.options = self.options.with_assets(assets);
        self
    }

    /// Load a logo through a fetcher. A failed load leaves the logo out.
    pub fn with_logo(mut self, fetcher: &dyn AssetFetcher, location: &str) -> Self {
        self.options.assets.logo = load_logo(fetcher, location);
        self
    }

    /// Load a logo from the filesystem. A failed load leaves the logo out.
    pub fn with_logo_file(self, path: &str) -> Self {
        self.with_logo(&FileFetcher::new(), path)
    }

    /// Add a `/Info` dictionary naming this library, dated now.
    pub fn with_info(mut self, title: Option<String>) -> Self {
        self.options.assets.info = DocumentInfo::now(title);
        self
    }

    /// Set the output base name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.with_output_name(name);
        self
    }

    /// Add a text rewriting step.
    pub fn with_rewriter(mut self, rewriter: Arc<dyn TextRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Build the converter.
    pub fn build(self) -> Converter {
        let converter = Converter::new(self.options);
        match self.rewriter {
            Some(rewriter) => converter.with_rewriter(rewriter),
            None => converter,
        }
    }

    /// Convert a file on disk.
    pub fn convert_file<P: AsRef<Path>>(self, path: P) -> Result<ConvertResult> {
        let (name, data) = read_named(path.as_ref())?;
        self.build().convert(&name, &data)
    }

    /// Convert a document held in memory.
    pub fn convert_bytes(self, name: &str, data: &[u8]) -> Result<ConvertResult> {
        self.build().convert(name, data)
    }
}

impl Default for DocPdf {
    fn default() -> Self {
        Self::new()
    }
}
