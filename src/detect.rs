//! Input format detection from file names and PDF header validation.

use crate::error::{Error, Result};
use std::fmt;

/// Kind of document accepted by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// ZIP-packaged word-processing document
    Docx,
    /// Plain UTF-8 text
    Text,
    /// Rich Text Format
    Rtf,
    /// HTML page (`.html` or `.htm`)
    Html,
    /// Already a PDF, passed through untouched
    Pdf,
}

impl InputKind {
    /// Map a lower-case extension to an input kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(InputKind::Docx),
            "txt" => Some(InputKind::Text),
            "rtf" => Some(InputKind::Rtf),
            "html" | "htm" => Some(InputKind::Html),
            "pdf" => Some(InputKind::Pdf),
            _ => None,
        }
    }

    /// Detect the input kind from a declared file name.
    ///
    /// Returns `Error::UnsupportedFormat` carrying the extension when the
    /// name does not map to a known kind.
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = extension(name);
        Self::from_extension(&ext).ok_or(Error::UnsupportedFormat(ext))
    }

    /// Whether text can be extracted from this kind (everything but PDF).
    pub fn is_extractable(&self) -> bool {
        !matches!(self, InputKind::Pdf)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Docx => "DOCX",
            InputKind::Text => "TXT",
            InputKind::Rtf => "RTF",
            InputKind::Html => "HTML",
            InputKind::Pdf => "PDF",
        };
        f.write_str(name)
    }
}

/// Extension of a declared file name: the text after the last `.`,
/// lower-cased. A name without a dot is its own extension.
pub fn extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the PDF version from a buffer's header (e.g. `"1.4"`).
///
/// Returns `Error::NotPdf` if the data does not start with `%PDF-x.y`.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::NotPdf);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let valid = version_bytes[0].is_ascii_digit()
        && version_bytes[1] == b'.'
        && version_bytes[2].is_ascii_digit();
    if !valid {
        return Err(Error::NotPdf);
    }

    Ok(String::from_utf8_lossy(version_bytes).to_string())
}
