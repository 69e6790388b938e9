//! Error types for docpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for docpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file extension does not map to a supported input kind.
    #[error("Unsupported file type '{0}': upload DOCX, TXT, RTF, or HTML")]
    UnsupportedFormat(String),

    /// The ZIP container backing a DOCX file is malformed.
    #[error("Invalid DOCX file ({0})")]
    Archive(#[from] ArchiveError),

    /// The container XML could not be tokenized.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The upload payload is not valid base64.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Block exchange (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// A pass-through upload does not carry a PDF header.
    #[error("Not a valid PDF file")]
    NotPdf,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller can fix this by supplying a different input.
    ///
    /// Everything else is a server-side defect and should be reported
    /// without internal detail.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Other(_))
    }
}

/// Reasons a ZIP container is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// No end-of-central-directory record in the trailing window.
    #[error("missing zip directory")]
    MissingDirectory,

    /// A central directory record is malformed or out of bounds.
    #[error("corrupt zip entry")]
    CorruptEntry,

    /// The local header does not carry its signature.
    #[error("bad local header")]
    BadLocalHeader,

    /// The inflated size disagrees with the central directory.
    #[error("unexpected decompressed size: expected {expected} bytes, got {actual}")]
    UnexpectedSize {
        /// Size recorded in the central directory
        expected: u32,
        /// Size actually produced
        actual: usize,
    },

    /// Compression method other than stored (0) or deflate (8).
    #[error("unsupported compression method {0}")]
    UnsupportedMethod(u16),

    /// The raw deflate stream could not be decoded.
    #[error("invalid deflate stream: {0}")]
    Inflate(String),

    /// The central directory has no entry with the requested path.
    #[error("{0} not found")]
    EntryNotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Archive(ArchiveError::MissingDirectory);
        assert_eq!(err.to_string(), "Invalid DOCX file (missing zip directory)");

        let err = Error::Archive(ArchiveError::EntryNotFound("word/document.xml".into()));
        assert_eq!(
            err.to_string(),
            "Invalid DOCX file (word/document.xml not found)"
        );

        let err = Error::UnsupportedFormat("odt".into());
        assert!(err.to_string().contains("'odt'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_user_errors() {
        assert!(Error::UnsupportedFormat("odt".into()).is_user_error());
        assert!(Error::Archive(ArchiveError::CorruptEntry).is_user_error());
        assert!(!Error::Other("boom".into()).is_user_error());
    }
}
