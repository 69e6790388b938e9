//! Minimal ZIP container reader.
//!
//! Only what is needed to locate one named entry through the central
//! directory and decompress it: stored (method 0) and raw deflate
//! (method 8). No ZIP64, no encryption, no spanning.

mod reader;

pub use reader::{
    entries, find_and_inflate, ArchiveEntry, CompressionMethod, Entries, DOCX_DOCUMENT_PATH,
};
