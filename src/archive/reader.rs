//! Central directory walk and entry extraction.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::DeflateDecoder;

use crate::error::{ArchiveError, Result};

/// Path of the main document part inside a DOCX container.
pub const DOCX_DOCUMENT_PATH: &str = "word/document.xml";

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const CENTRAL_SIGNATURE: u32 = 0x0201_4b50;
const LOCAL_SIGNATURE: u32 = 0x0403_4b50;

/// Fixed part of the end-of-central-directory record.
const EOCD_LEN: usize = 22;
/// EOCD record plus the largest possible comment.
const EOCD_SEARCH_WINDOW: usize = EOCD_LEN + u16::MAX as usize;
const CENTRAL_HEADER_LEN: usize = 46;
const LOCAL_HEADER_LEN: usize = 30;

/// Compression method of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Method 0
    Stored,
    /// Method 8, raw deflate
    Deflate,
    /// Anything else
    Unsupported(u16),
}

impl From<u16> for CompressionMethod {
    fn from(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            other => CompressionMethod::Unsupported(other),
        }
    }
}

/// One central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry path inside the container
    pub name: String,
    /// Compression method
    pub method: CompressionMethod,
    /// Size of the stored payload
    pub compressed_size: u32,
    /// Size after decompression (0 when unknown)
    pub uncompressed_size: u32,
    /// Offset of the matching local header
    pub local_header_offset: u32,
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset.checked_add(2)?)
        .map(LittleEndian::read_u16)
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset.checked_add(4)?)
        .map(LittleEndian::read_u32)
}

/// Locate the end-of-central-directory record, scanning backward.
fn find_eocd(data: &[u8]) -> Option<usize> {
    if data.len() < EOCD_LEN {
        return None;
    }
    let last = data.len() - EOCD_LEN;
    let first = data.len().saturating_sub(EOCD_SEARCH_WINDOW);
    (first..=last)
        .rev()
        .find(|&pos| read_u32(data, pos) == Some(EOCD_SIGNATURE))
}

/// Iterator over central directory records.
pub struct Entries<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    failed: bool,
}

impl<'a> Entries<'a> {
    fn parse_record(&mut self) -> std::result::Result<ArchiveEntry, ArchiveError> {
        let data = self.data;
        let ptr = self.pos;

        if read_u32(data, ptr) != Some(CENTRAL_SIGNATURE) {
            return Err(ArchiveError::CorruptEntry);
        }

        let field16 = |off: usize| read_u16(data, ptr + off).ok_or(ArchiveError::CorruptEntry);
        let field32 = |off: usize| read_u32(data, ptr + off).ok_or(ArchiveError::CorruptEntry);

        let method = field16(10)?;
        let compressed_size = field32(20)?;
        let uncompressed_size = field32(24)?;
        let name_len = field16(28)? as usize;
        let extra_len = field16(30)? as usize;
        let comment_len = field16(32)? as usize;
        let local_header_offset = field32(42)?;

        let name_start = ptr + CENTRAL_HEADER_LEN;
        let name_bytes = data
            .get(name_start..name_start + name_len)
            .ok_or(ArchiveError::CorruptEntry)?;

        self.pos = name_start + name_len + extra_len + comment_len;

        Ok(ArchiveEntry {
            name: String::from_utf8_lossy(name_bytes).into_owned(),
            method: method.into(),
            compressed_size,
            uncompressed_size,
            local_header_offset,
        })
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = std::result::Result<ArchiveEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.end {
            return None;
        }
        let record = self.parse_record();
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }
}

/// Walk the central directory of a ZIP container.
///
/// Fails up front with `MissingDirectory` when no end-of-central-directory
/// record exists in the last 65,557 bytes; each yielded record fails with
/// `CorruptEntry` on a signature mismatch or truncation, after which the
/// iterator stops.
pub fn entries(data: &[u8]) -> std::result::Result<Entries<'_>, ArchiveError> {
    let eocd = find_eocd(data).ok_or(ArchiveError::MissingDirectory)?;
    let size = read_u32(data, eocd + 12).ok_or(ArchiveError::MissingDirectory)? as usize;
    let offset = read_u32(data, eocd + 16).ok_or(ArchiveError::MissingDirectory)? as usize;

    Ok(Entries {
        data,
        pos: offset,
        end: offset.saturating_add(size),
        failed: false,
    })
}

/// Payload of an entry, resolved through its own local header.
///
/// The local header's name and extra lengths may differ from the central
/// directory copy, so the data offset is recomputed from the local header.
fn entry_payload<'a>(data: &'a [u8], entry: &ArchiveEntry) -> std::result::Result<&'a [u8], ArchiveError> {
    let header = entry.local_header_offset as usize;
    if read_u32(data, header) != Some(LOCAL_SIGNATURE) {
        return Err(ArchiveError::BadLocalHeader);
    }

    let name_len = read_u16(data, header + 26).ok_or(ArchiveError::BadLocalHeader)? as usize;
    let extra_len = read_u16(data, header + 28).ok_or(ArchiveError::BadLocalHeader)? as usize;
    let start = header + LOCAL_HEADER_LEN + name_len + extra_len;
    let end = start + entry.compressed_size as usize;

    data.get(start..end).ok_or(ArchiveError::CorruptEntry)
}

fn decompress(payload: &[u8], entry: &ArchiveEntry) -> std::result::Result<Vec<u8>, ArchiveError> {
    match entry.method {
        CompressionMethod::Stored => Ok(payload.to_vec()),
        CompressionMethod::Deflate => {
            let mut inflated = Vec::with_capacity(entry.uncompressed_size as usize);
            DeflateDecoder::new(payload)
                .read_to_end(&mut inflated)
                .map_err(|e| ArchiveError::Inflate(e.to_string()))?;

            if entry.uncompressed_size != 0 && inflated.len() != entry.uncompressed_size as usize {
                return Err(ArchiveError::UnexpectedSize {
                    expected: entry.uncompressed_size,
                    actual: inflated.len(),
                });
            }
            Ok(inflated)
        }
        CompressionMethod::Unsupported(method) => Err(ArchiveError::UnsupportedMethod(method)),
    }
}

/// Extract and decompress the entry at `entry_path`.
///
/// # Example
///
/// ```no_run
/// use docpdf::archive::{find_and_inflate, DOCX_DOCUMENT_PATH};
///
/// let data = std::fs::read("report.docx").unwrap();
/// let xml = find_and_inflate(&data, DOCX_DOCUMENT_PATH).unwrap();
/// println!("{} bytes of document XML", xml.len());
/// ```
pub fn find_and_inflate(data: &[u8], entry_path: &str) -> Result<Vec<u8>> {
    for record in entries(data)? {
        let entry = record?;
        if entry.name != entry_path {
            continue;
        }

        log::debug!(
            "Found {} ({:?}, {} -> {} bytes)",
            entry.name,
            entry.method,
            entry.compressed_size,
            entry.uncompressed_size
        );

        let payload = entry_payload(data, &entry)?;
        return Ok(decompress(payload, &entry)?);
    }

    Err(ArchiveError::EntryNotFound(entry_path.to_string()).into())
}
