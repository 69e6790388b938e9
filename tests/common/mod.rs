//! Shared fixtures: DOCX bodies and ZIP containers built byte by byte.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::write::DeflateEncoder;
use flate2::Compression;

pub const DOCUMENT_PATH: &str = "word/document.xml";

/// A WordprocessingML body with one `<w:p>` per paragraph; paragraphs
/// starting with `*` become numbered list items.
pub fn document_xml(paragraphs: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for p in paragraphs {
        match p.strip_prefix('*') {
            Some(item) => xml.push_str(&format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
                item
            )),
            None => xml.push_str(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p)),
        }
    }
    xml.push_str("</w:body></w:document>");
    xml
}

/// Raw (headerless) deflate.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A real archive written by the `zip` crate.
pub fn zip_archive(files: &[(&str, &[u8])], deflated: bool) -> Vec<u8> {
    let method = if deflated {
        zip::CompressionMethod::Deflated
    } else {
        zip::CompressionMethod::Stored
    };
    let options = zip::write::SimpleFileOptions::default().compression_method(method);

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A DOCX-shaped archive with the given paragraphs.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let xml = document_xml(paragraphs);
    zip_archive(
        &[
            ("[Content_Types].xml", b"<Types/>".as_slice()),
            (DOCUMENT_PATH, xml.as_bytes()),
        ],
        true,
    )
}

/// One entry of a hand-built container.
#[derive(Clone)]
pub struct RawEntry {
    pub name: String,
    pub method: u16,
    pub payload: Vec<u8>,
    pub uncompressed_size: u32,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub local_signature: u32,
}

impl RawEntry {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            method: 0,
            payload: data.to_vec(),
            uncompressed_size: data.len() as u32,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            local_signature: 0x0403_4b50,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            method: 8,
            payload: deflate(data),
            ..Self::stored(name, data)
        }
    }
}

/// Serialize entries as local headers, central directory and EOCD record.
pub fn build_container(entries: &[RawEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::new();

    for e in entries {
        offsets.push(out.len() as u32);
        out.extend_from_slice(&e.local_signature.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&e.method.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // time, date
        out.extend_from_slice(&0u32.to_le_bytes()); // crc
        out.extend_from_slice(&(e.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&e.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(e.local_extra.len() as u16).to_le_bytes());
        out.extend_from_slice(e.name.as_bytes());
        out.extend_from_slice(&e.local_extra);
        out.extend_from_slice(&e.payload);
    }

    let cd_start = out.len() as u32;
    for (e, offset) in entries.iter().zip(&offsets) {
        out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version made by
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&e.method.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // time, date
        out.extend_from_slice(&0u32.to_le_bytes()); // crc
        out.extend_from_slice(&(e.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&e.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(e.central_extra.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // comment length
        out.extend_from_slice(&0u16.to_le_bytes()); // disk number
        out.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
        out.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(e.name.as_bytes());
        out.extend_from_slice(&e.central_extra);
    }
    let cd_size = out.len() as u32 - cd_start;

    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_start.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}
