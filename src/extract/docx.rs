//! DOCX text extraction from `word/document.xml`.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{collapse_blank_lines, TextExtractor, BULLET};
use crate::archive::{find_and_inflate, DOCX_DOCUMENT_PATH};
use crate::error::Result;

/// DOCX extractor.
///
/// Reads the main document part out of the ZIP container and keeps the
/// text of every `<w:p>` paragraph: consecutive `<w:t>` runs are joined,
/// paragraphs carrying `<w:numPr>` become bullet items.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    _private: (),
}

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for DocxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let xml = find_and_inflate(bytes, DOCX_DOCUMENT_PATH)?;
        document_text(&String::from_utf8_lossy(&xml))
    }
}

#[derive(Default)]
struct ParagraphState {
    text: String,
    is_bullet: bool,
}

impl ParagraphState {
    fn finish(self) -> Option<String> {
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else if self.is_bullet {
            Some(format!("{} {}", BULLET, text))
        } else {
            Some(text.to_string())
        }
    }
}

/// Paragraph text of a WordprocessingML body, joined by blank lines.
pub(crate) fn document_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    // Paragraphs nest inside text boxes; the innermost one collects runs.
    let mut open: Vec<ParagraphState> = Vec::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(ParagraphState::default()),
                b"w:t" => in_run_text = true,
                b"w:numPr" => {
                    if let Some(p) = open.last_mut() {
                        p.is_bullet = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:numPr" => {
                    if let Some(p) = open.last_mut() {
                        p.is_bullet = true;
                    }
                }
                b"w:tab" => {
                    if let Some(p) = open.last_mut() {
                        p.text.push('\t');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                if let Some(p) = open.last_mut() {
                    match t.unescape() {
                        Ok(text) => p.text.push_str(&text),
                        Err(_) => p.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Event::CData(c) if in_run_text => {
                if let Some(p) = open.last_mut() {
                    p.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => {
                    if let Some(text) = open.pop().and_then(ParagraphState::finish) {
                        paragraphs.push(text);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("DOCX body yielded {} paragraphs", paragraphs.len());
    Ok(collapse_blank_lines(&paragraphs.join("\n\n"))
        .trim()
        .to_string())
}
