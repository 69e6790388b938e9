//! RTF text extraction.

use std::iter::Peekable;
use std::str::Chars;

use super::{collapse_blank_lines, TextExtractor, BULLET};
use crate::encoding::decode_byte;
use crate::error::Result;

/// Destination groups whose content is never document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "fldinst",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "filetbl",
    "revtbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "xmlnstbl",
];

/// RTF extractor.
///
/// Tokenizes control words, maps `\par`/`\line`/`\tab` to whitespace,
/// decodes `\'hh` and `\uN` escapes and drops group delimiters along
/// with non-text destinations such as the font table.
#[derive(Debug, Clone, Default)]
pub struct RtfExtractor {
    _private: (),
}

impl RtfExtractor {
    /// Create a new RTF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for RtfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["rtf"]
    }

    fn name(&self) -> &str {
        "rtf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(rtf_to_text(&String::from_utf8_lossy(bytes)))
    }
}

struct RtfState {
    out: String,
    /// Skip flag of each enclosing group
    groups: Vec<bool>,
    skipping: bool,
    /// Set right after `{`, where a destination keyword may appear
    group_start: bool,
    /// Fallback characters still to drop after a `\uN`
    pending_fallback: usize,
}

impl RtfState {
    fn emit(&mut self, c: char) {
        if self.skipping {
            return;
        }
        if self.pending_fallback > 0 {
            self.pending_fallback -= 1;
            return;
        }
        self.out.push(c);
    }

    fn emit_str(&mut self, s: &str) {
        if !self.skipping {
            self.pending_fallback = 0;
            self.out.push_str(s);
        }
    }

    fn control_word(&mut self, word: &str, param: Option<i32>) {
        if self.group_start && SKIPPED_DESTINATIONS.contains(&word) {
            self.skipping = true;
            return;
        }
        match word {
            "par" | "sect" | "page" => self.emit_str("\n\n"),
            "line" => self.emit_str("\n"),
            "tab" => self.emit_str("\t"),
            "emdash" => self.emit_str("\u{2014}"),
            "endash" => self.emit_str("\u{2013}"),
            "bullet" => self.emit_str(&BULLET.to_string()),
            "lquote" => self.emit_str("\u{2018}"),
            "rquote" => self.emit_str("\u{2019}"),
            "ldblquote" => self.emit_str("\u{201C}"),
            "rdblquote" => self.emit_str("\u{201D}"),
            "u" => {
                if let Some(code) = param {
                    let code = if code < 0 { code + 65536 } else { code };
                    if let Some(c) = char::from_u32(code as u32) {
                        if !self.skipping {
                            self.out.push(c);
                            self.pending_fallback = 1;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn read_control_word(chars: &mut Peekable<Chars<'_>>) -> (String, Option<i32>) {
    let mut word = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut digits = String::new();
    if chars.peek() == Some(&'-') {
        digits.push('-');
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    let param = digits.parse::<i32>().ok();

    // A single space delimits the control word and is not text.
    if chars.peek() == Some(&' ') {
        chars.next();
    }
    (word, param)
}

fn read_hex_byte(chars: &mut Peekable<Chars<'_>>) -> Option<u8> {
    let hi = chars.next()?.to_digit(16)?;
    let lo = chars.next()?.to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Plain text of an RTF document.
pub(crate) fn rtf_to_text(rtf: &str) -> String {
    let mut state = RtfState {
        out: String::with_capacity(rtf.len() / 2),
        groups: Vec::new(),
        skipping: false,
        group_start: false,
        pending_fallback: 0,
    };
    let mut chars = rtf.chars().peekable();

    while let Some(c) = chars.next() {
        let at_group_start = std::mem::replace(&mut state.group_start, false);
        match c {
            '{' => {
                state.groups.push(state.skipping);
                state.group_start = true;
            }
            '}' => {
                state.skipping = state.groups.pop().unwrap_or(false);
                state.pending_fallback = 0;
            }
            '\r' | '\n' => {}
            '\\' => match chars.peek().copied() {
                Some(next) if next.is_ascii_alphabetic() => {
                    let (word, param) = read_control_word(&mut chars);
                    state.group_start = at_group_start;
                    state.control_word(&word, param);
                    state.group_start = false;
                }
                Some('\'') => {
                    chars.next();
                    if let Some(byte) = read_hex_byte(&mut chars) {
                        state.emit(decode_byte(byte));
                    }
                }
                Some('*') => {
                    chars.next();
                    if at_group_start {
                        state.skipping = true;
                    }
                }
                Some(literal @ ('\\' | '{' | '}')) => {
                    chars.next();
                    state.emit(literal);
                }
                Some('~') => {
                    chars.next();
                    state.emit('\u{00A0}');
                }
                Some('_') => {
                    chars.next();
                    state.emit('-');
                }
                Some('\r') | Some('\n') => {
                    chars.next();
                    state.emit_str("\n\n");
                }
                Some(_) => {
                    chars.next();
                }
                None => {}
            },
            other => state.emit(other),
        }
    }

    collapse_blank_lines(&state.out).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_control_words() {
        assert_eq!(rtf_to_text("\\par Hello\\par World"), "Hello\n\nWorld");
    }

    #[test]
    fn test_document_with_font_table() {
        let rtf = r"{\rtf1\ansi\deff0{\fonttbl{\f0\froman Times New Roman;}}{\colortbl;\red0\green0\blue0;}\f0\fs24 Title\par\par\par Body text.\line Next line}";
        assert_eq!(rtf_to_text(rtf), "Title\n\nBody text.\nNext line");
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        assert_eq!(rtf_to_text(r"caf\'e9 \'93q\'94"), "caf\u{e9} \u{201C}q\u{201D}");
        let bullet = format!("{}u8226? item", '\\');
        assert_eq!(rtf_to_text(&bullet), "\u{2022} item");
        assert_eq!(rtf_to_text(r"\u-3913\'3f"), "\u{F0B7}");
    }

    #[test]
    fn test_ignorable_destination_and_literals() {
        let rtf = r"{\*\generator Writer;}a \{b\} c\\d";
        assert_eq!(rtf_to_text(rtf), "a {b} c\\d");
    }

    #[test]
    fn test_tab_and_symbols() {
        assert_eq!(rtf_to_text(r"a\tab b\emdash c"), "a\tb\u{2014}c");
    }
}
