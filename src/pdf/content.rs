//! Page content stream assembly.

use std::fmt::Write as _;

use super::layout::RgbColor;
use super::metrics::BaseFont;
use crate::encoding::encode_lossy;

/// Format a number for a content stream: at most two decimals, no
/// trailing zeros.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Encode text as a PDF literal string in WinAnsi bytes.
///
/// Delimiters and backslashes are escaped; bytes outside printable ASCII
/// are written as octal escapes.
pub fn literal_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for byte in encode_lossy(text) {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    out.push(')');
    out
}

/// Builder for one page's content stream.
#[derive(Debug, Default)]
pub struct ContentStream {
    buf: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the non-stroking color.
    pub fn fill_color(&mut self, color: RgbColor) -> &mut Self {
        let channel = |c: u8| fmt_num(f64::from(c) / 255.0);
        let _ = writeln!(
            self.buf,
            "{} {} {} rg",
            channel(color.0),
            channel(color.1),
            channel(color.2)
        );
        self
    }

    /// Fill a rectangle in PDF coordinates (origin bottom-left).
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = writeln!(
            self.buf,
            "{} {} {} {} re f",
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height)
        );
        self
    }

    /// Show a line of text with its baseline origin at `(x, y)`.
    pub fn text(&mut self, font: BaseFont, size: f64, x: f64, y: f64, text: &str) -> &mut Self {
        let _ = writeln!(
            self.buf,
            "BT /{} {} Tf {} {} Td {} Tj ET",
            font.resource_name(),
            fmt_num(size),
            fmt_num(x),
            fmt_num(y),
            literal_string(text)
        );
        self
    }

    /// Paint an image XObject into the given box.
    pub fn image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = writeln!(
            self.buf,
            "q {} 0 0 {} {} {} cm /{} Do Q",
            fmt_num(width),
            fmt_num(height),
            fmt_num(x),
            fmt_num(y),
            name
        );
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}
